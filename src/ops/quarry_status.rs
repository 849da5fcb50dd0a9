//! Implementation of `quarry status`.

use anyhow::Result;

use crate::builder::{propagate, BuildContext, SeedMode, StalenessReport};
use crate::core::{ChangeLedger, IgnoreSet, Inventory};
use crate::scan::DependencyResolver;

/// Work out what the next build would compile, without compiling anything.
pub fn status(ctx: &BuildContext, force: bool) -> Result<StalenessReport> {
    let ignore = IgnoreSet::load(ctx.root(), ctx.ignore_path());
    let mut inv = Inventory::scan(ctx.root(), &ignore)?;
    DependencyResolver::new(ctx).resolve_all(&mut inv)?;

    let (ledger, state) = ChangeLedger::load(ctx.ledger_path());
    let mode = if force || !state.is_trusted() {
        SeedMode::FullRebuild
    } else {
        SeedMode::Incremental
    };

    Ok(propagate(&mut inv, &ledger, mode, ctx))
}
