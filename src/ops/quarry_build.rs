//! Implementation of `quarry build`.

use anyhow::{Context, Result};

use crate::builder::{
    next_ledger, propagate, BuildContext, BuildOrchestrator, BuildOutcome, SeedMode,
    StalenessReport, Toolchain,
};
use crate::core::{ChangeLedger, IgnoreSet, Inventory};
use crate::ops::quarry_tables::generate_tables_with;
use crate::scan::DependencyResolver;
use crate::tables::TableOutcome;

/// Options for the build command.
#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
    /// Rebuild everything regardless of the ledger
    pub force: bool,

    /// Relink existing objects without compiling
    pub link_only: bool,

    /// Regenerate component tables first
    pub tables: bool,

    /// Show a progress bar over compiles
    pub progress: bool,
}

/// Result of a successful build.
#[derive(Debug)]
pub struct BuildResult {
    pub inventory: Inventory,
    pub outcome: BuildOutcome,

    /// Staleness report (not produced by link-only builds)
    pub report: Option<StalenessReport>,

    /// Generated tables (if requested)
    pub tables: Vec<TableOutcome>,
}

/// Build the project.
///
/// The ledger is rewritten before a compile or link failure is returned as
/// an error, so the next run retries exactly the affected files.
pub fn build(
    ctx: &BuildContext,
    toolchain: &dyn Toolchain,
    opts: &BuildOptions,
) -> Result<BuildResult> {
    let ignore = IgnoreSet::load(ctx.root(), ctx.ignore_path());

    let tables = if opts.tables {
        generate_tables_with(ctx, &ignore)?
    } else {
        Vec::new()
    };

    let mut inv = Inventory::scan(ctx.root(), &ignore)?;
    let orchestrator = BuildOrchestrator::new(ctx, toolchain).with_progress(opts.progress);

    if opts.link_only {
        let link = orchestrator.link(&inv)?;
        let mut outcome = BuildOutcome {
            compiled: Vec::new(),
            failed: None,
            skipped: Vec::new(),
            link,
            error: None,
        };
        if let Some(err) = outcome.take_error(&inv, ctx) {
            return Err(err.into());
        }
        return Ok(BuildResult {
            inventory: inv,
            outcome,
            report: None,
            tables,
        });
    }

    let (ledger, state) = ChangeLedger::load(ctx.ledger_path());
    let mode = if opts.force {
        SeedMode::FullRebuild
    } else if !state.is_trusted() {
        tracing::info!("No usable build ledger, rebuilding everything");
        SeedMode::FullRebuild
    } else {
        SeedMode::Incremental
    };

    DependencyResolver::new(ctx).resolve_all(&mut inv)?;
    let report = propagate(&mut inv, &ledger, mode, ctx);
    tracing::debug!(
        "{} of {} sources need compiling",
        report.rebuild_count(),
        report.rebuild_count() + report.up_to_date
    );

    let mut outcome = orchestrator.run(&mut inv);

    next_ledger(&inv, &outcome)
        .save(ctx.ledger_path())
        .context("build ledger could not be saved")?;

    if let Some(err) = outcome.take_error(&inv, ctx) {
        return Err(err.into());
    }

    if outcome.is_noop() {
        tracing::info!("Nothing to compile");
    } else {
        tracing::debug!("Compiled {} source(s)", outcome.compiled.len());
    }

    Ok(BuildResult {
        inventory: inv,
        outcome,
        report: Some(report),
        tables,
    })
}
