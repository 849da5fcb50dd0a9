//! Implementation of `quarry clean`.

use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::builder::BuildContext;
use crate::core::{IgnoreSet, Inventory};
use crate::util::fs::remove_file_if_exists;

/// Remove every object file and the output binary.
///
/// The ledger is kept; missing objects make the next build recompile.
/// Returns the paths that were actually removed.
pub fn clean(ctx: &BuildContext) -> Result<Vec<PathBuf>> {
    let ignore = IgnoreSet::load(ctx.root(), ctx.ignore_path());
    let inv = Inventory::scan(ctx.root(), &ignore)?;

    let targets = inv
        .sources()
        .map(|(_, f)| ctx.object_path(f.path()))
        .chain(std::iter::once(ctx.binary().to_path_buf()));

    let mut removed = Vec::new();
    for path in targets {
        if remove_file_if_exists(&path)
            .with_context(|| format!("failed to remove {}", path.display()))?
        {
            tracing::debug!("Removed {}", path.display());
            removed.push(path);
        }
    }

    Ok(removed)
}
