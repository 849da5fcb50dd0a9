//! Next ledger after a build run.
//!
//! A ledger entry claims that the file's current state is already reflected
//! in the objects on disk. After a fully successful run every file gets its
//! observed time. After a failure a file only gets its observed time if that
//! claim still holds:
//!
//! - a source is sealed if it was up to date or compiled this run;
//! - a header is sealed unless some source that still needs a rebuild
//!   includes it, directly or through other headers.
//!
//! Everything else keeps its previous entry, or none, so the next run retries
//! exactly the affected files.

use crate::builder::graph::IncludeGraph;
use crate::builder::orchestrator::BuildOutcome;
use crate::core::inventory::{FileId, Inventory};
use crate::core::ledger::ChangeLedger;

/// Compute the ledger to persist at the end of a build.
pub fn next_ledger(inv: &Inventory, outcome: &BuildOutcome) -> ChangeLedger {
    let mut ledger = ChangeLedger::new();

    if outcome.is_success() {
        for (_, file) in inv.iter() {
            ledger.record(file.path(), file.observed_mtime());
        }
        return ledger;
    }

    let unresolved: Vec<FileId> = inv
        .sources()
        .filter(|(_, f)| f.needs_rebuild() && !f.is_compiled())
        .map(|(id, _)| id)
        .collect();

    let graph = IncludeGraph::build(inv);
    let tainted = graph.reachable_from(unresolved.iter().copied());

    for (id, file) in inv.iter() {
        let sealed = if file.is_source() {
            !file.needs_rebuild() || file.is_compiled()
        } else {
            !tainted.contains(&id)
        };

        let time = if sealed {
            Some(file.observed_mtime())
        } else {
            file.recorded_mtime()
        };

        if let Some(time) = time {
            ledger.record(file.path(), time);
        } else {
            tracing::debug!("leaving {} out of the ledger", file.path().display());
        }
    }

    ledger
}
