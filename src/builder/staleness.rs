//! Staleness propagation.
//!
//! Three phases over a resolved inventory:
//!
//! 1. Seed: a file is dirty if the ledger has no entry for it or its recorded
//!    time differs from the observed one. An untrusted ledger seeds everything.
//! 2. Header closure: a worklist walks reverse include edges from every dirty
//!    header, marking each header that includes it.
//! 3. Source closure: a source needs a rebuild if it is dirty, includes a stale
//!    header, or its object file is missing.

use std::collections::VecDeque;
use std::path::PathBuf;

use serde::Serialize;

use crate::builder::context::BuildContext;
use crate::builder::graph::IncludeGraph;
use crate::core::inventory::{FileKind, Inventory, StaleReason};
use crate::core::ledger::ChangeLedger;

/// How the seed phase treats the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedMode {
    /// Compare every file with its ledger entry.
    Incremental,
    /// Treat every file as dirty.
    FullRebuild,
}

/// One stale file and the reason it was marked.
#[derive(Debug, Clone, Serialize)]
pub struct StaleEntry {
    /// Path relative to the project root
    pub path: PathBuf,
    pub kind: FileKind,
    pub reason: StaleReason,
}

/// Summary of one propagation, for `quarry status`.
#[derive(Debug, Clone, Serialize)]
pub struct StalenessReport {
    pub full_rebuild: bool,
    pub headers: Vec<StaleEntry>,
    pub sources: Vec<StaleEntry>,
    pub up_to_date: usize,
}

impl StalenessReport {
    /// Collect the stale files of a propagated inventory, in inventory order.
    pub fn from_inventory(inv: &Inventory, mode: SeedMode) -> Self {
        let mut headers = Vec::new();
        let mut sources = Vec::new();
        let mut up_to_date = 0;

        for (_, file) in inv.iter() {
            let Some(reason) = file.stale_reason() else {
                if file.is_source() {
                    up_to_date += 1;
                }
                continue;
            };

            let entry = StaleEntry {
                path: crate::util::fs::relative_path(inv.root(), file.path()),
                kind: file.kind(),
                reason: reason.clone(),
            };
            if file.is_header() {
                headers.push(entry);
            } else {
                sources.push(entry);
            }
        }

        StalenessReport {
            full_rebuild: mode == SeedMode::FullRebuild,
            headers,
            sources,
            up_to_date,
        }
    }

    /// Number of sources that will be recompiled.
    pub fn rebuild_count(&self) -> usize {
        self.sources.len()
    }
}

/// Mark every file of `inv` that needs rebuilding.
///
/// Dependencies must already be resolved. Recorded times are copied from the
/// ledger onto each file so the ledger policy can fall back to them later.
pub fn propagate(
    inv: &mut Inventory,
    ledger: &ChangeLedger,
    mode: SeedMode,
    ctx: &BuildContext,
) -> StalenessReport {
    seed(inv, ledger, mode);

    let graph = IncludeGraph::build(inv);
    tracing::debug!("Include graph has {} edge(s)", graph.edge_count());
    close_headers(inv, &graph);
    close_sources(inv, ctx);

    let report = StalenessReport::from_inventory(inv, mode);
    for entry in report.headers.iter().chain(report.sources.iter()) {
        tracing::debug!("stale: {} ({})", entry.path.display(), entry.reason);
    }
    report
}

fn seed(inv: &mut Inventory, ledger: &ChangeLedger, mode: SeedMode) {
    for id in inv.ids().collect::<Vec<_>>() {
        let file = inv.get_mut(id);
        let recorded = ledger.get(file.path());
        file.set_recorded_mtime(recorded);

        match (mode, recorded) {
            (SeedMode::FullRebuild, _) => file.mark_dirty(StaleReason::FullRebuild),
            (SeedMode::Incremental, None) => file.mark_dirty(StaleReason::Unrecorded),
            (SeedMode::Incremental, Some(recorded)) if recorded != file.observed_mtime() => {
                let observed = file.observed_mtime();
                file.mark_dirty(StaleReason::Modified { recorded, observed });
            }
            _ => {}
        }
    }
}

fn close_headers(inv: &mut Inventory, graph: &IncludeGraph) {
    let mut worklist: VecDeque<_> = inv
        .headers()
        .filter(|(_, f)| f.needs_rebuild())
        .map(|(id, _)| id)
        .collect();

    while let Some(header) = worklist.pop_front() {
        let path = inv.get(header).path().to_path_buf();

        for includer in graph.includers(header) {
            let file = inv.get_mut(includer);
            if !file.is_header() {
                continue;
            }
            if file.mark_stale(StaleReason::Header { path: path.clone() }) {
                worklist.push_back(includer);
            }
        }
    }
}

fn close_sources(inv: &mut Inventory, ctx: &BuildContext) {
    for id in inv.source_ids() {
        if inv.get(id).needs_rebuild() {
            continue;
        }

        let stale_header = inv
            .get(id)
            .dependencies()
            .iter()
            .find(|dep| inv.get(**dep).needs_rebuild())
            .map(|dep| inv.get(*dep).path().to_path_buf());

        let reason = match stale_header {
            Some(path) => StaleReason::Header { path },
            None => {
                let object = ctx.object_path(inv.get(id).path());
                if object.exists() {
                    continue;
                }
                StaleReason::MissingArtifact { path: object }
            }
        };

        inv.get_mut(id).mark_stale(reason);
    }
}
