//! Build orchestrator - sequential compile and link.
//!
//! Stale sources are compiled one at a time in inventory order. The first
//! failing compile stops the phase; sources after it are left untouched.
//! Every clean compile phase ends with a link, so removed sources also drop
//! out of the binary.

use std::path::{Path, PathBuf};

use indicatif::{ProgressBar, ProgressStyle};

use crate::builder::context::BuildContext;
use crate::builder::errors::BuildError;
use crate::builder::toolchain::{CompileInput, LinkInput, Toolchain};
use crate::core::inventory::{FileId, Inventory};
use crate::util::fs::remove_file_if_exists;

/// What happened in the link step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkOutcome {
    /// A compile failed, so linking was not attempted.
    Skipped,
    Linked,
    Failed { code: i32 },
}

/// Result of one build run.
#[derive(Debug)]
pub struct BuildOutcome {
    /// Sources compiled successfully this run, in order
    pub compiled: Vec<FileId>,
    /// The source whose compile failed, with the compiler's exit code
    pub failed: Option<(FileId, i32)>,
    /// Stale sources not attempted because of an earlier failure
    pub skipped: Vec<FileId>,
    pub link: LinkOutcome,
    /// Error that stopped the run when a tool could not be run at all
    pub error: Option<BuildError>,
}

impl BuildOutcome {
    /// Whether every required compile and the link succeeded.
    pub fn is_success(&self) -> bool {
        self.failed.is_none() && !matches!(self.link, LinkOutcome::Failed { .. })
    }

    /// Whether no source needed compiling.
    pub fn is_noop(&self) -> bool {
        self.compiled.is_empty() && self.failed.is_none()
    }

    /// Take the error to report for a failed run.
    ///
    /// A tool error is handed out once; exit-code failures are rebuilt from
    /// the outcome on every call.
    pub fn take_error(&mut self, inv: &Inventory, ctx: &BuildContext) -> Option<BuildError> {
        if let Some(err) = self.error.take() {
            return Some(err);
        }
        if let Some((id, code)) = self.failed {
            return Some(BuildError::CompileFailed {
                path: inv.get(id).path().to_path_buf(),
                code,
            });
        }
        if let LinkOutcome::Failed { code } = self.link {
            return Some(BuildError::LinkFailed {
                path: ctx.binary().to_path_buf(),
                code,
            });
        }
        None
    }
}

/// Drives the toolchain over a propagated inventory.
pub struct BuildOrchestrator<'a> {
    ctx: &'a BuildContext,
    toolchain: &'a dyn Toolchain,
    progress: ProgressBar,
}

impl<'a> BuildOrchestrator<'a> {
    pub fn new(ctx: &'a BuildContext, toolchain: &'a dyn Toolchain) -> Self {
        BuildOrchestrator {
            ctx,
            toolchain,
            progress: ProgressBar::hidden(),
        }
    }

    /// Show a progress bar over the compile steps.
    pub fn with_progress(mut self, show: bool) -> Self {
        if show {
            let pb = ProgressBar::new(0);
            if let Ok(style) = ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            {
                pb.set_style(style.progress_chars("#>-"));
            }
            self.progress = pb;
        }
        self
    }

    /// Compile every stale source, then link.
    ///
    /// Tool errors do not escape: they end the run like a failed compile or
    /// link and are kept in [`BuildOutcome::error`], so the caller can still
    /// persist the ledger.
    pub fn run(&self, inv: &mut Inventory) -> BuildOutcome {
        let stale: Vec<FileId> = inv
            .sources()
            .filter(|(_, f)| f.needs_rebuild())
            .map(|(id, _)| id)
            .collect();

        self.progress.set_length(stale.len() as u64);

        let mut outcome = BuildOutcome {
            compiled: Vec::new(),
            failed: None,
            skipped: Vec::new(),
            link: LinkOutcome::Skipped,
            error: None,
        };

        for id in stale {
            if outcome.failed.is_some() {
                outcome.skipped.push(id);
                continue;
            }

            let code = match self.compile(inv.get(id).path()) {
                Ok(code) => code,
                Err(err) => {
                    tracing::debug!("Stopping compiles: {}", err);
                    outcome.error = Some(err);
                    outcome.failed = Some((id, -1));
                    continue;
                }
            };
            self.progress.inc(1);
            if code == 0 {
                inv.get_mut(id).mark_compiled();
                outcome.compiled.push(id);
            } else {
                tracing::error!(
                    "Compilation of {} failed with exit code {}",
                    self.ctx.display_path(inv.get(id).path()),
                    code
                );
                outcome.failed = Some((id, code));
            }
        }

        self.progress.finish_and_clear();

        if outcome.failed.is_none() {
            outcome.link = match self.link(inv) {
                Ok(link) => link,
                Err(err) => {
                    tracing::debug!("Link could not run: {}", err);
                    outcome.error = Some(err);
                    LinkOutcome::Failed { code: -1 }
                }
            };
        }

        outcome
    }

    fn compile(&self, source: &Path) -> Result<i32, BuildError> {
        let object = self.ctx.object_path(source);
        remove_file_if_exists(&object).map_err(|e| BuildError::RemoveArtifact {
            path: object.clone(),
            source: e,
        })?;

        let shown = self.ctx.display_path(source);
        self.progress.set_message(shown.clone());
        self.progress.suspend(|| tracing::info!("Compiling {}", shown));

        let input = CompileInput {
            source: source.to_path_buf(),
            output: object,
            include_dirs: self.ctx.include_dirs().to_vec(),
            cflags: self.ctx.cflags().to_vec(),
        };

        self.toolchain
            .compile(&input)
            .map_err(|e| BuildError::ToolSpawn {
                path: source.to_path_buf(),
                source: e.into(),
            })
    }

    /// Link every source's object into the output binary.
    ///
    /// The previous binary is removed first, so a failed link leaves no
    /// binary behind and the next run links again.
    pub fn link(&self, inv: &Inventory) -> Result<LinkOutcome, BuildError> {
        let binary = self.ctx.binary();
        remove_file_if_exists(binary).map_err(|e| BuildError::RemoveArtifact {
            path: binary.to_path_buf(),
            source: e,
        })?;
        if let Some(parent) = binary.parent() {
            std::fs::create_dir_all(parent).map_err(|e| BuildError::CreateDir {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let objects: Vec<PathBuf> = inv
            .sources()
            .map(|(_, f)| self.ctx.object_path(f.path()))
            .collect();

        tracing::info!("Linking {}", self.ctx.display_path(binary));

        let input = LinkInput {
            objects,
            output: binary.to_path_buf(),
            ldflags: self.ctx.ldflags().to_vec(),
        };

        let code = self
            .toolchain
            .link(&input)
            .map_err(|e| BuildError::ToolSpawn {
                path: binary.to_path_buf(),
                source: e.into(),
            })?;

        if code == 0 {
            Ok(LinkOutcome::Linked)
        } else {
            tracing::error!("Linking failed with exit code {}", code);
            Ok(LinkOutcome::Failed { code })
        }
    }
}
