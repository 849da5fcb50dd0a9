//! Build errors.

use std::path::PathBuf;

use thiserror::Error;

use crate::core::ledger::LedgerError;
use crate::scan::ScanError;

#[derive(Debug, Error)]
pub enum BuildError {
    #[error("failed to compile {}", path.display())]
    CompileFailed { path: PathBuf, code: i32 },

    #[error("failed to link {}", path.display())]
    LinkFailed { path: PathBuf, code: i32 },

    #[error("could not run the compiler for {}", path.display())]
    ToolSpawn {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("failed to remove {}", path.display())]
    RemoveArtifact {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to create directory {}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Scan(#[from] ScanError),

    #[error(transparent)]
    Ledger(#[from] LedgerError),
}
