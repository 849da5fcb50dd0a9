//! Line scanning of C sources and headers.
//!
//! Shared by the dependency resolver and the component table generator.

pub mod comments;
pub mod includes;

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

pub use comments::CommentStripper;
pub use includes::{include_directives, DependencyResolver, IncludeDirective};

/// Errors while scanning project files.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("failed to read {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Read a source file for scanning.
///
/// Invalid UTF-8 is replaced rather than rejected; only the ASCII structure
/// of directives and declarations matters here.
pub fn read_source(path: &Path) -> Result<String, ScanError> {
    let bytes = std::fs::read(path).map_err(|source| ScanError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
