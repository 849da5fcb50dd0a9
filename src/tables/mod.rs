//! ID-keyed component table generation.
//!
//! For every built-in [`Domain`], the numbered component headers in the
//! domain directory are collected into [`ComponentEntry`] values, either from
//! a `components.toml` manifest or, without one, by scanning the headers for
//! conventionally named declarations. The entries are rendered into a C
//! source of dispatch tables indexed by component ID.

pub mod convention;
pub mod domain;
pub mod generate;
pub mod manifest;
pub mod render;

use std::path::PathBuf;

use thiserror::Error;

use crate::scan::ScanError;

pub use domain::{find_domain, Domain, Signature, BUILTIN_DOMAINS};
pub use generate::{generate_all, generate_domain, EntrySource, TableOutcome};
pub use manifest::{ComponentManifest, MANIFEST_FILE};
pub use render::render_tables;

/// One numbered component and the table entries it provides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentEntry {
    pub id: u32,
    /// Header file name, relative to the domain directory
    pub header: String,
    /// Symbol for each of the domain's signatures, `None` if not provided
    pub symbols: Vec<Option<String>>,
}

impl ComponentEntry {
    /// Whether the component provides the signature at `index`.
    pub fn provides(&self, index: usize) -> bool {
        self.symbols.get(index).is_some_and(|s| s.is_some())
    }
}

/// Errors from table generation.
#[derive(Debug, Error)]
pub enum TableError {
    #[error(transparent)]
    Read(#[from] ScanError),

    #[error("invalid component manifest {}", path.display())]
    Manifest {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error(
        "{}: component {id} provides unknown capability `{capability}` (expected one of: {known})",
        path.display()
    )]
    UnknownCapability {
        path: PathBuf,
        id: u32,
        capability: String,
        known: String,
    },

    #[error("{}: component id {id} is declared more than once", path.display())]
    DuplicateId { path: PathBuf, id: u32 },

    #[error("{}: component id {id} does not fit in {width} digits", path.display())]
    IdOutOfRange { path: PathBuf, id: u32, width: usize },

    #[error("invalid component header pattern")]
    Pattern(#[source] regex::Error),

    #[error("failed to render component tables")]
    Render(#[from] std::fmt::Error),

    #[error("failed to write {}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
