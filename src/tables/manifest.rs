//! Component manifests.
//!
//! A domain directory may carry a `components.toml` that lists its components
//! explicitly:
//!
//! ```toml
//! [[component]]
//! id = 3
//! header = "entity_00003.h"
//! provides = ["construct", "vtb"]
//!
//! [component.symbols]
//! vtb = "&player_vtb"
//! ```
//!
//! When present it replaces header scanning for that domain.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use serde::Deserialize;

use crate::core::inventory::Inventory;
use crate::tables::domain::{Domain, ID_WIDTH};
use crate::tables::{ComponentEntry, TableError};
use crate::util::fs::normalize_lexically;

/// File name of a domain's component manifest.
pub const MANIFEST_FILE: &str = "components.toml";

/// Parsed `components.toml`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ComponentManifest {
    #[serde(default, rename = "component")]
    pub components: Vec<ManifestComponent>,
}

/// One `[[component]]` table.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ManifestComponent {
    pub id: u32,
    /// Header file, relative to the domain directory
    pub header: String,
    #[serde(default)]
    pub provides: Vec<String>,
    /// Symbol overrides by capability
    #[serde(default)]
    pub symbols: BTreeMap<String, String>,
}

impl ComponentManifest {
    pub fn parse(path: &Path, contents: &str) -> Result<Self, TableError> {
        toml::from_str(contents).map_err(|source| TableError::Manifest {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load the manifest of a domain directory, if it has one.
    pub fn load(dir: &Path) -> Result<Option<Self>, TableError> {
        let path = dir.join(MANIFEST_FILE);
        if !path.is_file() {
            return Ok(None);
        }
        let contents = crate::scan::read_source(&path)?;
        Self::parse(&path, &contents).map(Some)
    }

    /// Resolve the manifest into table entries for `domain`.
    ///
    /// Components whose header is ignored or missing are dropped with a
    /// warning, the same as a header that does not exist for the scanner.
    pub fn entries(
        &self,
        path: &Path,
        domain: &Domain,
        dir: &Path,
        inv: &Inventory,
    ) -> Result<Vec<ComponentEntry>, TableError> {
        let mut seen = HashSet::new();
        let mut entries = Vec::new();
        let max_id = 10u32.pow(ID_WIDTH as u32) - 1;

        for component in &self.components {
            let id = component.id;
            if !seen.insert(id) {
                return Err(TableError::DuplicateId {
                    path: path.to_path_buf(),
                    id,
                });
            }
            if id > max_id {
                return Err(TableError::IdOutOfRange {
                    path: path.to_path_buf(),
                    id,
                    width: ID_WIDTH,
                });
            }

            let unknown = component
                .provides
                .iter()
                .chain(component.symbols.keys())
                .find(|cap| domain.signature_index(cap).is_none());
            if let Some(capability) = unknown {
                return Err(TableError::UnknownCapability {
                    path: path.to_path_buf(),
                    id,
                    capability: capability.clone(),
                    known: domain.capabilities().join(", "),
                });
            }

            let header_path = normalize_lexically(&dir.join(&component.header));
            if inv.find_header(&header_path).is_none() {
                tracing::warn!(
                    "{}: skipping component {}, header {} is missing or ignored",
                    path.display(),
                    id,
                    component.header
                );
                continue;
            }

            let symbols = domain
                .signatures
                .iter()
                .map(|sig| {
                    if !component.provides.iter().any(|p| p == sig.capability) {
                        return None;
                    }
                    Some(
                        component
                            .symbols
                            .get(sig.capability)
                            .cloned()
                            .unwrap_or_else(|| sig.symbol(id)),
                    )
                })
                .collect();

            entries.push(ComponentEntry {
                id,
                header: component.header.clone(),
                symbols,
            });
        }

        entries.sort_by_key(|e| e.id);
        Ok(entries)
    }
}
