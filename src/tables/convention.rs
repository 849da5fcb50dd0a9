//! Declaration detection by naming convention.
//!
//! A component provides a signature if some line of its header, with
//! comments stripped and runs of whitespace collapsed, starts with
//! `<return type> <name prefix><ID>` or `<return type><name prefix><ID>`.
//! Nothing past that prefix is checked.

use std::path::Path;

use crate::core::inventory::Inventory;
use crate::scan::{read_source, CommentStripper};
use crate::tables::domain::{format_id, Domain, GENERATED_SUFFIX};
use crate::tables::{ComponentEntry, TableError};

/// Which of `domain`'s signatures a header declares for component `id`.
pub fn declared_signatures(domain: &Domain, id: u32, content: &str) -> Vec<bool> {
    let id = format_id(id);
    let forms: Vec<[String; 2]> = domain
        .signatures
        .iter()
        .map(|sig| {
            [
                format!("{} {}{}", sig.return_type, sig.name_prefix, id),
                format!("{}{}{}", sig.return_type, sig.name_prefix, id),
            ]
        })
        .collect();

    let mut present = vec![false; forms.len()];
    for line in CommentStripper::strip_all(content) {
        let line = line.split_whitespace().collect::<Vec<_>>().join(" ");
        for (i, [spaced, tight]) in forms.iter().enumerate() {
            if line.starts_with(spaced.as_str()) || line.starts_with(tight.as_str()) {
                present[i] = true;
            }
        }
    }
    present
}

/// Component headers of `domain` in the inventory, as `(id, file name)`.
///
/// Only headers directly inside the domain directory count. The inventory
/// already excludes ignored paths.
pub fn component_headers(
    root: &Path,
    domain: &Domain,
    inv: &Inventory,
) -> Result<Vec<(u32, String)>, TableError> {
    let dir = domain.directory_in(root);
    let pattern = domain.header_pattern()?;
    let mut headers = Vec::new();

    for (_, file) in inv.headers() {
        let path = file.path();
        if path.parent() != Some(dir.as_path()) {
            continue;
        }
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if name.ends_with(GENERATED_SUFFIX) {
            continue;
        }
        let Some(id) = pattern
            .captures(name)
            .and_then(|c| c[1].parse::<u32>().ok())
        else {
            continue;
        };
        headers.push((id, name.to_string()));
    }

    headers.sort();
    Ok(headers)
}

/// Build entries by scanning every component header of `domain`.
pub fn scan_components(
    root: &Path,
    domain: &Domain,
    inv: &Inventory,
) -> Result<Vec<ComponentEntry>, TableError> {
    let dir = domain.directory_in(root);
    let mut entries = Vec::new();

    for (id, header) in component_headers(root, domain, inv)? {
        let content = read_source(&dir.join(&header))?;
        let present = declared_signatures(domain, id, &content);

        let symbols = domain
            .signatures
            .iter()
            .zip(present)
            .map(|(sig, found)| found.then(|| sig.symbol(id)))
            .collect();

        tracing::trace!("{}: {:?}", header, symbols);
        entries.push(ComponentEntry {
            id,
            header,
            symbols,
        });
    }

    Ok(entries)
}
