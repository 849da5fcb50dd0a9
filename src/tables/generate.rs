//! Table generation for whole domains.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::core::ignore::IgnoreSet;
use crate::core::inventory::Inventory;
use crate::tables::convention::scan_components;
use crate::tables::domain::{Domain, BUILTIN_DOMAINS};
use crate::tables::manifest::{ComponentManifest, MANIFEST_FILE};
use crate::tables::render::render_tables;
use crate::tables::TableError;
use crate::util::fs::write_atomic;

/// Where a domain's entries came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntrySource {
    Manifest,
    Convention,
}

/// Result of generating one domain's tables.
#[derive(Debug, Clone, Serialize)]
pub struct TableOutcome {
    pub domain: &'static str,
    pub output: PathBuf,
    pub source: EntrySource,
    pub components: usize,
    pub table_size: usize,
    /// Whether the output file was rewritten
    pub written: bool,
}

/// Generate the tables of one domain.
///
/// Returns `None` if the project has no directory for the domain, or the
/// directory is ignored. The output is always derived from scratch but only
/// written when its contents change.
pub fn generate_domain(
    root: &Path,
    domain: &Domain,
    inv: &Inventory,
    ignore: &IgnoreSet,
) -> Result<Option<TableOutcome>, TableError> {
    let dir = domain.directory_in(root);
    if !dir.is_dir() || ignore.is_ignored(&dir) {
        tracing::debug!("No {} directory, skipping {} tables", domain.directory, domain.name);
        return Ok(None);
    }

    let (entries, source) = match ComponentManifest::load(&dir)? {
        Some(manifest) => {
            let path = dir.join(MANIFEST_FILE);
            (manifest.entries(&path, domain, &dir, inv)?, EntrySource::Manifest)
        }
        None => (scan_components(root, domain, inv)?, EntrySource::Convention),
    };

    let rendered = render_tables(domain, &entries)?;
    let output = domain.output_in(root);

    let unchanged = std::fs::read(&output)
        .map(|existing| existing == rendered.as_bytes())
        .unwrap_or(false);

    if unchanged {
        tracing::debug!("{} is up to date", output.display());
    } else {
        write_atomic(&output, rendered.as_bytes()).map_err(|source| TableError::Write {
            path: output.clone(),
            source,
        })?;
        tracing::info!("Generated {}/{}", domain.directory, domain.output);
    }

    Ok(Some(TableOutcome {
        domain: domain.name,
        output,
        source,
        components: entries.len(),
        table_size: entries.iter().map(|e| e.id as usize + 1).max().unwrap_or(0),
        written: !unchanged,
    }))
}

/// Generate the tables of every built-in domain present in the project.
pub fn generate_all(
    root: &Path,
    inv: &Inventory,
    ignore: &IgnoreSet,
) -> Result<Vec<TableOutcome>, TableError> {
    let mut outcomes = Vec::new();
    for domain in BUILTIN_DOMAINS {
        if let Some(outcome) = generate_domain(root, domain, inv, ignore)? {
            outcomes.push(outcome);
        }
    }
    Ok(outcomes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tables::domain::{ENTITY, WEAPON};
    use crate::test_support::ProjectFixture;
    use std::fs;

    fn scan(fixture: &ProjectFixture, ignore: &str) -> (Inventory, IgnoreSet) {
        let ignore = IgnoreSet::parse(fixture.root(), ignore);
        let inv = Inventory::scan(fixture.root(), &ignore).unwrap();
        (inv, ignore)
    }

    #[test]
    fn test_sparse_ids() {
        let fixture = ProjectFixture::new()
            .file("entities/entity_00000.h", "void entity_construct_00000(Entity *e);\n")
            .file("entities/entity_00003.h", "void entity_construct_00003(Entity *e);\n");
        let (inv, ignore) = scan(&fixture, "");

        let outcome = generate_domain(fixture.root(), &ENTITY, &inv, &ignore)
            .unwrap()
            .unwrap();

        assert_eq!(outcome.table_size, 4);
        assert_eq!(outcome.source, EntrySource::Convention);
        let out = fs::read_to_string(fixture.path("entities/entity_tables.c")).unwrap();
        assert!(out.contains(
            "entityConstructTable[] = {\n    entity_construct_00000,\n    NULL,\n    NULL,\n    entity_construct_00003,\n};"
        ));
    }

    #[test]
    fn test_regeneration_is_byte_identical_and_skips_write() {
        let fixture = ProjectFixture::new()
            .file("weapons/weapon_00001.h", "Weapon *weapon_construct_00001(void);\n");
        let (inv, ignore) = scan(&fixture, "");
        let output = fixture.path("weapons/weapon_tables.c");

        let first = generate_domain(fixture.root(), &WEAPON, &inv, &ignore).unwrap().unwrap();
        let bytes = fs::read(&output).unwrap();

        let second = generate_domain(fixture.root(), &WEAPON, &inv, &ignore).unwrap().unwrap();

        assert!(first.written);
        assert!(!second.written);
        assert_eq!(fs::read(&output).unwrap(), bytes);
    }

    #[test]
    fn test_ignored_headers_are_excluded() {
        let fixture = ProjectFixture::new()
            .file("weapons/weapon_00001.h", "Weapon *weapon_construct_00001(void);\n")
            .file("weapons/weapon_00007.h", "Weapon *weapon_construct_00007(void);\n");
        let (inv, ignore) = scan(&fixture, "weapons/weapon_00007.h\n");

        let outcome = generate_domain(fixture.root(), &WEAPON, &inv, &ignore).unwrap().unwrap();

        assert_eq!(outcome.table_size, 2);
        let out = fs::read_to_string(outcome.output).unwrap();
        assert!(!out.contains("weapon_00007"));
    }

    #[test]
    fn test_manifest_takes_precedence() {
        let fixture = ProjectFixture::new()
            .file("weapons/weapon_00001.h", "Weapon *weapon_construct_00001(void);\n")
            .file(
                "weapons/components.toml",
                "[[component]]\nid = 1\nheader = \"weapon_00001.h\"\n",
            );
        let (inv, ignore) = scan(&fixture, "");

        let outcome = generate_domain(fixture.root(), &WEAPON, &inv, &ignore).unwrap().unwrap();

        assert_eq!(outcome.source, EntrySource::Manifest);
        let out = fs::read_to_string(outcome.output).unwrap();
        assert!(out.contains("weaponConstructTable[] = {\n    NULL,\n    NULL,\n};"));
    }

    #[test]
    fn test_missing_domain_directory_is_skipped() {
        let fixture = ProjectFixture::new().file("weapons/weapon_00000.h", "");
        let (inv, ignore) = scan(&fixture, "");

        let outcomes = generate_all(fixture.root(), &inv, &ignore).unwrap();

        assert_eq!(outcomes.len(), 1);
        assert_eq!(outcomes[0].domain, "weapon");
        assert!(!fixture.path("entities").exists());
    }
}
