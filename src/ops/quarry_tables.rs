//! Implementation of `quarry tables`.

use anyhow::{anyhow, Context, Result};

use crate::builder::BuildContext;
use crate::core::{IgnoreSet, Inventory};
use crate::tables::{find_domain, generate_all, generate_domain, TableOutcome, BUILTIN_DOMAINS};

/// Regenerate component tables, for one named domain or for every built-in
/// domain.
pub fn generate_tables(ctx: &BuildContext, only: Option<&str>) -> Result<Vec<TableOutcome>> {
    let ignore = IgnoreSet::load(ctx.root(), ctx.ignore_path());

    let Some(name) = only else {
        return generate_tables_with(ctx, &ignore);
    };

    let domain = find_domain(name).ok_or_else(|| {
        let known: Vec<&str> = BUILTIN_DOMAINS.iter().map(|d| d.name).collect();
        anyhow!(
            "unknown component domain `{}` (expected one of: {})",
            name,
            known.join(", ")
        )
    })?;

    let inv = Inventory::scan(ctx.root(), &ignore)?;
    let outcome = generate_domain(ctx.root(), domain, &inv, &ignore)
        .with_context(|| format!("{} table generation failed", domain.name))?;
    Ok(outcome.into_iter().collect())
}

/// Regenerate tables using an already loaded ignore list.
pub fn generate_tables_with(ctx: &BuildContext, ignore: &IgnoreSet) -> Result<Vec<TableOutcome>> {
    let inv = Inventory::scan(ctx.root(), ignore)?;
    let outcomes = generate_all(ctx.root(), &inv, ignore).context("table generation failed")?;

    for outcome in &outcomes {
        tracing::debug!(
            "{} tables: {} component(s), size {}, from {:?}",
            outcome.domain,
            outcome.components,
            outcome.table_size,
            outcome.source
        );
    }

    Ok(outcomes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::ProjectFixture;

    #[test]
    fn test_ignored_component_is_left_out() {
        let fixture = ProjectFixture::new()
            .file(".build.ignore", "# generated elsewhere\nentities/entity_00002.h\n")
            .file("entities/entity_00000.h", "")
            .file("entities/entity_00002.h", "void entity_construct_00002(Entity *e);\n");

        let outcomes = generate_tables(&fixture.context(), None).unwrap();

        assert_eq!(outcomes.len(), 1);
        assert_eq!(outcomes[0].table_size, 1);
        let out = std::fs::read_to_string(fixture.path("entities/entity_tables.c")).unwrap();
        assert!(!out.contains("entity_00002"));
    }

    #[test]
    fn test_ignored_domain_directory_is_skipped() {
        let fixture = ProjectFixture::new()
            .file(".build.ignore", "weapons\n")
            .file("weapons/weapon_00000.h", "");

        let outcomes = generate_tables(&fixture.context(), None).unwrap();

        assert!(outcomes.is_empty());
        assert!(!fixture.path("weapons/weapon_tables.c").exists());
    }

    #[test]
    fn test_single_domain_leaves_others_alone() {
        let fixture = ProjectFixture::new()
            .file("entities/entity_00000.h", "")
            .file("weapons/weapon_00000.h", "Weapon *weapon_construct_00000(void);\n");

        let outcomes = generate_tables(&fixture.context(), Some("weapon")).unwrap();

        assert_eq!(outcomes.len(), 1);
        assert_eq!(outcomes[0].domain, "weapon");
        assert!(fixture.path("weapons/weapon_tables.c").exists());
        assert!(!fixture.path("entities/entity_tables.c").exists());
    }

    #[test]
    fn test_unknown_domain_is_an_error() {
        let fixture = ProjectFixture::new();

        let err = generate_tables(&fixture.context(), Some("vehicle")).unwrap_err();

        assert!(err.to_string().contains("entity, weapon"));
    }
}
