//! Rendering of the generated table source.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt::{self, Write};

use crate::tables::domain::Domain;
use crate::tables::ComponentEntry;

const NULL_ENTRY: &str = "NULL";

/// Render the table source for `domain`.
///
/// The table size is one more than the largest ID. IDs without a component
/// get `NULL` in every table. Header includes are sorted by file name.
pub fn render_tables(domain: &Domain, entries: &[ComponentEntry]) -> Result<String, fmt::Error> {
    let mut out = String::new();
    write_tables(&mut out, domain, entries)?;
    Ok(out)
}

fn write_tables(out: &mut String, domain: &Domain, entries: &[ComponentEntry]) -> fmt::Result {
    let by_id: BTreeMap<u32, &ComponentEntry> = entries.iter().map(|e| (e.id, e)).collect();
    let size = by_id.keys().next_back().map_or(0, |max| *max as usize + 1);
    let headers: BTreeSet<&str> = entries.iter().map(|e| e.header.as_str()).collect();

    writeln!(out, "{}", domain.prologue)?;
    out.push_str("\n\n");
    for header in headers {
        writeln!(out, "#include \"{}\"", header)?;
    }
    out.push_str("\n\n");

    writeln!(out, "const int {} = {};", domain.size_constant, size)?;
    out.push('\n');

    for (column, sig) in domain.signatures.iter().enumerate() {
        writeln!(out, "const {} {}[] = {{", sig.pointer_type, sig.table)?;
        for id in 0..size as u32 {
            let symbol = by_id
                .get(&id)
                .and_then(|e| e.symbols.get(column))
                .and_then(|s| s.as_deref())
                .unwrap_or(NULL_ENTRY);
            writeln!(out, "    {},", symbol)?;
        }
        out.push_str("};\n");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tables::domain::{ENTITY, WEAPON};

    #[test]
    fn test_render_weapon_table() {
        let entries = vec![
            ComponentEntry {
                id: 1,
                header: "weapon_00001.h".into(),
                symbols: vec![Some("weapon_construct_00001".into())],
            },
            ComponentEntry {
                id: 0,
                header: "weapon_00000.h".into(),
                symbols: vec![None],
            },
        ];

        let expected = "\
#include \"weapon_tables.h\"


#include \"weapon_00000.h\"
#include \"weapon_00001.h\"


const int weaponTableSize = 2;

const weapon_construct_ptr_t weaponConstructTable[] = {
    NULL,
    weapon_construct_00001,
};
";
        assert_eq!(render_tables(&WEAPON, &entries).unwrap(), expected);
    }

    #[test]
    fn test_sparse_ids_render_null_rows() {
        let entries = vec![
            ComponentEntry {
                id: 0,
                header: "entity_00000.h".into(),
                symbols: vec![Some("entity_construct_00000".into()), None, None],
            },
            ComponentEntry {
                id: 3,
                header: "entity_00003.h".into(),
                symbols: vec![
                    Some("entity_construct_00003".into()),
                    Some("entity_clone_00003".into()),
                    Some("&entity_vtb_00003".into()),
                ],
            },
        ];

        let out = render_tables(&ENTITY, &entries).unwrap();

        assert!(out.contains("const int entityTableSize = 4;"));
        assert!(out.contains(
            "const entity_clone_ptr_t entityCloneTable[] = {\n    NULL,\n    NULL,\n    NULL,\n    entity_clone_00003,\n};\n"
        ));
        assert!(out.contains(
            "const Entity_vtb * entityVTBTable[] = {\n    NULL,\n    NULL,\n    NULL,\n    &entity_vtb_00003,\n};\n"
        ));
    }

    #[test]
    fn test_empty_domain() {
        let out = render_tables(&WEAPON, &[]).unwrap();
        assert!(out.contains("const int weaponTableSize = 0;"));
        assert!(out.ends_with("weaponConstructTable[] = {\n};\n"));
    }
}
