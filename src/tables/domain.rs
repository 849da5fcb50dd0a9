//! Built-in component domains.
//!
//! A domain is a directory of numbered component headers (`entity_00042.h`)
//! and the dispatch tables generated from them. The set of domains and their
//! declaration signatures is fixed.

use std::path::{Path, PathBuf};

use regex::Regex;

use crate::tables::TableError;

/// Width of the zero-padded ID in file and symbol names.
pub const ID_WIDTH: usize = 5;

/// Suffix reserved for generated files, never scanned as a component.
pub const GENERATED_SUFFIX: &str = "_tables.h";

/// One column of generated tables: a declaration to look for and the table
/// it fills.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Signature {
    /// Capability name used in manifests
    pub capability: &'static str,
    /// Declaration text before the name, as written in headers
    pub return_type: &'static str,
    /// Declaration name, without the ID
    pub name_prefix: &'static str,
    /// Generated table entry, without the ID
    pub symbol_prefix: &'static str,
    /// Element type of the table
    pub pointer_type: &'static str,
    /// Table variable name
    pub table: &'static str,
}

/// A family of numbered components.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Domain {
    pub name: &'static str,
    /// Directory of component headers, relative to the project root
    pub directory: &'static str,
    /// File name prefix before the ID
    pub file_prefix: &'static str,
    /// Generated source, inside `directory`
    pub output: &'static str,
    /// Fixed first line of the generated source
    pub prologue: &'static str,
    /// Name of the table size constant
    pub size_constant: &'static str,
    pub signatures: &'static [Signature],
}

pub const ENTITY: Domain = Domain {
    name: "entity",
    directory: "entities",
    file_prefix: "entity_",
    output: "entity_tables.c",
    prologue: "#include \"entity_tables.h\"",
    size_constant: "entityTableSize",
    signatures: &[
        Signature {
            capability: "construct",
            return_type: "void ",
            name_prefix: "entity_construct_",
            symbol_prefix: "entity_construct_",
            pointer_type: "entity_construct_ptr_t",
            table: "entityConstructTable",
        },
        Signature {
            capability: "clone",
            return_type: "Entity *",
            name_prefix: "entity_clone_",
            symbol_prefix: "entity_clone_",
            pointer_type: "entity_clone_ptr_t",
            table: "entityCloneTable",
        },
        Signature {
            capability: "vtb",
            return_type: "extern const Entity_vtb",
            name_prefix: "entity_vtb_",
            symbol_prefix: "&entity_vtb_",
            pointer_type: "Entity_vtb *",
            table: "entityVTBTable",
        },
    ],
};

pub const WEAPON: Domain = Domain {
    name: "weapon",
    directory: "weapons",
    file_prefix: "weapon_",
    output: "weapon_tables.c",
    prologue: "#include \"weapon_tables.h\"",
    size_constant: "weaponTableSize",
    signatures: &[Signature {
        capability: "construct",
        return_type: "Weapon *",
        name_prefix: "weapon_construct_",
        symbol_prefix: "weapon_construct_",
        pointer_type: "weapon_construct_ptr_t",
        table: "weaponConstructTable",
    }],
};

pub const BUILTIN_DOMAINS: &[Domain] = &[ENTITY, WEAPON];

/// Look up a built-in domain by name.
pub fn find_domain(name: &str) -> Option<&'static Domain> {
    BUILTIN_DOMAINS.iter().find(|d| d.name == name)
}

/// Format an ID the way it appears in file and symbol names.
pub fn format_id(id: u32) -> String {
    format!("{:0width$}", id, width = ID_WIDTH)
}

impl Domain {
    pub fn directory_in(&self, root: &Path) -> PathBuf {
        root.join(self.directory)
    }

    pub fn output_in(&self, root: &Path) -> PathBuf {
        self.directory_in(root).join(self.output)
    }

    /// Pattern matching component header file names, capturing the ID.
    pub fn header_pattern(&self) -> Result<Regex, TableError> {
        let pattern = format!(
            r"^{}(\d{{{}}})\.h$",
            regex::escape(self.file_prefix),
            ID_WIDTH
        );
        Regex::new(&pattern).map_err(TableError::Pattern)
    }

    /// Index of the signature providing `capability`.
    pub fn signature_index(&self, capability: &str) -> Option<usize> {
        self.signatures
            .iter()
            .position(|s| s.capability == capability)
    }

    pub fn capabilities(&self) -> Vec<&'static str> {
        self.signatures.iter().map(|s| s.capability).collect()
    }
}

impl Signature {
    /// The table entry generated for component `id`.
    pub fn symbol(&self, id: u32) -> String {
        format!("{}{}", self.symbol_prefix, format_id(id))
    }
}
