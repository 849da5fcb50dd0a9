//! The shared ignore list.
//!
//! One `IgnoreSet` is read per run and handed to every pass that walks the
//! project (inventory, dependency resolution, table generation), so all of
//! them exclude exactly the same files.

use std::io;
use std::path::{Path, PathBuf};

use crate::util::fs::normalize_lexically;

/// Absolute paths excluded from the project.
///
/// An entry excludes the path itself and, when it names a directory,
/// everything below it.
#[derive(Debug, Clone, Default)]
pub struct IgnoreSet {
    entries: Vec<PathBuf>,
}

impl IgnoreSet {
    /// An ignore set that excludes nothing.
    pub fn empty() -> Self {
        IgnoreSet::default()
    }

    /// Parse ignore-list text.
    ///
    /// Blank lines and lines starting with `#` are skipped. Every other line is
    /// a path relative to `root`; a leading `/` is tolerated and means the same.
    pub fn parse(root: &Path, contents: &str) -> Self {
        let entries = contents
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(|line| {
                let relative = line.trim_start_matches(['/', '\\']).replace('\\', "/");
                normalize_lexically(&root.join(relative))
            })
            .collect();

        IgnoreSet { entries }
    }

    /// Load the ignore list at `path`.
    ///
    /// A missing or unreadable file yields an empty set; that is a
    /// configuration gap, not an error.
    pub fn load(root: &Path, path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(contents) => {
                let set = Self::parse(root, &contents);
                tracing::debug!(
                    "Loaded {} ignore entries from {}",
                    set.entries.len(),
                    path.display()
                );
                set
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => IgnoreSet::empty(),
            Err(e) => {
                tracing::warn!("Could not read ignore list {}: {}", path.display(), e);
                IgnoreSet::empty()
            }
        }
    }

    /// Whether `path` is excluded.
    pub fn is_ignored(&self, path: &Path) -> bool {
        self.entries.iter().any(|entry| path.starts_with(entry))
    }

    /// The excluded absolute paths.
    pub fn entries(&self) -> &[PathBuf] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
