//! Source inventory - every C source and header in the project.
//!
//! The tree is walked once per run. Each discovered file becomes a
//! [`SourceFile`] carrying its observed modification time; the resolver fills
//! in its direct header dependencies and the staleness pass marks what has
//! to be rebuilt.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;
use walkdir::WalkDir;

use crate::core::ignore::IgnoreSet;
use crate::util::fs::{mtime_secs, normalize_lexically};

/// Whether a file is compiled on its own or only included.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    /// A translation unit (`.c`)
    Source,
    /// An included header (`.h`)
    Header,
}

impl FileKind {
    /// Classify a path by its extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "c" => Some(FileKind::Source),
            "h" => Some(FileKind::Header),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FileKind::Source => "source",
            FileKind::Header => "header",
        }
    }
}

/// Index of a file within its [`Inventory`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FileId(usize);

impl FileId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Why a file has to be rebuilt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum StaleReason {
    /// The ledger could not be loaded, or a full rebuild was requested.
    FullRebuild,
    /// The ledger has no entry for this file.
    Unrecorded,
    /// The recorded time differs from the file's modification time.
    Modified { recorded: i64, observed: i64 },
    /// A header this file includes is stale.
    Header { path: PathBuf },
    /// The source's object file is missing.
    MissingArtifact { path: PathBuf },
}

impl fmt::Display for StaleReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StaleReason::FullRebuild => write!(f, "full rebuild"),
            StaleReason::Unrecorded => write!(f, "not in ledger"),
            StaleReason::Modified { recorded, observed } => {
                write!(f, "modified ({} -> {})", recorded, observed)
            }
            StaleReason::Header { path } => write!(f, "includes stale {}", path.display()),
            StaleReason::MissingArtifact { path } => {
                write!(f, "object {} is missing", path.display())
            }
        }
    }
}

/// One discovered source or header file.
#[derive(Debug, Clone)]
pub struct SourceFile {
    path: PathBuf,
    kind: FileKind,
    observed_mtime: i64,
    recorded_mtime: Option<i64>,
    dirty: bool,
    stale: Option<StaleReason>,
    compiled: bool,
    dependencies: Vec<FileId>,
}

impl SourceFile {
    /// Create a file record from its absolute path and observed mtime.
    pub fn new(path: impl Into<PathBuf>, kind: FileKind, observed_mtime: i64) -> Self {
        SourceFile {
            path: path.into(),
            kind,
            observed_mtime,
            recorded_mtime: None,
            dirty: false,
            stale: None,
            compiled: false,
            dependencies: Vec::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn kind(&self) -> FileKind {
        self.kind
    }

    pub fn is_header(&self) -> bool {
        self.kind == FileKind::Header
    }

    pub fn is_source(&self) -> bool {
        self.kind == FileKind::Source
    }

    pub fn observed_mtime(&self) -> i64 {
        self.observed_mtime
    }

    pub fn recorded_mtime(&self) -> Option<i64> {
        self.recorded_mtime
    }

    pub fn set_recorded_mtime(&mut self, recorded: Option<i64>) {
        self.recorded_mtime = recorded;
    }

    /// Whether the file itself changed since it was last recorded.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Whether the file must be rebuilt, for itself or through a dependency.
    pub fn needs_rebuild(&self) -> bool {
        self.stale.is_some()
    }

    pub fn stale_reason(&self) -> Option<&StaleReason> {
        self.stale.as_ref()
    }

    /// Mark the file as changed in its own right.
    pub fn mark_dirty(&mut self, reason: StaleReason) {
        self.dirty = true;
        self.mark_stale(reason);
    }

    /// Flag the file for rebuild.
    ///
    /// The flag is never cleared once set; the first reason recorded wins.
    /// Returns `true` if the file was not already stale.
    pub fn mark_stale(&mut self, reason: StaleReason) -> bool {
        if self.stale.is_some() {
            return false;
        }
        self.stale = Some(reason);
        true
    }

    pub fn is_compiled(&self) -> bool {
        self.compiled
    }

    /// Record a successful compile of this source in the current run.
    pub fn mark_compiled(&mut self) {
        self.compiled = true;
    }

    /// Direct header dependencies, in include order.
    pub fn dependencies(&self) -> &[FileId] {
        &self.dependencies
    }

    pub fn set_dependencies(&mut self, deps: Vec<FileId>) {
        self.dependencies = deps;
    }
}

/// All source and header files of a project, in walk order.
#[derive(Debug, Clone)]
pub struct Inventory {
    root: PathBuf,
    files: Vec<SourceFile>,
    by_path: HashMap<PathBuf, FileId>,
}

impl Inventory {
    /// Build an inventory from already discovered files.
    pub fn from_files(root: impl Into<PathBuf>, files: Vec<SourceFile>) -> Self {
        let by_path = files
            .iter()
            .enumerate()
            .map(|(i, f)| (f.path.clone(), FileId(i)))
            .collect();

        Inventory {
            root: root.into(),
            files,
            by_path,
        }
    }

    /// Walk `root` and collect every `.c` and `.h` file not excluded by
    /// `ignore`.
    ///
    /// Entries are visited in file-name order so the inventory, and with it
    /// the compile order, is stable across runs. Hidden directories are not
    /// descended into.
    pub fn scan(root: &Path, ignore: &IgnoreSet) -> Result<Self> {
        let root = normalize_lexically(root);
        let mut files = Vec::new();

        let walker = WalkDir::new(&root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| {
                if ignore.is_ignored(entry.path()) {
                    return false;
                }
                let hidden = entry.depth() > 0
                    && entry.file_type().is_dir()
                    && entry.file_name().to_string_lossy().starts_with('.');
                !hidden
            });

        for entry in walker {
            let entry =
                entry.with_context(|| format!("failed to walk project: {}", root.display()))?;
            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.path();
            let Some(kind) = FileKind::from_path(path) else {
                continue;
            };

            let mtime = mtime_secs(path)
                .with_context(|| format!("failed to read metadata: {}", path.display()))?;
            files.push(SourceFile::new(path.to_path_buf(), kind, mtime));
        }

        tracing::debug!("Found {} source and header files", files.len());
        Ok(Self::from_files(root, files))
    }

    /// The project root all paths are under.
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn get(&self, id: FileId) -> &SourceFile {
        &self.files[id.0]
    }

    pub fn get_mut(&mut self, id: FileId) -> &mut SourceFile {
        &mut self.files[id.0]
    }

    /// Look a file up by its absolute, normalized path.
    pub fn find(&self, path: &Path) -> Option<FileId> {
        self.by_path.get(path).copied()
    }

    /// Look a header up by its absolute, normalized path.
    pub fn find_header(&self, path: &Path) -> Option<FileId> {
        self.find(path).filter(|id| self.get(*id).is_header())
    }

    pub fn ids(&self) -> impl Iterator<Item = FileId> {
        (0..self.files.len()).map(FileId)
    }

    pub fn iter(&self) -> impl Iterator<Item = (FileId, &SourceFile)> {
        self.files.iter().enumerate().map(|(i, f)| (FileId(i), f))
    }

    /// Source files, in inventory order.
    pub fn sources(&self) -> impl Iterator<Item = (FileId, &SourceFile)> {
        self.iter().filter(|(_, f)| f.is_source())
    }

    /// Header files, in inventory order.
    pub fn headers(&self) -> impl Iterator<Item = (FileId, &SourceFile)> {
        self.iter().filter(|(_, f)| f.is_header())
    }

    pub fn source_ids(&self) -> Vec<FileId> {
        self.sources().map(|(id, _)| id).collect()
    }

    pub fn header_ids(&self) -> Vec<FileId> {
        self.headers().map(|(id, _)| id).collect()
    }
}
