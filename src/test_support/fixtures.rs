//! On-disk project fixtures.
//!
//! Every file written through a fixture gets the same fixed modification time,
//! so tests control staleness explicitly with [`ProjectFixture::touch`]
//! instead of depending on the wall clock.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use tempfile::TempDir;

use crate::builder::context::BuildContext;
use crate::core::ignore::IgnoreSet;
use crate::core::inventory::{FileId, FileKind, Inventory};
use crate::core::ledger::ChangeLedger;
use crate::scan::DependencyResolver;
use crate::util::fs::mtime_secs;

/// Modification time given to freshly written fixture files.
pub const BASE_MTIME: u64 = 1_600_000_000;

/// A temporary project directory.
#[derive(Debug)]
pub struct ProjectFixture {
    dir: TempDir,
    /// Files written so far, relative to the root
    files: Vec<PathBuf>,
    tick: u64,
}

impl ProjectFixture {
    pub fn new() -> Self {
        ProjectFixture {
            dir: TempDir::new().unwrap(),
            files: Vec::new(),
            tick: 0,
        }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn path(&self, rel: &str) -> PathBuf {
        self.root().join(rel)
    }

    fn set_mtime(&self, rel: &str, secs: u64) {
        let file = fs::File::options().write(true).open(self.path(rel)).unwrap();
        file.set_modified(SystemTime::UNIX_EPOCH + Duration::from_secs(secs))
            .unwrap();
    }

    /// Write a file with the base modification time.
    pub fn file(mut self, rel: &str, content: &str) -> Self {
        let path = self.path(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        self.set_mtime(rel, BASE_MTIME);
        self.files.push(PathBuf::from(rel));
        self
    }

    /// Give a file a new, strictly later modification time.
    pub fn touch(mut self, rel: &str) -> Self {
        self.tick += 1;
        self.set_mtime(rel, BASE_MTIME + self.tick * 10);
        self
    }

    pub fn remove(self, rel: &str) -> Self {
        fs::remove_file(self.path(rel)).unwrap();
        self
    }

    /// Simulate a fully successful earlier build: every source has an object,
    /// the binary exists, and the ledger records every file's current time.
    pub fn built(self) -> Self {
        let ctx = self.context();
        let mut ledger = ChangeLedger::new();

        for rel in &self.files {
            let path = self.root().join(rel);
            match FileKind::from_path(&path) {
                Some(FileKind::Source) => {
                    fs::write(ctx.object_path(&path), "").unwrap();
                }
                Some(FileKind::Header) => {}
                None => continue,
            }
            ledger.record(&path, mtime_secs(&path).unwrap());
        }

        fs::write(ctx.binary(), "").unwrap();
        ledger.save(ctx.ledger_path()).unwrap();
        self
    }

    /// Current modification time of a file, in seconds.
    pub fn mtime(&self, rel: &str) -> i64 {
        mtime_secs(&self.path(rel)).unwrap()
    }

    pub fn context(&self) -> BuildContext {
        BuildContext::for_root(self.root())
    }

    /// Scan the project and resolve every file's dependencies.
    pub fn resolved_inventory(&self, ctx: &BuildContext) -> Inventory {
        let ignore = IgnoreSet::load(ctx.root(), ctx.ignore_path());
        let mut inv = Inventory::scan(ctx.root(), &ignore).unwrap();
        DependencyResolver::new(ctx).resolve_all(&mut inv).unwrap();
        inv
    }

    /// The ledger currently on disk, empty if there is none.
    pub fn ledger(&self) -> ChangeLedger {
        ChangeLedger::load(self.context().ledger_path()).0
    }

    pub fn id(&self, inv: &Inventory, rel: &str) -> FileId {
        inv.find(&self.path(rel))
            .unwrap_or_else(|| panic!("{} is not in the inventory", rel))
    }
}

impl Default for ProjectFixture {
    fn default() -> Self {
        Self::new()
    }
}
