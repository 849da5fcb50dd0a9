//! The change ledger - last known-good modification times.
//!
//! The ledger is a line-oriented text file, one `<seconds>,<absolute path>`
//! pair per line. An entry means the file was part of a successful build as
//! of that time. If the ledger is missing or cannot be parsed the next build
//! starts from scratch, so every failure mode here is recoverable.

use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::util::fs::write_atomic;

/// Errors reading or writing the ledger.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("malformed ledger line {line}: `{content}`")]
    Malformed { line: usize, content: String },

    #[error("failed to write ledger {}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// How the ledger was obtained at the start of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedgerState {
    /// Read and parsed successfully.
    Loaded,
    /// No ledger file exists yet.
    Missing,
    /// The file exists but could not be read or parsed.
    Unreadable,
}

impl LedgerState {
    /// Whether recorded times can be trusted for incremental decisions.
    pub fn is_trusted(self) -> bool {
        self == LedgerState::Loaded
    }
}

/// Mapping from absolute path to recorded modification time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeLedger {
    entries: BTreeMap<PathBuf, i64>,
}

impl ChangeLedger {
    pub fn new() -> Self {
        ChangeLedger::default()
    }

    /// Parse ledger text.
    ///
    /// The first comma separates the time from the path, so paths may
    /// themselves contain commas. Blank lines are skipped.
    pub fn parse(contents: &str) -> Result<Self, LedgerError> {
        let mut entries = BTreeMap::new();

        for (i, raw) in contents.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() {
                continue;
            }

            let malformed = || LedgerError::Malformed {
                line: i + 1,
                content: line.to_string(),
            };

            let (time, path) = line.split_once(',').ok_or_else(malformed)?;
            let time: i64 = time.trim().parse().map_err(|_| malformed())?;
            if path.is_empty() {
                return Err(malformed());
            }

            entries.insert(PathBuf::from(path), time);
        }

        Ok(ChangeLedger { entries })
    }

    /// Load the ledger at `path`, falling back to an empty ledger.
    pub fn load(path: &Path) -> (Self, LedgerState) {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::info!("No ledger at {}, rebuilding everything", path.display());
                return (ChangeLedger::new(), LedgerState::Missing);
            }
            Err(e) => {
                tracing::warn!(
                    "Could not read ledger {}: {}; rebuilding everything",
                    path.display(),
                    e
                );
                return (ChangeLedger::new(), LedgerState::Unreadable);
            }
        };

        match Self::parse(&contents) {
            Ok(ledger) => {
                tracing::debug!("Loaded {} ledger entries", ledger.len());
                (ledger, LedgerState::Loaded)
            }
            Err(e) => {
                tracing::warn!("{}; rebuilding everything", e);
                (ChangeLedger::new(), LedgerState::Unreadable)
            }
        }
    }

    /// The recorded time for `path`, if any.
    pub fn get(&self, path: &Path) -> Option<i64> {
        self.entries.get(path).copied()
    }

    pub fn record(&mut self, path: impl Into<PathBuf>, mtime: i64) {
        self.entries.insert(path.into(), mtime);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Path, i64)> {
        self.entries.iter().map(|(p, t)| (p.as_path(), *t))
    }

    /// Render the ledger as text, sorted by path.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for (path, time) in &self.entries {
            out.push_str(&format!("{},{}\n", time, path.display()));
        }
        out
    }

    /// Replace the ledger file atomically.
    pub fn save(&self, path: &Path) -> Result<(), LedgerError> {
        write_atomic(path, self.render().as_bytes()).map_err(|source| LedgerError::Write {
            path: path.to_path_buf(),
            source,
        })
    }
}
