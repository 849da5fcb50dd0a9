//! Core data structures for Quarry.
//!
//! This module contains the foundational types shared by every pass:
//! - The project inventory (source and header files)
//! - The shared ignore list
//! - The change ledger persisted between runs

pub mod ignore;
pub mod inventory;
pub mod ledger;

pub use ignore::IgnoreSet;
pub use inventory::{FileId, FileKind, Inventory, SourceFile, StaleReason};
pub use ledger::{ChangeLedger, LedgerError, LedgerState};
