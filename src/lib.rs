//! Quarry - incremental builds for flat C projects
//!
//! This crate provides the core library functionality for Quarry: the source
//! inventory and change ledger, include scanning, staleness propagation,
//! build orchestration, and generation of ID-keyed component tables.

pub mod builder;
pub mod core;
pub mod ops;
pub mod scan;
pub mod tables;
pub mod util;

/// Test utilities and mocks for Quarry unit tests.
///
/// This module is only available when compiling with `--cfg test` or
/// running tests. It provides on-disk project fixtures and a recording
/// toolchain.
#[cfg(test)]
pub mod test_support;

pub use builder::{BuildContext, BuildOutcome, Toolchain};
pub use core::{ChangeLedger, IgnoreSet, Inventory, SourceFile};
pub use util::Config;
