//! High-level operations.
//!
//! This module contains the implementation of Quarry commands.

pub mod quarry_build;
pub mod quarry_clean;
pub mod quarry_status;
pub mod quarry_tables;

pub use quarry_build::{build, BuildOptions, BuildResult};
pub use quarry_clean::clean;
pub use quarry_status::status;
pub use quarry_tables::generate_tables;
