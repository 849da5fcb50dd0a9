//! Test utilities for Quarry unit tests.
//!
//! # Example
//!
//! ```rust,ignore
//! use quarry::test_support::{MockToolchain, ProjectFixture};
//!
//! #[test]
//! fn test_example() {
//!     let fixture = ProjectFixture::new().file("main.c", "").built();
//!     let toolchain = MockToolchain::new().fail_on("main.c");
//!     // Drive a build over the fixture with the mock toolchain...
//! }
//! ```

pub mod fixtures;

use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::Result;

use crate::builder::toolchain::{CompileInput, LinkInput, Toolchain};

pub use fixtures::*;

/// Toolchain double that records every call.
///
/// Successful compiles and links create an empty output file, so artifact
/// checks on later runs behave as they would with a real compiler.
#[derive(Debug, Default)]
pub struct MockToolchain {
    /// File names of sources whose compile fails
    failing: Vec<String>,
    /// File names of sources whose compiler cannot be started
    erroring: Vec<String>,
    link_code: i32,
    compiles: Mutex<Vec<PathBuf>>,
    links: Mutex<Vec<LinkInput>>,
}

impl MockToolchain {
    pub fn new() -> Self {
        MockToolchain::default()
    }

    /// Make compiling the source with this file name fail.
    pub fn fail_on(mut self, file_name: &str) -> Self {
        self.failing.push(file_name.to_string());
        self
    }

    /// Make the compiler fail to start for the source with this file name.
    pub fn error_on(mut self, file_name: &str) -> Self {
        self.erroring.push(file_name.to_string());
        self
    }

    /// Make every link fail.
    pub fn fail_link(mut self) -> Self {
        self.link_code = 1;
        self
    }

    /// File names of every source a compile was attempted for, in order.
    pub fn compiled_names(&self) -> Vec<String> {
        self.compiles
            .lock()
            .unwrap()
            .iter()
            .filter_map(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .collect()
    }

    pub fn link_calls(&self) -> usize {
        self.links.lock().unwrap().len()
    }

    pub fn last_link_objects(&self) -> Vec<PathBuf> {
        self.links
            .lock()
            .unwrap()
            .last()
            .map(|l| l.objects.clone())
            .unwrap_or_default()
    }

    fn listed(names: &[String], source: &std::path::Path) -> bool {
        source
            .file_name()
            .map(|n| names.iter().any(|f| n == f.as_str()))
            .unwrap_or(false)
    }
}

impl Toolchain for MockToolchain {
    fn compile(&self, input: &CompileInput) -> Result<i32> {
        self.compiles.lock().unwrap().push(input.source.clone());
        if Self::listed(&self.erroring, &input.source) {
            anyhow::bail!("failed to start compiler for {}", input.source.display());
        }
        if Self::listed(&self.failing, &input.source) {
            return Ok(1);
        }
        fs::write(&input.output, "")?;
        Ok(0)
    }

    fn link(&self, input: &LinkInput) -> Result<i32> {
        self.links.lock().unwrap().push(input.clone());
        if self.link_code == 0 {
            fs::write(&input.output, "")?;
        }
        Ok(self.link_code)
    }
}
