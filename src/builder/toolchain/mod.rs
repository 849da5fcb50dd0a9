//! Toolchain abstraction for the C compiler.
//!
//! The build engine never spawns processes itself. It asks a [`Toolchain`] to
//! compile one source or link a set of objects and gets back the tool's exit
//! code. Anything that can do that (the native compiler driver, or a recording
//! double in tests) can drive a build.

use std::path::PathBuf;

use anyhow::Result;

use crate::util::process::ProcessBuilder;

mod gcc;

pub use gcc::GccToolchain;

/// A command to execute, with program, arguments, and environment.
#[derive(Debug, Clone)]
pub struct CommandSpec {
    /// The program to run (e.g., "gcc")
    pub program: PathBuf,
    /// Command arguments
    pub args: Vec<String>,
    /// Environment variables to set
    pub env: Vec<(String, String)>,
    /// Working directory
    pub cwd: Option<PathBuf>,
}

impl CommandSpec {
    /// Create a new command spec.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        CommandSpec {
            program: program.into(),
            args: Vec::new(),
            env: Vec::new(),
            cwd: None,
        }
    }

    /// Add an argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Add multiple arguments.
    pub fn args(mut self, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.args.extend(args.into_iter().map(|a| a.into()));
        self
    }

    /// Add an environment variable.
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    /// Set the working directory.
    pub fn cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = Some(cwd.into());
        self
    }

    fn to_process(&self) -> ProcessBuilder {
        let mut cmd = ProcessBuilder::new(&self.program).args(&self.args);
        for (key, value) in &self.env {
            cmd = cmd.env(key, value);
        }
        if let Some(ref cwd) = self.cwd {
            cmd = cmd.cwd(cwd);
        }
        cmd
    }

    /// Run the command and return its exit code.
    ///
    /// A process killed by a signal has no exit code and is reported as `-1`.
    pub fn run(&self) -> Result<i32> {
        let cmd = self.to_process();
        tracing::debug!("Running: {}", cmd.display_command());
        let status = cmd.status()?;
        Ok(status.code().unwrap_or(-1))
    }
}

/// Input for a compile step.
#[derive(Debug, Clone)]
pub struct CompileInput {
    /// Source file to compile
    pub source: PathBuf,
    /// Output object file
    pub output: PathBuf,
    /// Include directories
    pub include_dirs: Vec<PathBuf>,
    /// Additional compiler flags
    pub cflags: Vec<String>,
}

/// Input for a link step.
#[derive(Debug, Clone)]
pub struct LinkInput {
    /// Object files to link, in inventory order
    pub objects: Vec<PathBuf>,
    /// Output executable
    pub output: PathBuf,
    /// Additional linker flags
    pub ldflags: Vec<String>,
}

/// Trait for toolchain implementations.
///
/// Implementations report the tool's exit code; a non-zero code is a build
/// failure, not an error. `Err` is reserved for failing to run the tool at
/// all.
pub trait Toolchain {
    /// Compile one source file to an object file.
    fn compile(&self, input: &CompileInput) -> Result<i32>;

    /// Link object files into the output executable.
    fn link(&self, input: &LinkInput) -> Result<i32>;
}
