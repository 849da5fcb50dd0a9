//! GCC/Clang toolchain implementation.

use std::path::PathBuf;

use anyhow::Result;

use super::{CommandSpec, CompileInput, LinkInput, Toolchain};

/// GCC-style compiler driver, used for both compiling and linking.
#[derive(Debug, Clone)]
pub struct GccToolchain {
    /// Path to the C compiler
    pub cc: PathBuf,
    /// Extra environment for every invocation
    pub env: Vec<(String, String)>,
    /// Working directory for every invocation
    pub cwd: Option<PathBuf>,
}

impl GccToolchain {
    /// Create a new GCC-style toolchain.
    pub fn new(cc: PathBuf) -> Self {
        GccToolchain {
            cc,
            env: Vec::new(),
            cwd: None,
        }
    }

    pub fn with_env(mut self, env: impl IntoIterator<Item = (String, String)>) -> Self {
        self.env.extend(env);
        self
    }

    pub fn with_cwd(mut self, cwd: PathBuf) -> Self {
        self.cwd = Some(cwd);
        self
    }

    fn command(&self) -> CommandSpec {
        let mut cmd = CommandSpec::new(&self.cc);
        for (key, value) in &self.env {
            cmd = cmd.env(key, value);
        }
        if let Some(ref cwd) = self.cwd {
            cmd = cmd.cwd(cwd);
        }
        cmd
    }

    /// `cc -c <source> -o <object> <cflags> -I<dir>...`
    pub fn compile_command(&self, input: &CompileInput) -> CommandSpec {
        let mut cmd = self
            .command()
            .arg("-c")
            .arg(input.source.display().to_string())
            .arg("-o")
            .arg(input.output.display().to_string());

        cmd = cmd.args(input.cflags.iter().cloned());

        for dir in &input.include_dirs {
            cmd = cmd.arg(format!("-I{}", dir.display()));
        }

        cmd
    }

    /// `cc <objects...> -o <binary> <ldflags>`
    pub fn link_command(&self, input: &LinkInput) -> CommandSpec {
        let mut cmd = self.command();

        for obj in &input.objects {
            cmd = cmd.arg(obj.display().to_string());
        }

        cmd.arg("-o")
            .arg(input.output.display().to_string())
            .args(input.ldflags.iter().cloned())
    }
}

impl Toolchain for GccToolchain {
    fn compile(&self, input: &CompileInput) -> Result<i32> {
        self.compile_command(input).run()
    }

    fn link(&self, input: &LinkInput) -> Result<i32> {
        self.link_command(input).run()
    }
}
