//! Build context - the immutable configuration of one run.
//!
//! A `BuildContext` is assembled once at process start from the layered
//! [`Config`] and the command-line profile switches, then passed by reference
//! into every pass that needs paths or flags. Nothing downstream reads
//! environment or global state on its own.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::builder::toolchain::GccToolchain;
use crate::util::config::{Config, DEFAULT_IGNORE_FILE, DEFAULT_LEDGER_FILE};
use crate::util::fs::normalize_lexically;
use crate::util::process::find_c_compiler;

/// Library prefix excluded from dependency tracking unless configured.
pub const DEFAULT_EXCLUDED_PREFIX: &str = "SDL2";

const DEBUG_FLAGS: &[&str] = &["-ggdb3"];
const SANITIZE_FLAGS: &[&str] = &["-fsanitize=address", "-fno-omit-frame-pointer"];

/// Optional build profile switches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildProfile {
    /// Emit debug symbols
    pub debug: bool,
    /// Build with AddressSanitizer
    pub sanitize: bool,
}

impl BuildProfile {
    /// Extra flags added to both compile and link commands.
    pub fn extra_flags(&self) -> Vec<String> {
        let mut flags = Vec::new();
        if self.debug {
            flags.extend(DEBUG_FLAGS.iter().map(|f| f.to_string()));
        }
        if self.sanitize {
            flags.extend(SANITIZE_FLAGS.iter().map(|f| f.to_string()));
        }
        flags
    }
}

/// Build context containing project paths, compiler and flags.
#[derive(Debug, Clone)]
pub struct BuildContext {
    /// Project root, absolute
    root: PathBuf,

    /// Compiler, also used as the link driver
    cc: PathBuf,

    /// Compile flags (profile flags included)
    cflags: Vec<String>,

    /// Link flags (profile flags included)
    ldflags: Vec<String>,

    /// Absolute include directories
    include_dirs: Vec<PathBuf>,

    /// Extra environment for tool invocations
    env: BTreeMap<String, String>,

    /// Output binary, absolute
    binary: PathBuf,

    /// Object file extension, without the dot
    object_extension: String,

    /// Ledger file, absolute
    ledger_path: PathBuf,

    /// Ignore-list file, absolute
    ignore_path: PathBuf,

    /// Quoted include prefixes that name external libraries
    excluded_include_prefixes: Vec<String>,
}

impl BuildContext {
    /// A context with default settings for the project at `root`.
    pub fn for_root(root: impl AsRef<Path>) -> Self {
        let root = normalize_lexically(root.as_ref());
        let binary_name = default_binary_name(&root);

        BuildContext {
            cc: PathBuf::from("cc"),
            cflags: Vec::new(),
            ldflags: Vec::new(),
            include_dirs: Vec::new(),
            env: BTreeMap::new(),
            binary: root.join(binary_name),
            object_extension: "o".to_string(),
            ledger_path: root.join(DEFAULT_LEDGER_FILE),
            ignore_path: root.join(DEFAULT_IGNORE_FILE),
            excluded_include_prefixes: vec![DEFAULT_EXCLUDED_PREFIX.to_string()],
            root,
        }
    }

    /// Build the context from merged configuration.
    ///
    /// The compiler is taken from the config, then `CC`, then the first of
    /// `cc`/`gcc`/`clang` on `PATH`.
    pub fn from_config(root: impl AsRef<Path>, config: &Config, profile: BuildProfile) -> Self {
        let mut ctx = Self::for_root(root);

        let cc = config
            .toolchain
            .cc
            .clone()
            .or_else(find_c_compiler)
            .unwrap_or_else(|| PathBuf::from("cc"));
        ctx = ctx.with_compiler(cc);

        let extra = profile.extra_flags();
        ctx.cflags = config.toolchain.cflags.clone();
        ctx.cflags.extend(extra.iter().cloned());
        ctx.ldflags = config.toolchain.ldflags.clone();
        ctx.ldflags.extend(extra);
        ctx.env = config.toolchain.env.clone();
        ctx = ctx.with_include_dirs(config.toolchain.include_dirs.clone());

        if let Some(ref binary) = config.build.binary {
            ctx.binary = ctx.root.join(binary);
        }
        if let Some(ref ext) = config.build.object_extension {
            ctx.object_extension = ext.trim_start_matches('.').to_string();
        }
        if let Some(ref ledger) = config.build.ledger {
            ctx.ledger_path = normalize_lexically(&ctx.root.join(ledger));
        }
        if let Some(ref ignore) = config.build.ignore_file {
            ctx.ignore_path = normalize_lexically(&ctx.root.join(ignore));
        }
        if let Some(ref prefixes) = config.build.excluded_include_prefixes {
            ctx.excluded_include_prefixes = prefixes.clone();
        }

        tracing::debug!("Build context: {:?}", ctx);
        ctx
    }

    /// Set the compiler.
    pub fn with_compiler(mut self, cc: impl Into<PathBuf>) -> Self {
        self.cc = cc.into();
        self
    }

    /// Set include directories, relative to the project root.
    pub fn with_include_dirs(mut self, dirs: Vec<PathBuf>) -> Self {
        self.include_dirs = dirs
            .iter()
            .map(|d| normalize_lexically(&self.root.join(d)))
            .collect();
        self
    }

    /// Set the output binary, relative to the project root.
    pub fn with_binary(mut self, binary: impl AsRef<Path>) -> Self {
        self.binary = self.root.join(binary);
        self
    }

    /// Set the compile and link flags.
    pub fn with_flags(mut self, cflags: Vec<String>, ldflags: Vec<String>) -> Self {
        self.cflags = cflags;
        self.ldflags = ldflags;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn compiler(&self) -> &Path {
        &self.cc
    }

    pub fn cflags(&self) -> &[String] {
        &self.cflags
    }

    pub fn ldflags(&self) -> &[String] {
        &self.ldflags
    }

    pub fn include_dirs(&self) -> &[PathBuf] {
        &self.include_dirs
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }

    pub fn ledger_path(&self) -> &Path {
        &self.ledger_path
    }

    pub fn ignore_path(&self) -> &Path {
        &self.ignore_path
    }

    pub fn excluded_include_prefixes(&self) -> &[String] {
        &self.excluded_include_prefixes
    }

    /// The object file a source compiles to, next to the source.
    pub fn object_path(&self, source: &Path) -> PathBuf {
        source.with_extension(&self.object_extension)
    }

    /// A path relative to the project root, for display.
    pub fn display_path(&self, path: &Path) -> String {
        crate::util::fs::relative_path(&self.root, path)
            .display()
            .to_string()
    }

    /// The native compiler driver configured for this context.
    pub fn native_toolchain(&self) -> GccToolchain {
        GccToolchain::new(self.cc.clone())
            .with_env(self.env.iter().map(|(k, v)| (k.clone(), v.clone())))
            .with_cwd(self.root.clone())
    }
}

fn default_binary_name(root: &Path) -> String {
    let stem = root
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "a.out".to_string());

    if cfg!(target_os = "windows") {
        format!("{}.exe", stem)
    } else {
        stem
    }
}
