//! Command implementations

pub mod build;
pub mod clean;
pub mod status;
pub mod tables;

use std::io::IsTerminal;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use quarry::builder::{BuildContext, BuildProfile};
use quarry::util::config::{global_config_path, load_config, project_config_path};
use quarry::util::fs::normalize_lexically;
use quarry::util::Config;

/// Settings shared by every command: where the project is and how loud to be.
pub struct Session {
    pub root: PathBuf,
    pub config: Config,
    pub verbose: bool,
    pub quiet: bool,
}

impl Session {
    pub fn new(manifest_dir: Option<&Path>, verbose: bool, quiet: bool) -> Result<Self> {
        let cwd = std::env::current_dir().context("failed to get current directory")?;
        let root = match manifest_dir {
            Some(dir) => normalize_lexically(&cwd.join(dir)),
            None => cwd,
        };
        if !root.is_dir() {
            anyhow::bail!("project directory {} does not exist", root.display());
        }

        let config = load_config(global_config_path().as_deref(), &project_config_path(&root));

        Ok(Session {
            root,
            config,
            verbose,
            quiet,
        })
    }

    /// The immutable build context for this run.
    pub fn context(&self, profile: BuildProfile) -> BuildContext {
        BuildContext::from_config(&self.root, &self.config, profile)
    }

    /// Whether an interactive progress bar should be drawn.
    pub fn show_progress(&self) -> bool {
        !self.verbose && !self.quiet && std::io::stderr().is_terminal()
    }
}
