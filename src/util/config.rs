//! Configuration file support for Quarry.
//!
//! Quarry supports two configuration file locations:
//! - Global: `~/.quarry/config.toml` - User-wide defaults
//! - Project: `.quarry/config.toml` - Project-specific overrides
//!
//! Project config takes precedence over global config. Missing or broken
//! files never stop a build; they fall back to defaults with a warning.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Default ledger file name, relative to the project root.
pub const DEFAULT_LEDGER_FILE: &str = ".build.changed";

/// Default ignore-list file name, relative to the project root.
pub const DEFAULT_IGNORE_FILE: &str = ".build.ignore";

/// Quarry configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Build settings
    pub build: BuildConfig,

    /// Toolchain settings
    pub toolchain: ToolchainSettings,
}

/// Build-related configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Output binary name (defaults to the project directory name)
    pub binary: Option<String>,

    /// Object file extension, without the dot (defaults to "o")
    pub object_extension: Option<String>,

    /// Ledger file path, relative to the project root
    pub ledger: Option<PathBuf>,

    /// Ignore-list file path, relative to the project root
    pub ignore_file: Option<PathBuf>,

    /// Quoted includes starting with one of these prefixes belong to an
    /// external library and are never treated as project headers
    pub excluded_include_prefixes: Option<Vec<String>>,
}

/// Toolchain settings for C compilation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolchainSettings {
    /// Path to the C compiler, also used as the link driver
    pub cc: Option<PathBuf>,

    /// Additional C compiler flags
    #[serde(default)]
    pub cflags: Vec<String>,

    /// Additional linker flags (libraries, search paths)
    #[serde(default)]
    pub ldflags: Vec<String>,

    /// Include directories, relative to the project root
    #[serde(default)]
    pub include_dirs: Vec<PathBuf>,

    /// Extra environment for compiler and linker invocations
    #[serde(default)]
    pub env: BTreeMap<String, String>,
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    /// Load configuration with fallback to defaults if file doesn't exist.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_else(|e| {
                tracing::warn!("Failed to load config from {}: {:#}", path.display(), e);
                Self::default()
            })
        } else {
            Self::default()
        }
    }

    /// Merge another config into this one (other takes precedence).
    pub fn merge(&mut self, other: Config) {
        // Build settings
        if other.build.binary.is_some() {
            self.build.binary = other.build.binary;
        }
        if other.build.object_extension.is_some() {
            self.build.object_extension = other.build.object_extension;
        }
        if other.build.ledger.is_some() {
            self.build.ledger = other.build.ledger;
        }
        if other.build.ignore_file.is_some() {
            self.build.ignore_file = other.build.ignore_file;
        }
        if other.build.excluded_include_prefixes.is_some() {
            self.build.excluded_include_prefixes = other.build.excluded_include_prefixes;
        }

        // Toolchain settings
        if other.toolchain.cc.is_some() {
            self.toolchain.cc = other.toolchain.cc;
        }
        if !other.toolchain.cflags.is_empty() {
            self.toolchain.cflags = other.toolchain.cflags;
        }
        if !other.toolchain.ldflags.is_empty() {
            self.toolchain.ldflags = other.toolchain.ldflags;
        }
        if !other.toolchain.include_dirs.is_empty() {
            self.toolchain.include_dirs = other.toolchain.include_dirs;
        }
        self.toolchain.env.extend(other.toolchain.env);
    }
}

/// Load merged configuration from global and project locations.
///
/// Order of precedence (highest to lowest):
/// 1. Project config (.quarry/config.toml)
/// 2. Global config (~/.quarry/config.toml)
/// 3. Defaults
pub fn load_config(global_path: Option<&Path>, project_path: &Path) -> Config {
    let mut config = Config::default();

    if let Some(global_path) = global_path {
        if global_path.exists() {
            config.merge(Config::load_or_default(global_path));
        }
    }

    if project_path.exists() {
        config.merge(Config::load_or_default(project_path));
    }

    config
}

/// Get the global quarry config directory (~/.quarry).
pub fn global_config_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(".quarry"))
}

/// Get the global config path (~/.quarry/config.toml).
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("config.toml"))
}

/// Get the project config path (.quarry/config.toml).
pub fn project_config_path(project_root: &Path) -> PathBuf {
    project_root.join(".quarry").join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert!(config.build.binary.is_none());
        assert!(config.toolchain.cc.is_none());
        assert!(config.toolchain.cflags.is_empty());
    }

    #[test]
    fn test_config_load() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("config.toml");

        std::fs::write(
            &config_path,
            r#"
[build]
binary = "omnisquash"
object_extension = "obj"
excluded_include_prefixes = ["SDL2", "cjson"]

[toolchain]
cc = "/usr/bin/clang"
cflags = ["-Wall"]
ldflags = ["-lSDL2", "-lm"]
include_dirs = ["lib"]

[toolchain.env]
LANG = "C"
"#,
        )
        .unwrap();

        let config = Config::load(&config_path).unwrap();
        assert_eq!(config.build.binary.as_deref(), Some("omnisquash"));
        assert_eq!(config.build.object_extension.as_deref(), Some("obj"));
        assert_eq!(
            config.build.excluded_include_prefixes,
            Some(vec!["SDL2".to_string(), "cjson".to_string()])
        );
        assert_eq!(config.toolchain.cc, Some(PathBuf::from("/usr/bin/clang")));
        assert_eq!(config.toolchain.ldflags, vec!["-lSDL2", "-lm"]);
        assert_eq!(config.toolchain.include_dirs, vec![PathBuf::from("lib")]);
        assert_eq!(config.toolchain.env.get("LANG").map(String::as_str), Some("C"));
    }

    #[test]
    fn test_broken_config_falls_back_to_default() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("config.toml");
        std::fs::write(&config_path, "[build\nbinary = ").unwrap();

        let config = Config::load_or_default(&config_path);
        assert!(config.build.binary.is_none());
    }

    #[test]
    fn test_load_config_precedence() {
        let tmp = TempDir::new().unwrap();
        let global_path = tmp.path().join("global.toml");
        let project_path = tmp.path().join("project.toml");

        std::fs::write(
            &global_path,
            r#"
[build]
binary = "global-bin"

[toolchain]
cc = "/usr/bin/gcc"
cflags = ["-O2"]
"#,
        )
        .unwrap();

        std::fs::write(
            &project_path,
            r#"
[toolchain]
cflags = ["-O0", "-g"]
"#,
        )
        .unwrap();

        let config = load_config(Some(&global_path), &project_path);

        assert_eq!(config.build.binary.as_deref(), Some("global-bin"));
        assert_eq!(config.toolchain.cc, Some(PathBuf::from("/usr/bin/gcc")));
        // cflags are replaced, not merged
        assert_eq!(config.toolchain.cflags, vec!["-O0", "-g"]);
    }

    #[test]
    fn test_load_config_without_files() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(None, &tmp.path().join("missing.toml"));
        assert!(config.build.ledger.is_none());
    }
}
