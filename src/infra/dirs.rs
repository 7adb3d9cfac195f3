//! Platform-specific directory management
//!
//! Locates the directory holding the global `config.toml`.
//! Follows XDG Base Directory Specification on Linux and standard locations on macOS.
//!
//! The `BATCHBUILD_CONFIG_DIR` environment variable overrides the default.

use std::env;
use std::path::PathBuf;

/// Environment variable overriding the config directory
pub const ENV_CONFIG_DIR: &str = "BATCHBUILD_CONFIG_DIR";

/// Application name used in directory paths
const APP_NAME: &str = "batchbuild";

/// Global config file name
const GLOBAL_CONFIG_FILE: &str = "config.toml";

/// Platform-specific directory provider for batchbuild
#[derive(Debug, Clone)]
pub struct BatchBuildDirs {
    config_dir: PathBuf,
}

impl BatchBuildDirs {
    /// Create a new `BatchBuildDirs` instance
    ///
    /// Checks the environment variable first, then falls back to the platform default.
    #[must_use]
    pub fn new() -> Self {
        Self {
            config_dir: Self::resolve_config_dir(),
        }
    }

    /// Use an explicit config directory
    #[must_use]
    pub fn with_config_dir(config_dir: impl Into<PathBuf>) -> Self {
        Self {
            config_dir: config_dir.into(),
        }
    }

    /// Get the config directory path
    ///
    /// - Linux: `$XDG_CONFIG_HOME/batchbuild` or `~/.config/batchbuild`
    /// - macOS: `~/Library/Application Support/batchbuild`
    #[must_use]
    pub fn config_dir(&self) -> PathBuf {
        self.config_dir.clone()
    }

    /// Get the global config file path
    #[must_use]
    pub fn global_config_path(&self) -> PathBuf {
        self.config_dir.join(GLOBAL_CONFIG_FILE)
    }

    fn resolve_config_dir() -> PathBuf {
        if let Ok(path) = env::var(ENV_CONFIG_DIR) {
            return PathBuf::from(path);
        }

        dirs::config_dir()
            .map(|p| p.join(APP_NAME))
            .unwrap_or_else(|| {
                // Fallback to home directory
                dirs::home_dir()
                    .map(|h| h.join(".config").join(APP_NAME))
                    .unwrap_or_else(|| PathBuf::from(".").join(".config").join(APP_NAME))
            })
    }
}

impl Default for BatchBuildDirs {
    fn default() -> Self {
        Self::new()
    }
}
