//! Build settings
//!
//! Reads build settings from TOML. Settings come from the global
//! `config.toml` in the config directory and from `batchbuild.toml` at the
//! build root; later layers override earlier ones field by field, and
//! anything left unset falls back to [`crate::config::defaults`].

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::defaults;
use crate::error::ConfigError;
use crate::infra::dirs::BatchBuildDirs;

/// All configurable settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BuildSettings {
    /// Compiler invocation
    #[serde(default)]
    pub compiler: CompilerSettings,

    /// Project discovery
    #[serde(default)]
    pub loader: LoaderSettings,

    /// Failure log
    #[serde(default)]
    pub log: LogSettings,

    /// Post-build test harness
    #[serde(default)]
    pub tests: TestSettings,
}

/// Compiler settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CompilerSettings {
    /// Explicit compiler executable
    pub path: Option<PathBuf>,

    /// Program name looked up on PATH
    pub program: Option<String>,

    /// Extra arguments placed before the descriptor path
    pub args: Option<Vec<String>>,

    /// Seconds to wait per project, 0 for no limit
    pub timeout_secs: Option<u64>,
}

/// Loader settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoaderSettings {
    /// Descriptor file extension, without the dot
    pub extension: Option<String>,
}

/// Failure log settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LogSettings {
    /// Log file path
    pub file: Option<PathBuf>,
}

/// Test harness settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TestSettings {
    /// Explicit harness executable
    pub path: Option<PathBuf>,

    /// Program name looked up on PATH
    pub program: Option<String>,

    /// Arguments placed before the per-project arguments
    pub args: Option<Vec<String>>,

    /// Per-project argument, `{path}` is replaced by the artifact path
    pub arg_template: Option<String>,
}

impl BuildSettings {
    /// Load the global settings from the config directory
    pub fn load_global(dirs: &BatchBuildDirs) -> Result<Self, ConfigError> {
        Self::load_from_path(&dirs.global_config_path())
    }

    /// Load settings from a specific path
    ///
    /// A missing file yields default settings.
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            error: e.to_string(),
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            error: e.to_string(),
        })
    }

    /// Load global settings overlaid with the root's `batchbuild.toml`
    pub fn load_layered(dirs: &BatchBuildDirs, root: &Path) -> Result<Self, ConfigError> {
        let global = Self::load_global(dirs)?;
        let local = Self::load_from_path(&root.join(defaults::ROOT_CONFIG_FILE))?;
        Ok(global.overlay(local))
    }

    /// Apply `other` on top of `self`, field by field
    #[must_use]
    pub fn overlay(self, other: Self) -> Self {
        Self {
            compiler: CompilerSettings {
                path: other.compiler.path.or(self.compiler.path),
                program: other.compiler.program.or(self.compiler.program),
                args: other.compiler.args.or(self.compiler.args),
                timeout_secs: other.compiler.timeout_secs.or(self.compiler.timeout_secs),
            },
            loader: LoaderSettings {
                extension: other.loader.extension.or(self.loader.extension),
            },
            log: LogSettings {
                file: other.log.file.or(self.log.file),
            },
            tests: TestSettings {
                path: other.tests.path.or(self.tests.path),
                program: other.tests.program.or(self.tests.program),
                args: other.tests.args.or(self.tests.args),
                arg_template: other.tests.arg_template.or(self.tests.arg_template),
            },
        }
    }

    /// Effective compiler program name
    #[must_use]
    pub fn compiler_program(&self) -> &str {
        self.compiler
            .program
            .as_deref()
            .unwrap_or(defaults::DEFAULT_COMPILER_PROGRAM)
    }

    /// Effective compiler arguments
    #[must_use]
    pub fn compiler_args(&self) -> &[String] {
        self.compiler.args.as_deref().unwrap_or(&[])
    }

    /// Effective per-project timeout, `None` when unbounded
    #[must_use]
    pub fn compile_timeout(&self) -> Option<Duration> {
        match self
            .compiler
            .timeout_secs
            .unwrap_or(defaults::DEFAULT_COMPILE_TIMEOUT_SECS)
        {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }

    /// Effective descriptor extension, without a leading dot
    #[must_use]
    pub fn descriptor_extension(&self) -> &str {
        self.loader
            .extension
            .as_deref()
            .map_or(defaults::DEFAULT_DESCRIPTOR_EXTENSION, |e| {
                e.trim_start_matches('.')
            })
    }

    /// Effective failure log path
    #[must_use]
    pub fn log_file(&self) -> PathBuf {
        self.log
            .file
            .clone()
            .unwrap_or_else(|| PathBuf::from(defaults::DEFAULT_LOG_FILE))
    }

    /// Effective test harness program name
    #[must_use]
    pub fn test_program(&self) -> &str {
        self.tests
            .program
            .as_deref()
            .unwrap_or(defaults::DEFAULT_TEST_PROGRAM)
    }

    /// Effective test harness arguments
    #[must_use]
    pub fn test_args(&self) -> &[String] {
        self.tests.args.as_deref().unwrap_or(&[])
    }

    /// Effective per-project test argument template
    #[must_use]
    pub fn test_arg_template(&self) -> &str {
        self.tests
            .arg_template
            .as_deref()
            .unwrap_or(defaults::DEFAULT_TEST_ARG_TEMPLATE)
    }
}
