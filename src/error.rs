//! Error types for batchbuild
//!
//! Domain-specific error types using thiserror.
//!
//! Only setup-fatal errors ever leave a build session. Per-project failures
//! are absorbed into the [`crate::core::report::BuildReport`].

use std::path::PathBuf;
use thiserror::Error;

/// Project loader errors
#[derive(Error, Debug)]
pub enum LoaderError {
    /// Build root does not exist or is not a directory
    #[error("Couldn't find build path {path}")]
    RootNotFound { path: PathBuf },

    /// No project descriptors under the root
    #[error("No project files found under '{path}' (looked for *.{extension})")]
    NoDescriptorsFound { path: PathBuf, extension: String },

    /// Descriptor could not be read
    #[error("Failed to read project file '{path}': {error}")]
    Read { path: PathBuf, error: String },

    /// Descriptor declares no assembly name
    #[error("Project file '{path}' has no <AssemblyName>")]
    MissingIdentity { path: PathBuf },

    /// Two descriptors share one identity
    #[error("Duplicate project identity '{identity}' in '{first}' and '{second}'")]
    DuplicateIdentity {
        identity: String,
        first: PathBuf,
        second: PathBuf,
    },

    /// Directory traversal failed
    #[error("Failed to scan '{path}': {error}")]
    Walk { path: PathBuf, error: String },
}

/// Compiler and test harness invocation errors
#[derive(Error, Debug)]
pub enum InvokeError {
    /// Executable could not be located
    #[error("Tool not found: {tool}")]
    ToolNotFound { tool: String },

    /// Process could not be started or awaited
    #[error("Failed to run '{program}': {error}")]
    Spawn { program: String, error: String },

    /// Process did not finish in time
    #[error("'{program}' timed out after {seconds}s")]
    TimedOut { program: String, seconds: u64 },
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file '{path}': {error}")]
    Read { path: String, error: String },

    /// Failed to parse config file
    #[error("Failed to parse config file '{path}': {error}")]
    Parse { path: String, error: String },
}

/// Top-level batchbuild error type
#[derive(Error, Debug)]
pub enum BatchBuildError {
    /// Loader error
    #[error("Loader error: {0}")]
    Loader(#[from] LoaderError),

    /// Invocation error
    #[error("Invocation error: {0}")]
    Invoke(#[from] InvokeError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// IO error
    #[error("IO error for '{path}': {error}")]
    Io { path: PathBuf, error: String },
}
