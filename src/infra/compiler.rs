//! Compiler invocation
//!
//! Resolves the compiler executable once at setup and runs it as a child
//! process for each project, capturing its output. A run that exceeds the
//! configured wait is killed and reported as timed out; its partial output
//! is discarded.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;

use crate::core::project::ProjectMetadata;
use crate::core::scheduler::{CompileOutput, CompilerInvoker};
use crate::core::settings::BuildSettings;
use crate::error::InvokeError;

/// Locate an executable from an explicit path or a PATH lookup
///
/// Returns an absolute path. Compiles run from each descriptor's
/// directory, not the current one.
pub fn resolve_program(path: Option<&Path>, program: &str) -> Result<PathBuf, InvokeError> {
    let candidate = match path {
        Some(path) => path.to_path_buf(),
        None => which::which(program).map_err(|_| InvokeError::ToolNotFound {
            tool: program.to_string(),
        })?,
    };
    std::fs::canonicalize(&candidate)
        .ok()
        .filter(|p| p.is_file())
        .ok_or_else(|| InvokeError::ToolNotFound {
            tool: candidate.display().to_string(),
        })
}

/// Resolved compiler configuration
#[derive(Debug, Clone)]
pub struct CompilerConfig {
    /// Compiler executable
    pub path: PathBuf,
    /// Arguments placed before the descriptor
    pub args: Vec<String>,
    /// Per-project wait limit
    pub timeout: Option<Duration>,
}

impl CompilerConfig {
    /// Resolve the compiler named by the settings
    pub fn resolve(settings: &BuildSettings) -> Result<Self, InvokeError> {
        let path = resolve_program(
            settings.compiler.path.as_deref(),
            settings.compiler_program(),
        )?;
        tracing::info!("Using compiler {}", path.display());
        Ok(Self {
            path,
            args: settings.compiler_args().to_vec(),
            timeout: settings.compile_timeout(),
        })
    }

    fn program_name(&self) -> String {
        self.path.display().to_string()
    }
}

/// Compiler invoker backed by a child process
#[derive(Debug)]
pub struct ProcessCompiler {
    config: CompilerConfig,
}

impl ProcessCompiler {
    /// Create a new process-backed compiler
    pub fn new(config: CompilerConfig) -> Self {
        Self { config }
    }

    /// Get the configuration
    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }

    fn command(&self, project: &ProjectMetadata) -> Command {
        let descriptor = project
            .descriptor
            .file_name()
            .map_or_else(|| project.descriptor.clone().into_os_string(), ToOwned::to_owned);

        let mut cmd = Command::new(&self.config.path);
        cmd.args(&self.config.args)
            .arg(descriptor)
            .current_dir(project.descriptor_dir())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        cmd
    }
}

impl CompilerInvoker for ProcessCompiler {
    async fn compile(&mut self, project: &ProjectMetadata) -> Result<CompileOutput, InvokeError> {
        let program = self.config.program_name();
        tracing::debug!(
            "Running {program} for {} in {}",
            project.identity,
            project.descriptor_dir().display()
        );

        let child = self.command(project).spawn().map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound && !self.config.path.exists() {
                InvokeError::ToolNotFound {
                    tool: program.clone(),
                }
            } else {
                InvokeError::Spawn {
                    program: program.clone(),
                    error: e.to_string(),
                }
            }
        })?;

        // Dropping the wait future on timeout kills the child
        let waited = match self.config.timeout {
            Some(limit) => tokio::time::timeout(limit, child.wait_with_output())
                .await
                .map_err(|_| InvokeError::TimedOut {
                    program: program.clone(),
                    seconds: limit.as_secs(),
                })?,
            None => child.wait_with_output().await,
        };
        let output = waited.map_err(|e| InvokeError::Spawn {
            program: program.clone(),
            error: e.to_string(),
        })?;

        Ok(CompileOutput {
            text: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            exit_code: output.status.code(),
        })
    }
}
