//! Post-build test runner
//!
//! Hands the output artifacts of built projects to an external test harness
//! and waits for it to exit. Harness output goes straight to the terminal.

use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};

use tokio::process::Command;

use crate::core::project::ProjectMetadata;
use crate::core::report::BuildReport;
use crate::core::settings::BuildSettings;
use crate::error::InvokeError;
use crate::infra::compiler::resolve_program;

/// Resolved test harness invocation
#[derive(Debug, Clone)]
pub struct TestRunner {
    program: PathBuf,
    args: Vec<String>,
    arg_template: String,
    /// Send harness stdout to stderr, keeping stdout for the report
    stdout_to_stderr: bool,
}

impl TestRunner {
    /// Resolve the harness named by the settings
    pub fn resolve(settings: &BuildSettings) -> Result<Self, InvokeError> {
        let program = resolve_program(settings.tests.path.as_deref(), settings.test_program())?;
        Ok(Self {
            program,
            args: settings.test_args().to_vec(),
            arg_template: settings.test_arg_template().to_string(),
            stdout_to_stderr: false,
        })
    }

    /// Route harness stdout to stderr
    pub fn with_stdout_to_stderr(mut self, enabled: bool) -> Self {
        self.stdout_to_stderr = enabled;
        self
    }

    /// Harness arguments for the built projects, in build order
    pub fn arguments(&self, projects: &[ProjectMetadata], report: &BuildReport) -> Vec<String> {
        let mut args = self.args.clone();
        for identity in report.built() {
            let Some(output) = projects
                .iter()
                .find(|p| p.identity == identity)
                .and_then(|p| p.output.as_deref())
            else {
                continue;
            };
            args.push(self.format_arg(output));
        }
        args
    }

    fn format_arg(&self, output: &Path) -> String {
        self.arg_template
            .replace("{path}", &output.display().to_string())
    }

    /// Run the harness over the built projects and wait for it
    pub async fn run(
        &self,
        projects: &[ProjectMetadata],
        report: &BuildReport,
    ) -> Result<ExitStatus, InvokeError> {
        let args = self.arguments(projects, report);
        let program = self.program.display().to_string();
        tracing::info!("Running tests: {program} {}", args.join(" "));

        let stdout = if self.stdout_to_stderr {
            Stdio::from(std::io::stderr())
        } else {
            Stdio::inherit()
        };
        Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(stdout)
            .status()
            .await
            .map_err(|e| InvokeError::Spawn {
                program,
                error: e.to_string(),
            })
    }
}
