//! Build command implementation
//!
//! Runs one build session over a directory tree: load settings, discover
//! projects, resolve the compiler, schedule, report and optionally test.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use indicatif::ProgressBar;

use crate::cli::output::{self, status, OutputConfig};
use crate::core::report::Outcome;
use crate::core::scheduler::{BuildListener, BuildScheduler};
use crate::core::settings::{BuildSettings, CompilerSettings, LogSettings};
use crate::infra::build_log::BuildLog;
use crate::infra::compiler::{CompilerConfig, ProcessCompiler};
use crate::infra::dirs::BatchBuildDirs;
use crate::infra::loader;
use crate::infra::test_runner::TestRunner;

/// Build options taken from the command line
#[derive(Debug, Default)]
pub struct BuildOptions {
    /// Run the test harness after the build
    pub run_tests: bool,
    /// Compiler executable override
    pub compiler: Option<PathBuf>,
    /// Per-project timeout override in seconds
    pub timeout_secs: Option<u64>,
    /// Failure log override
    pub log_file: Option<PathBuf>,
}

impl BuildOptions {
    /// Settings layer holding the command-line overrides
    fn as_settings(&self) -> BuildSettings {
        BuildSettings {
            compiler: CompilerSettings {
                path: self.compiler.clone(),
                timeout_secs: self.timeout_secs,
                ..CompilerSettings::default()
            },
            log: LogSettings {
                file: self.log_file.clone(),
            },
            ..BuildSettings::default()
        }
    }
}

/// Forwards session progress to the progress bar and failure log
struct SessionListener {
    bar: ProgressBar,
    log: BuildLog,
}

impl BuildListener for SessionListener {
    fn started(&mut self, identity: &str, _index: usize, _total: usize) {
        self.bar.set_message(format!("building {identity}"));
    }

    fn finished(&mut self, identity: &str, outcome: &Outcome, diagnostic: Option<&str>) {
        self.bar.inc(1);
        if !outcome.is_built() {
            self.bar
                .println(format!("{} {identity}: {outcome}", status::ERROR));
        }
        if let Some(text) = diagnostic {
            if let Err(e) = self.log.append(text) {
                tracing::warn!("Could not write failure log: {e}");
            }
        }
    }
}

/// Execute a build session and return the process exit code
pub async fn execute(root: &Path, options: BuildOptions, out: &OutputConfig) -> Result<i32> {
    let settings = BuildSettings::load_layered(&BatchBuildDirs::new(), root)
        .context("Failed to load settings")?
        .overlay(options.as_settings());

    let projects = loader::load_projects(root, settings.descriptor_extension())
        .context("Failed to load projects")?;
    let log = BuildLog::create(settings.log_file()).context("Failed to reset failure log")?;
    let compiler = CompilerConfig::resolve(&settings).context("Failed to locate compiler")?;
    let scheduler = BuildScheduler::new(projects.clone()).context("Invalid project set")?;

    tracing::info!("Building {} projects under {}", projects.len(), root.display());
    let bar = output::create_build_bar(projects.len() as u64, out);
    let mut listener = SessionListener {
        bar: bar.clone(),
        log: log.clone(),
    };
    let mut compiler = ProcessCompiler::new(compiler);
    let report = scheduler
        .run(&mut compiler, &mut listener)
        .await
        .context("Build aborted")?;
    bar.finish_and_clear();

    output::display_report(&report, out).context("Failed to render report")?;
    if log.has_entries() && !out.quiet && !out.json {
        println!("\nFailure details written to {}", log.path().display());
    }

    if options.run_tests {
        let runner = TestRunner::resolve(&settings)
            .context("Failed to locate test harness")?
            .with_stdout_to_stderr(out.json);
        if !out.json && !out.quiet {
            println!("\nRunning tests...\n");
        }
        let exit = runner
            .run(&projects, &report)
            .await
            .context("Failed to run tests")?;
        if exit.success() {
            if !out.quiet && !out.json {
                println!("{} Tests finished", status::SUCCESS);
            }
        } else {
            eprintln!("{} Test harness exited with {exit}", status::WARNING);
        }
    }

    Ok(report.exit_code())
}
