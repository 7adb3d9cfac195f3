//! Command-line interface module
//!
//! This module handles argument parsing and output formatting.
//! It contains no scheduling logic - that belongs in the [`crate::core`] module.

pub mod build;
pub mod output;

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;

use output::OutputConfig;

/// Batchbuild - dependency-ordered batch builder
///
/// Finds every project file under a directory, builds each one with the
/// external compiler once its references are built, and reports which
/// projects failed.
#[derive(Parser, Debug)]
#[command(name = "batchbuild")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory tree to scan for project files (prompted for if omitted)
    pub path: Option<PathBuf>,

    /// Run the test harness over built projects afterwards
    #[arg(short = 't', long = "test")]
    pub test: bool,

    /// Compiler executable (default: msbuild on PATH)
    #[arg(long, env = "BATCHBUILD_COMPILER")]
    pub compiler: Option<PathBuf>,

    /// Seconds to wait for each compile, 0 for no limit
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Failure log path (default: buildFailure.log)
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Enable verbose output (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long)]
    pub quiet: bool,

    /// Output the report as JSON for scripting
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    /// Output settings implied by the flags
    pub fn output_config(&self) -> OutputConfig {
        OutputConfig::new(self.quiet, self.json, self.verbose)
    }

    /// Execute the build and return the process exit code
    pub async fn run(self) -> Result<i32> {
        let output = self.output_config();
        let root = match self.path {
            Some(path) => path,
            None => prompt_for_path(&mut io::stdin().lock(), &mut io::stdout())?,
        };

        let options = build::BuildOptions {
            run_tests: self.test,
            compiler: self.compiler,
            timeout_secs: self.timeout,
            log_file: self.log_file,
        };
        build::execute(&root, options, &output).await
    }
}

/// Ask for the build root on the terminal
pub fn prompt_for_path(input: &mut impl BufRead, out: &mut impl Write) -> Result<PathBuf> {
    write!(out, "Enter a build target file path: ")?;
    out.flush()?;

    let mut line = String::new();
    input
        .read_line(&mut line)
        .context("Failed to read build path")?;
    let path = line.trim();
    if path.is_empty() {
        bail!("No build path given");
    }
    Ok(PathBuf::from(path))
}
