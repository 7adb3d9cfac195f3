//! Output formatting and progress indicators
//!
//! Renders the end-of-session summary, drives the build progress bar and
//! prints fatal errors.

use std::fmt::Write as _;

use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;

use crate::core::report::{BuildEvent, BuildReport};

/// Status message prefixes
pub mod status {
    /// Success prefix (green checkmark)
    pub const SUCCESS: &str = "✓";

    /// Error prefix (red X)
    pub const ERROR: &str = "✗";

    /// Warning prefix (yellow triangle)
    pub const WARNING: &str = "⚠";
}

/// How much to print and in which format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OutputConfig {
    /// Suppress everything but errors
    pub quiet: bool,
    /// Print the report as JSON
    pub json: bool,
    /// Verbosity level from `-v` flags
    pub verbose: u8,
}

impl OutputConfig {
    /// Create an output configuration
    pub fn new(quiet: bool, json: bool, verbose: u8) -> Self {
        Self {
            quiet,
            json,
            verbose,
        }
    }

    /// Whether an interactive progress bar should be drawn
    pub fn show_progress(&self) -> bool {
        !self.quiet && !self.json
    }

    /// Default tracing filter for this configuration
    pub fn log_level(&self) -> &'static str {
        if self.quiet {
            return "error";
        }
        match self.verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
    }
}

/// Create a progress bar for build steps
pub fn create_build_bar(total: u64, config: &OutputConfig) -> ProgressBar {
    if !config.show_progress() {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new(total);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} projects ({msg})")
            .expect("Invalid progress bar template")
            .progress_chars("█▓▒░"),
    );
    pb
}

/// Human-readable session summary
pub fn render_summary(report: &BuildReport) -> String {
    if report.is_empty() {
        return "No projects targeted to build.\n".to_string();
    }

    let mut out = String::from("Build completed.\n");
    let built = report.built();
    if !built.is_empty() {
        out.push_str("\nThe following projects were successfully built:\n");
        for identity in built {
            let _ = writeln!(out, "\t{identity}");
        }
    }

    let failed: Vec<&BuildEvent> = report
        .events()
        .iter()
        .filter(|e| !e.outcome.is_built())
        .collect();
    if !failed.is_empty() {
        out.push_str("\nThe following projects could not be built:\n");
        for event in failed {
            let _ = writeln!(out, "\t{} ({})", event.identity, event.outcome);
        }
    }
    out
}

#[derive(Serialize)]
struct ReportJson<'a> {
    success: bool,
    built: Vec<&'a str>,
    failed: Vec<&'a str>,
    events: &'a [BuildEvent],
}

/// Machine-readable session summary
pub fn render_json(report: &BuildReport) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&ReportJson {
        success: report.is_success(),
        built: report.built(),
        failed: report.failed(),
        events: report.events(),
    })
}

/// Print the summary in the configured format
pub fn display_report(report: &BuildReport, config: &OutputConfig) -> serde_json::Result<()> {
    if config.json {
        println!("{}", render_json(report)?);
    } else if !config.quiet {
        print!("{}", render_summary(report));
    }
    Ok(())
}

/// Print a fatal error and its causes to stderr
pub fn display_error(error: &anyhow::Error) {
    eprintln!("{} Error: {error}", status::ERROR);
    for cause in error.chain().skip(1) {
        eprintln!("  caused by: {cause}");
    }
}
