//! Batchbuild CLI - dependency-ordered batch builder
//!
//! Entry point for the batchbuild command-line application.
//!
//! Exit status: 0 when every project built, 1 when any project failed,
//! 2 when the session could not start.

use clap::Parser;

use batchbuild::cli::output::display_error;
use batchbuild::cli::Cli;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let output_config = cli.output_config();

    // Initialize tracing subscriber
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(output_config.log_level())),
        )
        .init();

    // Run the build and map the outcome to an exit status
    let code = match cli.run().await {
        Ok(code) => code,
        Err(e) => {
            display_error(&e);
            2
        }
    };
    std::process::exit(code);
}
