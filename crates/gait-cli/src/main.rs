//! gait-cycles: batch gait cycle extraction for sprint trial exports
//!
//! Reads every CSV export in a directory, detects stride cycles on both
//! shank gyroscopes and writes normalized curves to `<dir>/gait_processing/`.

mod batch;
mod loader;
mod writer;

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Gait event detection and cycle normalization for sprint recordings
#[derive(Parser)]
#[command(name = "gait-cycles")]
#[command(version)]
#[command(about = "Detect gait cycles and normalize them to 0-100 %", long_about = None)]
struct Cli {
    /// Directory containing trial CSV exports (and optionally gait_config.json)
    input_dir: PathBuf,
}

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cli = Cli::parse();

    match batch::run(&cli.input_dir) {
        Ok(report) => {
            println!(
                "Processed {} trial(s), {} failed. Output: {}",
                report.processed,
                report.failed.len(),
                report.output_dir.display()
            );
            if report.failed.is_empty() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
        Err(e) => {
            tracing::error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}
