//! Directory-wide batch processing

use crate::loader::{discover_trials, load_config, load_trial, trial_name};
use crate::writer::{prepare_output_dir, write_analysis, write_summary, LegSummary};
use anyhow::{ensure, Result};
use gait_processing::GaitPipeline;
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{error, info, warn};

/// Outcome of one batch run
#[derive(Debug, Clone)]
pub struct BatchReport {
    pub processed: usize,
    pub failed: Vec<PathBuf>,
    pub output_dir: PathBuf,
}

/// Process every trial file in `input_dir`.
///
/// A file that fails to load or process is logged and skipped.
pub fn run(input_dir: &Path) -> Result<BatchReport> {
    ensure!(input_dir.is_dir(), "{} is not a directory", input_dir.display());

    let config = load_config(input_dir)?;
    let pipeline = GaitPipeline::new(config)?;
    let files = discover_trials(input_dir);
    if files.is_empty() {
        warn!(dir = %input_dir.display(), "no trial files found");
    }

    let output_dir = prepare_output_dir(input_dir)?;
    let start_time = Instant::now();
    info!(files = files.len(), config = %pipeline.config().name, "processing trials");

    let results: Vec<(PathBuf, Result<Vec<LegSummary>>)> = files
        .par_iter()
        .map(|path| (path.clone(), process_file(&pipeline, path, &output_dir)))
        .collect();

    let mut rows = Vec::new();
    let mut failed = Vec::new();
    for (path, result) in results {
        match result {
            Ok(summaries) => rows.extend(summaries),
            Err(e) => {
                error!(file = %path.display(), error = %format!("{:#}", e), "trial skipped");
                failed.push(path);
            }
        }
    }

    write_summary(&output_dir, &rows)?;

    let processed = files.len() - failed.len();
    info!(
        processed,
        failed = failed.len(),
        elapsed_ms = start_time.elapsed().as_millis() as u64,
        "batch complete"
    );

    Ok(BatchReport {
        processed,
        failed,
        output_dir,
    })
}

fn process_file(
    pipeline: &GaitPipeline,
    path: &Path,
    output_dir: &Path,
) -> Result<Vec<LegSummary>> {
    let trial = load_trial(path)?;
    let analysis = pipeline.process(&trial)?;
    let artifact = write_analysis(output_dir, &trial_name(path), &analysis)?;
    info!(trial = %analysis.trial_name, artifact = %artifact.display(), "analysis written");
    Ok(LegSummary::from_analysis(&analysis))
}
