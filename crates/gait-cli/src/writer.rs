//! JSON analysis artifacts and the batch summary table

use anyhow::{Context, Result};
use gait_core::LegSide;
use gait_processing::TrialAnalysis;
use serde::Serialize;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

/// Subdirectory of the input directory receiving all outputs
pub const OUTPUT_DIR: &str = "gait_processing";
/// Per-run summary table inside [`OUTPUT_DIR`]
pub const SUMMARY_FILE: &str = "processing_summary.csv";

/// Create (if needed) and return the output directory for `input_dir`
pub fn prepare_output_dir(input_dir: &Path) -> Result<PathBuf> {
    let dir = input_dir.join(OUTPUT_DIR);
    fs::create_dir_all(&dir).with_context(|| format!("failed to create {}", dir.display()))?;
    Ok(dir)
}

/// Write `<stem>_analysis.json`
pub fn write_analysis(output_dir: &Path, stem: &str, analysis: &TrialAnalysis) -> Result<PathBuf> {
    let path = output_dir.join(format!("{}_analysis.json", stem));
    let file = File::create(&path).with_context(|| format!("failed to create {}", path.display()))?;
    serde_json::to_writer_pretty(BufWriter::new(file), analysis)
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(path)
}

/// One row of the summary table: a leg of a processed trial
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegSummary {
    pub trial: String,
    pub side: LegSide,
    pub peaks: usize,
    pub intervals: usize,
    pub selected_categories: usize,
    pub normalized_cycles: usize,
    pub warnings: usize,
}

impl LegSummary {
    pub fn from_analysis(analysis: &TrialAnalysis) -> Vec<LegSummary> {
        analysis
            .legs
            .values()
            .map(|leg| LegSummary {
                trial: analysis.trial_name.clone(),
                side: leg.side,
                peaks: leg.detection.peaks.len(),
                intervals: leg.intervals.len(),
                selected_categories: leg.selected.len(),
                normalized_cycles: leg
                    .normalized
                    .values()
                    .flat_map(|c| c.values())
                    .map(Vec::len)
                    .sum(),
                warnings: analysis
                    .warnings
                    .iter()
                    .filter(|w| warning_side(w) == leg.side)
                    .count(),
            })
            .collect()
    }
}

fn warning_side(warning: &gait_processing::ProcessingWarning) -> LegSide {
    use gait_processing::ProcessingWarning::*;
    match warning {
        NoIntervals { side }
        | NoPeaks { side }
        | InsufficientCycles { side, .. }
        | TooFewSelected { side, .. }
        | CycleSkipped { side, .. } => *side,
    }
}

/// Write the summary table
pub fn write_summary(output_dir: &Path, rows: &[LegSummary]) -> Result<PathBuf> {
    let path = output_dir.join(SUMMARY_FILE);
    let mut wtr = csv::Writer::from_path(&path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(path)
}
