//! Trial discovery and CSV loading

use anyhow::{Context, Result};
use gait_core::{ColumnTable, TrialRecording};
use gait_processing::ProcessingConfig;
use std::fs::{self, File};
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

/// Optional processing configuration looked up in the input directory
pub const CONFIG_FILE: &str = "gait_config.json";

/// CSV exports directly inside `dir`, sorted by path
pub fn discover_trials(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .max_depth(1)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| {
            entry.file_type().is_file()
                && entry
                    .path()
                    .extension()
                    .and_then(|s| s.to_str())
                    .map(|s| s.eq_ignore_ascii_case("csv"))
                    .unwrap_or(false)
        })
        .map(|entry| entry.path().to_path_buf())
        .collect();
    files.sort();
    files
}

/// File stem used as the trial name
pub fn trial_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "trial".to_string())
}

/// Parse a headed numeric CSV. Empty cells become NaN; blank rows are skipped.
pub fn read_table<R: Read>(reader: R) -> Result<ColumnTable> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers: Vec<String> = csv_reader
        .headers()
        .context("missing header row")?
        .iter()
        .map(str::to_string)
        .collect();
    let mut columns = vec![Vec::new(); headers.len()];

    for (row, record) in csv_reader.records().enumerate() {
        // Header is line 1
        let line = row + 2;
        let record = record.with_context(|| format!("malformed row at line {}", line))?;
        if record.iter().all(str::is_empty) {
            continue;
        }

        for (column, field) in record.iter().enumerate() {
            let value = if field.is_empty() {
                f64::NAN
            } else {
                field.parse::<f64>().with_context(|| {
                    format!(
                        "line {}, column '{}': '{}' is not a number",
                        line, headers[column], field
                    )
                })?
            };
            columns[column].push(value);
        }
    }

    Ok(ColumnTable::new(headers, columns)?)
}

/// Load one trial file and map its columns onto the two legs
pub fn load_trial(path: &Path) -> Result<TrialRecording> {
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let table = read_table(BufReader::new(file))
        .with_context(|| format!("failed to read {}", path.display()))?;
    debug!(file = %path.display(), columns = table.headers.len(), "table loaded");

    let trial = table
        .into_trial(trial_name(path))
        .with_context(|| format!("failed to map channels of {}", path.display()))?;
    Ok(trial)
}

/// `gait_config.json` from `dir` when present, otherwise the defaults
pub fn load_config(dir: &Path) -> Result<ProcessingConfig> {
    let path = dir.join(CONFIG_FILE);
    if !path.is_file() {
        return Ok(ProcessingConfig::default());
    }

    let json =
        fs::read_to_string(&path).with_context(|| format!("failed to read {}", path.display()))?;
    let config = ProcessingConfig::from_json(&json)
        .with_context(|| format!("invalid configuration in {}", path.display()))?;
    info!(config = %config.name, "loaded processing configuration");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use gait_core::{ChannelKind, LegSide};
    use gait_simulation::{simulate_session, SprintSessionConfig};

    /// Render a column table back to CSV text
    fn to_csv(table: &ColumnTable) -> String {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(&table.headers).unwrap();
        let rows = table.columns.first().map(Vec::len).unwrap_or(0);
        for row in 0..rows {
            writer
                .write_record(table.columns.iter().map(|c| c[row].to_string()))
                .unwrap();
        }
        String::from_utf8(writer.into_inner().unwrap()).unwrap()
    }

    #[test]
    fn test_read_table() {
        let text = "X [s], R GYRO.Z [°/s]\n0.0, -1.5\n0.01,\n\n0.02, 3\n";
        let table = read_table(text.as_bytes()).unwrap();

        assert_eq!(table.headers, vec!["X [s]", "R GYRO.Z [°/s]"]);
        assert_eq!(table.columns[0], vec![0.0, 0.01, 0.02]);
        assert_eq!(table.columns[1][0], -1.5);
        assert!(table.columns[1][1].is_nan());
    }

    #[test]
    fn test_non_numeric_cell_rejected() {
        let text = "X [s],EMG\n0.0,abc\n";
        let error = read_table(text.as_bytes()).unwrap_err();
        assert!(format!("{:#}", error).contains("'abc' is not a number"));
    }

    #[test]
    fn test_simulated_export_round_trip() {
        let session = simulate_session(SprintSessionConfig {
            bouts: 1,
            strides_per_bout: 6,
            ..SprintSessionConfig::default()
        })
        .unwrap();
        let csv_text = to_csv(&session.column_table().unwrap());

        let trial = read_table(csv_text.as_bytes()).unwrap().into_trial("csv").unwrap();
        assert_eq!(trial.len(), session.trial.len());
        assert_eq!(
            trial.channel(LegSide::Left, ChannelKind::EmgSt),
            session.trial.channel(LegSide::Left, ChannelKind::EmgSt)
        );
    }

    #[test]
    fn test_discovery_and_config() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.csv"), "").unwrap();
        fs::write(dir.path().join("a.CSV"), "").unwrap();
        fs::write(dir.path().join("notes.txt"), "").unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("nested").join("c.csv"), "").unwrap();

        let names: Vec<String> = discover_trials(dir.path())
            .iter()
            .map(|p| trial_name(p))
            .collect();
        assert_eq!(names, vec!["a", "b"]);

        assert_eq!(load_config(dir.path()).unwrap(), ProcessingConfig::default());

        let mut config = ProcessingConfig::default();
        config.selection.n_cycles = 6;
        fs::write(dir.path().join(CONFIG_FILE), config.to_json().unwrap()).unwrap();
        assert_eq!(load_config(dir.path()).unwrap().selection.n_cycles, 6);

        fs::write(dir.path().join(CONFIG_FILE), "{ not json").unwrap();
        assert!(load_config(dir.path()).is_err());
    }
}
