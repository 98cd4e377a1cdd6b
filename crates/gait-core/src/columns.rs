//! Column-name based channel mapping
//!
//! Sprint exports carry one column per sensor channel plus repeated time
//! columns. Channels are recognised by header substrings; inside each family
//! the right leg comes first.

use crate::error::{GaitError, GaitResult};
use crate::trial::{LegChannels, TrialRecording};

/// Header substring identifying time columns
pub const TIME_PATTERN: &str = "X [s]";
/// Header substrings identifying shank gyroscope columns
pub const GYRO_PATTERNS: [&str; 2] = ["GYRO.Z", "[°/s]"];
/// Header substrings identifying shank accelerometer columns
pub const ACC_PATTERNS: [&str; 2] = ["ACC.Z", "[g]"];
/// Header substring identifying EMG columns
pub const EMG_PATTERN: &str = "EMG";

/// Raw numeric table with named columns, as produced by a file reader
#[derive(Debug, Clone, Default)]
pub struct ColumnTable {
    pub headers: Vec<String>,
    pub columns: Vec<Vec<f64>>,
}

impl ColumnTable {
    pub fn new(headers: Vec<String>, columns: Vec<Vec<f64>>) -> GaitResult<Self> {
        if headers.len() != columns.len() {
            return Err(GaitError::LengthMismatch {
                channel: "header row".to_string(),
                expected: columns.len(),
                actual: headers.len(),
            });
        }
        Ok(Self { headers, columns })
    }

    /// Indices of columns whose header contains every pattern, in table order
    pub fn matching(&self, patterns: &[&str]) -> Vec<usize> {
        self.headers
            .iter()
            .enumerate()
            .filter(|(_, header)| patterns.iter().all(|p| header.contains(p)))
            .map(|(i, _)| i)
            .collect()
    }

    fn take_family<const N: usize>(&self, patterns: &[&str]) -> GaitResult<[Vec<f64>; N]> {
        let indices = self.matching(patterns);
        if indices.len() < N {
            return Err(GaitError::ChannelNotFound {
                pattern: format!("{} (need {}, found {})", patterns.join(" + "), N, indices.len()),
            });
        }
        Ok(std::array::from_fn(|k| self.columns[indices[k]].clone()))
    }

    /// Build a trial from this table.
    ///
    /// Only the first time column is kept; duplicates exported per sensor are ignored.
    pub fn into_trial(self, name: impl Into<String>) -> GaitResult<TrialRecording> {
        let time = self
            .matching(&[TIME_PATTERN])
            .first()
            .map(|&i| self.columns[i].clone())
            .ok_or_else(|| GaitError::ChannelNotFound {
                pattern: TIME_PATTERN.to_string(),
            })?;

        let [right_gyro, left_gyro] = self.take_family::<2>(&GYRO_PATTERNS)?;
        let [right_acc, left_acc] = self.take_family::<2>(&ACC_PATTERNS)?;
        let [right_bf, right_st, left_bf, left_st] = self.take_family::<4>(&[EMG_PATTERN])?;

        let right = LegChannels::new(right_gyro, right_acc, right_bf, right_st);
        let left = LegChannels::new(left_gyro, left_acc, left_bf, left_st);

        TrialRecording::new(name, time, right, left)
    }
}
