//! Rest/activity segmentation of a sprint session
//!
//! A session alternates sprint bouts with standing rests. A rest is a run of
//! samples with `|value| <= rest_amplitude_threshold` lasting at least
//! `min_rest_duration` seconds; each rest closes the bout before it.

use crate::config::IntervalConfig;
use gait_core::{GaitError, GaitResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Category id of an interval, assigned from 1 in discovery order
pub type CategoryId = u32;

/// One activity bout as a closed index range `[start_idx, end_idx]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interval {
    pub start_idx: usize,
    pub end_idx: usize,
}

impl Interval {
    /// Closed-range membership
    pub fn contains(&self, index: usize) -> bool {
        self.start_idx <= index && index <= self.end_idx
    }

    /// Number of samples spanned
    pub fn sample_count(&self) -> usize {
        self.end_idx - self.start_idx + 1
    }
}

/// Ordered category -> interval mapping
pub type IntervalMap = BTreeMap<CategoryId, Interval>;

/// Split a session into activity intervals separated by rests.
///
/// Returns an empty map when the whole stream is one rest; callers decide how
/// to treat a session without bouts.
pub fn segment_intervals(
    values: &[f64],
    time: &[f64],
    config: &IntervalConfig,
) -> GaitResult<IntervalMap> {
    config.validate()?;
    if time.len() != values.len() {
        return Err(GaitError::LengthMismatch {
            channel: "gyro".to_string(),
            expected: time.len(),
            actual: values.len(),
        });
    }

    let mut intervals = IntervalMap::new();
    let mut next_category: CategoryId = 1;
    let mut rest_start: Option<usize> = None;
    let mut interval_start = 0usize;

    for (i, &value) in values.iter().enumerate() {
        // NaN counts as activity
        if !(value.abs() <= config.rest_amplitude_threshold) {
            rest_start = None;
            continue;
        }

        match rest_start {
            None => rest_start = Some(i),
            Some(rest) if time[i] - time[rest] >= config.min_rest_duration => {
                if interval_start < rest {
                    intervals.insert(
                        next_category,
                        Interval {
                            start_idx: interval_start,
                            end_idx: rest,
                        },
                    );
                    next_category += 1;
                }
                // Keeps advancing while the rest continues
                interval_start = i;
            }
            Some(_) => {}
        }
    }

    if let Some(last) = values.len().checked_sub(1) {
        if interval_start < last {
            intervals.insert(
                next_category,
                Interval {
                    start_idx: interval_start,
                    end_idx: last,
                },
            );
        }
    }

    debug!(intervals = intervals.len(), "rest segmentation finished");
    Ok(intervals)
}
