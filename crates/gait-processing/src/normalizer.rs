//! Percentage-of-cycle normalization
//!
//! Each cycle between consecutive selected valleys is resampled onto a fixed
//! 0-100 % axis with a cubic spline, so cycles of different durations (and
//! subjects) can be averaged point by point. The valley indices always come
//! from the gyroscope of the same leg; any channel on the same time base can
//! be normalized against them.

use crate::config::NormalizationConfig;
use crate::interpolation::{linspace, CubicSpline};
use gait_core::{GaitError, GaitResult};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// One cycle resampled onto the percentage axis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedCycle {
    /// 1-based position of the opening valley within the selection
    pub cycle_number: usize,
    pub start_idx: usize,
    /// Inclusive end of the raw segment
    pub end_idx: usize,
    /// Raw segment duration in seconds
    pub duration: f64,
    /// `num_points` values at 0, 1/(num_points-1), ..., 100 %
    pub values: Vec<f64>,
}

/// Why a cycle is absent from the output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SkipReason {
    /// Raw segment shorter than the interpolant needs
    TooFewSamples { samples: usize, required: usize },
    /// Single valley with no preceding cycle to borrow a length from
    NoReferenceLength,
    /// Spline construction or evaluation failed
    InterpolationFailed { reason: String },
}

/// A cycle dropped during normalization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedCycle {
    pub cycle_number: usize,
    pub reason: SkipReason,
}

/// Normalized cycles plus the cycles that had to be skipped
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NormalizationOutcome {
    pub cycles: Vec<NormalizedCycle>,
    pub skipped: Vec<SkippedCycle>,
}

/// Channel-agnostic cycle resampler
#[derive(Debug, Clone)]
pub struct CycleNormalizer {
    config: NormalizationConfig,
    target: Vec<f64>,
}

impl CycleNormalizer {
    pub fn new(config: NormalizationConfig) -> GaitResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            target: linspace(0.0, 100.0, config.num_points),
        })
    }

    /// Resample `signal` between each pair of consecutive `peaks`.
    ///
    /// The last peak borrows the length of the cycle before it, clamped to the
    /// end of the stream. Short segments and interpolation failures are
    /// skipped, never fatal.
    pub fn normalize(
        &self,
        time: &[f64],
        signal: &[f64],
        peaks: &[usize],
    ) -> GaitResult<NormalizationOutcome> {
        if time.len() != signal.len() {
            return Err(GaitError::LengthMismatch {
                channel: "normalized signal".to_string(),
                expected: time.len(),
                actual: signal.len(),
            });
        }
        if let Some(&p) = peaks.iter().find(|&&p| p >= signal.len()) {
            return Err(gait_core::parameter_error!(
                "peaks",
                "index {} beyond stream of {} samples",
                p,
                signal.len()
            ));
        }
        if peaks.windows(2).any(|w| w[1] <= w[0]) {
            return Err(gait_core::parameter_error!("peaks", "indices must be strictly ascending"));
        }

        let mut outcome = NormalizationOutcome::default();
        let last_index = signal.len().saturating_sub(1);

        for (i, &start_idx) in peaks.iter().enumerate() {
            let cycle_number = i + 1;

            let end_idx = match (peaks.get(i + 1), i.checked_sub(1).map(|k| peaks[k])) {
                (Some(&next), _) => next,
                (None, Some(previous)) => (start_idx + (start_idx - previous)).min(last_index),
                (None, None) => {
                    warn!(
                        cycle = cycle_number,
                        "single valley has no reference cycle length, skipping"
                    );
                    outcome.skipped.push(SkippedCycle {
                        cycle_number,
                        reason: SkipReason::NoReferenceLength,
                    });
                    continue;
                }
            };

            let segment = &signal[start_idx..=end_idx];
            if segment.len() < self.config.min_segment_len {
                warn!(
                    cycle = cycle_number,
                    samples = segment.len(),
                    required = self.config.min_segment_len,
                    "cycle has too few points, skipping"
                );
                outcome.skipped.push(SkippedCycle {
                    cycle_number,
                    reason: SkipReason::TooFewSamples {
                        samples: segment.len(),
                        required: self.config.min_segment_len,
                    },
                });
                continue;
            }

            match self.resample(segment) {
                Ok(values) => outcome.cycles.push(NormalizedCycle {
                    cycle_number,
                    start_idx,
                    end_idx,
                    duration: time[end_idx] - time[start_idx],
                    values,
                }),
                Err(e) => {
                    warn!(
                        cycle = cycle_number,
                        error = %e,
                        "failed to interpolate cycle, skipping"
                    );
                    outcome.skipped.push(SkippedCycle {
                        cycle_number,
                        reason: SkipReason::InterpolationFailed {
                            reason: e.to_string(),
                        },
                    });
                }
            }
        }

        Ok(outcome)
    }

    fn resample(&self, segment: &[f64]) -> GaitResult<Vec<f64>> {
        let axis = linspace(0.0, 100.0, segment.len());
        let spline = CubicSpline::not_a_knot(&axis, segment)?;
        spline.evaluate_many(&self.target)
    }
}

/// Normalize one channel with an explicit point count.
pub fn normalize(
    time: &[f64],
    signal: &[f64],
    peaks: &[usize],
    num_points: usize,
) -> GaitResult<NormalizationOutcome> {
    let config = NormalizationConfig {
        num_points,
        ..NormalizationConfig::default()
    };
    CycleNormalizer::new(config)?.normalize(time, signal, peaks)
}
