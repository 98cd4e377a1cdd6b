//! Valley detection on shank angular velocity
//!
//! Heel-strike-like events show up as deep negative excursions of the sagittal
//! gyroscope. A sample is a valley when it is the minimum of its symmetric
//! window and lies below the amplitude threshold; accepted valleys are spaced
//! by a refractory distance.

use crate::config::PeakDetectorConfig;
use gait_core::{GaitError, GaitResult};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Summary of the span between two consecutive valleys
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GaitCycle {
    pub start_idx: usize,
    pub end_idx: usize,
    pub start_time: f64,
    pub end_time: f64,
    /// `end_time - start_time` in seconds
    pub duration: f64,
    /// Angular velocity at the opening valley
    pub peak_velocity: f64,
    /// Largest absolute angular velocity in `[start_idx, end_idx)`
    pub max_velocity: f64,
}

/// Detector output: valley indices and the cycle view derived from them
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PeakDetection {
    /// Ascending, duplicate-free valley indices
    pub peaks: Vec<usize>,
    /// One record per pair of consecutive valleys
    pub cycles: Vec<GaitCycle>,
}

/// Windowed local-minimum valley detector
#[derive(Debug, Clone)]
pub struct PeakDetector {
    config: PeakDetectorConfig,
}

impl PeakDetector {
    pub fn new(config: PeakDetectorConfig) -> GaitResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Detect valleys and build cycle records.
    ///
    /// A stream shorter than two windows yields no valleys.
    pub fn detect(&self, time: &[f64], values: &[f64]) -> GaitResult<PeakDetection> {
        if time.len() != values.len() {
            return Err(GaitError::LengthMismatch {
                channel: "gyro".to_string(),
                expected: time.len(),
                actual: values.len(),
            });
        }

        let peaks = self.scan(values);
        let cycles = build_cycles(time, values, &peaks);
        debug!(peaks = peaks.len(), cycles = cycles.len(), "valley scan finished");

        Ok(PeakDetection { peaks, cycles })
    }

    fn scan(&self, values: &[f64]) -> Vec<usize> {
        let PeakDetectorConfig {
            min_distance,
            window_size,
            threshold,
        } = self.config;
        let n = values.len();

        let mut committed = Vec::new();
        // Most recent accepted valley; still replaceable by a deeper neighbour
        let mut pending: Option<usize> = None;
        let mut i = window_size;

        while i + window_size < n {
            let window_start = i - window_size;
            let local_min = window_start + argmin(&values[window_start..i + window_size]);

            if local_min != i || !(values[i] < threshold) {
                i += 1;
                continue;
            }

            match pending {
                Some(last) if i - last < min_distance => {
                    if values[i] < values[last] {
                        pending = Some(i);
                    }
                    i += 1;
                }
                _ => {
                    committed.extend(pending.replace(i));
                    i += min_distance;
                }
            }
        }

        committed.extend(pending);
        committed
    }
}

/// Detect valley indices with explicit parameters.
pub fn find_peaks(
    time: &[f64],
    values: &[f64],
    min_distance: usize,
    window_size: usize,
    threshold: f64,
) -> GaitResult<Vec<usize>> {
    let detector = PeakDetector::new(PeakDetectorConfig {
        min_distance,
        window_size,
        threshold,
    })?;
    Ok(detector.detect(time, values)?.peaks)
}

/// Index of the first minimum; the first NaN wins over any number.
fn argmin(window: &[f64]) -> usize {
    if let Some(k) = window.iter().position(|v| v.is_nan()) {
        return k;
    }
    let mut best = 0;
    for (k, &v) in window.iter().enumerate().skip(1) {
        if v < window[best] {
            best = k;
        }
    }
    best
}

fn build_cycles(time: &[f64], values: &[f64], peaks: &[usize]) -> Vec<GaitCycle> {
    peaks
        .windows(2)
        .map(|pair| {
            let (start_idx, end_idx) = (pair[0], pair[1]);
            let max_velocity = values[start_idx..end_idx]
                .iter()
                .fold(0.0f64, |acc, v| acc.max(v.abs()));

            GaitCycle {
                start_idx,
                end_idx,
                start_time: time[start_idx],
                end_time: time[end_idx],
                duration: time[end_idx] - time[start_idx],
                peak_velocity: values[start_idx],
                max_velocity,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn time_axis(n: usize, rate: f64) -> Vec<f64> {
        (0..n).map(|i| i as f64 / rate).collect()
    }

    fn default_detector() -> PeakDetector {
        PeakDetector::new(PeakDetectorConfig::default()).unwrap()
    }

    #[test]
    fn test_two_isolated_valleys() {
        let mut values = vec![0.0; 250];
        values[60] = -250.0;
        values[130] = -260.0;
        let time = time_axis(values.len(), 100.0);

        let peaks = find_peaks(&time, &values, 20, 50, -200.0).unwrap();
        assert_eq!(peaks, vec![60, 130]);
    }

    #[test]
    fn test_valley_beside_nan_gap_rejected() {
        let mut values = vec![0.0; 250];
        values[60] = -250.0;
        values[130] = -260.0;
        for v in &mut values[150..160] {
            *v = f64::NAN;
        }
        let time = time_axis(values.len(), 100.0);

        let peaks = find_peaks(&time, &values, 20, 50, -200.0).unwrap();
        assert_eq!(peaks, vec![60]);
    }

    #[test]
    fn test_cycle_records() {
        let mut values = vec![0.0; 250];
        values[60] = -250.0;
        values[100] = 320.0;
        values[130] = -260.0;
        let time = time_axis(values.len(), 100.0);

        let detection = default_detector().detect(&time, &values).unwrap();
        assert_eq!(detection.cycles.len(), 1);

        let cycle = &detection.cycles[0];
        assert_eq!((cycle.start_idx, cycle.end_idx), (60, 130));
        assert!((cycle.duration - 0.7).abs() < 1e-9);
        assert_eq!(cycle.peak_velocity, -250.0);
        assert_eq!(cycle.max_velocity, 320.0);
    }

    #[test]
    fn test_shallow_valleys_ignored() {
        let mut values = vec![0.0; 250];
        values[60] = -150.0;
        values[130] = -200.0; // must be strictly below the threshold
        let time = time_axis(values.len(), 100.0);

        assert!(default_detector().detect(&time, &values).unwrap().peaks.is_empty());
    }

    #[test]
    fn test_short_stream_yields_nothing() {
        let values = vec![-500.0; 99];
        let time = time_axis(values.len(), 100.0);
        assert!(default_detector().detect(&time, &values).unwrap().peaks.is_empty());
    }

    #[test]
    fn test_edges_not_scanned() {
        let mut values = vec![0.0; 200];
        values[10] = -400.0;
        values[190] = -400.0;
        let time = time_axis(values.len(), 100.0);
        assert!(default_detector().detect(&time, &values).unwrap().peaks.is_empty());
    }

    #[test]
    fn test_refractory_jump() {
        let config = PeakDetectorConfig {
            min_distance: 5,
            window_size: 1,
            threshold: -10.0,
        };
        let detector = PeakDetector::new(config).unwrap();

        // After accepting 3 the scan resumes at 3 + min_distance
        let values = vec![0.0, 0.0, 0.0, -20.0, 0.0, 0.0, 0.0, 0.0, -30.0, 0.0, 0.0, 0.0];
        let time = time_axis(values.len(), 10.0);

        let peaks = detector.detect(&time, &values).unwrap().peaks;
        assert_eq!(peaks, vec![3, 8]);
    }

    #[test]
    fn test_min_distance_respected() {
        let n = 2000;
        let values: Vec<f64> = (0..n)
            .map(|i| -300.0 * (i as f64 * 0.21).sin() - 40.0 * (i as f64 * 1.7).cos())
            .collect();
        let time = time_axis(n, 200.0);

        let config = PeakDetectorConfig {
            min_distance: 12,
            window_size: 6,
            threshold: -200.0,
        };
        let peaks = PeakDetector::new(config).unwrap().detect(&time, &values).unwrap().peaks;

        assert!(!peaks.is_empty());
        for pair in peaks.windows(2) {
            assert!(pair[1] > pair[0]);
            assert!(pair[1] - pair[0] >= 12);
        }
        for &p in &peaks {
            assert!(values[p] < -200.0);
        }
    }

    #[test]
    fn test_deterministic() {
        let values: Vec<f64> = (0..1500).map(|i| -350.0 * (i as f64 * 0.05).sin()).collect();
        let time = time_axis(values.len(), 100.0);
        let detector = default_detector();

        let first = detector.detect(&time, &values).unwrap();
        let second = detector.detect(&time, &values).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_length_mismatch() {
        let err = default_detector().detect(&[0.0, 1.0], &[0.0]).unwrap_err();
        assert!(matches!(err, GaitError::LengthMismatch { .. }));
    }

    #[test]
    fn test_invalid_parameters() {
        assert!(find_peaks(&[], &[], 0, 50, -200.0).is_err());
        assert!(find_peaks(&[], &[], 20, 0, -200.0).is_err());
        assert!(find_peaks(&[], &[], 20, 50, f64::NAN).is_err());
    }

    #[test]
    fn test_argmin_first_occurrence() {
        assert_eq!(argmin(&[3.0, -1.0, 2.0, -1.0]), 1);
        assert_eq!(argmin(&[2.0, f64::NAN, 1.0, f64::NAN]), 1);
    }
}
