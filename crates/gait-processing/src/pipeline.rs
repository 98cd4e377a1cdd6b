//! Per-trial processing pipeline
//!
//! For each leg: valleys and intervals are both computed on that leg's
//! gyroscope (the same index-aligned array), joined into categories, reduced
//! to the mid-set and then used to normalize every channel of the leg.
//! EMG and accelerometer cycles reuse the gyroscope timing without checking
//! it against their own signal.

use crate::config::ProcessingConfig;
use crate::cycles::{categorize, select_middle, CategorizedCycles};
use crate::intervals::{segment_intervals, CategoryId, IntervalMap};
use crate::normalizer::{CycleNormalizer, NormalizedCycle, SkippedCycle};
use crate::peaks::{PeakDetection, PeakDetector};
use crate::snapshots::{interval_snapshots, peak_snapshots, SampleSnapshot};
use gait_core::{ChannelKind, ChannelStats, GaitResult, LegSide, TrialRecording};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Instant;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Category id -> normalized cycles
pub type CategoryCycles = BTreeMap<CategoryId, Vec<NormalizedCycle>>;

/// `{side: {channel: {category: cycles}}}`, the hand-off to aggregation
pub type NormalizedDataset = BTreeMap<LegSide, BTreeMap<ChannelKind, CategoryCycles>>;

/// Recoverable data-sparsity conditions met while processing a trial
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ProcessingWarning {
    /// Gyroscope never left rest long enough to form a bout
    NoIntervals { side: LegSide },
    /// No valley passed the amplitude threshold
    NoPeaks { side: LegSide },
    /// Category held fewer valleys than the selection size and was dropped
    InsufficientCycles {
        side: LegSide,
        category: CategoryId,
        available: usize,
        required: usize,
    },
    /// Selection too small to delimit a cycle
    TooFewSelected { side: LegSide, category: CategoryId },
    /// A cycle was absent from one channel's normalized output
    CycleSkipped {
        side: LegSide,
        channel: ChannelKind,
        category: CategoryId,
        cycle: SkippedCycle,
    },
}

/// Everything computed for one leg
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LegAnalysis {
    pub side: LegSide,
    pub gyro_stats: ChannelStats,
    pub detection: PeakDetection,
    pub intervals: IntervalMap,
    pub categorized: CategorizedCycles,
    pub selected: CategorizedCycles,
    pub peak_snapshots: Vec<SampleSnapshot>,
    pub interval_snapshots: BTreeMap<CategoryId, Vec<SampleSnapshot>>,
    pub normalized: BTreeMap<ChannelKind, CategoryCycles>,
}

/// Result of processing one trial
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrialAnalysis {
    pub trial_id: Uuid,
    pub trial_name: String,
    pub config: ProcessingConfig,
    pub legs: BTreeMap<LegSide, LegAnalysis>,
    pub warnings: Vec<ProcessingWarning>,
    pub processing_time_us: u64,
}

impl TrialAnalysis {
    /// Normalized curves of both legs, keyed side -> channel -> category
    pub fn normalized_dataset(&self) -> NormalizedDataset {
        self.legs
            .iter()
            .map(|(&side, leg)| (side, leg.normalized.clone()))
            .collect()
    }

    pub fn leg(&self, side: LegSide) -> Option<&LegAnalysis> {
        self.legs.get(&side)
    }

    /// Total normalized cycles over every side, channel and category
    pub fn normalized_cycle_count(&self) -> usize {
        self.legs
            .values()
            .flat_map(|leg| leg.normalized.values())
            .flat_map(|categories| categories.values())
            .map(Vec::len)
            .sum()
    }
}

/// Gait event detection and cycle normalization for whole trials
#[derive(Debug, Clone)]
pub struct GaitPipeline {
    config: ProcessingConfig,
    detector: PeakDetector,
    normalizer: CycleNormalizer,
}

impl GaitPipeline {
    /// Create a pipeline, validating the configuration
    pub fn new(config: ProcessingConfig) -> GaitResult<Self> {
        config.validate()?;
        Ok(Self {
            detector: PeakDetector::new(config.peaks)?,
            normalizer: CycleNormalizer::new(config.normalization)?,
            config,
        })
    }

    pub fn config(&self) -> &ProcessingConfig {
        &self.config
    }

    /// Process both legs of a trial
    pub fn process(&self, trial: &TrialRecording) -> GaitResult<TrialAnalysis> {
        let start_time = Instant::now();
        let mut warnings = Vec::new();
        let mut legs = BTreeMap::new();

        for side in LegSide::ALL {
            let leg = self.process_leg(trial, side, &mut warnings)?;
            legs.insert(side, leg);
        }

        let analysis = TrialAnalysis {
            trial_id: trial.id,
            trial_name: trial.name.clone(),
            config: self.config.clone(),
            legs,
            warnings,
            processing_time_us: start_time.elapsed().as_micros() as u64,
        };

        info!(
            trial = %analysis.trial_name,
            cycles = analysis.normalized_cycle_count(),
            warnings = analysis.warnings.len(),
            "trial processed"
        );
        Ok(analysis)
    }

    /// Run detection, segmentation, selection and normalization for one leg
    pub fn process_leg(
        &self,
        trial: &TrialRecording,
        side: LegSide,
        warnings: &mut Vec<ProcessingWarning>,
    ) -> GaitResult<LegAnalysis> {
        let time = trial.time();
        let gyro = trial.channel(side, ChannelKind::Gyro);

        let detection = self.detector.detect(time, gyro)?;
        if detection.peaks.is_empty() {
            warn!(%side, "no valleys below threshold");
            warnings.push(ProcessingWarning::NoPeaks { side });
        }

        let intervals = segment_intervals(gyro, time, &self.config.intervals)?;
        if intervals.is_empty() {
            warn!(%side, "no activity intervals found");
            warnings.push(ProcessingWarning::NoIntervals { side });
        }

        let categorized = categorize(&detection.peaks, &intervals);
        let required = self.config.selection.n_cycles;
        let selected = select_middle(&categorized, required);

        for (&category, cycles) in &categorized {
            if !selected.contains_key(&category) {
                warn!(
                    %side,
                    category,
                    available = cycles.len(),
                    required,
                    "not enough steady-state cycles"
                );
                warnings.push(ProcessingWarning::InsufficientCycles {
                    side,
                    category,
                    available: cycles.len(),
                    required,
                });
            }
        }

        let mut normalized: BTreeMap<ChannelKind, CategoryCycles> = BTreeMap::new();
        for (&category, peaks) in &selected {
            if peaks.len() < 2 {
                warnings.push(ProcessingWarning::TooFewSelected { side, category });
                continue;
            }

            for channel in ChannelKind::ALL {
                let outcome = self.normalizer.normalize(time, trial.channel(side, channel), peaks)?;
                warnings.extend(outcome.skipped.into_iter().map(|cycle| {
                    ProcessingWarning::CycleSkipped {
                        side,
                        channel,
                        category,
                        cycle,
                    }
                }));
                normalized.entry(channel).or_default().insert(category, outcome.cycles);
            }
        }

        debug!(
            %side,
            peaks = detection.peaks.len(),
            intervals = intervals.len(),
            selected = selected.len(),
            "leg processed"
        );

        Ok(LegAnalysis {
            side,
            gyro_stats: trial.channel_stats(side, ChannelKind::Gyro),
            peak_snapshots: peak_snapshots(trial, side, &detection.peaks),
            interval_snapshots: interval_snapshots(trial, side, &selected),
            detection,
            intervals,
            categorized,
            selected,
            normalized,
        })
    }
}

/// Process one trial with the given configuration
pub fn process_trial(
    trial: &TrialRecording,
    config: &ProcessingConfig,
) -> GaitResult<TrialAnalysis> {
    GaitPipeline::new(config.clone())?.process(trial)
}

#[cfg(test)]
mod tests {
    use super::*;
    use gait_core::LegChannels;

    /// Flat rest, then a bout with a valley every `period` samples
    fn synthetic_leg(n: usize, bout: std::ops::Range<usize>, period: usize) -> LegChannels {
        let gyro: Vec<f64> = (0..n)
            .map(|i| {
                if !bout.contains(&i) {
                    0.0
                } else {
                    let phase = (i - bout.start) % period;
                    let angle = 2.0 * std::f64::consts::PI * phase as f64 / period as f64;
                    -400.0 * angle.cos()
                }
            })
            .collect();
        let acc = gyro.iter().map(|g| g / 400.0).collect();
        let bf = gyro.iter().map(|g| g.abs() * 0.001).collect();
        let st = gyro.iter().map(|g| g.abs() * 0.002).collect();
        LegChannels::new(gyro, acc, bf, st)
    }

    fn trial(n: usize) -> TrialRecording {
        let time: Vec<f64> = (0..n).map(|i| i as f64 / 100.0).collect();
        TrialRecording::new(
            "pipeline",
            time,
            synthetic_leg(n, 400..2400, 60),
            synthetic_leg(n, 430..2400, 60),
        )
        .unwrap()
    }

    fn config() -> ProcessingConfig {
        let mut config = ProcessingConfig::default();
        config.peaks.window_size = 20;
        config
    }

    #[test]
    fn test_full_trial() {
        let analysis = process_trial(&trial(2800), &config()).unwrap();

        let right = analysis.leg(LegSide::Right).unwrap();
        assert!(right.detection.peaks.len() >= 30);
        assert_eq!(right.intervals.len(), 1);
        assert_eq!(right.selected[&1].len(), 10);
        assert!(right.gyro_stats.min < -399.0);
        assert!((right.gyro_stats.max - 400.0).abs() < 1e-9);

        let dataset = analysis.normalized_dataset();
        for side in LegSide::ALL {
            for channel in ChannelKind::ALL {
                let cycles = &dataset[&side][&channel][&1];
                assert_eq!(cycles.len(), 10);
                assert!(cycles.iter().all(|c| c.values.len() == 101));
            }
        }
        assert_eq!(analysis.normalized_cycle_count(), 80);
    }

    #[test]
    fn test_channels_share_gyro_timing() {
        let analysis = process_trial(&trial(2800), &config()).unwrap();
        let right = analysis.leg(LegSide::Right).unwrap();

        let gyro_bounds: Vec<(usize, usize)> = right.normalized[&ChannelKind::Gyro][&1]
            .iter()
            .map(|c| (c.start_idx, c.end_idx))
            .collect();
        let emg_bounds: Vec<(usize, usize)> = right.normalized[&ChannelKind::EmgSt][&1]
            .iter()
            .map(|c| (c.start_idx, c.end_idx))
            .collect();
        assert_eq!(gyro_bounds, emg_bounds);
        assert_eq!(gyro_bounds[0].0, right.selected[&1][0]);
    }

    #[test]
    fn test_quiet_trial_reports_warnings() {
        let n = 1000;
        let time: Vec<f64> = (0..n).map(|i| i as f64 / 100.0).collect();
        let quiet = LegChannels::new(vec![0.0; n], vec![0.0; n], vec![0.0; n], vec![0.0; n]);
        let trial = TrialRecording::new("quiet", time, quiet.clone(), quiet).unwrap();

        let analysis = process_trial(&trial, &ProcessingConfig::default()).unwrap();
        assert_eq!(analysis.normalized_cycle_count(), 0);
        let (left, right) = (LegSide::Left, LegSide::Right);
        assert!(analysis.warnings.contains(&ProcessingWarning::NoPeaks { side: left }));
        assert!(analysis.warnings.contains(&ProcessingWarning::NoIntervals { side: right }));
    }

    #[test]
    fn test_short_bout_dropped() {
        let mut config = config();
        config.selection.n_cycles = 40;

        let analysis = process_trial(&trial(2800), &config).unwrap();
        assert!(analysis.normalized_dataset()[&LegSide::Right].is_empty());
        assert!(analysis.warnings.iter().any(|w| matches!(
            w,
            ProcessingWarning::InsufficientCycles {
                side: LegSide::Right,
                category: 1,
                required: 40,
                ..
            }
        )));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = ProcessingConfig::default();
        config.normalization.num_points = 0;
        assert!(GaitPipeline::new(config.clone()).is_err());

        config.normalization.num_points = 51;
        let pipeline = GaitPipeline::new(config).unwrap();
        assert_eq!(pipeline.config().normalization.num_points, 51);
    }

    #[test]
    fn test_analysis_serializes() {
        let analysis = process_trial(&trial(2800), &config()).unwrap();
        let json = serde_json::to_string(&analysis).unwrap();
        assert!(json.contains("\"right\""));
        assert!(json.contains("\"IMU\""));
    }
}
