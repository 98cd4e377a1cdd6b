//! Repeated-sprint session simulator
//!
//! A session is a quiet lead-in, a number of sprint bouts separated by rests,
//! and a quiet tail. Both legs run the same stride pattern with the left leg
//! shifted by a fraction of a stride. The simulator records where every
//! stride valley was placed so tests can check detections against it.

use crate::signal_patterns::{StridePattern, VALLEY_PHASE};
use gait_core::{
    columns, ColumnTable, GaitError, GaitResult, LegChannels, LegSide, TrialRecording,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::ops::Range;
use tracing::debug;

/// Additive Gaussian noise per channel family
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NoiseConfig {
    /// Gyroscope noise standard deviation (deg/s)
    pub gyro_std: f64,
    /// Accelerometer noise standard deviation (g)
    pub acc_std: f64,
    /// EMG baseline noise standard deviation (mV)
    pub emg_std: f64,
}

impl Default for NoiseConfig {
    fn default() -> Self {
        Self {
            gyro_std: 5.0,
            acc_std: 0.05,
            emg_std: 0.02,
        }
    }
}

impl NoiseConfig {
    /// No noise at all
    pub fn silent() -> Self {
        Self {
            gyro_std: 0.0,
            acc_std: 0.0,
            emg_std: 0.0,
        }
    }
}

/// Configuration for a synthetic session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SprintSessionConfig {
    pub name: String,
    /// Sampling rate in Hz
    pub sampling_rate: f64,
    /// Quiet time before the first bout (s)
    pub lead_in: f64,
    pub bouts: usize,
    pub strides_per_bout: usize,
    /// Duration of one stride (s)
    pub stride_period: f64,
    /// Quiet time between bouts (s)
    pub rest_duration: f64,
    /// Quiet time after the last bout (s)
    pub tail: f64,
    /// Left-leg delay as a fraction of a stride, in `[0, 1)`
    pub left_phase_offset: f64,
    pub pattern: StridePattern,
    pub noise: NoiseConfig,
    /// Random seed; equal seeds give identical sessions
    pub seed: u64,
}

impl Default for SprintSessionConfig {
    fn default() -> Self {
        Self {
            name: "synthetic sprint".to_string(),
            sampling_rate: 200.0,
            lead_in: 4.0,
            bouts: 3,
            strides_per_bout: 24,
            stride_period: 0.45,
            rest_duration: 5.0,
            tail: 4.0,
            left_phase_offset: 0.5,
            pattern: StridePattern::default(),
            noise: NoiseConfig::default(),
            seed: 42,
        }
    }
}

impl SprintSessionConfig {
    pub fn validate(&self) -> GaitResult<()> {
        if !(self.sampling_rate.is_finite() && self.sampling_rate > 0.0) {
            return Err(gait_core::parameter_error!(
                "sampling_rate",
                "must be positive, got {}",
                self.sampling_rate
            ));
        }
        if !(self.stride_period.is_finite() && self.stride_period * self.sampling_rate >= 8.0) {
            return Err(gait_core::parameter_error!(
                "stride_period",
                "stride must span at least 8 samples, got {} s at {} Hz",
                self.stride_period,
                self.sampling_rate
            ));
        }
        if self.bouts == 0 || self.strides_per_bout == 0 {
            return Err(gait_core::parameter_error!(
                "bouts",
                "need at least one bout of one stride"
            ));
        }
        for (name, value) in [
            ("lead_in", self.lead_in),
            ("rest_duration", self.rest_duration),
            ("tail", self.tail),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(GaitError::InvalidParameter {
                    name,
                    reason: format!("must be non-negative, got {}", value),
                });
            }
        }
        if !(0.0..1.0).contains(&self.left_phase_offset) {
            return Err(gait_core::parameter_error!(
                "left_phase_offset",
                "must be in [0, 1), got {}",
                self.left_phase_offset
            ));
        }
        Ok(())
    }

    fn stride_samples(&self) -> f64 {
        self.stride_period * self.sampling_rate
    }

    fn bout_duration(&self) -> f64 {
        self.strides_per_bout as f64 * self.stride_period
    }

    /// Total number of samples in the session
    pub fn total_samples(&self) -> usize {
        let rests = self.bouts.saturating_sub(1) as f64;
        let quiet = self.lead_in + self.tail + self.rest_duration * rests;
        let total = quiet + self.bout_duration() * self.bouts as f64;
        (total * self.sampling_rate).round() as usize
    }

    /// Sample ranges covered by each bout
    pub fn bout_ranges(&self) -> Vec<Range<usize>> {
        let bout_samples = (self.bout_duration() * self.sampling_rate).round() as usize;
        (0..self.bouts)
            .map(|b| {
                let onset = self.lead_in + b as f64 * (self.bout_duration() + self.rest_duration);
                let start = (onset * self.sampling_rate).round() as usize;
                start..start + bout_samples
            })
            .collect()
    }

    fn phase_offset(&self, side: LegSide) -> f64 {
        match side {
            LegSide::Right => 0.0,
            LegSide::Left => self.left_phase_offset,
        }
    }

    /// Stride phase of `side` at `index`, `None` outside strides
    fn stride_phase(&self, bouts: &[Range<usize>], side: LegSide, index: usize) -> Option<f64> {
        let bout = bouts.iter().find(|b| b.contains(&index))?;
        let strides = (index - bout.start) as f64 / self.stride_samples() - self.phase_offset(side);
        if strides < 0.0 || strides >= self.strides_per_bout as f64 {
            return None;
        }
        Some(strides.fract())
    }

    /// Nearest sample to each placed valley, per bout
    fn valley_indices(&self, bouts: &[Range<usize>], side: LegSide) -> Vec<usize> {
        let period = self.stride_samples();
        bouts
            .iter()
            .flat_map(|bout| {
                (0..self.strides_per_bout).filter_map(move |k| {
                    let stride = k as f64 + VALLEY_PHASE + self.phase_offset(side);
                    let position = bout.start as f64 + stride * period;
                    let index = position.round() as usize;
                    (index < bout.end).then_some(index)
                })
            })
            .collect()
    }
}

/// A generated session together with its ground truth
#[derive(Debug, Clone)]
pub struct SimulatedSession {
    pub trial: TrialRecording,
    /// Sample ranges of the sprint bouts
    pub bouts: Vec<Range<usize>>,
    /// Placed valley indices per leg, in order
    pub valleys: BTreeMap<LegSide, Vec<usize>>,
}

impl SimulatedSession {
    pub fn valleys(&self, side: LegSide) -> &[usize] {
        self.valleys.get(&side).map(Vec::as_slice).unwrap_or_default()
    }

    /// The session laid out as an export table with named columns
    pub fn column_table(&self) -> GaitResult<ColumnTable> {
        let trial = &self.trial;
        let mut headers = vec![columns::TIME_PATTERN.to_string()];
        let mut data = vec![trial.time().to_vec()];

        for side in LegSide::ALL {
            headers.push(format!("{}_Shank GYRO.Z [°/s]", side_tag(side)));
            data.push(trial.leg(side).gyro.clone());
        }
        for side in LegSide::ALL {
            headers.push(format!("{}_Shank ACC.Z [g]", side_tag(side)));
            data.push(trial.leg(side).acc.clone());
        }
        for side in LegSide::ALL {
            let leg = trial.leg(side);
            headers.push(format!("{} BF EMG [mV]", side_tag(side)));
            data.push(leg.emg_bf.clone());
            headers.push(format!("{} ST EMG [mV]", side_tag(side)));
            data.push(leg.emg_st.clone());
        }

        ColumnTable::new(headers, data)
    }
}

fn side_tag(side: LegSide) -> &'static str {
    match side {
        LegSide::Right => "R",
        LegSide::Left => "L",
    }
}

/// Sprint session generator
pub struct SprintSimulator {
    config: SprintSessionConfig,
    rng: StdRng,
    gyro_noise: Normal<f64>,
    acc_noise: Normal<f64>,
    emg_noise: Normal<f64>,
    carrier: Normal<f64>,
}

impl SprintSimulator {
    pub fn new(config: SprintSessionConfig) -> GaitResult<Self> {
        config.validate()?;

        let normal = |std: f64, what: &str| {
            Normal::new(0.0, std).map_err(|e| GaitError::ConfigurationError {
                message: format!("Failed to create {} noise distribution: {}", what, e),
            })
        };

        Ok(Self {
            rng: StdRng::seed_from_u64(config.seed),
            gyro_noise: normal(config.noise.gyro_std, "gyro")?,
            acc_noise: normal(config.noise.acc_std, "acc")?,
            emg_noise: normal(config.noise.emg_std, "EMG")?,
            carrier: normal(1.0, "EMG carrier")?,
            config,
        })
    }

    /// Generate one full session
    pub fn generate(&mut self) -> GaitResult<SimulatedSession> {
        let n = self.config.total_samples();
        let bouts = self.config.bout_ranges();
        let time: Vec<f64> = (0..n).map(|i| i as f64 / self.config.sampling_rate).collect();

        let right = self.generate_leg(n, &bouts, LegSide::Right);
        let left = self.generate_leg(n, &bouts, LegSide::Left);
        let trial = TrialRecording::new(self.config.name.clone(), time, right, left)?;

        let valleys = LegSide::ALL
            .into_iter()
            .map(|side| (side, self.config.valley_indices(&bouts, side)))
            .collect();

        debug!(samples = n, bouts = bouts.len(), "synthetic session generated");
        Ok(SimulatedSession {
            trial,
            bouts,
            valleys,
        })
    }

    fn generate_leg(&mut self, n: usize, bouts: &[Range<usize>], side: LegSide) -> LegChannels {
        let pattern = self.config.pattern;
        let mut leg = LegChannels::new(
            Vec::with_capacity(n),
            Vec::with_capacity(n),
            Vec::with_capacity(n),
            Vec::with_capacity(n),
        );

        for index in 0..n {
            let (gyro, acc, bf, st) = match self.config.stride_phase(bouts, side, index) {
                Some(phase) => (
                    pattern.gyro_at(phase),
                    pattern.acc_at(phase),
                    pattern.bf_amplitude
                        * pattern.bf_envelope(phase)
                        * self.carrier.sample(&mut self.rng),
                    pattern.st_amplitude
                        * pattern.st_envelope(phase)
                        * self.carrier.sample(&mut self.rng),
                ),
                None => (0.0, 1.0, 0.0, 0.0),
            };

            leg.gyro.push(gyro + self.gyro_noise.sample(&mut self.rng));
            leg.acc.push(acc + self.acc_noise.sample(&mut self.rng));
            leg.emg_bf.push(bf + self.emg_noise.sample(&mut self.rng));
            leg.emg_st.push(st + self.emg_noise.sample(&mut self.rng));
        }

        leg
    }
}

/// Generate a session in one call
pub fn simulate_session(config: SprintSessionConfig) -> GaitResult<SimulatedSession> {
    SprintSimulator::new(config)?.generate()
}
