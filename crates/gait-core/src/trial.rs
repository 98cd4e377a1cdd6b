//! TrialRecording: container for one sprint session

use crate::channel_types::{ChannelKind, LegSide};
use crate::error::{GaitError, GaitResult};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The four channels recorded on one leg, index-aligned with the trial time base
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LegChannels {
    /// Angular velocity about Z (deg/s)
    pub gyro: Vec<f64>,
    /// Acceleration along Z (g)
    pub acc: Vec<f64>,
    /// Biceps femoris EMG
    pub emg_bf: Vec<f64>,
    /// Semitendinosus EMG
    pub emg_st: Vec<f64>,
}

impl LegChannels {
    pub fn new(gyro: Vec<f64>, acc: Vec<f64>, emg_bf: Vec<f64>, emg_st: Vec<f64>) -> Self {
        Self {
            gyro,
            acc,
            emg_bf,
            emg_st,
        }
    }

    /// Borrow a channel by kind
    pub fn channel(&self, kind: ChannelKind) -> &[f64] {
        match kind {
            ChannelKind::Gyro => &self.gyro,
            ChannelKind::Acc => &self.acc,
            ChannelKind::EmgBf => &self.emg_bf,
            ChannelKind::EmgSt => &self.emg_st,
        }
    }
}

/// One trial: a shared time stream plus the channels of both legs.
///
/// Construction validates that every channel shares the time base, so the
/// processing stages can index any channel with a peak found on another.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrialRecording {
    /// Unique identifier for this recording
    pub id: Uuid,
    /// Source name (file stem or subject label)
    pub name: String,
    time: Vec<f64>,
    right: LegChannels,
    left: LegChannels,
}

impl TrialRecording {
    /// Create a new recording, validating lengths and time monotonicity
    pub fn new(
        name: impl Into<String>,
        time: Vec<f64>,
        right: LegChannels,
        left: LegChannels,
    ) -> GaitResult<Self> {
        validate_time(&time)?;

        for side in LegSide::ALL {
            let leg = match side {
                LegSide::Right => &right,
                LegSide::Left => &left,
            };
            for kind in ChannelKind::ALL {
                let actual = leg.channel(kind).len();
                if actual != time.len() {
                    return Err(GaitError::LengthMismatch {
                        channel: format!("{} {}", side, kind),
                        expected: time.len(),
                        actual,
                    });
                }
            }
        }

        Ok(TrialRecording {
            id: Uuid::new_v4(),
            name: name.into(),
            time,
            right,
            left,
        })
    }

    /// Number of samples per channel
    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    /// Shared time stream in seconds
    pub fn time(&self) -> &[f64] {
        &self.time
    }

    /// All channels of one leg
    pub fn leg(&self, side: LegSide) -> &LegChannels {
        match side {
            LegSide::Right => &self.right,
            LegSide::Left => &self.left,
        }
    }

    /// One channel of one leg
    pub fn channel(&self, side: LegSide, kind: ChannelKind) -> &[f64] {
        self.leg(side).channel(kind)
    }

    /// Recording duration in seconds
    pub fn duration(&self) -> f64 {
        match (self.time.first(), self.time.last()) {
            (Some(first), Some(last)) => last - first,
            _ => 0.0,
        }
    }

    /// Mean sampling rate in Hz, estimated from the time stream
    pub fn sampling_rate(&self) -> Option<f64> {
        let duration = self.duration();
        if self.time.len() < 2 || duration <= 0.0 {
            None
        } else {
            Some((self.time.len() - 1) as f64 / duration)
        }
    }

    /// Calculate basic statistics for a channel
    pub fn channel_stats(&self, side: LegSide, kind: ChannelKind) -> ChannelStats {
        ChannelStats::calculate(self.channel(side, kind))
    }
}

fn validate_time(time: &[f64]) -> GaitResult<()> {
    for (index, pair) in time.windows(2).enumerate() {
        if !(pair[1] > pair[0]) {
            return Err(GaitError::NonMonotonicTime { index: index + 1 });
        }
    }
    Ok(())
}

/// Basic statistics for a signal channel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelStats {
    pub mean: f64,
    pub rms: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
    pub peak_to_peak: f64,
}

impl ChannelStats {
    pub fn calculate(data: &[f64]) -> Self {
        if data.is_empty() {
            return Self {
                mean: 0.0,
                rms: 0.0,
                std_dev: 0.0,
                min: 0.0,
                max: 0.0,
                peak_to_peak: 0.0,
            };
        }

        let n = data.len() as f64;
        let mean = data.iter().sum::<f64>() / n;
        let rms = (data.iter().map(|x| x * x).sum::<f64>() / n).sqrt();

        let variance = data.iter()
            .map(|x| (x - mean).powi(2))
            .sum::<f64>() / n;
        let std_dev = variance.sqrt();

        let min = data.iter().fold(f64::INFINITY, |a, &b| a.min(b));
        let max = data.iter().fold(f64::NEG_INFINITY, |a, &b| a.max(b));

        Self {
            mean,
            rms,
            std_dev,
            min,
            max,
            peak_to_peak: max - min,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leg(len: usize, offset: f64) -> LegChannels {
        LegChannels::new(
            (0..len).map(|i| i as f64 + offset).collect(),
            vec![1.0; len],
            vec![0.1; len],
            vec![0.2; len],
        )
    }

    #[test]
    fn test_trial_creation() {
        let time: Vec<f64> = (0..500).map(|i| i as f64 / 100.0).collect();
        let trial = TrialRecording::new("S01", time, leg(500, 0.0), leg(500, 1000.0)).unwrap();

        assert_eq!(trial.len(), 500);
        assert_eq!(trial.name, "S01");
        assert_eq!(trial.channel(LegSide::Right, ChannelKind::Gyro)[3], 3.0);
        assert_eq!(trial.channel(LegSide::Left, ChannelKind::Gyro)[3], 1003.0);
        assert!((trial.sampling_rate().unwrap() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_length_mismatch_rejected() {
        let time: Vec<f64> = (0..100).map(|i| i as f64).collect();
        let mut left = leg(100, 0.0);
        left.emg_st.pop();

        let err = TrialRecording::new("bad", time, leg(100, 0.0), left).unwrap_err();
        assert_eq!(
            err,
            GaitError::LengthMismatch {
                channel: "Left ST".to_string(),
                expected: 100,
                actual: 99,
            }
        );
    }

    #[test]
    fn test_non_monotonic_time_rejected() {
        let time = vec![0.0, 0.01, 0.02, 0.02, 0.04];
        let err = TrialRecording::new("bad", time, leg(5, 0.0), leg(5, 0.0)).unwrap_err();
        assert_eq!(err, GaitError::NonMonotonicTime { index: 3 });
    }

    #[test]
    fn test_channel_stats() {
        let stats = ChannelStats::calculate(&[-2.0, 0.0, 2.0]);
        assert_eq!(stats.mean, 0.0);
        assert_eq!(stats.min, -2.0);
        assert_eq!(stats.max, 2.0);
        assert_eq!(stats.peak_to_peak, 4.0);
        assert!((stats.rms - (8.0f64 / 3.0).sqrt()).abs() < 1e-12);

        let empty = ChannelStats::calculate(&[]);
        assert_eq!(empty.peak_to_peak, 0.0);
    }
}
