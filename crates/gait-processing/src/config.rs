//! Configuration management for gait cycle processing

use gait_core::{GaitError, GaitResult};
use serde::{Deserialize, Serialize};

/// Peak (valley) detector tuning
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PeakDetectorConfig {
    /// Refractory distance between accepted valleys (samples)
    pub min_distance: usize,
    /// Half-width of the local-minimum window (samples)
    pub window_size: usize,
    /// Valleys must lie strictly below this angular velocity (deg/s)
    pub threshold: f64,
}

/// Rest/activity segmentation tuning
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IntervalConfig {
    /// Samples with `|value| <= threshold` count as rest (deg/s)
    pub rest_amplitude_threshold: f64,
    /// Rest must last this long to split two bouts (s)
    pub min_rest_duration: f64,
}

/// Mid-set cycle selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionConfig {
    /// Cycles kept per interval
    pub n_cycles: usize,
}

/// Cycle resampling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizationConfig {
    /// Points on the 0-100 % axis
    pub num_points: usize,
    /// Shortest raw segment accepted by the cubic interpolant
    pub min_segment_len: usize,
}

/// Complete processing configuration for one trial
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessingConfig {
    /// Configuration name/profile
    pub name: String,
    pub peaks: PeakDetectorConfig,
    pub intervals: IntervalConfig,
    pub selection: SelectionConfig,
    pub normalization: NormalizationConfig,
}

impl Default for PeakDetectorConfig {
    fn default() -> Self {
        Self {
            min_distance: 20,
            window_size: 50,
            threshold: -200.0,
        }
    }
}

impl Default for IntervalConfig {
    fn default() -> Self {
        Self {
            rest_amplitude_threshold: 150.0,
            min_rest_duration: 3.0,
        }
    }
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self { n_cycles: 10 }
    }
}

impl Default for NormalizationConfig {
    fn default() -> Self {
        Self {
            num_points: 101,
            min_segment_len: 4,
        }
    }
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self::repeated_sprint()
    }
}

impl PeakDetectorConfig {
    pub fn validate(&self) -> GaitResult<()> {
        if self.min_distance == 0 {
            return Err(gait_core::parameter_error!("min_distance", "must be at least 1 sample"));
        }
        if self.window_size == 0 {
            return Err(gait_core::parameter_error!("window_size", "must be at least 1 sample"));
        }
        if !self.threshold.is_finite() {
            return Err(gait_core::parameter_error!(
                "threshold",
                "must be finite, got {}",
                self.threshold
            ));
        }
        Ok(())
    }
}

impl IntervalConfig {
    pub fn validate(&self) -> GaitResult<()> {
        if !self.rest_amplitude_threshold.is_finite() || self.rest_amplitude_threshold < 0.0 {
            return Err(gait_core::parameter_error!(
                "rest_amplitude_threshold",
                "must be finite and non-negative, got {}",
                self.rest_amplitude_threshold
            ));
        }
        if !self.min_rest_duration.is_finite() || self.min_rest_duration < 0.0 {
            return Err(gait_core::parameter_error!(
                "min_rest_duration",
                "must be finite and non-negative, got {}",
                self.min_rest_duration
            ));
        }
        Ok(())
    }
}

impl SelectionConfig {
    pub fn validate(&self) -> GaitResult<()> {
        if self.n_cycles == 0 {
            return Err(gait_core::parameter_error!("n_cycles", "must select at least one cycle"));
        }
        Ok(())
    }
}

impl NormalizationConfig {
    pub fn validate(&self) -> GaitResult<()> {
        if self.num_points < 2 {
            return Err(gait_core::parameter_error!(
                "num_points",
                "needs at least 2 points, got {}",
                self.num_points
            ));
        }
        if self.min_segment_len < 4 {
            return Err(gait_core::parameter_error!(
                "min_segment_len",
                "cubic interpolation needs at least 4 samples, got {}",
                self.min_segment_len
            ));
        }
        Ok(())
    }
}

impl ProcessingConfig {
    /// Repeated-sprint protocol defaults (IMU around 100 Hz-2 kHz, 3 s rests)
    pub fn repeated_sprint() -> Self {
        ProcessingConfig {
            name: "Repeated sprint".to_string(),
            peaks: PeakDetectorConfig::default(),
            intervals: IntervalConfig::default(),
            selection: SelectionConfig::default(),
            normalization: NormalizationConfig::default(),
        }
    }

    /// Validate entire configuration
    pub fn validate(&self) -> GaitResult<()> {
        self.peaks.validate()?;
        self.intervals.validate()?;
        self.selection.validate()?;
        self.normalization.validate()?;
        Ok(())
    }

    /// Export configuration to JSON
    pub fn to_json(&self) -> GaitResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| GaitError::ConfigurationError {
            message: format!("Failed to serialize configuration: {}", e),
        })
    }

    /// Import and validate configuration from JSON
    pub fn from_json(json: &str) -> GaitResult<Self> {
        let config: Self = serde_json::from_str(json).map_err(|e| GaitError::ConfigurationError {
            message: format!("Failed to deserialize configuration: {}", e),
        })?;
        config.validate()?;
        Ok(config)
    }
}
