//! Per-stride waveform shapes for synthetic sprint data

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Stride phase (0..1) at which the gyroscope valley sits
pub const VALLEY_PHASE: f64 = 0.1;

/// Waveform of one stride, evaluated at a phase in `[0, 1)`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StridePattern {
    /// Depth of the stride valley (deg/s, positive)
    pub valley_depth: f64,
    /// Valley width as a fraction of the stride
    pub valley_width: f64,
    /// Height of the swing-phase peak (deg/s)
    pub swing_peak: f64,
    /// Depth of the shallow late-swing dip (deg/s, positive)
    pub secondary_dip: f64,
    /// Ground-contact impact on the vertical accelerometer (g)
    pub impact: f64,
    /// Biceps femoris burst amplitude (mV)
    pub bf_amplitude: f64,
    /// Semitendinosus burst amplitude (mV)
    pub st_amplitude: f64,
}

impl Default for StridePattern {
    fn default() -> Self {
        Self {
            valley_depth: 500.0,
            valley_width: 0.04,
            swing_peak: 350.0,
            secondary_dip: 120.0,
            impact: 2.5,
            bf_amplitude: 0.8,
            st_amplitude: 0.6,
        }
    }
}

fn bump(phase: f64, centre: f64, width: f64) -> f64 {
    let d = (phase - centre) / width;
    (-0.5 * d * d).exp()
}

impl StridePattern {
    /// Shank angular velocity; single deep valley at [`VALLEY_PHASE`]
    pub fn gyro_at(&self, phase: f64) -> f64 {
        -self.valley_depth * bump(phase, VALLEY_PHASE, self.valley_width)
            + self.swing_peak * bump(phase, 0.45, 0.12)
            - self.secondary_dip * bump(phase, 0.75, 0.04)
    }

    /// Vertical acceleration around 1 g with an impact spike after the valley
    pub fn acc_at(&self, phase: f64) -> f64 {
        1.0 + self.impact * bump(phase, VALLEY_PHASE + 0.02, 0.02) - 0.8 * (2.0 * PI * phase).sin()
    }

    /// Activation envelope (0..1) of the biceps femoris: late swing into contact
    pub fn bf_envelope(&self, phase: f64) -> f64 {
        bump(phase, 0.9, 0.08).max(bump(phase, 0.0, 0.06))
    }

    /// Activation envelope (0..1) of the semitendinosus, slightly earlier than BF
    pub fn st_envelope(&self, phase: f64) -> f64 {
        bump(phase, 0.82, 0.09)
    }

    /// Named presets
    pub fn presets() -> Vec<(&'static str, StridePattern)> {
        vec![
            ("Maximal sprint", StridePattern::default()),
            (
                "Acceleration",
                StridePattern {
                    valley_depth: 380.0,
                    swing_peak: 280.0,
                    impact: 3.2,
                    ..StridePattern::default()
                },
            ),
            (
                "Fatigued",
                StridePattern {
                    valley_depth: 320.0,
                    swing_peak: 250.0,
                    bf_amplitude: 0.5,
                    st_amplitude: 0.4,
                    ..StridePattern::default()
                },
            ),
        ]
    }
}
