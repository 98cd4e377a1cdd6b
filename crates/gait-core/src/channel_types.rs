//! Leg and channel vocabulary for sprint recordings

use serde::{Deserialize, Serialize};

/// Instrumented leg
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LegSide {
    Right,
    Left,
}

impl LegSide {
    /// Both sides in recording column order
    pub const ALL: [LegSide; 2] = [LegSide::Right, LegSide::Left];
}

/// One sensor channel of a leg
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ChannelKind {
    /// Shank angular velocity about Z (deg/s); source of all event timing
    #[serde(rename = "IMU")]
    Gyro,
    /// Shank acceleration along Z (g)
    #[serde(rename = "ACC")]
    Acc,
    /// Biceps femoris EMG
    #[serde(rename = "BF")]
    EmgBf,
    /// Semitendinosus EMG
    #[serde(rename = "ST")]
    EmgSt,
}

impl ChannelKind {
    /// Every channel, in normalization order
    pub const ALL: [ChannelKind; 4] = [
        ChannelKind::Gyro,
        ChannelKind::Acc,
        ChannelKind::EmgBf,
        ChannelKind::EmgSt,
    ];

    /// Short label used in reports
    pub fn label(&self) -> &'static str {
        match self {
            ChannelKind::Gyro => "IMU",
            ChannelKind::Acc => "ACC",
            ChannelKind::EmgBf => "BF",
            ChannelKind::EmgSt => "ST",
        }
    }
}

impl std::fmt::Display for LegSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LegSide::Right => write!(f, "Right"),
            LegSide::Left => write!(f, "Left"),
        }
    }
}

impl std::fmt::Display for ChannelKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
