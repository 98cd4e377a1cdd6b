//! Gait-Processing: Gait event detection and cycle normalization
//!
//! Finds stride valleys in the shank gyroscope, splits sessions into sprint
//! bouts at rests, keeps the steady-state mid-set of each bout and resamples
//! every channel onto a 0-100 % cycle axis.

pub mod config;
pub mod cycles;
pub mod interpolation;
pub mod intervals;
pub mod normalizer;
pub mod peaks;
pub mod pipeline;
pub mod snapshots;

pub use config::{
    IntervalConfig, NormalizationConfig, PeakDetectorConfig, ProcessingConfig, SelectionConfig,
};
pub use cycles::{categorize, select_middle, CategorizedCycles};
pub use interpolation::{linspace, CubicSpline};
pub use intervals::{segment_intervals, CategoryId, Interval, IntervalMap};
pub use normalizer::{
    normalize, CycleNormalizer, NormalizationOutcome, NormalizedCycle, SkipReason, SkippedCycle,
};
pub use peaks::{find_peaks, GaitCycle, PeakDetection, PeakDetector};
pub use pipeline::*;
pub use snapshots::{interval_snapshots, peak_snapshots, SampleSnapshot};
