//! Gait-Simulation: Synthetic sprint sessions
//!
//! Deterministic shank gyroscope, accelerometer and hamstring EMG streams
//! with known stride valleys, for testing and benchmarking.

pub mod signal_patterns;
pub mod sprint_simulator;

pub use signal_patterns::*;
pub use sprint_simulator::*;
