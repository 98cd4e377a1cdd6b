//! Error handling for the gait processing workspace
//!
//! Only contract violations surface as errors. Sparse data (too few cycles,
//! short segments) is reported through warnings by the processing crate.

use core::fmt;

/// Result type alias for gait processing operations
pub type GaitResult<T> = Result<T, GaitError>;

/// Error type shared by all gait processing crates
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum GaitError {
    /// A tuning parameter is outside its valid domain
    InvalidParameter {
        /// Parameter name as it appears in the configuration
        name: &'static str,
        /// Description of the violated constraint
        reason: String,
    },

    /// Two streams that must share a time base have different lengths
    LengthMismatch {
        /// Channel whose length disagrees
        channel: String,
        /// Length of the reference (time) stream
        expected: usize,
        /// Length actually found
        actual: usize,
    },

    /// Time stream is not strictly increasing
    NonMonotonicTime {
        /// First index where `time[index] <= time[index - 1]`
        index: usize,
    },

    /// A required channel family could not be found among the columns
    ChannelNotFound {
        /// Header pattern that was searched for
        pattern: String,
    },

    /// Not enough samples or cycles for the requested operation
    InsufficientData {
        /// Description of what was missing
        reason: String,
    },

    /// Interpolant construction or evaluation failed
    NumericalFailure {
        /// Description of the numerical problem
        reason: String,
    },

    /// Configuration could not be validated, parsed or serialized
    ConfigurationError {
        /// Error message
        message: String,
    },
}

impl fmt::Display for GaitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GaitError::InvalidParameter { name, reason } => {
                write!(f, "Invalid parameter '{}': {}", name, reason)
            }
            GaitError::LengthMismatch {
                channel,
                expected,
                actual,
            } => {
                write!(
                    f,
                    "Length mismatch for channel {}: expected {} samples, found {}",
                    channel, expected, actual
                )
            }
            GaitError::NonMonotonicTime { index } => {
                write!(f, "Time stream is not strictly increasing at index {}", index)
            }
            GaitError::ChannelNotFound { pattern } => {
                write!(f, "No column matching '{}'", pattern)
            }
            GaitError::InsufficientData { reason } => {
                write!(f, "Insufficient data: {}", reason)
            }
            GaitError::NumericalFailure { reason } => {
                write!(f, "Numerical failure: {}", reason)
            }
            GaitError::ConfigurationError { message } => {
                write!(f, "Configuration error: {}", message)
            }
        }
    }
}

impl std::error::Error for GaitError {}

/// Convenience macro for creating parameter errors
#[macro_export]
macro_rules! parameter_error {
    ($name:literal, $($arg:tt)+) => {
        $crate::error::GaitError::InvalidParameter {
            name: $name,
            reason: format!($($arg)+),
        }
    };
}
