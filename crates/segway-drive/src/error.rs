//! Error types for PWM timing validation.

use thiserror::Error;

/// PWM timing validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DriveError {
    /// A timing parameter is unusable.
    #[error("Invalid PWM timing '{name}': {reason}")]
    InvalidTiming {
        /// Parameter name.
        name: &'static str,
        /// Why it was rejected.
        reason: String,
    },
}

impl DriveError {
    /// Create an invalid timing error.
    #[must_use]
    pub fn invalid_timing(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidTiming {
            name,
            reason: reason.into(),
        }
    }
}

/// Result type for drive configuration.
pub type DriveResult<T> = Result<T, DriveError>;
