//! Error types for gating thresholds.

use thiserror::Error;

/// Rider-presence threshold validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatingError {
    /// A threshold is unusable.
    #[error("Invalid rider threshold '{name}': {reason}")]
    InvalidThreshold {
        /// Parameter name.
        name: &'static str,
        /// Why it was rejected.
        reason: String,
    },
}

impl GatingError {
    /// Create an invalid threshold error.
    #[must_use]
    pub fn invalid_threshold(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidThreshold {
            name,
            reason: reason.into(),
        }
    }
}

/// Result type for gating configuration.
pub type GatingResult<T> = Result<T, GatingError>;
