//! Error types for balance-loop calibration.
//!
//! The control path itself never fails: saturation and dropped integrator
//! updates are silent recoveries. Only calibration validation can reject
//! input.

use thiserror::Error;

/// Calibration validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BalanceError {
    /// A calibration parameter is outside its usable range.
    #[error("Invalid {component} calibration '{name}': {reason}")]
    InvalidCalibration {
        /// Stage the parameter belongs to.
        component: &'static str,
        /// Parameter name.
        name: &'static str,
        /// Why it was rejected.
        reason: String,
    },
}

impl BalanceError {
    /// Create an invalid calibration error.
    #[must_use]
    pub fn invalid(component: &'static str, name: &'static str, reason: impl Into<String>) -> Self {
        BalanceError::InvalidCalibration {
            component,
            name,
            reason: reason.into(),
        }
    }

    /// Name of the offending parameter.
    #[must_use]
    pub fn parameter(&self) -> &'static str {
        match self {
            BalanceError::InvalidCalibration { name, .. } => name,
        }
    }
}

/// Result type for balance calibration.
pub type BalanceResult<T> = Result<T, BalanceError>;
