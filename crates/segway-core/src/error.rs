//! Configuration errors.

use std::path::PathBuf;

use segway_balance::BalanceError;
use segway_drive::DriveError;
use segway_gating::GatingError;
use thiserror::Error;

/// Errors from loading or validating a [`SegwayConfig`](crate::SegwayConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Balance-loop calibration rejected.
    #[error(transparent)]
    Balance(#[from] BalanceError),

    /// PWM timing rejected.
    #[error(transparent)]
    Drive(#[from] DriveError),

    /// Rider thresholds rejected.
    #[error(transparent)]
    Gating(#[from] GatingError),

    /// Battery monitor threshold rejected.
    #[error("Invalid battery threshold: {0}")]
    Battery(String),

    /// Config file could not be read or written.
    #[error("IO error on {path}: {source}")]
    Io {
        /// File involved.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Malformed YAML.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Malformed JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// File extension is neither YAML nor JSON.
    #[error("Unsupported config format: {0}")]
    UnsupportedFormat(String),
}

impl ConfigError {
    /// Whether the file parsed but a value was out of range.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::Balance(_) | Self::Drive(_) | Self::Gating(_) | Self::Battery(_)
        )
    }
}

/// Result type for configuration.
pub type ConfigResult<T> = Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrapped_errors_keep_their_message() {
        let err: ConfigError = BalanceError::invalid("pid", "i_shift", "must be below 18").into();
        insta::assert_snapshot!(err.to_string(), @"Invalid pid calibration 'i_shift': must be below 18");
        assert!(err.is_validation());

        let err = ConfigError::UnsupportedFormat("toml".to_string());
        insta::assert_snapshot!(err.to_string(), @"Unsupported config format: toml");
        assert!(!err.is_validation());
    }
}
