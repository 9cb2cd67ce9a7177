//! Error types for segway-sim

use std::path::PathBuf;

use segway_core::ConfigError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SimError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Scenario parse error in {path}: {source}")]
    ScenarioParse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Invalid scenario: {0}")]
    InvalidScenario(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SimError {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Io { .. } => 2,
            Self::Config(ConfigError::Io { .. }) => 2,
            Self::ScenarioParse { .. } | Self::InvalidScenario(_) => 3,
            Self::Config(err) if err.is_validation() => 4,
            Self::Config(ConfigError::UnsupportedFormat(_)) => 4,
            Self::Config(_) | Self::Json(_) => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(SimError::InvalidScenario("x".into()).exit_code(), 3);
        let err = SimError::Io {
            path: PathBuf::from("a.yaml"),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        };
        assert_eq!(err.exit_code(), 2);
        let err = SimError::Config(ConfigError::Battery("too high".into()));
        assert_eq!(err.exit_code(), 4);
        let err = SimError::Config(ConfigError::UnsupportedFormat("toml".into()));
        assert_eq!(err.exit_code(), 4);
    }

    #[test]
    fn test_config_parse_errors_are_general_failures() {
        let parse = serde_json::from_str::<serde_json::Value>("{").map_err(ConfigError::from);
        let err = SimError::Config(segway_test_helpers::must_err(parse));
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_error_display() {
        let err = SimError::InvalidScenario("event at tick 20 is past the end (10 ticks)".into());
        insta::assert_snapshot!(err.to_string(), @"Invalid scenario: event at tick 20 is past the end (10 ticks)");
    }
}
