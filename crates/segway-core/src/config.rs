//! Calibration for the whole core.
//!
//! Every section has defaults, so a file only needs the values it changes:
//!
//! ```yaml
//! pid:
//!   p_coeff: 10
//! rider:
//!   settle_ticks: 32768
//! ```

use std::path::Path;

use segway_balance::{MixerCalibration, PidGains, PitchCalibration, SoftStartConfig};
use segway_drive::PwmTiming;
use segway_gating::RiderThresholds;
use serde::{Deserialize, Serialize};

use crate::battery::BatteryConfig;
use crate::error::{ConfigError, ConfigResult};

/// Complete calibration set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SegwayConfig {
    /// Pitch estimator offsets and fusion constants.
    pub pitch: PitchCalibration,
    /// PID coefficients.
    pub pid: PidGains,
    /// Soft-start ramp geometry.
    pub soft_start: SoftStartConfig,
    /// Steering and dead-zone constants.
    pub mixer: MixerCalibration,
    /// PWM period and windows.
    pub pwm: PwmTiming,
    /// Rider-presence thresholds.
    pub rider: RiderThresholds,
    /// Battery-low threshold.
    pub battery: BatteryConfig,
}

impl SegwayConfig {
    /// Defaults with the short soft-start and stability timers used in
    /// simulation.
    #[must_use]
    pub fn fast_sim() -> Self {
        Self {
            soft_start: SoftStartConfig::fast_sim(),
            rider: RiderThresholds::fast_sim(),
            ..Self::default()
        }
    }

    /// Validate every section.
    ///
    /// # Errors
    ///
    /// Returns the first section's validation error.
    pub fn validate(&self) -> ConfigResult<()> {
        self.pitch.validate()?;
        self.pid.validate()?;
        self.soft_start.validate()?;
        self.mixer.validate()?;
        self.pwm.validate()?;
        self.rider.validate()?;
        self.battery.validate()?;
        Ok(())
    }

    /// Parse and validate YAML.
    ///
    /// # Errors
    ///
    /// Returns a parse or validation error.
    pub fn from_yaml_str(text: &str) -> ConfigResult<Self> {
        let config: Self = serde_yaml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate JSON.
    ///
    /// # Errors
    ///
    /// Returns a parse or validation error.
    pub fn from_json_str(text: &str) -> ConfigResult<Self> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a `.yaml`, `.yml` or `.json` file and validate it.
    ///
    /// # Errors
    ///
    /// Returns an I/O, format, parse or validation error.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let format = ConfigFormat::from_path(path)?;
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        match format {
            ConfigFormat::Yaml => Self::from_yaml_str(&text),
            ConfigFormat::Json => Self::from_json_str(&text),
        }
    }

    /// Serialize as YAML.
    ///
    /// # Errors
    ///
    /// Returns a serialization error.
    pub fn to_yaml(&self) -> ConfigResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Serialize as pretty JSON.
    ///
    /// # Errors
    ///
    /// Returns a serialization error.
    pub fn to_json(&self) -> ConfigResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Config file format, chosen by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// `.yaml` or `.yml`.
    Yaml,
    /// `.json`.
    Json,
}

impl ConfigFormat {
    /// Format for a path's extension.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnsupportedFormat`] for any other extension.
    pub fn from_path(path: &Path) -> ConfigResult<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        match ext.as_str() {
            "yaml" | "yml" => Ok(Self::Yaml),
            "json" => Ok(Self::Json),
            _ => Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use segway_test_helpers::prelude::*;

    #[test]
    fn test_defaults_validate() {
        must(SegwayConfig::default().validate());
        must(SegwayConfig::fast_sim().validate());
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = must(SegwayConfig::from_yaml_str("pid:\n  p_coeff: 12\n"));
        assert_eq!(config.pid.p_coeff, 12);
        assert_eq!(config.pid.i_shift, PidGains::default().i_shift);
        assert_eq!(config.pwm, PwmTiming::default());
    }

    #[test]
    fn test_yaml_validation_error_surfaces() {
        let err = must_err(SegwayConfig::from_yaml_str("pwm:\n  period: 1000\n"));
        assert!(err.is_validation());
        assert!(matches!(err, ConfigError::Drive(_)));
    }

    #[test]
    fn test_json_round_trip_of_fast_sim() {
        let config = SegwayConfig::fast_sim();
        let text = must(config.to_json());
        assert_eq!(must(SegwayConfig::from_json_str(&text)), config);
    }

    #[test]
    fn test_format_by_extension() {
        assert_eq!(
            must(ConfigFormat::from_path(Path::new("cal.YML"))),
            ConfigFormat::Yaml
        );
        assert_eq!(
            must(ConfigFormat::from_path(Path::new("cal.json"))),
            ConfigFormat::Json
        );
        assert!(matches!(
            ConfigFormat::from_path(Path::new("cal.toml")),
            Err(ConfigError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let dir = must(tempfile::tempdir());
        let path = dir.path().join("segway.yaml");
        must(std::fs::write(&path, "rider:\n  settle_ticks: 100\n"));
        let config = must(SegwayConfig::load(&path));
        assert_eq!(config.rider.settle_ticks, 100);

        let missing = dir.path().join("missing.json");
        assert!(matches!(
            SegwayConfig::load(&missing),
            Err(ConfigError::Io { .. })
        ));
    }
}
