//! Battery-low monitor.

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};

/// Battery monitor threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatteryConfig {
    /// Readings below this raise `battery_low`.
    pub low_threshold: u16,
}

impl Default for BatteryConfig {
    fn default() -> Self {
        Self {
            low_threshold: 0x800,
        }
    }
}

impl BatteryConfig {
    /// Check the threshold fits the 12-bit ADC range.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Battery`] for a threshold above `0xFFF`.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.low_threshold > 0xFFF {
            return Err(ConfigError::Battery(format!(
                "low_threshold must fit 12 bits, got {:#x}",
                self.low_threshold
            )));
        }
        Ok(())
    }
}

/// Tracks the `battery_low` flag.
#[derive(Debug, Clone)]
pub struct BatteryMonitor {
    config: BatteryConfig,
    low: bool,
}

impl BatteryMonitor {
    /// Create a monitor with the flag clear.
    #[must_use]
    pub fn new(config: BatteryConfig) -> Self {
        Self { config, low: false }
    }

    /// Compare one reading and return the flag.
    pub fn update(&mut self, reading: u16) -> bool {
        self.low = reading < self.config.low_threshold;
        self.low
    }

    /// Current flag.
    #[must_use]
    pub fn is_low(&self) -> bool {
        self.low
    }

    /// Clear the flag.
    pub fn reset(&mut self) {
        self.low = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_is_exclusive() {
        let mut monitor = BatteryMonitor::new(BatteryConfig::default());
        assert!(!monitor.update(0x800));
        assert!(monitor.update(0x7FF));
        assert!(!monitor.update(0xFFF));
    }

    #[test]
    fn test_validation() {
        assert!(BatteryConfig::default().validate().is_ok());
        assert!(
            BatteryConfig {
                low_threshold: 0x1000
            }
            .validate()
            .is_err()
        );
    }
}
