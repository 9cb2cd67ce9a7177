//! Soft-start ramp.
//!
//! Torque is faded in after power-up by a counter whose top eight bits scale
//! the balance torque. The counter only runs while power is up, saturates at
//! its maximum instead of wrapping, and drops to zero on the first tick
//! without power.

use crate::error::{BalanceError, BalanceResult};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Counter geometry for [`SoftStartRamp`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SoftStartConfig {
    /// Counter width. The scale factor is the top eight bits.
    pub width_bits: u32,
    /// Counter increment per powered tick.
    pub step: u32,
}

impl Default for SoftStartConfig {
    fn default() -> Self {
        Self {
            width_bits: 27,
            step: 1,
        }
    }
}

impl SoftStartConfig {
    /// Step used by fast-simulation builds.
    pub const FAST_SIM_STEP: u32 = 256;

    /// Default geometry with the fast-simulation step.
    #[must_use]
    pub fn fast_sim() -> Self {
        Self {
            step: Self::FAST_SIM_STEP,
            ..Self::default()
        }
    }

    /// Check the ramp geometry.
    ///
    /// The step must stay below one scale LSB so the first powered tick
    /// still reports a scale of zero.
    ///
    /// # Errors
    ///
    /// Returns [`BalanceError::InvalidCalibration`] for a bad width or step.
    pub fn validate(&self) -> BalanceResult<()> {
        if !(9..=31).contains(&self.width_bits) {
            return Err(BalanceError::invalid(
                "soft_start",
                "width_bits",
                format!("must be in 9..=31, got {}", self.width_bits),
            ));
        }
        if self.step == 0 || self.step >= self.scale_lsb() {
            return Err(BalanceError::invalid(
                "soft_start",
                "step",
                format!("must be in 1..{}, got {}", self.scale_lsb(), self.step),
            ));
        }
        Ok(())
    }

    /// Counter value of one scale step.
    #[must_use]
    pub fn scale_lsb(&self) -> u32 {
        1 << self.width_bits.saturating_sub(8)
    }

    /// Saturation value of the counter.
    #[must_use]
    pub fn counter_max(&self) -> u32 {
        u32::MAX >> (32 - self.width_bits.clamp(9, 31))
    }

    /// Number of powered ticks until the scale reads 255.
    #[must_use]
    pub fn ticks_to_full(&self) -> u64 {
        let target = u64::from(SoftStartRamp::FULL_SCALE) * u64::from(self.scale_lsb());
        target.div_ceil(u64::from(self.step.max(1)))
    }
}

/// Power-gated soft-start counter.
///
/// # Example
///
/// ```
/// use segway_balance::soft_start::{SoftStartConfig, SoftStartRamp};
///
/// let config = SoftStartConfig { width_bits: 12, step: 1 };
/// let mut ramp = SoftStartRamp::new(config);
///
/// assert_eq!(ramp.update(true), 0);
/// for _ in 1..config.ticks_to_full() {
///     ramp.update(true);
/// }
/// assert_eq!(ramp.scale(), 255);
///
/// // Power loss zeroes it immediately.
/// assert_eq!(ramp.update(false), 0);
/// ```
#[derive(Debug, Clone)]
pub struct SoftStartRamp {
    config: SoftStartConfig,
    counter: u32,
}

impl SoftStartRamp {
    /// Scale reported once the ramp is complete.
    pub const FULL_SCALE: u8 = 255;

    /// Create a ramp at zero.
    #[must_use]
    pub fn new(config: SoftStartConfig) -> Self {
        Self { config, counter: 0 }
    }

    /// Advance one tick and return the new scale.
    pub fn update(&mut self, power_up: bool) -> u8 {
        self.counter = if power_up {
            self.counter
                .saturating_add(self.config.step)
                .min(self.config.counter_max())
        } else {
            0
        };
        self.scale()
    }

    /// Current scale, 0 to 255 representing 0/256 to 255/256.
    #[must_use]
    pub fn scale(&self) -> u8 {
        let shifted = self.counter >> self.config.width_bits.saturating_sub(8);
        u8::try_from(shifted).unwrap_or(Self::FULL_SCALE)
    }

    /// Whether the scale has reached its maximum.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.scale() == Self::FULL_SCALE
    }

    /// Raw counter value.
    #[must_use]
    pub fn counter(&self) -> u32 {
        self.counter
    }

    /// Zero the counter.
    pub fn reset(&mut self) {
        self.counter = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn short() -> SoftStartConfig {
        SoftStartConfig {
            width_bits: 12,
            step: 1,
        }
    }

    #[test]
    fn test_scale_zero_on_first_powered_tick() {
        let mut ramp = SoftStartRamp::new(SoftStartConfig::default());
        assert_eq!(ramp.update(true), 0);

        let mut fast = SoftStartRamp::new(SoftStartConfig::fast_sim());
        assert_eq!(fast.update(true), 0);
    }

    #[test]
    fn test_reaches_full_scale_after_exact_tick_count() {
        let config = short();
        assert_eq!(config.ticks_to_full(), 255 * 16);

        let mut ramp = SoftStartRamp::new(config);
        for _ in 0..config.ticks_to_full() - 1 {
            ramp.update(true);
        }
        assert_eq!(ramp.scale(), 254);
        assert_eq!(ramp.update(true), 255);
        assert!(ramp.is_complete());
    }

    #[test]
    fn test_counter_saturates_instead_of_wrapping() {
        let config = short();
        let mut ramp = SoftStartRamp::new(config);
        for _ in 0..10_000 {
            ramp.update(true);
        }
        assert_eq!(ramp.counter(), config.counter_max());
        assert_eq!(ramp.scale(), 255);
    }

    #[test]
    fn test_power_loss_resets_from_any_value() {
        let mut ramp = SoftStartRamp::new(short());
        for _ in 0..2000 {
            ramp.update(true);
        }
        assert!(ramp.scale() > 0);
        assert_eq!(ramp.update(false), 0);
        assert_eq!(ramp.counter(), 0);
    }

    #[test]
    fn test_fast_sim_ticks_to_full() {
        assert_eq!(SoftStartConfig::fast_sim().ticks_to_full(), 255 * 2048);
        assert_eq!(SoftStartConfig::default().ticks_to_full(), 255 * (1 << 19));
    }

    #[test]
    fn test_counter_max() {
        assert_eq!(short().counter_max(), 0xFFF);
        assert_eq!(SoftStartConfig::default().counter_max(), (1 << 27) - 1);
    }

    #[test]
    fn test_validation() {
        assert!(SoftStartConfig::default().validate().is_ok());
        assert!(SoftStartConfig::fast_sim().validate().is_ok());
        assert!(
            SoftStartConfig {
                width_bits: 8,
                step: 1
            }
            .validate()
            .is_err()
        );
        assert!(
            SoftStartConfig {
                width_bits: 12,
                step: 16
            }
            .validate()
            .is_err()
        );
        assert!(
            SoftStartConfig {
                width_bits: 12,
                step: 0
            }
            .validate()
            .is_err()
        );
    }
}
