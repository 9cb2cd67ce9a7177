//! PID controller for the balance loop.
//!
//! The error is the fused pitch itself (set-point zero), saturated to a
//! 10-bit range before it reaches any multiplier. The integrator is an 18-bit
//! register that drops an update rather than wrap, the derivative is the
//! negated, down-shifted gyro rate, and the sum is saturated to the 12-bit
//! control range.

use crate::error::{BalanceError, BalanceResult};
use crate::fixed::{checked_accumulate, saturate, saturate_wide};
use crate::pitch::PitchEstimate;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Width of the saturated pitch error.
pub const ERROR_BITS: u32 = 10;
/// Width of the integrator register.
pub const INTEGRATOR_BITS: u32 = 18;
/// Width of the saturated I-term.
pub const I_TERM_BITS: u32 = 12;
/// Width of the control output `PID_cntrl`.
pub const OUTPUT_BITS: u32 = 12;

/// Coefficients and shift amounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PidGains {
    /// Proportional coefficient.
    pub p_coeff: i32,
    /// Right shift from integrator to I-term.
    pub i_shift: u32,
    /// Right shift from pitch rate to D-term.
    pub d_shift: u32,
}

impl Default for PidGains {
    fn default() -> Self {
        Self {
            p_coeff: 9,
            i_shift: 4,
            d_shift: 6,
        }
    }
}

impl PidGains {
    /// Check the coefficients.
    ///
    /// # Errors
    ///
    /// Returns [`BalanceError::InvalidCalibration`] naming the bad field.
    pub fn validate(&self) -> BalanceResult<()> {
        if !(0..=0x7FFF).contains(&self.p_coeff) {
            return Err(BalanceError::invalid(
                "pid",
                "p_coeff",
                format!("must be in 0..=32767, got {}", self.p_coeff),
            ));
        }
        if self.i_shift >= INTEGRATOR_BITS {
            return Err(BalanceError::invalid(
                "pid",
                "i_shift",
                format!("must be below {INTEGRATOR_BITS}"),
            ));
        }
        if self.d_shift >= 16 {
            return Err(BalanceError::invalid("pid", "d_shift", "must be below 16"));
        }
        Ok(())
    }
}

/// The three terms and the saturated output of the last update.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PidTerms {
    /// Proportional term.
    pub p: i32,
    /// Integral term (saturated).
    pub i: i32,
    /// Derivative (rate-damping) term.
    pub d: i32,
    /// Saturated 12-bit control output.
    pub output: i16,
}

/// Fixed-point PID.
///
/// # RT Safety
///
/// - No heap allocations
/// - O(1) per update
///
/// # Example
///
/// ```
/// use segway_balance::pid::{PidController, PidGains};
/// use segway_balance::pitch::PitchEstimate;
///
/// let mut pid = PidController::new(PidGains::default());
/// let estimate = PitchEstimate { pitch: 100, rate: 0 };
///
/// let out = pid.update(estimate, true, false);
/// // P = 100 * 9, I = 100 >> 4
/// assert_eq!(out, 906);
/// ```
#[derive(Debug, Clone)]
pub struct PidController {
    gains: PidGains,
    integrator: i32,
    terms: PidTerms,
}

impl PidController {
    /// Create a controller with a cleared integrator.
    ///
    /// The gains are taken as given; see [`PidController::update`].
    #[must_use]
    pub fn new(gains: PidGains) -> Self {
        Self {
            gains,
            integrator: 0,
            terms: PidTerms::default(),
        }
    }

    /// Create a controller from gains that pass [`PidGains::validate`].
    ///
    /// # Errors
    ///
    /// Returns [`BalanceError::InvalidCalibration`] naming the bad field.
    pub fn try_new(gains: PidGains) -> BalanceResult<Self> {
        gains.validate()?;
        Ok(Self::new(gains))
    }

    /// Pitch error saturated to [`ERROR_BITS`].
    #[must_use]
    pub fn saturated_error(pitch: i16) -> i32 {
        saturate(i32::from(pitch), ERROR_BITS)
    }

    /// Run one tick.
    ///
    /// * `valid` - a new IMU sample arrived this tick; gates the integrator.
    /// * `rider_off` - clears the integrator, taking priority over `valid`.
    ///
    /// # Panics
    ///
    /// With overflow checks on, gains that fail [`PidGains::validate`]
    /// (shifts of 32 or more) panic here. Build with
    /// [`PidController::try_new`] to rule that out.
    pub fn update(&mut self, estimate: PitchEstimate, valid: bool, rider_off: bool) -> i16 {
        let error = Self::saturated_error(estimate.pitch);

        if rider_off {
            self.integrator = 0;
        } else if valid {
            // An overflowing add is dropped and the previous value kept.
            if let Some(sum) = checked_accumulate(self.integrator, error, INTEGRATOR_BITS) {
                self.integrator = sum;
            }
        }

        let p = error * self.gains.p_coeff;
        let i = saturate(self.integrator >> self.gains.i_shift, I_TERM_BITS);
        let d = -(i32::from(estimate.rate) >> self.gains.d_shift);

        let sum = i64::from(p) + i64::from(i) + i64::from(d);
        let output = saturate_wide(sum, OUTPUT_BITS);

        self.terms = PidTerms {
            p,
            i,
            d,
            output: i16::try_from(output).unwrap_or_default(),
        };
        self.terms.output
    }

    /// Terms of the last update.
    #[must_use]
    pub fn terms(&self) -> PidTerms {
        self.terms
    }

    /// Last control output `PID_cntrl`.
    #[must_use]
    pub fn output(&self) -> i16 {
        self.terms.output
    }

    /// Integrator register.
    #[must_use]
    pub fn integrator(&self) -> i32 {
        self.integrator
    }

    /// Gains in use.
    #[must_use]
    pub fn gains(&self) -> &PidGains {
        &self.gains
    }

    /// Clear the integrator and terms.
    pub fn reset(&mut self) {
        self.integrator = 0;
        self.terms = PidTerms::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixed::{signed_max, signed_min};

    fn at(pitch: i16, rate: i16) -> PitchEstimate {
        PitchEstimate { pitch, rate }
    }

    #[test]
    fn test_p_term_uses_saturated_error() {
        let mut pid = PidController::new(PidGains::default());
        pid.update(at(5000, 0), false, false);
        assert_eq!(pid.terms().p, 511 * 9);

        pid.update(at(-5000, 0), false, false);
        assert_eq!(pid.terms().p, -512 * 9);
    }

    #[test]
    fn test_integrator_only_moves_on_valid_sample() {
        let mut pid = PidController::new(PidGains::default());
        pid.update(at(40, 0), false, false);
        assert_eq!(pid.integrator(), 0);
        pid.update(at(40, 0), true, false);
        assert_eq!(pid.integrator(), 40);
        pid.update(at(40, 0), true, false);
        assert_eq!(pid.integrator(), 80);
    }

    #[test]
    fn test_integrator_overflow_is_dropped() {
        let mut pid = PidController::new(PidGains::default());
        // 256 * 511 = 130816, one more step would exceed 131071
        for _ in 0..256 {
            pid.update(at(511, 0), true, false);
        }
        assert_eq!(pid.integrator(), 130_816);
        pid.update(at(511, 0), true, false);
        assert_eq!(pid.integrator(), 130_816);

        // A smaller addend that still fits is accepted
        pid.update(at(255, 0), true, false);
        assert_eq!(pid.integrator(), signed_max(INTEGRATOR_BITS));
    }

    #[test]
    fn test_negative_integrator_overflow_is_dropped() {
        let mut pid = PidController::new(PidGains::default());
        for _ in 0..256 {
            pid.update(at(-512, 0), true, false);
        }
        assert_eq!(pid.integrator(), signed_min(INTEGRATOR_BITS));
        pid.update(at(-1, 0), true, false);
        assert_eq!(pid.integrator(), signed_min(INTEGRATOR_BITS));
    }

    #[test]
    fn test_rider_off_clears_integrator_in_one_tick() {
        let mut pid = PidController::new(PidGains::default());
        for _ in 0..10 {
            pid.update(at(100, 0), true, false);
        }
        assert_eq!(pid.integrator(), 1000);

        pid.update(at(100, 0), true, true);
        assert_eq!(pid.integrator(), 0);
        assert_eq!(pid.terms().i, 0);
    }

    #[test]
    fn test_i_term_is_saturated() {
        let mut pid = PidController::new(PidGains::default());
        for _ in 0..256 {
            pid.update(at(511, 0), true, false);
        }
        // 130816 >> 4 = 8176, saturated to 12 bits
        assert_eq!(pid.terms().i, 2047);
    }

    #[test]
    fn test_d_term_negates_shifted_rate() {
        let mut pid = PidController::new(PidGains::default());
        pid.update(at(0, 640), false, false);
        assert_eq!(pid.terms().d, -10);

        pid.update(at(0, -640), false, false);
        assert_eq!(pid.terms().d, 10);

        // Arithmetic shift: -1 >> 6 == -1
        pid.update(at(0, -1), false, false);
        assert_eq!(pid.terms().d, 1);
    }

    #[test]
    fn test_output_saturates_to_12_bits() {
        let mut pid = PidController::new(PidGains::default());
        assert_eq!(pid.update(at(i16::MAX, i16::MIN), true, false), 2047);

        let mut pid = PidController::new(PidGains::default());
        assert_eq!(pid.update(at(i16::MIN, i16::MAX), true, false), -2048);
    }

    #[test]
    fn test_reset() {
        let mut pid = PidController::new(PidGains::default());
        pid.update(at(100, 50), true, false);
        pid.reset();
        assert_eq!(pid.integrator(), 0);
        assert_eq!(pid.terms(), PidTerms::default());
    }

    #[test]
    fn test_gain_validation() {
        assert!(PidGains::default().validate().is_ok());
        assert!(
            PidGains {
                i_shift: 18,
                ..PidGains::default()
            }
            .validate()
            .is_err()
        );
        assert!(
            PidGains {
                p_coeff: -1,
                ..PidGains::default()
            }
            .validate()
            .is_err()
        );
    }

    #[test]
    fn test_try_new_rejects_unusable_shift() {
        let result = PidController::try_new(PidGains {
            d_shift: 40,
            ..PidGains::default()
        });
        assert!(matches!(
            result,
            Err(BalanceError::InvalidCalibration {
                name: "d_shift",
                ..
            })
        ));
        assert!(PidController::try_new(PidGains::default()).is_ok());
    }
}
