//! Pitch estimator.
//!
//! A bang-bang complementary filter: every valid IMU sample integrates the
//! compensated gyro rate into a wide integrator and nudges that integrator by
//! a fixed amount toward the accelerometer's small-angle pitch. The gyro term
//! carries short-term dynamics, the constant nudge bleeds off long-term drift.
//! No trigonometry is involved; the accelerometer pitch is a scaled product.

use crate::error::{BalanceError, BalanceResult};
use crate::fixed::{saturate_i16, saturate_wide, signed_max};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Sensor offsets and fusion constants for [`PitchEstimator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PitchCalibration {
    /// Gyro pitch-rate bias subtracted from every raw reading.
    pub rate_offset: i16,
    /// Accelerometer bias subtracted from every raw reading.
    pub accel_offset: i16,
    /// Empirical accelerometer-to-pitch scale.
    pub accel_gain: i16,
    /// Right shift taking the accelerometer product to pitch units.
    pub accel_shift: u32,
    /// Fixed correction applied toward the accelerometer pitch, in
    /// integrator units.
    pub fusion_nudge: i32,
    /// Right shift from integrator to pitch. The integrator is
    /// `16 + integrator_shift` bits wide.
    pub integrator_shift: u32,
}

impl Default for PitchCalibration {
    fn default() -> Self {
        Self {
            rate_offset: 0x0050,
            accel_offset: 0x00A0,
            accel_gain: 327,
            accel_shift: 13,
            fusion_nudge: 1024,
            integrator_shift: 11,
        }
    }
}

impl PitchCalibration {
    /// Check the calibration is usable.
    ///
    /// # Errors
    ///
    /// Returns [`BalanceError::InvalidCalibration`] naming the first bad field.
    pub fn validate(&self) -> BalanceResult<()> {
        if self.accel_gain <= 0 {
            return Err(BalanceError::invalid(
                "pitch",
                "accel_gain",
                "must be positive",
            ));
        }
        if !(1..=24).contains(&self.accel_shift) {
            return Err(BalanceError::invalid(
                "pitch",
                "accel_shift",
                format!("must be in 1..=24, got {}", self.accel_shift),
            ));
        }
        if !(1..=15).contains(&self.integrator_shift) {
            return Err(BalanceError::invalid(
                "pitch",
                "integrator_shift",
                format!("must be in 1..=15, got {}", self.integrator_shift),
            ));
        }
        if self.fusion_nudge <= 0 || self.fusion_nudge >= signed_max(self.integrator_bits()) {
            return Err(BalanceError::invalid(
                "pitch",
                "fusion_nudge",
                "must be positive and inside the integrator range",
            ));
        }
        Ok(())
    }

    /// Width of the fusion integrator in bits.
    #[must_use]
    pub fn integrator_bits(&self) -> u32 {
        16 + self.integrator_shift
    }
}

/// One IMU reading from the acquisition path.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ImuSample {
    /// Raw gyro pitch rate.
    pub rate: i16,
    /// Raw accelerometer axis reading.
    pub accel: i16,
    /// New-sample pulse. Samples without it are ignored.
    pub valid: bool,
}

impl ImuSample {
    /// A fresh, valid sample.
    #[must_use]
    pub const fn new(rate: i16, accel: i16) -> Self {
        Self {
            rate,
            accel,
            valid: true,
        }
    }

    /// A tick with no new sample.
    #[must_use]
    pub const fn idle() -> Self {
        Self {
            rate: 0,
            accel: 0,
            valid: false,
        }
    }
}

/// Fused pitch angle and compensated pitch rate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PitchEstimate {
    /// Fused pitch angle.
    pub pitch: i16,
    /// Bias-compensated pitch rate from the latest valid sample.
    pub rate: i16,
}

/// Drift-corrected pitch estimator.
///
/// # RT Safety
///
/// - No heap allocations
/// - O(1) per update
///
/// # Example
///
/// ```
/// use segway_balance::pitch::{ImuSample, PitchCalibration, PitchEstimator};
///
/// let calibration = PitchCalibration::default();
/// let mut estimator = PitchEstimator::new(calibration);
///
/// // Level and still: raw readings equal the offsets.
/// let sample = ImuSample::new(calibration.rate_offset, calibration.accel_offset);
/// let estimate = estimator.update(sample);
/// assert_eq!(estimate.rate, 0);
/// assert!(estimate.pitch.abs() <= 1);
/// ```
#[derive(Debug, Clone)]
pub struct PitchEstimator {
    calibration: PitchCalibration,
    integrator: i32,
    estimate: PitchEstimate,
}

impl PitchEstimator {
    /// Create an estimator with a cleared integrator.
    ///
    /// The calibration is taken as given; see [`PitchEstimator::update`].
    #[must_use]
    pub fn new(calibration: PitchCalibration) -> Self {
        Self {
            calibration,
            integrator: 0,
            estimate: PitchEstimate::default(),
        }
    }

    /// Create an estimator from a calibration that passes
    /// [`PitchCalibration::validate`].
    ///
    /// # Errors
    ///
    /// Returns [`BalanceError::InvalidCalibration`] naming the bad field.
    pub fn try_new(calibration: PitchCalibration) -> BalanceResult<Self> {
        calibration.validate()?;
        Ok(Self::new(calibration))
    }

    /// Small-angle pitch implied by a bias-compensated accelerometer value.
    #[must_use]
    pub fn accel_pitch(&self, accel_comp: i16) -> i16 {
        let product = i32::from(accel_comp) * i32::from(self.calibration.accel_gain);
        saturate_i16(product >> self.calibration.accel_shift)
    }

    /// Fold one IMU sample into the estimate.
    ///
    /// Ticks without a valid sample return the held estimate unchanged.
    ///
    /// # Panics
    ///
    /// With overflow checks on, a calibration that fails
    /// [`PitchCalibration::validate`] (shifts of 32 or more) panics here.
    /// Build with [`PitchEstimator::try_new`] to rule that out.
    pub fn update(&mut self, sample: ImuSample) -> PitchEstimate {
        if !sample.valid {
            return self.estimate;
        }

        let rate = saturate_i16(i32::from(sample.rate) - i32::from(self.calibration.rate_offset));
        let accel =
            saturate_i16(i32::from(sample.accel) - i32::from(self.calibration.accel_offset));

        let nudge = if self.accel_pitch(accel) > self.estimate.pitch {
            self.calibration.fusion_nudge
        } else {
            -self.calibration.fusion_nudge
        };

        let next = i64::from(self.integrator) - i64::from(rate) + i64::from(nudge);
        self.integrator = saturate_wide(next, self.calibration.integrator_bits());

        self.estimate = PitchEstimate {
            pitch: saturate_i16(self.integrator >> self.calibration.integrator_shift),
            rate,
        };
        self.estimate
    }

    /// Latest estimate.
    #[must_use]
    pub fn estimate(&self) -> PitchEstimate {
        self.estimate
    }

    /// Raw fusion integrator.
    #[must_use]
    pub fn integrator(&self) -> i32 {
        self.integrator
    }

    /// Calibration in use.
    #[must_use]
    pub fn calibration(&self) -> &PitchCalibration {
        &self.calibration
    }

    /// Clear the integrator and estimate.
    pub fn reset(&mut self) {
        self.integrator = 0;
        self.estimate = PitchEstimate::default();
    }
}
