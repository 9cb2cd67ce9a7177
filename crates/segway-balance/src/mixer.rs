//! Torque mixer and dead-zone shaper.
//!
//! The soft-started PID output becomes the common balance torque. A steering
//! term from the handlebar pot is added on the left and subtracted on the
//! right. Each side is then shaped to clear the motors' dead zone and
//! saturated to the 12-bit duty range.
//!
//! Shaping has two regions:
//!
//! ```text
//!   |t| >  band : t + sign(t) * min_duty     (jump clear of the dead zone)
//!   |t| <= band : t * gain_mult              (steep but continuous near rest)
//! ```
//!
//! Validation requires `band * gain_mult <= band + 1 + min_duty`, so the
//! response stays monotonic through the transition. The default constants
//! meet exactly (`band * gain_mult == min_duty`).

use crate::error::{BalanceError, BalanceResult};
use crate::fixed::saturate;
use crate::pid::OUTPUT_BITS;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Width of the shaped motor command.
pub const MOTOR_BITS: u32 = 12;

/// Steering and dead-zone constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MixerCalibration {
    /// Lowest steering pot reading treated as data.
    pub steer_min: u16,
    /// Highest steering pot reading treated as data.
    pub steer_max: u16,
    /// Pot reading for straight ahead.
    pub steer_center: u16,
    /// First shift of the steering scale (`x >> a + x >> b`).
    pub steer_shift_a: u32,
    /// Second shift of the steering scale.
    pub steer_shift_b: u32,
    /// Magnitude below which the small-signal gain applies.
    pub low_torque_band: i32,
    /// Offset added outside the low-torque band.
    pub min_duty: i32,
    /// Gain applied inside the low-torque band.
    pub gain_mult: i32,
    /// Shaped magnitude above which overspeed is flagged.
    pub overspeed_threshold: i32,
}

impl Default for MixerCalibration {
    fn default() -> Self {
        Self {
            steer_min: 0x200,
            steer_max: 0xE00,
            steer_center: 0x7FF,
            steer_shift_a: 3,
            steer_shift_b: 4,
            low_torque_band: 0x3C,
            min_duty: 0x3C0,
            gain_mult: 0x10,
            overspeed_threshold: 1536,
        }
    }
}

impl MixerCalibration {
    /// Check band ordering and ranges.
    ///
    /// # Errors
    ///
    /// Returns [`BalanceError::InvalidCalibration`] naming the bad field.
    pub fn validate(&self) -> BalanceResult<()> {
        if self.steer_min >= self.steer_max {
            return Err(BalanceError::invalid(
                "mixer",
                "steer_min",
                "must be below steer_max",
            ));
        }
        if !(self.steer_min..=self.steer_max).contains(&self.steer_center) {
            return Err(BalanceError::invalid(
                "mixer",
                "steer_center",
                "must lie inside the steering band",
            ));
        }
        if self.steer_shift_a >= 16 {
            return Err(BalanceError::invalid(
                "mixer",
                "steer_shift_a",
                format!("must be below 16, got {}", self.steer_shift_a),
            ));
        }
        if self.steer_shift_b >= 16 {
            return Err(BalanceError::invalid(
                "mixer",
                "steer_shift_b",
                format!("must be below 16, got {}", self.steer_shift_b),
            ));
        }
        if !(0..=0xFFF).contains(&self.low_torque_band) {
            return Err(BalanceError::invalid(
                "mixer",
                "low_torque_band",
                format!("must be in 0..=4095, got {}", self.low_torque_band),
            ));
        }
        if !(0..=0xFFF).contains(&self.min_duty) {
            return Err(BalanceError::invalid(
                "mixer",
                "min_duty",
                format!("must be in 0..=4095, got {}", self.min_duty),
            ));
        }
        if !(1..=256).contains(&self.gain_mult) {
            return Err(BalanceError::invalid(
                "mixer",
                "gain_mult",
                format!("must be in 1..=256, got {}", self.gain_mult),
            ));
        }
        // The gain region must not overshoot the first offset step.
        let band_edge = self.low_torque_band * self.gain_mult;
        let first_offset = self.low_torque_band + 1 + self.min_duty;
        if band_edge > first_offset {
            return Err(BalanceError::invalid(
                "mixer",
                "gain_mult",
                format!(
                    "low_torque_band * gain_mult ({band_edge}) exceeds the first shaped value \
                     outside the band ({first_offset})"
                ),
            ));
        }
        if self.overspeed_threshold <= 0 {
            return Err(BalanceError::invalid(
                "mixer",
                "overspeed_threshold",
                "must be positive",
            ));
        }
        Ok(())
    }
}

/// Pre-shape torque per side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TorqueCommand {
    /// Balance torque plus steering.
    pub left: i32,
    /// Balance torque minus steering.
    pub right: i32,
}

/// Shaped, saturated 12-bit duty per side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MotorCommand {
    /// Left motor command.
    pub left: i16,
    /// Right motor command.
    pub right: i16,
}

impl MotorCommand {
    /// Both motors at rest.
    pub const ZERO: Self = Self { left: 0, right: 0 };
}

/// Everything the mixer reads in one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MixerInputs {
    /// `PID_cntrl`.
    pub pid_output: i16,
    /// Soft-start scale, 0..=255.
    pub soft_start_scale: u8,
    /// Raw steering pot reading.
    pub steer_pot: u16,
    /// Steering permitted by rider presence.
    pub steering_enabled: bool,
    /// Ride authorized.
    pub power_up: bool,
}

/// Mixer result for one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MixerOutput {
    /// Soft-started balance torque.
    pub balance: i32,
    /// Steering term after enable gating.
    pub steering: i32,
    /// Pre-shape torques.
    pub torque: TorqueCommand,
    /// Shaped motor commands.
    pub motor: MotorCommand,
    /// Either side above the overspeed threshold.
    pub overspeed: bool,
}

/// Scale `PID_cntrl` by the soft-start fraction.
#[must_use]
pub fn balance_torque(pid_output: i16, soft_start_scale: u8) -> i32 {
    let scaled = (i32::from(pid_output) * i32::from(soft_start_scale)) >> 8;
    saturate(scaled, OUTPUT_BITS)
}

/// Steering term for a pot reading, or zero when steering is disabled.
///
/// Readings outside the valid band are clipped to it: pot extremes are
/// saturation, not data.
#[must_use]
pub fn steering_term(calibration: &MixerCalibration, steer_pot: u16, enabled: bool) -> i32 {
    if !enabled {
        return 0;
    }
    let clipped = steer_pot.clamp(calibration.steer_min, calibration.steer_max);
    let centered = i32::from(clipped) - i32::from(calibration.steer_center);
    (centered >> calibration.steer_shift_a) + (centered >> calibration.steer_shift_b)
}

/// Dead-zone compensation for one side, before saturation.
#[must_use]
pub fn shape_torque(calibration: &MixerCalibration, torque: i32) -> i32 {
    if torque.abs() > calibration.low_torque_band {
        if torque < 0 {
            torque - calibration.min_duty
        } else {
            torque + calibration.min_duty
        }
    } else {
        torque * calibration.gain_mult
    }
}

/// Combines balance and steering torque and shapes it for the motors.
///
/// # RT Safety
///
/// - No heap allocations
/// - O(1) per update
///
/// # Example
///
/// ```
/// use segway_balance::mixer::{MixerCalibration, MixerInputs, TorqueMixer};
///
/// let mut mixer = TorqueMixer::new(MixerCalibration::default());
/// let out = mixer.update(MixerInputs {
///     pid_output: 512,
///     soft_start_scale: 255,
///     steer_pot: 0x7FF,
///     steering_enabled: true,
///     power_up: true,
/// });
///
/// // 512 * 255 >> 8 = 510, shaped 510 + 960
/// assert_eq!(out.motor.left, 1470);
/// assert_eq!(out.motor.left, out.motor.right);
/// ```
#[derive(Debug, Clone)]
pub struct TorqueMixer {
    calibration: MixerCalibration,
    output: MixerOutput,
}

impl TorqueMixer {
    /// Create a mixer with zero output.
    #[must_use]
    pub fn new(calibration: MixerCalibration) -> Self {
        Self {
            calibration,
            output: MixerOutput::default(),
        }
    }

    /// Create a mixer from a calibration that passes
    /// [`MixerCalibration::validate`].
    ///
    /// # Errors
    ///
    /// Returns [`BalanceError::InvalidCalibration`] naming the bad field.
    pub fn try_new(calibration: MixerCalibration) -> BalanceResult<Self> {
        calibration.validate()?;
        Ok(Self::new(calibration))
    }

    /// Mix and shape one tick.
    ///
    /// # Panics
    ///
    /// With overflow checks on, a calibration that fails
    /// [`MixerCalibration::validate`] can overflow the steering shifts or
    /// the small-signal gain. Build with [`TorqueMixer::try_new`] to rule
    /// that out.
    pub fn update(&mut self, inputs: MixerInputs) -> MixerOutput {
        let balance = balance_torque(inputs.pid_output, inputs.soft_start_scale);
        let steering = steering_term(&self.calibration, inputs.steer_pot, inputs.steering_enabled);

        let torque = TorqueCommand {
            left: balance + steering,
            right: balance - steering,
        };

        let motor = if inputs.power_up {
            MotorCommand {
                left: self.shape_and_saturate(torque.left),
                right: self.shape_and_saturate(torque.right),
            }
        } else {
            MotorCommand::ZERO
        };

        // Compared after saturation: the flag reflects what the motors are
        // actually commanded.
        let threshold = self.calibration.overspeed_threshold;
        let overspeed = i32::from(motor.left).abs() > threshold
            || i32::from(motor.right).abs() > threshold;

        self.output = MixerOutput {
            balance,
            steering,
            torque,
            motor,
            overspeed,
        };
        self.output
    }

    fn shape_and_saturate(&self, torque: i32) -> i16 {
        let shaped = saturate(shape_torque(&self.calibration, torque), MOTOR_BITS);
        i16::try_from(shaped).unwrap_or_default()
    }

    /// Output of the last update.
    #[must_use]
    pub fn output(&self) -> MixerOutput {
        self.output
    }

    /// Calibration in use.
    #[must_use]
    pub fn calibration(&self) -> &MixerCalibration {
        &self.calibration
    }

    /// Zero the held output.
    pub fn reset(&mut self) {
        self.output = MixerOutput::default();
    }
}
