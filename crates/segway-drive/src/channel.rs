//! One motor channel: duty mapping, PWM generator and over-current latch.

use crate::error::DriveResult;
use crate::overcurrent::OverCurrentLatch;
use crate::pwm::{PwmGenerator, PwmOutputs, PwmTiming};
use segway_balance::mixer::MOTOR_BITS;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Which motor a channel drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum MotorSide {
    /// Left wheel.
    Left,
    /// Right wheel.
    Right,
}

impl MotorSide {
    /// Get the side as a string slice.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

impl core::fmt::Display for MotorSide {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Map a shaped 12-bit motor command to a locked anti-phase duty.
///
/// Zero torque is 50% duty; full negative torque is 0 and full positive is
/// `period - 1`.
///
/// # Examples
///
/// ```
/// use segway_drive::channel::duty_from_command;
///
/// assert_eq!(duty_from_command(0, 2048), 1024);
/// assert_eq!(duty_from_command(-2048, 2048), 0);
/// assert_eq!(duty_from_command(2047, 2048), 2047);
/// ```
#[must_use]
pub fn duty_from_command(command: i16, period: u32) -> u32 {
    let half = i64::from(period / 2);
    let offset = (i64::from(command) * half) >> (MOTOR_BITS - 1);
    let duty = (half + offset).clamp(0, i64::from(period.saturating_sub(1)));
    u32::try_from(duty).unwrap_or(0)
}

/// Gated outputs of one channel for one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ChannelOutputs {
    /// PWM bits after latch gating.
    pub pwm: PwmOutputs,
    /// Duty in force this period.
    pub duty: u32,
    /// Over-current latch state.
    pub tripped: bool,
}

/// PWM generator and over-current latch for one motor.
///
/// # RT Safety
///
/// - No heap allocations
/// - O(1) per tick
#[derive(Debug, Clone)]
pub struct MotorChannel {
    pwm: PwmGenerator,
    latch: OverCurrentLatch,
}

impl MotorChannel {
    /// Create a channel with an armed latch.
    #[must_use]
    pub fn new(side: MotorSide, timing: PwmTiming) -> Self {
        Self {
            pwm: PwmGenerator::new(timing),
            latch: OverCurrentLatch::new(side),
        }
    }

    /// Create a channel from a timing that passes [`PwmTiming::validate`].
    ///
    /// # Errors
    ///
    /// Returns [`crate::DriveError::InvalidTiming`] for a bad timing.
    pub fn try_new(side: MotorSide, timing: PwmTiming) -> DriveResult<Self> {
        Ok(Self {
            pwm: PwmGenerator::try_new(timing)?,
            latch: OverCurrentLatch::new(side),
        })
    }

    /// Run one tick with this tick's motor command and fault input.
    ///
    /// The fault is sampled against this tick's blanking windows; a trip
    /// gates both switches off in the same tick.
    pub fn tick(&mut self, command: i16, fault: bool) -> ChannelOutputs {
        self.pwm
            .set_duty(duty_from_command(command, self.pwm.timing().period));
        let raw = self.pwm.tick();
        let tripped = self.latch.sample(fault, raw.blanked());

        ChannelOutputs {
            pwm: if tripped { raw.gated_off() } else { raw },
            duty: self.pwm.duty(),
            tripped,
        }
    }

    /// Side this channel drives.
    #[must_use]
    pub fn side(&self) -> MotorSide {
        self.latch.side()
    }

    /// Whether the over-current latch is tripped.
    #[must_use]
    pub fn is_tripped(&self) -> bool {
        self.latch.is_tripped()
    }

    /// The PWM generator.
    #[must_use]
    pub fn pwm(&self) -> &PwmGenerator {
        &self.pwm
    }

    /// Return the generator to counter zero and re-arm the latch.
    pub fn reset(&mut self) {
        self.pwm.reset();
        self.latch.reset();
    }
}
