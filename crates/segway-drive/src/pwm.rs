//! Complementary PWM generator with dead-time and blanking windows.
//!
//! One period of the free-running counter `c`:
//!
//! ```text
//!  c:     0    dt        duty  duty+dt             period
//!         |----|----------|-----|-------------------|
//!  high:  0    1111111111 0     0000000000000000000
//!  low:   0    0000000000 0     1111111111111111111
//!  blank:      [leading]        [duty edge]
//! ```
//!
//! Both outputs are low for `dead_time` ticks after each switching edge, so
//! they are never active together. The duty is latched at the start of each
//! period so a mid-period update cannot produce a runt pulse.

use crate::error::{DriveError, DriveResult};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Period, dead-time and blanking widths in ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PwmTiming {
    /// Counter period.
    pub period: u32,
    /// Gap inserted after every switching edge.
    pub dead_time: u32,
    /// Length of each blanking window.
    pub blank_ticks: u32,
}

impl Default for PwmTiming {
    fn default() -> Self {
        Self {
            period: 2048,
            dead_time: 32,
            blank_ticks: 128,
        }
    }
}

impl PwmTiming {
    /// Check period and window widths.
    ///
    /// # Errors
    ///
    /// Returns [`DriveError::InvalidTiming`] naming the bad field.
    pub fn validate(&self) -> DriveResult<()> {
        if !self.period.is_power_of_two() || !(64..=65_536).contains(&self.period) {
            return Err(DriveError::invalid_timing(
                "period",
                format!("must be a power of two in 64..=65536, got {}", self.period),
            ));
        }
        if self.dead_time == 0 {
            return Err(DriveError::invalid_timing("dead_time", "must be non-zero"));
        }
        if self.dead_time.saturating_add(self.blank_ticks) >= self.period / 2 {
            return Err(DriveError::invalid_timing(
                "blank_ticks",
                format!(
                    "dead_time + blank_ticks must be below {}, got {}",
                    self.period / 2,
                    self.dead_time.saturating_add(self.blank_ticks)
                ),
            ));
        }
        Ok(())
    }

    /// Duty giving equal high and low time.
    #[must_use]
    pub fn midpoint(&self) -> u32 {
        self.period / 2
    }
}

/// Output bits for one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PwmOutputs {
    /// High-side switch.
    pub high_side: bool,
    /// Low-side switch.
    pub low_side: bool,
    /// Counter is at zero this tick.
    pub period_start: bool,
    /// Inside the window after the leading dead-time gap.
    pub blank_leading: bool,
    /// Inside the window after the duty-edge dead-time gap.
    pub blank_duty: bool,
}

impl PwmOutputs {
    /// Either blanking window is open.
    #[must_use]
    pub fn blanked(&self) -> bool {
        self.blank_leading || self.blank_duty
    }

    /// Same tick with both switches forced off.
    #[must_use]
    pub fn gated_off(self) -> Self {
        Self {
            high_side: false,
            low_side: false,
            ..self
        }
    }
}

/// Free-running PWM counter for one motor.
///
/// # RT Safety
///
/// - No heap allocations
/// - O(1) per tick
///
/// # Example
///
/// ```
/// use segway_drive::pwm::{PwmGenerator, PwmTiming};
///
/// let mut pwm = PwmGenerator::new(PwmTiming::default());
/// pwm.set_duty(1024);
///
/// let first = pwm.tick();
/// assert!(first.period_start);
/// assert!(!first.high_side && !first.low_side);
/// ```
#[derive(Debug, Clone)]
pub struct PwmGenerator {
    timing: PwmTiming,
    counter: u32,
    pending_duty: u32,
    duty: u32,
}

impl PwmGenerator {
    /// Create a generator at counter zero with a 50% duty pending.
    ///
    /// The timing is not checked here. An unchecked timing never panics,
    /// but a period that is not a power of two gives a meaningless waveform;
    /// use [`PwmGenerator::try_new`] to reject it.
    #[must_use]
    pub fn new(timing: PwmTiming) -> Self {
        Self {
            timing,
            counter: 0,
            pending_duty: timing.midpoint(),
            duty: timing.midpoint(),
        }
    }

    /// Create a generator from a timing that passes [`PwmTiming::validate`].
    ///
    /// # Errors
    ///
    /// Returns [`DriveError::InvalidTiming`] for a bad period or window.
    pub fn try_new(timing: PwmTiming) -> DriveResult<Self> {
        timing.validate()?;
        Ok(Self::new(timing))
    }

    /// Stage a duty for the next period. Values above `period - 1` are clamped.
    pub fn set_duty(&mut self, duty: u32) {
        self.pending_duty = duty.min(self.timing.period.saturating_sub(1));
    }

    /// Evaluate the current counter value, then advance it.
    pub fn tick(&mut self) -> PwmOutputs {
        let c = self.counter;
        let period_start = c == 0;
        if period_start {
            self.duty = self.pending_duty;
        }

        let dt = self.timing.dead_time;
        let blank = self.timing.blank_ticks;
        let duty_edge = self.duty.saturating_add(dt);

        let outputs = PwmOutputs {
            high_side: dt <= c && c < self.duty,
            low_side: duty_edge <= c && c < self.timing.period,
            period_start,
            blank_leading: dt <= c && c < dt.saturating_add(blank),
            blank_duty: duty_edge <= c && c < duty_edge.saturating_add(blank),
        };

        // period is a power of two
        self.counter = c.wrapping_add(1) & self.timing.period.wrapping_sub(1);
        outputs
    }

    /// Counter value the next tick will evaluate.
    #[must_use]
    pub fn counter(&self) -> u32 {
        self.counter
    }

    /// Duty in force for the current period.
    #[must_use]
    pub fn duty(&self) -> u32 {
        self.duty
    }

    /// Timing in use.
    #[must_use]
    pub fn timing(&self) -> &PwmTiming {
        &self.timing
    }

    /// Return to counter zero with a 50% duty.
    pub fn reset(&mut self) {
        self.counter = 0;
        self.pending_duty = self.timing.midpoint();
        self.duty = self.timing.midpoint();
    }
}
