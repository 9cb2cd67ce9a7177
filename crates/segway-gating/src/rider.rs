//! Rider-presence / steering-enable state machine.
//!
//! ```text
//!            sum > gt                 settled
//!   Off ─────────────────► Settling ───────────► Enabled
//!    ▲                       ▲   │ shifting:        │
//!    │                       │   └─ restart timer   │
//!    │ sum < lt (any state)  └──────────────────────┘
//!    └────────────────────          stepping off
//! ```
//!
//! The "gt" and "lt" comparison points straddle the nominal rider weight by
//! the hysteresis band, so a weight sitting near the boundary does not chatter
//! between Off and Settling.

use crate::error::{GatingError, GatingResult};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Rider-presence state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum RiderState {
    /// No rider on the platform.
    #[default]
    Off,
    /// Rider detected, waiting for a stable stance.
    Settling,
    /// Rider stable; steering permitted.
    Enabled,
}

impl RiderState {
    /// Get the state as a string slice.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Off => "Off",
            Self::Settling => "Settling",
            Self::Enabled => "Enabled",
        }
    }

    /// `rider_off` output of this state.
    #[must_use]
    pub fn rider_off(self) -> bool {
        matches!(self, Self::Off)
    }

    /// `steering_enabled` output of this state.
    #[must_use]
    pub fn steering_enabled(self) -> bool {
        matches!(self, Self::Enabled)
    }

    /// Next state for one tick of observations.
    ///
    /// Weight below the "lt" point forces Off from every state; every other
    /// cell of the table is spelled out.
    #[must_use]
    pub fn transition(self, obs: RiderObservation) -> Self {
        if obs.below_lt {
            return Self::Off;
        }
        match self {
            Self::Off if obs.above_gt => Self::Settling,
            Self::Off => Self::Off,
            Self::Settling if obs.settled => Self::Enabled,
            Self::Settling => Self::Settling,
            Self::Enabled if obs.stepping_off => Self::Settling,
            Self::Enabled => Self::Enabled,
        }
    }
}

impl core::fmt::Display for RiderState {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Comparison points and stability interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RiderThresholds {
    /// Nominal combined load-cell reading of a rider.
    pub min_rider_weight: u16,
    /// Half-width of the hysteresis band around `min_rider_weight`.
    pub hysteresis: u16,
    /// Consecutive steady ticks needed to leave Settling.
    pub settle_ticks: u32,
}

impl Default for RiderThresholds {
    fn default() -> Self {
        Self {
            min_rider_weight: 0x200,
            hysteresis: 0x40,
            settle_ticks: 1 << 26,
        }
    }
}

impl RiderThresholds {
    /// Stability interval used by fast-simulation builds.
    pub const FAST_SIM_SETTLE_TICKS: u32 = 1 << 15;

    /// Default thresholds with the fast-simulation stability interval.
    #[must_use]
    pub fn fast_sim() -> Self {
        Self {
            settle_ticks: Self::FAST_SIM_SETTLE_TICKS,
            ..Self::default()
        }
    }

    /// Combined weight above which a rider is detected.
    #[must_use]
    pub fn gt_threshold(&self) -> u32 {
        u32::from(self.min_rider_weight) + u32::from(self.hysteresis)
    }

    /// Combined weight below which the rider is gone.
    #[must_use]
    pub fn lt_threshold(&self) -> u32 {
        u32::from(self.min_rider_weight.saturating_sub(self.hysteresis))
    }

    /// Check the thresholds.
    ///
    /// # Errors
    ///
    /// Returns [`GatingError::InvalidThreshold`] naming the bad field.
    pub fn validate(&self) -> GatingResult<()> {
        if self.min_rider_weight == 0 {
            return Err(GatingError::invalid_threshold(
                "min_rider_weight",
                "must be non-zero",
            ));
        }
        if self.hysteresis >= self.min_rider_weight {
            return Err(GatingError::invalid_threshold(
                "hysteresis",
                format!(
                    "must be below min_rider_weight ({}), got {}",
                    self.min_rider_weight, self.hysteresis
                ),
            ));
        }
        if self.settle_ticks == 0 {
            return Err(GatingError::invalid_threshold(
                "settle_ticks",
                "must be at least 1",
            ));
        }
        Ok(())
    }
}

/// Left and right load-cell readings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LoadCells {
    /// Left cell.
    pub left: u16,
    /// Right cell.
    pub right: u16,
}

impl LoadCells {
    /// Create a reading.
    #[must_use]
    pub const fn new(left: u16, right: u16) -> Self {
        Self { left, right }
    }

    /// Combined weight.
    #[must_use]
    pub fn sum(&self) -> u32 {
        u32::from(self.left) + u32::from(self.right)
    }

    /// Left/right imbalance magnitude.
    #[must_use]
    pub fn imbalance(&self) -> u32 {
        u32::from(self.left.abs_diff(self.right))
    }

    /// Imbalance above 1/4 of the total: the rider is shifting.
    #[must_use]
    pub fn is_shifting(&self) -> bool {
        self.imbalance() > self.sum() >> 2
    }

    /// Imbalance above 15/16 of the total: the rider is stepping off.
    #[must_use]
    pub fn is_stepping_off(&self) -> bool {
        let sum = self.sum();
        self.imbalance() > sum - (sum >> 4)
    }
}

/// Comparator outputs feeding [`RiderState::transition`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RiderObservation {
    /// Combined weight below the "lt" point.
    pub below_lt: bool,
    /// Combined weight above the "gt" point.
    pub above_gt: bool,
    /// Stepping-off imbalance.
    pub stepping_off: bool,
    /// Stability timer completes on this tick.
    pub settled: bool,
}

/// Rider-presence FSM with its stability timer.
///
/// # RT Safety
///
/// - No heap allocations
/// - O(1) per update
///
/// # Example
///
/// ```
/// use segway_gating::rider::{LoadCells, RiderPresence, RiderState, RiderThresholds};
///
/// let thresholds = RiderThresholds { settle_ticks: 3, ..RiderThresholds::default() };
/// let mut rider = RiderPresence::new(thresholds);
///
/// rider.update(LoadCells::new(0x150, 0x150));
/// assert_eq!(rider.state(), RiderState::Settling);
/// for _ in 0..3 {
///     rider.update(LoadCells::new(0x150, 0x150));
/// }
/// assert!(rider.steering_enabled());
/// ```
#[derive(Debug, Clone)]
pub struct RiderPresence {
    thresholds: RiderThresholds,
    state: RiderState,
    timer: u32,
}

impl RiderPresence {
    /// Create an FSM in Off.
    #[must_use]
    pub fn new(thresholds: RiderThresholds) -> Self {
        Self {
            thresholds,
            state: RiderState::Off,
            timer: 0,
        }
    }

    /// Comparator outputs for a reading in the current state.
    #[must_use]
    pub fn observe(&self, cells: LoadCells) -> RiderObservation {
        let sum = cells.sum();
        let steady = !cells.is_shifting();
        RiderObservation {
            below_lt: sum < self.thresholds.lt_threshold(),
            above_gt: sum > self.thresholds.gt_threshold(),
            stepping_off: cells.is_stepping_off(),
            settled: self.state == RiderState::Settling
                && steady
                && self.timer.saturating_add(1) >= self.thresholds.settle_ticks,
        }
    }

    /// Advance one tick and return the new state.
    pub fn update(&mut self, cells: LoadCells) -> RiderState {
        let next = self.state.transition(self.observe(cells));

        self.timer = match (self.state, next) {
            (RiderState::Settling, RiderState::Settling) if !cells.is_shifting() => {
                self.timer.saturating_add(1)
            }
            _ => 0,
        };
        self.state = next;
        next
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> RiderState {
        self.state
    }

    /// Asserted only in Off.
    #[must_use]
    pub fn rider_off(&self) -> bool {
        self.state.rider_off()
    }

    /// Asserted only in Enabled.
    #[must_use]
    pub fn steering_enabled(&self) -> bool {
        self.state.steering_enabled()
    }

    /// Consecutive steady ticks spent in Settling.
    #[must_use]
    pub fn timer(&self) -> u32 {
        self.timer
    }

    /// Thresholds in use.
    #[must_use]
    pub fn thresholds(&self) -> &RiderThresholds {
        &self.thresholds
    }

    /// Return to Off.
    pub fn reset(&mut self) {
        self.state = RiderState::Off;
        self.timer = 0;
    }
}
