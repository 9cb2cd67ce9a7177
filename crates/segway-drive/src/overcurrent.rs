//! Latching over-current interlock.
//!
//! A fault seen outside the blanking window trips the latch in the same tick.
//! A tripped latch holds until [`OverCurrentLatch::reset`]; the fault input
//! going away does not release it. Faults inside the blanking window are
//! switching transients and leave the latch untouched.

use crate::channel::MotorSide;
use tracing::error;

/// Over-current latch for one motor channel.
///
/// # RT Safety
///
/// - No heap allocations
/// - O(1) per sample
/// - Logs once, on the tick it trips
///
/// # Example
///
/// ```
/// use segway_drive::channel::MotorSide;
/// use segway_drive::overcurrent::OverCurrentLatch;
///
/// let mut latch = OverCurrentLatch::new(MotorSide::Left);
/// assert!(!latch.sample(true, true));  // blanked: ignored
/// assert!(latch.sample(true, false));  // qualifying: trips
/// assert!(latch.sample(false, false)); // holds
/// ```
#[derive(Debug, Clone)]
pub struct OverCurrentLatch {
    side: MotorSide,
    tripped: bool,
}

impl OverCurrentLatch {
    /// Create an armed latch.
    #[must_use]
    pub fn new(side: MotorSide) -> Self {
        Self {
            side,
            tripped: false,
        }
    }

    /// Sample the fault input and return whether the latch is tripped.
    pub fn sample(&mut self, fault: bool, blanked: bool) -> bool {
        if fault && !blanked && !self.tripped {
            self.tripped = true;
            error!(side = %self.side, "Over-current fault latched, motor outputs disabled");
        }
        self.tripped
    }

    /// Whether the latch is tripped.
    #[must_use]
    pub fn is_tripped(&self) -> bool {
        self.tripped
    }

    /// Channel this latch protects.
    #[must_use]
    pub fn side(&self) -> MotorSide {
        self.side
    }

    /// Re-arm the latch. Only a full system reset calls this.
    pub fn reset(&mut self) {
        self.tripped = false;
    }
}
