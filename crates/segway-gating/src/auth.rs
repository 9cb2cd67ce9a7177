//! Ride-authorization state machine.
//!
//! | state        | Go     | Stop                            | no command              |
//! |--------------|--------|---------------------------------|-------------------------|
//! | Idle         | Active | Idle                            | Idle                    |
//! | Active       | Active | Idle if rider off, else PendingStop | Active              |
//! | PendingStop  | Active | Idle if rider off, else PendingStop | Idle if rider off, else PendingStop |
//!
//! Power stays up in Active and PendingStop, so a stop request never drops
//! the rider while they are still on the platform.

use crate::command::RideCommand;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Authorization state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum AuthState {
    /// Not authorized; power down.
    #[default]
    Idle,
    /// Authorized; power up.
    Active,
    /// Stop requested; power held until the rider is off.
    PendingStop,
}

impl AuthState {
    /// Get the state as a string slice.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::Active => "Active",
            Self::PendingStop => "PendingStop",
        }
    }

    /// `power_up` output of this state.
    #[must_use]
    pub fn power_up(self) -> bool {
        matches!(self, Self::Active | Self::PendingStop)
    }

    /// Next state for an optional command and the current rider flag.
    #[must_use]
    pub fn transition(self, command: Option<RideCommand>, rider_off: bool) -> Self {
        match (self, command) {
            (Self::Idle, Some(RideCommand::Go)) => Self::Active,
            (Self::Idle, Some(RideCommand::Stop) | None) => Self::Idle,

            (Self::Active, Some(RideCommand::Go) | None) => Self::Active,
            (Self::Active, Some(RideCommand::Stop)) if rider_off => Self::Idle,
            (Self::Active, Some(RideCommand::Stop)) => Self::PendingStop,

            (Self::PendingStop, Some(RideCommand::Go)) => Self::Active,
            (Self::PendingStop, Some(RideCommand::Stop) | None) if rider_off => Self::Idle,
            (Self::PendingStop, Some(RideCommand::Stop) | None) => Self::PendingStop,
        }
    }
}

impl core::fmt::Display for AuthState {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Authorization FSM.
///
/// # RT Safety
///
/// - No heap allocations
/// - O(1) per update
///
/// # Example
///
/// ```
/// use segway_gating::auth::{AuthState, Authorization};
///
/// let mut auth = Authorization::new();
/// assert!(auth.update(Some(0x47), true));
/// assert_eq!(auth.state(), AuthState::Active);
///
/// // Unknown bytes change nothing.
/// assert!(auth.update(Some(0x00), true));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Authorization {
    state: AuthState,
}

impl Authorization {
    /// Create an FSM in Idle.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance one tick.
    ///
    /// `byte` is `Some` only on the tick a new command byte arrives. Returns
    /// the new `power_up` flag.
    pub fn update(&mut self, byte: Option<u8>, rider_off: bool) -> bool {
        let command = byte.and_then(RideCommand::from_byte);
        self.state = self.state.transition(command, rider_off);
        self.state.power_up()
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> AuthState {
        self.state
    }

    /// Power flag of the current state.
    #[must_use]
    pub fn power_up(&self) -> bool {
        self.state.power_up()
    }

    /// Return to Idle.
    pub fn reset(&mut self) {
        self.state = AuthState::Idle;
    }
}
