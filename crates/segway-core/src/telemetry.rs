//! Host-side diagnostics snapshot.

use segway_balance::{MotorCommand, PidTerms, PitchEstimate};
use segway_gating::{AuthState, RiderState};
use serde::{Deserialize, Serialize};

use crate::frame::StatusFlags;

/// Snapshot of the core after a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Telemetry {
    /// Ticks since construction or the last reset.
    pub tick: u64,
    /// Authorization FSM state.
    pub auth_state: AuthState,
    /// Rider-presence FSM state.
    pub rider_state: RiderState,
    /// Status flags.
    pub flags: StatusFlags,
    /// Fused pitch and rate.
    pub pitch: PitchEstimate,
    /// PID terms and output.
    pub pid: PidTerms,
    /// Soft-start scale, 0..=255.
    pub soft_start_scale: u8,
    /// Shaped motor commands.
    pub motor: MotorCommand,
    /// Left PWM duty in force.
    pub left_duty: u32,
    /// Right PWM duty in force.
    pub right_duty: u32,
}

impl Telemetry {
    /// Pretty JSON.
    ///
    /// # Errors
    ///
    /// Returns a serialization error.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
