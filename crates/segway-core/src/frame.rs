//! Per-tick inputs and outputs of the core.

use segway_balance::ImuSample;
use segway_drive::ChannelOutputs;
use segway_gating::LoadCells;
use serde::{Deserialize, Serialize};

/// Latest values from the acquisition subsystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SensorFrame {
    /// IMU reading; `valid` is the new-sample pulse.
    pub imu: ImuSample,
    /// Load-cell readings.
    pub load: LoadCells,
    /// Steering pot reading.
    pub steer_pot: u16,
    /// Battery ADC reading.
    pub battery: u16,
}

impl Default for SensorFrame {
    fn default() -> Self {
        Self {
            imu: ImuSample::idle(),
            load: LoadCells::default(),
            steer_pot: 0x7FF,
            battery: 0xFFF,
        }
    }
}

/// Over-current fault inputs, one per channel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverCurrentFaults {
    /// Left channel current sense.
    pub left: bool,
    /// Right channel current sense.
    pub right: bool,
}

/// Everything one tick consumes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInputs {
    /// Sensor values.
    pub sensors: SensorFrame,
    /// Command byte, present only on the tick it arrives.
    pub command: Option<u8>,
    /// Current-sense faults.
    pub faults: OverCurrentFaults,
}

impl TickInputs {
    /// Inputs carrying only sensor values.
    #[must_use]
    pub fn from_sensors(sensors: SensorFrame) -> Self {
        Self {
            sensors,
            ..Self::default()
        }
    }

    /// Same inputs with a command byte.
    #[must_use]
    pub fn with_command(mut self, byte: u8) -> Self {
        self.command = Some(byte);
        self
    }

    /// Same inputs with fault levels.
    #[must_use]
    pub fn with_faults(mut self, left: bool, right: bool) -> Self {
        self.faults = OverCurrentFaults { left, right };
        self
    }
}

/// Status flags exposed to the alert sequencer and diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusFlags {
    /// Ride authorized.
    pub power_up: bool,
    /// Rider-presence FSM in Off.
    pub rider_off: bool,
    /// Rider-presence FSM in Enabled.
    pub steering_enabled: bool,
    /// Either shaped command above the overspeed threshold.
    pub overspeed: bool,
    /// Battery reading below threshold.
    pub battery_low: bool,
    /// Left over-current latch tripped.
    pub left_tripped: bool,
    /// Right over-current latch tripped.
    pub right_tripped: bool,
}

impl Default for StatusFlags {
    fn default() -> Self {
        Self {
            power_up: false,
            rider_off: true,
            steering_enabled: false,
            overspeed: false,
            battery_low: false,
            left_tripped: false,
            right_tripped: false,
        }
    }
}

/// Everything one tick produces.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickOutputs {
    /// Left motor channel.
    pub left: ChannelOutputs,
    /// Right motor channel.
    pub right: ChannelOutputs,
    /// Status flags after this tick.
    pub flags: StatusFlags,
}
