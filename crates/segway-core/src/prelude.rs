//! Prelude module for convenient imports.

pub use crate::battery::{BatteryConfig, BatteryMonitor};
pub use crate::config::{ConfigFormat, SegwayConfig};
pub use crate::error::{ConfigError, ConfigResult};
pub use crate::frame::{OverCurrentFaults, SensorFrame, StatusFlags, TickInputs, TickOutputs};
pub use crate::segway::Segway;
pub use crate::telemetry::Telemetry;

pub use segway_balance::{ImuSample, MotorCommand, PitchEstimate, SoftStartConfig};
pub use segway_drive::{ChannelOutputs, MotorSide, PwmOutputs};
pub use segway_gating::{AuthState, LoadCells, RideCommand, RiderState};
