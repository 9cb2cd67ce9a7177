//! Prelude module for convenient imports.

pub use crate::channel::{ChannelOutputs, MotorChannel, MotorSide, duty_from_command};
pub use crate::error::{DriveError, DriveResult};
pub use crate::overcurrent::OverCurrentLatch;
pub use crate::pwm::{PwmGenerator, PwmOutputs, PwmTiming};
