//! Motor drive stage for the Segway balance core.
//!
//! Each motor has a [`MotorChannel`]: the shaped command becomes a locked
//! anti-phase duty, a [`PwmGenerator`] produces the complementary switch
//! signals with dead-time, and an [`OverCurrentLatch`] forces both switches
//! off on a qualifying fault until the next full reset.
//!
//! # Example
//!
//! ```
//! use segway_drive::prelude::*;
//!
//! let mut channel = MotorChannel::new(MotorSide::Left, PwmTiming::default());
//! let out = channel.tick(0, false);
//! assert!(out.pwm.period_start);
//! assert!(!out.tripped);
//! ```

#![deny(unsafe_op_in_unsafe_fn, clippy::unwrap_used)]
#![warn(missing_docs, missing_debug_implementations, rust_2018_idioms)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod channel;
pub mod error;
pub mod overcurrent;
pub mod prelude;
pub mod pwm;

pub use channel::{ChannelOutputs, MotorChannel, MotorSide, duty_from_command};
pub use error::{DriveError, DriveResult};
pub use overcurrent::OverCurrentLatch;
pub use pwm::{PwmGenerator, PwmOutputs, PwmTiming};
