//! Fixed-point balance loop for a two-wheeled self-balancing vehicle.
//!
//! This crate holds the control half of the Segway core: everything between
//! raw inertial samples and the shaped per-motor duty commands.
//!
//! # Overview
//!
//! - **Pitch Estimator** ([`pitch`]): bang-bang complementary filter fusing
//!   gyro rate and accelerometer pitch
//! - **PID Controller** ([`pid`]): saturating PID with an overflow-dropping
//!   integrator
//! - **Soft-start Ramp** ([`soft_start`]): power-gated torque fade-in
//! - **Torque Mixer & Shaper** ([`mixer`]): steering mix, dead-zone
//!   compensation, saturation and overspeed detection
//! - **Register arithmetic** ([`fixed`]): saturate/wrap helpers for N-bit
//!   signed registers
//!
//! # RT Safety
//!
//! Every `update` method is RT-safe:
//! - No heap allocations
//! - O(1) time complexity
//! - No error returns; out-of-range values saturate
//!
//! # Example
//!
//! ```
//! use segway_balance::prelude::*;
//!
//! let mut estimator = PitchEstimator::new(PitchCalibration::default());
//! let mut pid = PidController::new(PidGains::default());
//! let mut ramp = SoftStartRamp::new(SoftStartConfig::default());
//! let mut mixer = TorqueMixer::new(MixerCalibration::default());
//!
//! // One control tick
//! let sample = ImuSample::new(0x50, 0xA0);
//! let estimate = estimator.update(sample);
//! let pid_output = pid.update(estimate, sample.valid, false);
//! let scale = ramp.update(true);
//! let out = mixer.update(MixerInputs {
//!     pid_output,
//!     soft_start_scale: scale,
//!     steer_pot: 0x7FF,
//!     steering_enabled: false,
//!     power_up: true,
//! });
//! assert_eq!(out.motor.left, out.motor.right);
//! ```

#![deny(unsafe_op_in_unsafe_fn, clippy::unwrap_used)]
#![warn(missing_docs, missing_debug_implementations, rust_2018_idioms)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod error;
pub mod fixed;
pub mod mixer;
pub mod pid;
pub mod pitch;
pub mod prelude;
pub mod soft_start;

pub use error::{BalanceError, BalanceResult};
pub use mixer::{MixerCalibration, MixerInputs, MixerOutput, MotorCommand, TorqueCommand, TorqueMixer};
pub use pid::{PidController, PidGains, PidTerms};
pub use pitch::{ImuSample, PitchCalibration, PitchEstimate, PitchEstimator};
pub use soft_start::{SoftStartConfig, SoftStartRamp};
