//! Balance and motor-safety core of a two-wheeled self-balancing vehicle.
//!
//! [`Segway`] owns every stage and runs them as one sequential control tick:
//! pitch fusion, PID with soft-start, torque mixing and shaping, the two PWM
//! channels with their over-current latches, then the rider-presence and
//! authorization FSMs and the battery monitor.
//!
//! # Overview
//!
//! - [`config`]: [`SegwayConfig`] aggregating every calibration section,
//!   loadable from YAML or JSON
//! - [`frame`]: per-tick inputs and outputs
//! - [`segway`]: the tick pipeline
//! - [`telemetry`]: serializable diagnostics snapshot
//!
//! # Logging
//!
//! The core emits `tracing` events only on changes: FSM transitions and
//! soft-start completion at `info`, overspeed and battery-low onset at
//! `warn`, over-current trips at `error`, resets at `debug`.

#![deny(unsafe_op_in_unsafe_fn, clippy::unwrap_used)]
#![warn(missing_docs, missing_debug_implementations, rust_2018_idioms)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod battery;
pub mod config;
pub mod error;
pub mod frame;
pub mod prelude;
pub mod segway;
pub mod telemetry;

pub use battery::{BatteryConfig, BatteryMonitor};
pub use config::{ConfigFormat, SegwayConfig};
pub use error::{ConfigError, ConfigResult};
pub use frame::{OverCurrentFaults, SensorFrame, StatusFlags, TickInputs, TickOutputs};
pub use segway::Segway;
pub use telemetry::Telemetry;
