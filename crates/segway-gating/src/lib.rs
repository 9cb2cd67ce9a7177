//! Gating state machines for the Segway balance core.
//!
//! Two small FSMs decide whether the balance loop may move the motors:
//!
//! - [`RiderPresence`]: load-cell weight and balance → `rider_off` and
//!   `steering_enabled`
//! - [`Authorization`]: remote go/stop bytes plus `rider_off` → `power_up`
//!
//! Both expose their state as a plain enum with an explicit `transition`
//! function, so the full table can be tested cell by cell. Outputs are
//! functions of the state alone.

#![deny(unsafe_op_in_unsafe_fn, clippy::unwrap_used)]
#![warn(missing_docs, missing_debug_implementations, rust_2018_idioms)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod auth;
pub mod command;
pub mod error;
pub mod prelude;
pub mod rider;

pub use auth::{AuthState, Authorization};
pub use command::RideCommand;
pub use error::{GatingError, GatingResult};
pub use rider::{LoadCells, RiderObservation, RiderPresence, RiderState, RiderThresholds};
