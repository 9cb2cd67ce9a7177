//! Prelude module for convenient imports.

pub use crate::auth::{AuthState, Authorization};
pub use crate::command::RideCommand;
pub use crate::error::{GatingError, GatingResult};
pub use crate::rider::{LoadCells, RiderObservation, RiderPresence, RiderState, RiderThresholds};
