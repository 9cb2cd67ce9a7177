//! Prelude for convenient imports.
//!
//! ```rust
//! use segway_balance::prelude::*;
//! ```

pub use crate::{
    BalanceError, BalanceResult, ImuSample, MixerCalibration, MixerInputs, MixerOutput,
    MotorCommand, PidController, PidGains, PidTerms, PitchCalibration, PitchEstimate,
    PitchEstimator, SoftStartConfig, SoftStartRamp, TorqueCommand, TorqueMixer,
};
