//! The control tick.
//!
//! One call to [`Segway::tick`] runs every stage once, in a fixed order:
//!
//! ```text
//!  IMU ──► PitchEstimator ──► PID + soft-start ──► TorqueMixer ──► MotorChannel ×2
//!                                  ▲                   ▲
//!                 registered flags │ (previous tick)   │
//!  load cells ──► RiderPresence ──► Authorization ─────┘
//! ```
//!
//! The control path reads the FSM flags registered at the end of the
//! previous tick, so gating decisions reach the motors with exactly one tick
//! of latency. Every other hand-off is within the same tick. The
//! authorization FSM sees this tick's `rider_off`.

use segway_balance::{MixerInputs, PidController, PitchEstimator, SoftStartRamp, TorqueMixer};
use segway_drive::{MotorChannel, MotorSide};
use segway_gating::{AuthState, Authorization, RiderPresence, RiderState};
use tracing::{debug, info, warn};

use crate::battery::BatteryMonitor;
use crate::config::SegwayConfig;
use crate::error::ConfigResult;
use crate::frame::{StatusFlags, TickInputs, TickOutputs};
use crate::telemetry::Telemetry;

/// The balance and motor-safety core.
///
/// # RT Safety
///
/// [`Segway::tick`] is RT-safe:
/// - No heap allocations
/// - O(1) per tick
/// - Logs only on state changes
///
/// # Example
///
/// ```
/// use segway_core::prelude::*;
///
/// let mut segway = Segway::new(SegwayConfig::fast_sim())?;
/// let idle = TickInputs::default();
///
/// let out = segway.tick(&idle.with_command(b'G'));
/// assert!(out.flags.power_up);
/// assert_eq!(segway.auth_state(), AuthState::Active);
/// # Ok::<(), ConfigError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Segway {
    config: SegwayConfig,
    estimator: PitchEstimator,
    pid: PidController,
    soft_start: SoftStartRamp,
    mixer: TorqueMixer,
    left: MotorChannel,
    right: MotorChannel,
    rider: RiderPresence,
    auth: Authorization,
    battery: BatteryMonitor,
    flags: StatusFlags,
    last: TickOutputs,
    tick: u64,
}

impl Segway {
    /// Build the core from a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns the configuration's validation error.
    pub fn new(config: SegwayConfig) -> ConfigResult<Self> {
        config.validate()?;
        Ok(Self {
            estimator: PitchEstimator::new(config.pitch),
            pid: PidController::new(config.pid),
            soft_start: SoftStartRamp::new(config.soft_start),
            mixer: TorqueMixer::new(config.mixer),
            left: MotorChannel::new(MotorSide::Left, config.pwm),
            right: MotorChannel::new(MotorSide::Right, config.pwm),
            rider: RiderPresence::new(config.rider),
            auth: Authorization::new(),
            battery: BatteryMonitor::new(config.battery),
            flags: StatusFlags::default(),
            last: TickOutputs::default(),
            tick: 0,
            config,
        })
    }

    /// Run one control tick.
    pub fn tick(&mut self, inputs: &TickInputs) -> TickOutputs {
        let sensors = &inputs.sensors;
        let registered = self.flags;

        let estimate = self.estimator.update(sensors.imu);
        let pid_output = self
            .pid
            .update(estimate, sensors.imu.valid, registered.rider_off);

        let was_complete = self.soft_start.is_complete();
        let scale = self.soft_start.update(registered.power_up);
        if scale == SoftStartRamp::FULL_SCALE && !was_complete {
            info!(tick = self.tick, "Soft-start complete");
        }

        let mix = self.mixer.update(MixerInputs {
            pid_output,
            soft_start_scale: scale,
            steer_pot: sensors.steer_pot,
            steering_enabled: registered.steering_enabled,
            power_up: registered.power_up,
        });

        let left = self.left.tick(mix.motor.left, inputs.faults.left);
        let right = self.right.tick(mix.motor.right, inputs.faults.right);

        let rider_before = self.rider.state();
        let rider_state = self.rider.update(sensors.load);
        if rider_state != rider_before {
            info!(from = %rider_before, to = %rider_state, tick = self.tick, "Rider presence changed");
        }

        let auth_before = self.auth.state();
        let power_up = self.auth.update(inputs.command, self.rider.rider_off());
        let auth_state = self.auth.state();
        if auth_state != auth_before {
            info!(from = %auth_before, to = %auth_state, tick = self.tick, "Authorization changed");
        }

        let battery_low = self.battery.update(sensors.battery);
        if battery_low && !registered.battery_low {
            warn!(reading = sensors.battery, tick = self.tick, "Battery low");
        }
        if mix.overspeed && !registered.overspeed {
            warn!(
                left = mix.motor.left,
                right = mix.motor.right,
                tick = self.tick,
                "Overspeed"
            );
        }

        self.flags = StatusFlags {
            power_up,
            rider_off: rider_state.rider_off(),
            steering_enabled: rider_state.steering_enabled(),
            overspeed: mix.overspeed,
            battery_low,
            left_tripped: left.tripped,
            right_tripped: right.tripped,
        };
        self.last = TickOutputs {
            left,
            right,
            flags: self.flags,
        };
        self.tick = self.tick.wrapping_add(1);
        self.last
    }

    /// Clear every integrator, latch, ramp and FSM back to its initial
    /// state. The configuration is kept.
    pub fn reset(&mut self) {
        debug!(tick = self.tick, "Core reset");
        self.estimator.reset();
        self.pid.reset();
        self.soft_start.reset();
        self.mixer.reset();
        self.left.reset();
        self.right.reset();
        self.rider.reset();
        self.auth.reset();
        self.battery.reset();
        self.flags = StatusFlags::default();
        self.last = TickOutputs::default();
        self.tick = 0;
    }

    /// Snapshot for diagnostics.
    #[must_use]
    pub fn telemetry(&self) -> Telemetry {
        Telemetry {
            tick: self.tick,
            auth_state: self.auth.state(),
            rider_state: self.rider.state(),
            flags: self.flags,
            pitch: self.estimator.estimate(),
            pid: self.pid.terms(),
            soft_start_scale: self.soft_start.scale(),
            motor: self.mixer.output().motor,
            left_duty: self.last.left.duty,
            right_duty: self.last.right.duty,
        }
    }

    /// Status flags after the last tick.
    #[must_use]
    pub fn flags(&self) -> StatusFlags {
        self.flags
    }

    /// Authorization state.
    #[must_use]
    pub fn auth_state(&self) -> AuthState {
        self.auth.state()
    }

    /// Rider-presence state.
    #[must_use]
    pub fn rider_state(&self) -> RiderState {
        self.rider.state()
    }

    /// Ticks since construction or reset.
    #[must_use]
    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    /// The PID controller.
    #[must_use]
    pub fn pid(&self) -> &PidController {
        &self.pid
    }

    /// The soft-start ramp.
    #[must_use]
    pub fn soft_start(&self) -> &SoftStartRamp {
        &self.soft_start
    }

    /// One motor channel.
    #[must_use]
    pub fn channel(&self, side: MotorSide) -> &MotorChannel {
        match side {
            MotorSide::Left => &self.left,
            MotorSide::Right => &self.right,
        }
    }

    /// Configuration in use.
    #[must_use]
    pub fn config(&self) -> &SegwayConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::SensorFrame;
    use segway_gating::LoadCells;
    use segway_test_helpers::prelude::*;

    fn core() -> Segway {
        must(Segway::new(SegwayConfig::fast_sim()))
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let mut config = SegwayConfig::default();
        config.pwm.period = 100;
        assert!(Segway::new(config).is_err());
    }

    #[test]
    fn test_power_reaches_ramp_one_tick_later() {
        let mut segway = core();
        let out = segway.tick(&TickInputs::default().with_command(b'G'));
        assert!(out.flags.power_up);
        assert_eq!(segway.soft_start().counter(), 0);

        segway.tick(&TickInputs::default());
        assert_eq!(segway.soft_start().counter(), SegwayConfig::fast_sim().soft_start.step);
        assert_eq!(segway.soft_start().scale(), 0);
    }

    #[test]
    fn test_rider_off_is_registered_initially() {
        let segway = core();
        assert!(segway.flags().rider_off);
        assert!(!segway.flags().power_up);
    }

    #[test]
    fn test_unpowered_motors_sit_at_half_duty() {
        let mut segway = core();
        let out = segway.tick(&TickInputs::default());
        assert_eq!(out.left.duty, 1024);
        assert_eq!(out.right.duty, 1024);
        assert_eq!(segway.telemetry().motor, segway_balance::MotorCommand::ZERO);
    }

    #[test]
    fn test_reset_restores_initial_state() {
        let mut segway = core();
        let sensors = SensorFrame {
            load: LoadCells::new(0x150, 0x150),
            ..SensorFrame::default()
        };
        segway.tick(&TickInputs::from_sensors(sensors).with_command(b'G'));
        segway.tick(&TickInputs::from_sensors(sensors));
        assert_eq!(segway.auth_state(), AuthState::Active);

        segway.reset();
        assert_eq!(segway.auth_state(), AuthState::Idle);
        assert_eq!(segway.rider_state(), RiderState::Off);
        assert_eq!(segway.tick_count(), 0);
        assert_eq!(segway.flags(), StatusFlags::default());
        assert_eq!(segway.soft_start().counter(), 0);
    }
}
