//! Scripted scenarios and the runner that plays them through the core.
//!
//! A scenario is a YAML list of timed events. Sensor values set by an event
//! are held until the next event changes them; command bytes, fault pulses
//! and resets apply to their tick only.
//!
//! ```yaml
//! name: ride and stop
//! ticks: 40000
//! imu_period: 4
//! events:
//!   - at: 0
//!     load: { left: 0x150, right: 0x150 }
//!   - at: 10
//!     command: go
//!   - at: 30000
//!     fault: left
//! ```

use std::path::Path;

use segway_core::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::SimError;

/// A command byte, by name or value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CommandSpec {
    /// `go` or `stop`.
    Named(RideCommand),
    /// Any raw byte, recognized or not.
    Byte(u8),
}

impl CommandSpec {
    pub fn byte(self) -> u8 {
        match self {
            Self::Named(command) => command.to_byte(),
            Self::Byte(byte) => byte,
        }
    }
}

/// Channel(s) receiving a one-tick fault pulse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FaultSide {
    Left,
    Right,
    Both,
}

impl FaultSide {
    fn faults(self) -> OverCurrentFaults {
        OverCurrentFaults {
            left: matches!(self, Self::Left | Self::Both),
            right: matches!(self, Self::Right | Self::Both),
        }
    }
}

/// Raw IMU readings held until changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ImuSpec {
    pub rate: i16,
    pub accel: i16,
}

/// Everything that happens at one tick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioEvent {
    pub at: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<CommandSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub load: Option<LoadCells>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub imu: Option<ImuSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub steer: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub battery: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fault: Option<FaultSide>,
    #[serde(default)]
    pub reset: bool,
}

fn default_imu_period() -> u32 {
    1
}

/// A timed script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Scenario {
    #[serde(default)]
    pub name: Option<String>,
    /// Ticks to run.
    pub ticks: u64,
    /// A valid IMU sample arrives every `imu_period` ticks.
    #[serde(default = "default_imu_period")]
    pub imu_period: u32,
    #[serde(default)]
    pub events: Vec<ScenarioEvent>,
}

impl Scenario {
    /// Parse and validate a YAML scenario.
    pub fn from_yaml_str(text: &str, origin: &Path) -> Result<Self, SimError> {
        let scenario: Self =
            serde_yaml::from_str(text).map_err(|source| SimError::ScenarioParse {
                path: origin.to_path_buf(),
                source,
            })?;
        scenario.validate()?;
        Ok(scenario)
    }

    /// Read, parse and validate a YAML scenario file.
    pub fn load(path: &Path) -> Result<Self, SimError> {
        let text = std::fs::read_to_string(path).map_err(|source| SimError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&text, path)
    }

    pub fn validate(&self) -> Result<(), SimError> {
        if self.ticks == 0 {
            return Err(SimError::InvalidScenario("ticks must be at least 1".into()));
        }
        if self.imu_period == 0 {
            return Err(SimError::InvalidScenario(
                "imu_period must be at least 1".into(),
            ));
        }
        if let Some(late) = self.events.iter().find(|e| e.at >= self.ticks) {
            return Err(SimError::InvalidScenario(format!(
                "event at tick {} is past the end ({} ticks)",
                late.at, self.ticks
            )));
        }
        Ok(())
    }
}

/// A change observed while running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Transition {
    Auth {
        tick: u64,
        from: AuthState,
        to: AuthState,
    },
    Rider {
        tick: u64,
        from: RiderState,
        to: RiderState,
    },
    SoftStartComplete {
        tick: u64,
    },
    Overspeed {
        tick: u64,
        active: bool,
    },
    BatteryLow {
        tick: u64,
        active: bool,
    },
    Tripped {
        tick: u64,
        side: MotorSide,
    },
    Reset {
        tick: u64,
    },
}

impl Transition {
    pub fn tick(&self) -> u64 {
        match *self {
            Self::Auth { tick, .. }
            | Self::Rider { tick, .. }
            | Self::SoftStartComplete { tick }
            | Self::Overspeed { tick, .. }
            | Self::BatteryLow { tick, .. }
            | Self::Tripped { tick, .. }
            | Self::Reset { tick } => tick,
        }
    }
}

impl std::fmt::Display for Transition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Auth { from, to, .. } => write!(f, "authorization {from} -> {to}"),
            Self::Rider { from, to, .. } => write!(f, "rider {from} -> {to}"),
            Self::SoftStartComplete { .. } => write!(f, "soft-start complete"),
            Self::Overspeed { active, .. } => {
                write!(f, "overspeed {}", if *active { "on" } else { "off" })
            }
            Self::BatteryLow { active, .. } => {
                write!(f, "battery low {}", if *active { "on" } else { "off" })
            }
            Self::Tripped { side, .. } => write!(f, "{side} over-current latch tripped"),
            Self::Reset { .. } => write!(f, "reset"),
        }
    }
}

/// Result of a scenario run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub name: Option<String>,
    pub ticks: u64,
    pub transitions: Vec<Transition>,
    pub telemetry: Telemetry,
}

fn diff(tick: u64, before: &Telemetry, after: &Telemetry, out: &mut Vec<Transition>) {
    if before.rider_state != after.rider_state {
        out.push(Transition::Rider {
            tick,
            from: before.rider_state,
            to: after.rider_state,
        });
    }
    if before.auth_state != after.auth_state {
        out.push(Transition::Auth {
            tick,
            from: before.auth_state,
            to: after.auth_state,
        });
    }
    if before.soft_start_scale != u8::MAX && after.soft_start_scale == u8::MAX {
        out.push(Transition::SoftStartComplete { tick });
    }
    if before.flags.overspeed != after.flags.overspeed {
        out.push(Transition::Overspeed {
            tick,
            active: after.flags.overspeed,
        });
    }
    if before.flags.battery_low != after.flags.battery_low {
        out.push(Transition::BatteryLow {
            tick,
            active: after.flags.battery_low,
        });
    }
    if !before.flags.left_tripped && after.flags.left_tripped {
        out.push(Transition::Tripped {
            tick,
            side: MotorSide::Left,
        });
    }
    if !before.flags.right_tripped && after.flags.right_tripped {
        out.push(Transition::Tripped {
            tick,
            side: MotorSide::Right,
        });
    }
}

/// Play a scenario through a core.
pub fn run(scenario: &Scenario, segway: &mut Segway) -> RunReport {
    let mut events = scenario.events.clone();
    events.sort_by_key(|e| e.at);
    let mut pending = events.into_iter().peekable();

    let mut sensors = SensorFrame::default();
    let mut imu = ImuSpec { rate: 0, accel: 0 };
    let mut transitions = Vec::new();
    let mut before = segway.telemetry();

    for tick in 0..scenario.ticks {
        let mut command = None;
        let mut faults = OverCurrentFaults::default();
        let mut reset = false;

        while let Some(event) = pending.next_if(|e| e.at == tick) {
            command = event.command.map(CommandSpec::byte).or(command);
            if let Some(load) = event.load {
                sensors.load = load;
            }
            if let Some(spec) = event.imu {
                imu = spec;
            }
            if let Some(steer) = event.steer {
                sensors.steer_pot = steer;
            }
            if let Some(battery) = event.battery {
                sensors.battery = battery;
            }
            if let Some(side) = event.fault {
                let pulse = side.faults();
                faults.left |= pulse.left;
                faults.right |= pulse.right;
            }
            reset |= event.reset;
        }

        if reset {
            segway.reset();
            transitions.push(Transition::Reset { tick });
            before = segway.telemetry();
        }

        sensors.imu = ImuSample {
            rate: imu.rate,
            accel: imu.accel,
            valid: tick % u64::from(scenario.imu_period) == 0,
        };
        segway.tick(&TickInputs {
            sensors,
            command,
            faults,
        });

        let after = segway.telemetry();
        diff(tick, &before, &after, &mut transitions);
        before = after;
    }

    RunReport {
        name: scenario.name.clone(),
        ticks: scenario.ticks,
        transitions,
        telemetry: before,
    }
}
