//! Subcommand implementations

use std::path::Path;

use anyhow::Result;
use segway_core::prelude::*;
use tracing::info;

use crate::error::SimError;
use crate::output;
use crate::scenario::{self, Scenario};

/// Calibration for `run`: a file, the fast-sim set or the defaults.
pub fn resolve_config(path: Option<&Path>, fast_sim: bool) -> Result<SegwayConfig, SimError> {
    match path {
        Some(path) => Ok(SegwayConfig::load(path)?),
        None if fast_sim => Ok(SegwayConfig::fast_sim()),
        None => Ok(SegwayConfig::default()),
    }
}

pub fn defaults(fast_sim: bool, json: bool) -> Result<()> {
    let config = if fast_sim {
        SegwayConfig::fast_sim()
    } else {
        SegwayConfig::default()
    };
    output::print_config(&config, json)?;
    Ok(())
}

pub fn check(path: &Path, json: bool) -> Result<()> {
    let config = SegwayConfig::load(path).map_err(SimError::from)?;
    output::print_check_ok(&path.display().to_string(), &config, json);
    Ok(())
}

pub fn run(
    scenario_path: &Path,
    config_path: Option<&Path>,
    fast_sim: bool,
    ticks: Option<u64>,
    json: bool,
) -> Result<()> {
    let mut scenario = Scenario::load(scenario_path)?;
    if let Some(ticks) = ticks {
        scenario.ticks = ticks;
        scenario.events.retain(|e| e.at < ticks);
        scenario.validate()?;
    }
    let config = resolve_config(config_path, fast_sim)?;
    let mut segway = Segway::new(config).map_err(SimError::from)?;

    info!(
        scenario = %scenario_path.display(),
        ticks = scenario.ticks,
        events = scenario.events.len(),
        "Running scenario"
    );
    let report = scenario::run(&scenario, &mut segway);
    output::print_report(&report, json);
    Ok(())
}
