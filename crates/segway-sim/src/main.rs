//! segway-sim - Segway balance core simulator
//!
//! Drives the control tick from scripted scenarios on a host, printing
//! state transitions and final telemetry.

#![deny(unused_must_use)]
#![deny(clippy::unwrap_used)]

mod commands;
mod error;
mod output;
mod scenario;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::error::SimError;

#[derive(Parser)]
#[command(name = "segway-sim")]
#[command(about = "Segway balance core simulator - run scripted ride scenarios on a host")]
#[command(version)]
#[command(long_about = "
segway-sim runs the Segway balance and motor-safety core one control tick at
a time, driven by a YAML scenario of timed sensor changes, command bytes and
fault pulses. It reports every state transition and the final telemetry.

Use --json for machine-readable output suitable for scripting.
")]
struct Cli {
    /// Output format (human-readable or JSON)
    #[arg(long, global = true, help = "Output in JSON format for machine parsing")]
    json: bool,

    /// Verbose logging
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the default calibration
    Defaults {
        /// Print the fast-simulation calibration instead
        #[arg(long)]
        fast_sim: bool,
    },

    /// Load and validate a calibration file (.yaml, .yml or .json)
    Check {
        /// Calibration file
        path: PathBuf,
    },

    /// Run a scenario
    Run {
        /// Scenario file (YAML)
        scenario: PathBuf,

        /// Calibration file; defaults are used when omitted
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Use the fast-simulation calibration when no file is given
        #[arg(long, conflicts_with = "config")]
        fast_sim: bool,

        /// Override the scenario's tick count; later events are dropped
        #[arg(long)]
        ticks: Option<u64>,
    },
}

fn init_tracing(verbose: u8) {
    let log_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    let subscriber = tracing_subscriber::registry().with(filter).with(
        tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_writer(std::io::stderr),
    );
    if subscriber.try_init().is_err() {
        eprintln!("Failed to install log subscriber");
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match execute_command(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if cli.json {
                output::print_error_json(&e);
            } else {
                output::print_error_human(&e);
            }

            let code = e.downcast_ref::<SimError>().map_or(1, SimError::exit_code);
            ExitCode::from(code)
        }
    }
}

fn execute_command(cli: &Cli) -> Result<()> {
    match &cli.command {
        Commands::Defaults { fast_sim } => commands::defaults(*fast_sim, cli.json),
        Commands::Check { path } => commands::check(path, cli.json),
        Commands::Run {
            scenario,
            config,
            fast_sim,
            ticks,
        } => commands::run(scenario, config.as_deref(), *fast_sim, *ticks, cli.json),
    }
}
