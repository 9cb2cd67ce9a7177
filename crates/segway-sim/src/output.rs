//! Output formatting for simulator results

use anyhow::Error;
use colored::*;
use segway_core::prelude::*;
use serde_json::json;

use crate::error::SimError;
use crate::scenario::{RunReport, Transition};

fn print_json(value: &serde_json::Value) {
    match serde_json::to_string_pretty(value) {
        Ok(s) => println!("{s}"),
        Err(e) => eprintln!("Failed to format output as JSON: {e}"),
    }
}

fn error_type_name(error: &Error) -> &'static str {
    match error.downcast_ref::<SimError>() {
        Some(SimError::Config(_)) => "config",
        Some(SimError::Io { .. }) => "io",
        Some(SimError::ScenarioParse { .. } | SimError::InvalidScenario(_)) => "scenario",
        Some(SimError::Json(_)) => "json",
        None => "internal",
    }
}

/// Print error in JSON format
pub fn print_error_json(error: &Error) {
    print_json(&json!({
        "success": false,
        "error": {
            "message": error.to_string(),
            "type": error_type_name(error)
        }
    }));
}

/// Print error in human-readable format
pub fn print_error_human(error: &Error) {
    eprintln!("{} {}", "Error:".red().bold(), error);

    let mut source = error.source();
    while let Some(err) = source {
        eprintln!("  {} {}", "Caused by:".yellow(), err);
        source = err.source();
    }
}

/// Print a calibration set
pub fn print_config(config: &SegwayConfig, json: bool) -> Result<(), SimError> {
    if json {
        print_json(&json!({
            "success": true,
            "config": config
        }));
    } else {
        let yaml = config.to_yaml()?;
        print!("{yaml}");
    }
    Ok(())
}

/// Report a calibration file that passed validation
pub fn print_check_ok(path: &str, config: &SegwayConfig, json: bool) {
    if json {
        print_json(&json!({
            "success": true,
            "path": path,
            "config": config
        }));
    } else {
        println!("{} {}", "✓".green(), format!("{path} is valid").bold());
        println!(
            "  soft-start: {} ticks to full scale",
            config.soft_start.ticks_to_full()
        );
        println!("  rider settle: {} ticks", config.rider.settle_ticks);
        println!(
            "  pwm: period {}, dead time {}, blanking {}",
            config.pwm.period, config.pwm.dead_time, config.pwm.blank_ticks
        );
    }
}

fn flag(label: &str, on: bool, alarm: bool) -> ColoredString {
    match (on, alarm) {
        (true, true) => label.red().bold(),
        (true, false) => label.green(),
        (false, _) => label.dimmed(),
    }
}

fn transition_line(transition: &Transition) -> String {
    let text = transition.to_string();
    let text = match transition {
        Transition::Tripped { .. } => text.red().bold(),
        Transition::Overspeed { active: true, .. } | Transition::BatteryLow { active: true, .. } => {
            text.yellow()
        }
        Transition::Reset { .. } => text.cyan(),
        _ => text.normal(),
    };
    format!("  {:>10}  {}", transition.tick(), text)
}

/// Print a scenario run
pub fn print_report(report: &RunReport, json: bool) {
    if json {
        print_json(&json!({
            "success": true,
            "report": report
        }));
        return;
    }

    let title = report.name.as_deref().unwrap_or("scenario");
    println!("{} ({} ticks)", title.bold(), report.ticks);

    if report.transitions.is_empty() {
        println!("{}", "  no state changes".dimmed());
    } else {
        for transition in &report.transitions {
            println!("{}", transition_line(transition));
        }
    }

    let t = &report.telemetry;
    println!();
    println!("{}", "Final state:".bold());
    println!("  authorization: {}", t.auth_state);
    println!("  rider:         {}", t.rider_state);
    println!(
        "  flags:         {} {} {} {} {} {} {}",
        flag("power_up", t.flags.power_up, false),
        flag("rider_off", t.flags.rider_off, false),
        flag("steering", t.flags.steering_enabled, false),
        flag("overspeed", t.flags.overspeed, true),
        flag("battery_low", t.flags.battery_low, true),
        flag("left_trip", t.flags.left_tripped, true),
        flag("right_trip", t.flags.right_tripped, true),
    );
    println!("  pitch:         {} (rate {})", t.pitch.pitch, t.pitch.rate);
    println!(
        "  pid:           P {} I {} D {} -> {}",
        t.pid.p, t.pid.i, t.pid.d, t.pid.output
    );
    println!("  soft-start:    {}/255", t.soft_start_scale);
    println!(
        "  motors:        left {} (duty {})  right {} (duty {})",
        t.motor.left, t.left_duty, t.motor.right, t.right_duty
    );
}
