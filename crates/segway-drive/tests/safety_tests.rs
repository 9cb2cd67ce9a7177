//! Safety tests for the motor drive stage.
//!
//! Shoot-through prevention, blanking and latch persistence across whole
//! PWM periods. All tests use `Result<>` return types and avoid
//! `unwrap`/`expect`.

#![cfg(test)]

use segway_drive::prelude::*;
use segway_test_helpers::prelude::*;
use tracing_test::traced_test;

type TestResult = Result<(), Box<dyn std::error::Error>>;

fn advance(channel: &mut MotorChannel, command: i16, ticks: u32) {
    for _ in 0..ticks {
        channel.tick(command, false);
    }
}

#[test]
#[traced_test]
fn test_unblanked_fault_holds_outputs_low() -> TestResult {
    let timing = PwmTiming::default();
    timing.validate()?;
    let mut channel = MotorChannel::new(MotorSide::Right, timing);

    // Counter 500 with a 50% duty is outside both blanking windows.
    advance(&mut channel, 0, 500);
    let out = channel.tick(0, true);
    assert!(out.tripped);
    assert!(logs_contain("Over-current fault latched"));

    for _ in 0..10_000 {
        let out = channel.tick(1500, false);
        assert!(out.tripped);
        assert!(!out.pwm.high_side);
        assert!(!out.pwm.low_side);
    }
    Ok(())
}

#[test]
fn test_fault_inside_blanking_window_changes_nothing() -> TestResult {
    let timing = PwmTiming::default();
    let mut faulted = MotorChannel::new(MotorSide::Left, timing);
    let mut clean = MotorChannel::new(MotorSide::Left, timing);

    for _ in 0..3 * timing.period {
        let probe = faulted.pwm().counter();
        let a = faulted.tick(-300, false);
        let b = clean.tick(-300, false);
        assert_eq!(a, b);

        // Replay the same counter with a fault only where it is blanked.
        if a.pwm.blanked() {
            let mut replay = MotorChannel::new(MotorSide::Left, timing);
            advance(&mut replay, -300, probe);
            let out = replay.tick(-300, true);
            assert!(!out.tripped, "fault at counter {probe} should be blanked");
            assert_eq!(out, a);
        }
    }
    assert!(!faulted.is_tripped());
    Ok(())
}

#[test]
fn test_single_tick_pulse_far_from_edges_trips() {
    let mut channel = MotorChannel::new(MotorSide::Left, PwmTiming::default());
    advance(&mut channel, 0, 700);
    assert!(channel.tick(0, true).tripped);
    advance(&mut channel, 0, 5000);
    assert!(channel.is_tripped());
}

#[test]
fn test_reset_rearms_channel() {
    let mut channel = MotorChannel::new(MotorSide::Left, PwmTiming::default());
    advance(&mut channel, 0, 700);
    channel.tick(0, true);
    channel.reset();
    assert!(!channel.is_tripped());
    assert_eq!(channel.pwm().counter(), 0);
    let out = channel.tick(0, false);
    assert!(out.pwm.period_start);
    assert!(!out.tripped);
}

#[test]
fn test_both_channels_independent() {
    let timing = PwmTiming::default();
    let mut left = MotorChannel::new(MotorSide::Left, timing);
    let mut right = MotorChannel::new(MotorSide::Right, timing);
    for tick in 0..2000u32 {
        let fault = tick == 600;
        let l = left.tick(100, fault);
        let r = right.tick(100, false);
        assert!(!r.tripped);
        if tick >= 600 {
            assert!(l.tripped);
        }
    }
    assert_eq!(left.side(), MotorSide::Left);
    assert_eq!(right.side(), MotorSide::Right);
}

#[test]
fn test_duty_tracks_command_across_periods() -> TestResult {
    let timing = PwmTiming::default();
    let mut channel = MotorChannel::new(MotorSide::Left, timing);
    let first = channel.tick(-2048, false);
    assert_eq!(first.duty, 0);

    advance(&mut channel, 1024, timing.period - 1);
    let next = channel.tick(1024, false);
    assert!(next.pwm.period_start);
    assert_eq!(next.duty, duty_from_command(1024, timing.period));
    assert_in_range!(next.duty, 1535, 1537);
    Ok(())
}
