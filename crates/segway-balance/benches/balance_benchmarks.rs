//! Balance Loop Benchmarks
//!
//! Criterion benchmarks for each stage of the per-tick balance path.

use criterion::{Criterion, criterion_group, criterion_main};
use segway_balance::prelude::*;
use std::hint::black_box;

fn bench_pitch_estimator(c: &mut Criterion) {
    let calibration = PitchCalibration::default();
    let mut estimator = PitchEstimator::new(calibration);
    let sample = ImuSample::new(calibration.rate_offset - 300, calibration.accel_offset + 800);

    c.bench_function("pitch_estimator_update", |b| {
        b.iter(|| estimator.update(black_box(sample)))
    });
}

fn bench_pid(c: &mut Criterion) {
    let mut pid = PidController::new(PidGains::default());
    let estimate = PitchEstimate {
        pitch: 120,
        rate: -340,
    };

    c.bench_function("pid_update", |b| {
        b.iter(|| pid.update(black_box(estimate), black_box(true), black_box(false)))
    });
}

fn bench_soft_start(c: &mut Criterion) {
    let mut ramp = SoftStartRamp::new(SoftStartConfig::default());

    c.bench_function("soft_start_update", |b| {
        b.iter(|| ramp.update(black_box(true)))
    });
}

fn bench_mixer(c: &mut Criterion) {
    let mut mixer = TorqueMixer::new(MixerCalibration::default());
    let inputs = MixerInputs {
        pid_output: 700,
        soft_start_scale: 255,
        steer_pot: 0x900,
        steering_enabled: true,
        power_up: true,
    };

    c.bench_function("mixer_update", |b| {
        b.iter(|| mixer.update(black_box(inputs)))
    });
}

fn bench_balance_chain(c: &mut Criterion) {
    let calibration = PitchCalibration::default();
    let mut estimator = PitchEstimator::new(calibration);
    let mut pid = PidController::new(PidGains::default());
    let mut ramp = SoftStartRamp::new(SoftStartConfig::default());
    let mut mixer = TorqueMixer::new(MixerCalibration::default());
    let sample = ImuSample::new(calibration.rate_offset + 50, calibration.accel_offset - 400);

    c.bench_function("balance_chain_tick", |b| {
        b.iter(|| {
            let estimate = estimator.update(black_box(sample));
            let pid_output = pid.update(estimate, sample.valid, false);
            let scale = ramp.update(true);
            mixer.update(MixerInputs {
                pid_output,
                soft_start_scale: scale,
                steer_pot: 0x7FF,
                steering_enabled: true,
                power_up: true,
            })
        })
    });
}

criterion_group!(
    benches,
    bench_pitch_estimator,
    bench_pid,
    bench_soft_start,
    bench_mixer,
    bench_balance_chain
);
criterion_main!(benches);
