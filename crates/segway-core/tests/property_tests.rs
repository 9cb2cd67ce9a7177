//! Property-Based Tests for the Control Tick

use segway_core::prelude::*;

#[cfg(test)]
mod proptest_tests {
    use super::*;
    use proptest::prelude::*;

    fn sensor_frame() -> impl Strategy<Value = SensorFrame> {
        (
            any::<i16>(),
            any::<i16>(),
            any::<bool>(),
            0u16..0x1000,
            0u16..0x1000,
            0u16..0x1000,
            0u16..0x1000,
        )
            .prop_map(|(rate, accel, valid, left, right, steer_pot, battery)| SensorFrame {
                imu: ImuSample { rate, accel, valid },
                load: LoadCells::new(left, right),
                steer_pot,
                battery,
            })
    }

    fn tick_inputs() -> impl Strategy<Value = TickInputs> {
        (
            sensor_frame(),
            proptest::option::weighted(0.05, prop_oneof![Just(b'G'), Just(b'S'), any::<u8>()]),
            proptest::bool::weighted(0.01),
            proptest::bool::weighted(0.01),
        )
            .prop_map(|(sensors, command, left, right)| TickInputs {
                sensors,
                command,
                faults: OverCurrentFaults { left, right },
            })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn flags_follow_fsm_states(steps in proptest::collection::vec(tick_inputs(), 1..400)) {
            let mut config = SegwayConfig::fast_sim();
            config.rider.settle_ticks = 8;
            let Ok(mut segway) = Segway::new(config) else {
                return Err(TestCaseError::fail("fast_sim config rejected"));
            };
            for inputs in &steps {
                let out = segway.tick(inputs);
                prop_assert_eq!(out.flags.power_up, segway.auth_state() != AuthState::Idle);
                prop_assert_eq!(out.flags.rider_off, segway.rider_state() == RiderState::Off);
                prop_assert_eq!(
                    out.flags.steering_enabled,
                    segway.rider_state() == RiderState::Enabled
                );
            }
        }

        #[test]
        fn no_shoot_through_and_latches_hold(steps in proptest::collection::vec(tick_inputs(), 1..3000)) {
            let Ok(mut segway) = Segway::new(SegwayConfig::fast_sim()) else {
                return Err(TestCaseError::fail("fast_sim config rejected"));
            };
            let mut left_seen = false;
            let mut right_seen = false;
            for inputs in &steps {
                let out = segway.tick(inputs);
                for channel in [out.left, out.right] {
                    prop_assert!(!(channel.pwm.high_side && channel.pwm.low_side));
                    if channel.tripped {
                        prop_assert!(!channel.pwm.high_side && !channel.pwm.low_side);
                    }
                }
                left_seen |= out.flags.left_tripped;
                right_seen |= out.flags.right_tripped;
                prop_assert_eq!(out.flags.left_tripped, left_seen);
                prop_assert_eq!(out.flags.right_tripped, right_seen);
            }
        }

        #[test]
        fn motor_commands_zero_without_power(steps in proptest::collection::vec(tick_inputs(), 1..200)) {
            let Ok(mut segway) = Segway::new(SegwayConfig::fast_sim()) else {
                return Err(TestCaseError::fail("fast_sim config rejected"));
            };
            let mut powered_before = false;
            for inputs in &steps {
                let out = segway.tick(inputs);
                if !powered_before {
                    prop_assert_eq!(segway.telemetry().motor, MotorCommand::ZERO);
                }
                powered_before = out.flags.power_up;
            }
        }
    }
}
