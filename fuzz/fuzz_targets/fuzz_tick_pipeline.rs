//! Fuzzes the control tick with arbitrary sensor, command and fault streams.
//!
//! Every 12 input bytes form one tick. Checks shoot-through and latch
//! persistence on every tick.
//!
//! Run with:
//!   cargo +nightly fuzz run fuzz_tick_pipeline
#![no_main]
use libfuzzer_sys::fuzz_target;
use segway_core::prelude::*;

fn tick_from(chunk: &[u8; 12]) -> TickInputs {
    let [r0, r1, a0, a1, l0, l1, rr0, rr1, steer, battery, cmd, flags] = *chunk;
    TickInputs {
        sensors: SensorFrame {
            imu: ImuSample {
                rate: i16::from_le_bytes([r0, r1]),
                accel: i16::from_le_bytes([a0, a1]),
                valid: flags & 0x01 != 0,
            },
            load: LoadCells::new(
                u16::from_le_bytes([l0, l1]) & 0x0FFF,
                u16::from_le_bytes([rr0, rr1]) & 0x0FFF,
            ),
            steer_pot: u16::from(steer) << 4,
            battery: u16::from(battery) << 4,
        },
        command: (flags & 0x02 != 0).then_some(cmd),
        faults: OverCurrentFaults {
            left: flags & 0x04 != 0,
            right: flags & 0x08 != 0,
        },
    }
}

fuzz_target!(|data: &[u8]| {
    let mut config = SegwayConfig::fast_sim();
    config.rider.settle_ticks = 16;
    let Ok(mut segway) = Segway::new(config) else {
        return;
    };

    let mut left_tripped = false;
    let mut right_tripped = false;
    for chunk in data.chunks_exact(12) {
        let Ok(chunk) = <&[u8; 12]>::try_from(chunk) else {
            return;
        };
        let out = segway.tick(&tick_from(chunk));

        for channel in [out.left, out.right] {
            assert!(!(channel.pwm.high_side && channel.pwm.low_side));
            if channel.tripped {
                assert!(!channel.pwm.high_side && !channel.pwm.low_side);
            }
        }
        left_tripped |= out.flags.left_tripped;
        right_tripped |= out.flags.right_tripped;
        assert_eq!(out.flags.left_tripped, left_tripped);
        assert_eq!(out.flags.right_tripped, right_tripped);
        assert_eq!(out.flags.power_up, segway.auth_state() != AuthState::Idle);
    }
});
