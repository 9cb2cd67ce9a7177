//! Scenario tests driving both gating FSMs together, the way the control
//! tick does: rider presence first, then authorization with this tick's
//! `rider_off`.

use segway_gating::prelude::*;

const RIDER: LoadCells = LoadCells::new(0x150, 0x150);
const EMPTY: LoadCells = LoadCells::new(0x20, 0x18);

struct Gates {
    rider: RiderPresence,
    auth: Authorization,
}

impl Gates {
    fn new(settle_ticks: u32) -> Self {
        Self {
            rider: RiderPresence::new(RiderThresholds {
                settle_ticks,
                ..RiderThresholds::default()
            }),
            auth: Authorization::new(),
        }
    }

    fn tick(&mut self, cells: LoadCells, byte: Option<u8>) -> bool {
        self.rider.update(cells);
        self.auth.update(byte, self.rider.rider_off())
    }
}

#[test]
fn go_then_stop_then_rider_leaves() {
    let mut gates = Gates::new(8);

    gates.tick(EMPTY, None);
    assert_eq!(gates.auth.state(), AuthState::Idle);

    assert!(gates.tick(EMPTY, Some(b'G')));
    assert_eq!(gates.auth.state(), AuthState::Active);

    for _ in 0..20 {
        assert!(gates.tick(RIDER, None));
    }
    assert!(gates.rider.steering_enabled());

    assert!(gates.tick(RIDER, Some(b'S')));
    assert_eq!(gates.auth.state(), AuthState::PendingStop);

    for _ in 0..100 {
        assert!(gates.tick(RIDER, None));
    }

    assert!(!gates.tick(EMPTY, None));
    assert_eq!(gates.auth.state(), AuthState::Idle);
}

#[test]
fn stop_with_rider_already_off_goes_straight_to_idle() {
    let mut gates = Gates::new(8);
    gates.tick(EMPTY, Some(b'G'));
    assert!(!gates.tick(EMPTY, Some(b'S')));
    assert_eq!(gates.auth.state(), AuthState::Idle);
}

#[test]
fn go_reauthorizes_pending_stop() {
    let mut gates = Gates::new(8);
    gates.tick(RIDER, Some(b'G'));
    gates.tick(RIDER, Some(b'S'));
    assert_eq!(gates.auth.state(), AuthState::PendingStop);
    gates.tick(RIDER, Some(b'G'));
    assert_eq!(gates.auth.state(), AuthState::Active);

    // Rider stepping off while Active keeps power up
    assert!(gates.tick(EMPTY, None));
    assert_eq!(gates.auth.state(), AuthState::Active);
}

#[test]
fn rider_off_flag_tracks_off_state_exactly() {
    let mut gates = Gates::new(3);
    let script = [EMPTY, RIDER, RIDER, LoadCells::new(0x2F0, 0x10), RIDER, EMPTY, RIDER];
    for cells in script.iter().cycle().take(60) {
        gates.tick(*cells, None);
        assert_eq!(gates.rider.rider_off(), gates.rider.state() == RiderState::Off);
        assert_eq!(
            gates.rider.steering_enabled(),
            gates.rider.state() == RiderState::Enabled
        );
    }
}

#[cfg(test)]
mod proptest_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn power_matches_auth_state(
            steps in proptest::collection::vec((any::<u16>(), any::<u16>(), proptest::option::of(any::<u8>())), 1..300),
        ) {
            let mut gates = Gates::new(4);
            for (l, r, byte) in steps {
                let power = gates.tick(LoadCells::new(l >> 4, r >> 4), byte);
                prop_assert_eq!(power, gates.auth.state() != AuthState::Idle);
            }
        }

        #[test]
        fn idle_only_leaves_on_go(
            bytes in proptest::collection::vec(any::<u8>(), 1..200),
            rider_off in any::<bool>(),
        ) {
            let mut auth = Authorization::new();
            for byte in bytes {
                let was_idle = auth.state() == AuthState::Idle;
                auth.update(Some(byte), rider_off);
                if was_idle && byte != RideCommand::GO_BYTE {
                    prop_assert_eq!(auth.state(), AuthState::Idle);
                }
            }
        }

        #[test]
        fn light_weight_always_forces_off(l in 0u16..0xE0, r in 0u16..0xE0, warmup in 0usize..20) {
            let mut rider = RiderPresence::new(RiderThresholds { settle_ticks: 2, ..RiderThresholds::default() });
            for _ in 0..warmup {
                rider.update(RIDER);
            }
            rider.update(LoadCells::new(l, r));
            prop_assert!(rider.rider_off());
        }
    }
}
