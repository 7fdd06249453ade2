//! Fuzz target: `MissionService` under arbitrary sensor scripts
//!
//! The first byte picks the start side and whether the far shot is
//! enabled.  Every following byte is one step: the low nibble changes one
//! reading, the high nibble sets how many ticks pass.
//!
//! Invariants checked:
//! - No panics under any byte sequence
//! - Every wheel and launcher command stays inside [-1000, 1000]
//! - The context phase always mirrors the engine phase
//! - A maneuver is owned only by the matching shoot phase
//!
//! cargo fuzz run fuzz_mission_run

#![no_main]

use hoopbot::app::events::MissionEvent;
use hoopbot::app::ports::{ActuatorPort, EventSink, ReleaseGate, SensorPort};
use hoopbot::app::service::MissionService;
use hoopbot::config::MissionConfig;
use hoopbot::drive::{Side, Wheel, speed_in_range};
use hoopbot::error::ActuatorError;
use hoopbot::events::{BumperMask, RangeChannel, TapeMask};
use hoopbot::fsm::Phase;
use hoopbot::maneuver::Maneuver;
use libfuzzer_sys::fuzz_target;

const MAX_STEPS: usize = 4096;

// ── Scripted robot ────────────────────────────────────────────

struct Robot {
    side: Side,
    tape: u8,
    ranges: [u16; 4],
    bumpers: u8,
    wire: bool,
    beacon: bool,
}

impl SensorPort for Robot {
    fn read_tape(&mut self) -> TapeMask {
        TapeMask(self.tape & (TapeMask::FRONT | TapeMask::BACK))
    }

    fn read_range(&mut self, channel: RangeChannel) -> u16 {
        let i = RangeChannel::ALL.iter().position(|c| *c == channel).unwrap_or(0);
        self.ranges[i]
    }

    fn read_bumpers(&mut self) -> BumperMask {
        BumperMask(self.bumpers & 0x0F)
    }

    fn read_boundary_wire(&mut self) -> bool {
        self.wire
    }

    fn read_beacon(&mut self) -> bool {
        self.beacon
    }

    fn read_side_selector(&mut self) -> Side {
        self.side
    }
}

impl ActuatorPort for Robot {
    fn set_wheel_speed(&mut self, _wheel: Wheel, speed: i16) -> Result<(), ActuatorError> {
        assert!(speed_in_range(speed), "wheel speed {speed} out of range");
        Ok(())
    }

    fn set_launcher_speed(&mut self, _wheel: Wheel, speed: i16) -> Result<(), ActuatorError> {
        assert!(speed_in_range(speed), "launcher speed {speed} out of range");
        Ok(())
    }

    fn set_release(&mut self, _gate: ReleaseGate) {}
}

struct Discard;

impl EventSink for Discard {
    fn emit(&mut self, _event: &MissionEvent) {}
}

fuzz_target!(|data: &[u8]| {
    let Some((&head, steps)) = data.split_first() else {
        return;
    };

    let mut config = MissionConfig::default();
    config.far.enabled = head & 0x02 != 0;
    let Ok(mut svc) = MissionService::new(config) else {
        return;
    };
    let mut robot = Robot {
        side: if head & 0x01 != 0 { Side::Left } else { Side::Right },
        tape: 0,
        ranges: [1000; 4],
        bumpers: 0,
        wire: false,
        beacon: false,
    };
    let mut sink = Discard;
    svc.start(&mut robot, &mut sink);

    for &b in steps.iter().take(MAX_STEPS) {
        let near = b & 0x10 != 0;
        match b & 0x0F {
            0 => robot.beacon = !robot.beacon,
            1 => robot.wire = !robot.wire,
            2 => robot.tape ^= TapeMask::FRONT,
            3 => robot.tape ^= TapeMask::BACK,
            4..=7 => robot.ranges[usize::from(b & 0x03)] = if near { 100 } else { 900 },
            8..=11 => robot.bumpers ^= 1 << (b & 0x03),
            _ => robot.bumpers = 0,
        }
        let ticks = u32::from(b >> 4) * 97 + 1;
        svc.tick(ticks, &mut robot, &mut sink);

        let mc = svc.controller();
        assert_eq!(mc.context().phase, mc.phase());
        let owner = match mc.phase() {
            Phase::ShootNear => Some(Maneuver::Near),
            Phase::ShootMid => Some(Maneuver::Mid),
            Phase::ShootFar => Some(Maneuver::Far),
            _ => None,
        };
        assert_eq!(mc.active_maneuver().kind(), owner);
    }
});
