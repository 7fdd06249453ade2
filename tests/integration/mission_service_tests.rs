//! Integration tests: MissionService → controller → maneuvers → actuators.
//!
//! Everything is driven through elapsed ticks and scripted sensor
//! readings, exactly as on the robot: no event is injected by hand.

use super::mock_hw::{LogSink, MockRobot};

use hoopbot::app::events::MissionEvent;
use hoopbot::app::ports::ReleaseGate;
use hoopbot::app::service::MissionService;
use hoopbot::config::MissionConfig;
use hoopbot::drive::{Side, WheelPair};
use hoopbot::events::{BumperMask, TapeMask};
use hoopbot::fsm::Phase;
use hoopbot::maneuver::Maneuver;
use hoopbot::timers::TimerId;

const IN: u16 = 100;

struct Rig {
    svc: MissionService,
    hw: MockRobot,
    sink: LogSink,
}

impl Rig {
    fn new(config: MissionConfig, side: Side) -> Self {
        let mut rig = Self {
            svc: MissionService::new(config).expect("valid config"),
            hw: MockRobot::new(side),
            sink: LogSink::new(),
        };
        rig.svc.start(&mut rig.hw, &mut rig.sink);
        rig
    }

    fn run(&mut self, ticks: u32) {
        self.svc.tick(ticks, &mut self.hw, &mut self.sink);
    }

    /// Right-side start up to wall following with the guide tape armed.
    fn to_follow_wall(config: MissionConfig) -> Self {
        let mut rig = Self::new(config, Side::Right);
        rig.run(3);
        rig.hw.beacon = true;
        rig.run(3);
        assert_eq!(rig.svc.phase(), Phase::FindWall);

        rig.hw.front_right = IN;
        rig.run(3);
        assert_eq!(rig.svc.phase(), Phase::Pivot);

        rig.hw.right = IN;
        rig.run(3);
        assert_eq!(rig.svc.phase(), Phase::FollowWall);

        rig.run(2000);
        assert!(rig.svc.context().tape_armed);
        rig
    }

    /// Through the near shot and back to reversing.
    fn past_near_shot(config: MissionConfig) -> Self {
        let mut rig = Self::to_follow_wall(config);
        rig.hw.tape = TapeMask(TapeMask::BACK);
        rig.run(3);
        rig.hw.tape = TapeMask::default();
        assert_eq!(rig.svc.timer_remaining(TimerId::MoveForward).map(|t| t > 490), Some(true));

        rig.run(500);
        assert_eq!(rig.svc.phase(), Phase::ShootNear);

        rig.run(4000);
        assert_eq!(rig.svc.phase(), Phase::ReverseToWall);
        rig
    }

    /// Through the mid shot and back to reversing.
    fn past_mid_shot(config: MissionConfig) -> Self {
        let mut rig = Self::past_near_shot(config);
        rig.hw.tape = TapeMask(TapeMask::FRONT);
        rig.run(3);
        rig.hw.tape = TapeMask::default();
        rig.run(3);
        assert_eq!(rig.svc.phase(), Phase::ShootMid);

        rig.run(1500);
        assert_eq!(rig.svc.phase(), Phase::ReverseToWall);
        rig
    }
}

// ── Start-up ──────────────────────────────────────────────────

#[test]
fn start_spins_looking_for_beacon() {
    let rig = Rig::new(MissionConfig::default(), Side::Right);
    assert_eq!(rig.svc.phase(), Phase::FindBeacon);
    assert_eq!(rig.hw.wheels, WheelPair::new(1000, -1000));
    assert_eq!(rig.hw.gate, ReleaseGate::Closed);
    assert_eq!(
        rig.sink.events.first(),
        Some(&MissionEvent::Started { side: Side::Right })
    );
}

#[test]
fn left_start_mirrors_search() {
    let mut rig = Rig::new(MissionConfig::default(), Side::Left);
    assert_eq!(rig.hw.wheels, WheelPair::new(-1000, 1000));
    rig.hw.beacon = true;
    rig.run(6);
    assert_eq!(rig.svc.phase(), Phase::FindWall);
    assert_eq!(rig.hw.wheels, WheelPair::new(250, 500));
}

// ── Full lap ──────────────────────────────────────────────────

#[test]
fn wall_acquisition_sequence() {
    let rig = Rig::to_follow_wall(MissionConfig::default());
    assert_eq!(rig.hw.wheels, WheelPair::new(400, 1000));
    assert_eq!(
        rig.sink.phases(),
        vec![
            Phase::FindBeacon,
            Phase::FindWall,
            Phase::Pivot,
            Phase::FollowWall
        ]
    );
}

#[test]
fn back_tape_before_arming_is_ignored() {
    let mut rig = Rig::new(MissionConfig::default(), Side::Right);
    rig.hw.front_right = IN;
    rig.hw.right = IN;
    rig.hw.beacon = true;
    rig.run(6);
    assert_eq!(rig.svc.phase(), Phase::FollowWall);

    rig.hw.tape = TapeMask(TapeMask::BACK);
    rig.run(600);
    assert_eq!(rig.svc.phase(), Phase::FollowWall);
    assert_eq!(rig.svc.timer_remaining(TimerId::MoveForward), None);
}

#[test]
fn near_shot_fires_twice() {
    let rig = Rig::past_near_shot(MissionConfig::default());
    assert_eq!(rig.hw.gate_opens(), 2);
    assert_eq!(rig.hw.gate, ReleaseGate::Closed);
    assert!(rig.sink.contains(&MissionEvent::ManeuverCompleted(Maneuver::Near)));
    assert!(rig.svc.context().near_done);
    assert_eq!(rig.hw.wheels, WheelPair::new(-300, -500));
}

#[test]
fn mid_shot_fires_once() {
    let rig = Rig::past_mid_shot(MissionConfig::default());
    assert_eq!(rig.hw.gate_opens(), 3);
    assert!(rig.sink.contains(&MissionEvent::ManeuverCompleted(Maneuver::Mid)));
    assert!(rig.svc.context().mid_done);
}

#[test]
fn lap_ends_in_reload_and_restarts() {
    let mut rig = Rig::past_mid_shot(MissionConfig::default());

    rig.hw.bumpers = BumperMask(BumperMask::BACK_RIGHT);
    rig.run(30);
    assert_eq!(rig.svc.phase(), Phase::CollisionReturnRealign);
    assert_eq!(rig.hw.wheels, WheelPair::new(500, 500));
    rig.hw.bumpers = BumperMask::NONE;

    rig.run(800);
    assert_eq!(rig.svc.phase(), Phase::Reload);
    assert_eq!(rig.hw.wheels, WheelPair::STOP);

    rig.run(4000);
    assert_eq!(rig.svc.phase(), Phase::FollowWall);
    let ctx = rig.svc.context();
    assert!(ctx.lap_flags_clear());
    assert_eq!(ctx.side, Side::Right);
    assert!(rig.svc.timer_remaining(TimerId::GuideTape).is_some());
    assert_eq!(rig.svc.dropped_events(), 0);
}

#[test]
fn far_shot_runs_when_enabled() {
    let mut config = MissionConfig::default();
    config.far.enabled = true;
    let mut rig = Rig::past_mid_shot(config);

    rig.hw.wire = true;
    rig.run(15);
    assert_eq!(rig.svc.phase(), Phase::ShootFar);
    assert_eq!(rig.hw.wheels, WheelPair::new(-500, -500));

    rig.run(2100);
    assert!(rig.sink.contains(&MissionEvent::ManeuverCompleted(Maneuver::Far)));
    assert!(rig.svc.context().far_done);
    assert_eq!(rig.svc.phase(), Phase::ReverseToWall);
    assert_eq!(rig.hw.gate_opens(), 4);
}

#[test]
fn wire_is_ignored_when_far_disabled() {
    let mut rig = Rig::past_mid_shot(MissionConfig::default());
    rig.hw.wire = true;
    rig.run(30);
    assert_eq!(rig.svc.phase(), Phase::ReverseToWall);
}

// ── Collisions ────────────────────────────────────────────────

#[test]
fn rear_bump_before_mid_flips_to_other_wall() {
    let mut rig = Rig::new(MissionConfig::default(), Side::Left);
    rig.hw.beacon = true;
    rig.run(6);
    assert_eq!(rig.svc.phase(), Phase::FindWall);

    rig.hw.left = IN;
    rig.hw.bumpers = BumperMask(BumperMask::FRONT_LEFT);
    rig.run(30);
    assert_eq!(rig.svc.phase(), Phase::ReverseToWall);
    assert_eq!(rig.hw.wheels, WheelPair::new(-500, -300));

    rig.hw.bumpers = BumperMask(BumperMask::BACK_LEFT);
    rig.run(30);
    assert_eq!(rig.svc.phase(), Phase::CollisionLeaveRealign);
    assert!(rig.sink.contains(&MissionEvent::SideFlipped(Side::Right)));
    rig.hw.bumpers = BumperMask::NONE;

    rig.run(800);
    assert_eq!(rig.svc.phase(), Phase::FindWall);
    assert_eq!(rig.hw.wheels, WheelPair::new(500, 250));
}

#[test]
fn pivot_timeout_restarts_search() {
    let mut rig = Rig::new(MissionConfig::default(), Side::Right);
    rig.hw.beacon = true;
    rig.run(6);
    rig.hw.front_right = IN;
    rig.run(3);
    assert_eq!(rig.svc.phase(), Phase::Pivot);

    rig.run(3010);
    assert_eq!(rig.svc.phase(), Phase::FindBeacon);
    assert!(!rig.svc.context().tape_armed);
}
