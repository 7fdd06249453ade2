//! Concrete phase handlers and table builder.
//!
//! Each phase is three plain `fn` pointers: no closures, no heap.
//! Wheel pairs come from the config and are mirrored by `ctx.side`;
//! "leading" and "trailing" always mean the sensors on the wall side.
//!
//! ```text
//!  Init ─▶ FindBeacon ─[beacon]─▶ FindWall ─[front in]─▶ Pivot ─[rear in]─▶ FollowWall
//!              ▲    └──[fast path: front/rear already in]────────────────────▲   │
//!              │                                             AlignFront ◀────┘   │ tape + creep
//!    [timeouts, pivot bump]                                                      ▼
//!                                     ReverseToWall / AlignRear ◀──[done]── ShootNear
//!                                       │ [front tape off] ─▶ ShootMid ─[done]─┘
//!                                       │ [wire]           ─▶ ShootFar ─[done]─┘
//!                                       │ [rear bump, mid done] ─▶ CollisionReturnRealign ─▶ Reload
//!                                       └ [rear bump]           ─▶ CollisionLeaveRealign (flip side) ─▶ FindWall
//!
//!  Any forward phase ──[front bump]──▶ ReverseToWall / AlignRear (collision recovery)
//!  Reload ──[timer]──▶ FollowWall / AlignFront, or CollisionLeaveRealign after a collision
//! ```

use log::info;

use super::{Mission, Phase, PhaseDescriptor};
use crate::app::ports::MissionIo;
use crate::drive::{WheelPair, drive, spin_launcher};
use crate::events::{Event, RangeChannel, TapeSensor};
use crate::maneuver::{ActiveManeuver, Maneuver};
use crate::timers::TimerId;

// ═══════════════════════════════════════════════════════════════════════════
//  Table builder
// ═══════════════════════════════════════════════════════════════════════════

/// Build the static phase table.  Order must match `Phase as usize`.
pub fn build_phase_table() -> [PhaseDescriptor; Phase::COUNT] {
    [
        PhaseDescriptor {
            id: Phase::Init,
            name: "Init",
            on_enter: None,
            on_exit: None,
            on_event: init_event,
        },
        PhaseDescriptor {
            id: Phase::FindBeacon,
            name: "FindBeacon",
            on_enter: Some(find_beacon_enter),
            on_exit: None,
            on_event: find_beacon_event,
        },
        PhaseDescriptor {
            id: Phase::FindWall,
            name: "FindWall",
            on_enter: Some(find_wall_enter),
            on_exit: None,
            on_event: find_wall_event,
        },
        PhaseDescriptor {
            id: Phase::Pivot,
            name: "Pivot",
            on_enter: Some(pivot_enter),
            on_exit: Some(stop_wall_timeout),
            on_event: pivot_event,
        },
        PhaseDescriptor {
            id: Phase::AlignFront,
            name: "AlignFront",
            on_enter: Some(align_front_enter),
            on_exit: Some(stop_wall_timeout),
            on_event: align_front_event,
        },
        PhaseDescriptor {
            id: Phase::FollowWall,
            name: "FollowWall",
            on_enter: Some(follow_wall_enter),
            on_exit: None,
            on_event: follow_wall_event,
        },
        PhaseDescriptor {
            id: Phase::ShootNear,
            name: "ShootNear",
            on_enter: Some(shoot_near_enter),
            on_exit: Some(shoot_exit),
            on_event: shoot_near_event,
        },
        PhaseDescriptor {
            id: Phase::ReverseToWall,
            name: "ReverseToWall",
            on_enter: Some(reverse_to_wall_enter),
            on_exit: None,
            on_event: reverse_to_wall_event,
        },
        PhaseDescriptor {
            id: Phase::AlignRear,
            name: "AlignRear",
            on_enter: Some(align_rear_enter),
            on_exit: Some(stop_wall_timeout),
            on_event: align_rear_event,
        },
        PhaseDescriptor {
            id: Phase::CollisionLeaveRealign,
            name: "CollisionLeaveRealign",
            on_enter: Some(collision_leave_enter),
            on_exit: None,
            on_event: collision_leave_event,
        },
        PhaseDescriptor {
            id: Phase::CollisionReturnRealign,
            name: "CollisionReturnRealign",
            on_enter: Some(collision_return_enter),
            on_exit: None,
            on_event: collision_return_event,
        },
        PhaseDescriptor {
            id: Phase::ShootMid,
            name: "ShootMid",
            on_enter: Some(shoot_mid_enter),
            on_exit: Some(shoot_exit),
            on_event: shoot_mid_event,
        },
        PhaseDescriptor {
            id: Phase::ShootFar,
            name: "ShootFar",
            on_enter: Some(shoot_far_enter),
            on_exit: Some(shoot_exit),
            on_event: shoot_far_event,
        },
        PhaseDescriptor {
            id: Phase::Reload,
            name: "Reload",
            on_enter: Some(reload_enter),
            on_exit: None,
            on_event: reload_event,
        },
    ]
}

// ═══════════════════════════════════════════════════════════════════════════
//  Shared helpers
// ═══════════════════════════════════════════════════════════════════════════

fn go(m: &Mission, io: &mut dyn MissionIo, pair: WheelPair) {
    drive(io, m.ctx.side, pair);
}

fn in_range(m: &Mission, io: &mut dyn MissionIo, channel: RangeChannel) -> bool {
    io.read_range(channel) < m.config.sensors.range_near_threshold
}

fn leading_in_range(m: &Mission, io: &mut dyn MissionIo) -> bool {
    in_range(m, io, m.ctx.side.leading_sensor())
}

fn trailing_in_range(m: &Mission, io: &mut dyn MissionIo) -> bool {
    in_range(m, io, m.ctx.side.trailing_sensor())
}

fn stop_wall_timeout(_m: &mut Mission, io: &mut dyn MissionIo) {
    io.stop_timer(TimerId::WallTimeout);
}

/// The leading sensor has the wall: settle onto it directly if the
/// trailing sensor has it too, otherwise pivot.
fn settle_on_wall(m: &Mission, io: &mut dyn MissionIo) -> Phase {
    if trailing_in_range(m, io) {
        Phase::FollowWall
    } else {
        Phase::Pivot
    }
}

/// Pick how to start reversing from the live trailing sensor.
fn reverse_direction(m: &mut Mission, io: &mut dyn MissionIo) -> Phase {
    if trailing_in_range(m, io) {
        Phase::ReverseToWall
    } else {
        m.ctx.last_phase = Phase::ReverseToWall;
        Phase::AlignRear
    }
}

/// Unexpected front contact while driving forward.
fn collision_recovery(m: &mut Mission, io: &mut dyn MissionIo) -> Option<Phase> {
    info!("front collision, reversing");
    io.stop_timer(TimerId::MoveForward);
    m.ctx.collision_detected = true;
    Some(reverse_direction(m, io))
}

/// Tape trigger, creep expiry, and front bumps: shared by the forward
/// wall-following phases.
fn forward_common(m: &mut Mission, event: &Event, io: &mut dyn MissionIo) -> Option<Phase> {
    match *event {
        Event::TapeTripped(TapeSensor::Back) if m.ctx.tape_armed && !m.ctx.near_done => {
            info!("back tape: creeping to the near shot");
            m.ctx.tape_armed = false;
            io.start_timer(TimerId::MoveForward, m.config.timing.creep_ticks);
            None
        }
        Event::Timeout(TimerId::MoveForward) => Some(Phase::ShootNear),
        Event::Bumped(mask) if mask.any_front() => collision_recovery(m, io),
        _ => None,
    }
}

/// Mid/far triggers and rear bumps: shared by the reversing phases.
fn reverse_common(m: &mut Mission, event: &Event, _io: &mut dyn MissionIo) -> Option<Phase> {
    match *event {
        Event::TapeUntripped(TapeSensor::Front) if m.ctx.near_done && !m.ctx.mid_done => {
            Some(Phase::ShootMid)
        }
        Event::OnWire if m.ctx.mid_done && !m.ctx.far_done && m.config.far.enabled => {
            Some(Phase::ShootFar)
        }
        Event::Bumped(mask) if mask.any_back() => {
            if m.ctx.mid_done {
                Some(Phase::CollisionReturnRealign)
            } else {
                m.ctx.side = m.ctx.side.flip();
                m.ctx.collision_detected = true;
                info!("rear collision, mirroring mission to {:?}", m.ctx.side);
                Some(Phase::CollisionLeaveRealign)
            }
        }
        _ => None,
    }
}

/// Forward to the active maneuver; on completion mark it and reverse.
fn delegate_shot(m: &mut Mission, event: &Event, io: &mut dyn MissionIo) -> Option<Phase> {
    let Some(Event::ManeuverDone(kind)) = m.active.run(event, m.ctx.side, &m.config, io) else {
        return None;
    };
    match kind {
        Maneuver::Near => m.ctx.near_done = true,
        Maneuver::Mid => m.ctx.mid_done = true,
        Maneuver::Far => m.ctx.far_done = true,
    }
    m.completed = Some(kind);
    Some(reverse_direction(m, io))
}

fn shoot_exit(m: &mut Mission, _io: &mut dyn MissionIo) {
    m.active = ActiveManeuver::None;
}

// ═══════════════════════════════════════════════════════════════════════════
//  INIT
// ═══════════════════════════════════════════════════════════════════════════

fn init_event(_m: &mut Mission, _event: &Event, _io: &mut dyn MissionIo) -> Option<Phase> {
    Some(Phase::FindBeacon)
}

// ═══════════════════════════════════════════════════════════════════════════
//  FIND BEACON: spin in place; the safe restart point
// ═══════════════════════════════════════════════════════════════════════════

fn find_beacon_enter(m: &mut Mission, io: &mut dyn MissionIo) {
    m.ctx.reset_lap();
    m.ctx.collision_detected = false;
    for id in [
        TimerId::GuideTape,
        TimerId::MoveForward,
        TimerId::WallTimeout,
        TimerId::Realign,
    ] {
        io.stop_timer(id);
    }
    go(m, io, m.config.speeds.spin);
}

fn find_beacon_event(m: &mut Mission, event: &Event, io: &mut dyn MissionIo) -> Option<Phase> {
    if *event != Event::BeaconPresent {
        return None;
    }
    io.start_timer(TimerId::GuideTape, m.config.timing.guide_tape_ticks);
    spin_launcher(io, m.config.speeds.launcher);
    go(m, io, m.config.speeds.creep);

    if leading_in_range(m, io) {
        info!("beacon found, wall already close");
        Some(settle_on_wall(m, io))
    } else {
        Some(Phase::FindWall)
    }
}

// ═══════════════════════════════════════════════════════════════════════════
//  FIND WALL
// ═══════════════════════════════════════════════════════════════════════════

fn find_wall_enter(m: &mut Mission, io: &mut dyn MissionIo) {
    go(m, io, m.config.speeds.find_wall);
}

fn find_wall_event(m: &mut Mission, event: &Event, io: &mut dyn MissionIo) -> Option<Phase> {
    match *event {
        Event::WallInRange(ch) if ch == m.ctx.side.leading_sensor() => Some(settle_on_wall(m, io)),
        Event::Bumped(mask) if mask.any_front() => collision_recovery(m, io),
        _ => None,
    }
}

// ═══════════════════════════════════════════════════════════════════════════
//  PIVOT: rotate until the trailing sensor has the wall
// ═══════════════════════════════════════════════════════════════════════════

fn pivot_enter(m: &mut Mission, io: &mut dyn MissionIo) {
    m.ctx.clear_latches();
    go(m, io, m.config.speeds.pivot);
    io.start_timer(TimerId::WallTimeout, m.config.timing.wall_timeout_ticks);
}

fn pivot_event(m: &mut Mission, event: &Event, _io: &mut dyn MissionIo) -> Option<Phase> {
    match *event {
        Event::WallFar(ch) if ch == m.ctx.side.leading_sensor() => {
            m.ctx.set_front_seen();
            None
        }
        Event::WallInRange(ch) if ch == m.ctx.side.trailing_sensor() => {
            if m.ctx.front_seen() {
                // Overshot: nose has swung off the wall.
                m.ctx.last_phase = Phase::FollowWall;
                Some(Phase::AlignFront)
            } else {
                Some(Phase::FollowWall)
            }
        }
        Event::Bumped(mask) if mask.any() => {
            info!("pivot: bumped, restarting");
            Some(Phase::FindBeacon)
        }
        Event::Timeout(TimerId::WallTimeout) => {
            info!("pivot: wall not acquired, restarting");
            Some(Phase::FindBeacon)
        }
        _ => None,
    }
}

// ═══════════════════════════════════════════════════════════════════════════
//  ALIGN FRONT: swing the nose back to the wall
// ═══════════════════════════════════════════════════════════════════════════

fn align_front_enter(m: &mut Mission, io: &mut dyn MissionIo) {
    go(m, io, m.config.speeds.align_front);
    io.start_timer(TimerId::WallTimeout, m.config.timing.wall_timeout_ticks);
}

fn align_front_event(m: &mut Mission, event: &Event, io: &mut dyn MissionIo) -> Option<Phase> {
    match *event {
        Event::WallInRange(ch) if ch == m.ctx.side.leading_sensor() => Some(m.ctx.last_phase),
        Event::Timeout(TimerId::WallTimeout) => Some(Phase::FindBeacon),
        _ => forward_common(m, event, io),
    }
}

// ═══════════════════════════════════════════════════════════════════════════
//  FOLLOW WALL
// ═══════════════════════════════════════════════════════════════════════════

fn follow_wall_enter(m: &mut Mission, io: &mut dyn MissionIo) {
    go(m, io, m.config.speeds.follow);
}

fn follow_wall_event(m: &mut Mission, event: &Event, io: &mut dyn MissionIo) -> Option<Phase> {
    match *event {
        Event::WallFar(ch) if ch == m.ctx.side.leading_sensor() => {
            m.ctx.last_phase = Phase::FollowWall;
            Some(Phase::AlignFront)
        }
        _ => forward_common(m, event, io),
    }
}

// ═══════════════════════════════════════════════════════════════════════════
//  SHOOT NEAR / MID / FAR: delegate to the maneuver
// ═══════════════════════════════════════════════════════════════════════════

fn shoot_near_enter(m: &mut Mission, io: &mut dyn MissionIo) {
    go(m, io, WheelPair::STOP);
    spin_launcher(io, m.config.speeds.launcher);
    m.active = ActiveManeuver::begin(Maneuver::Near, &m.config, io);
}

fn shoot_near_event(m: &mut Mission, event: &Event, io: &mut dyn MissionIo) -> Option<Phase> {
    delegate_shot(m, event, io)
}

fn shoot_mid_enter(m: &mut Mission, io: &mut dyn MissionIo) {
    go(m, io, WheelPair::STOP);
    spin_launcher(io, m.config.speeds.launcher);
    m.active = ActiveManeuver::begin(Maneuver::Mid, &m.config, io);
}

fn shoot_mid_event(m: &mut Mission, event: &Event, io: &mut dyn MissionIo) -> Option<Phase> {
    delegate_shot(m, event, io)
}

fn shoot_far_enter(m: &mut Mission, io: &mut dyn MissionIo) {
    go(m, io, m.config.speeds.reverse_creep);
    spin_launcher(io, m.config.speeds.launcher);
    io.start_timer(TimerId::MoveForward, m.config.timing.creep_ticks);
    m.active = ActiveManeuver::begin(Maneuver::Far, &m.config, io);
}

fn shoot_far_event(m: &mut Mission, event: &Event, io: &mut dyn MissionIo) -> Option<Phase> {
    delegate_shot(m, event, io)
}

// ═══════════════════════════════════════════════════════════════════════════
//  REVERSE TO WALL / ALIGN REAR
// ═══════════════════════════════════════════════════════════════════════════

fn reverse_to_wall_enter(m: &mut Mission, io: &mut dyn MissionIo) {
    go(m, io, m.config.speeds.reverse);
}

fn reverse_to_wall_event(m: &mut Mission, event: &Event, io: &mut dyn MissionIo) -> Option<Phase> {
    match *event {
        Event::WallFar(ch) if ch == m.ctx.side.trailing_sensor() => {
            m.ctx.last_phase = Phase::ReverseToWall;
            Some(Phase::AlignRear)
        }
        _ => reverse_common(m, event, io),
    }
}

fn align_rear_enter(m: &mut Mission, io: &mut dyn MissionIo) {
    go(m, io, m.config.speeds.align_rear);
    io.start_timer(TimerId::WallTimeout, m.config.timing.wall_timeout_ticks);
}

fn align_rear_event(m: &mut Mission, event: &Event, io: &mut dyn MissionIo) -> Option<Phase> {
    match *event {
        Event::WallInRange(ch) if ch == m.ctx.side.trailing_sensor() => Some(m.ctx.last_phase),
        Event::Timeout(TimerId::WallTimeout) => Some(Phase::FindBeacon),
        _ => reverse_common(m, event, io),
    }
}

// ═══════════════════════════════════════════════════════════════════════════
//  COLLISION REALIGN: leave spins onto the new side, return creeps off
// ═══════════════════════════════════════════════════════════════════════════

fn collision_leave_enter(m: &mut Mission, io: &mut dyn MissionIo) {
    go(m, io, m.config.speeds.spin);
    io.start_timer(TimerId::Realign, m.config.timing.realign_ticks);
}

fn collision_leave_event(_m: &mut Mission, event: &Event, _io: &mut dyn MissionIo) -> Option<Phase> {
    (*event == Event::Timeout(TimerId::Realign)).then_some(Phase::FindWall)
}

fn collision_return_enter(m: &mut Mission, io: &mut dyn MissionIo) {
    go(m, io, m.config.speeds.creep);
    io.start_timer(TimerId::Realign, m.config.timing.realign_ticks);
}

fn collision_return_event(_m: &mut Mission, event: &Event, _io: &mut dyn MissionIo) -> Option<Phase> {
    (*event == Event::Timeout(TimerId::Realign)).then_some(Phase::Reload)
}

// ═══════════════════════════════════════════════════════════════════════════
//  RELOAD: hold, keep the launcher spinning, then start the next lap
// ═══════════════════════════════════════════════════════════════════════════

fn reload_enter(m: &mut Mission, io: &mut dyn MissionIo) {
    go(m, io, WheelPair::STOP);
    spin_launcher(io, m.config.speeds.launcher);
    io.start_timer(TimerId::Reload, m.config.timing.reload_ticks);
}

fn reload_event(m: &mut Mission, event: &Event, io: &mut dyn MissionIo) -> Option<Phase> {
    if *event != Event::Timeout(TimerId::Reload) {
        return None;
    }

    m.ctx.reset_lap();
    for id in [
        TimerId::MoveForward,
        TimerId::WallTimeout,
        TimerId::Realign,
        TimerId::GuideTape,
    ] {
        io.stop_timer(id);
    }
    io.start_timer(TimerId::GuideTape, m.config.timing.guide_tape_ticks);

    if m.ctx.collision_detected {
        info!("reload: collision this lap, realigning on {:?}", m.ctx.side);
        m.ctx.collision_detected = false;
        return Some(Phase::CollisionLeaveRealign);
    }
    if leading_in_range(m, io) {
        Some(Phase::FollowWall)
    } else {
        m.ctx.last_phase = Phase::FollowWall;
        Some(Phase::AlignFront)
    }
}
