//! Function-pointer mission state machine.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │  PhaseTable                                                    │
//! │  ┌──────────────┬──────────────┬──────────────┬──────────────┐ │
//! │  │ Phase        │ on_enter     │ on_exit      │ on_event     │ │
//! │  ├──────────────┼──────────────┼──────────────┼──────────────┤ │
//! │  │ FindBeacon   │ fn(m, io)    │ —            │ fn(m,e,io)→? │ │
//! │  │ Pivot        │ fn(m, io)    │ fn(m, io)    │ fn(m,e,io)→? │ │
//! │  │ ShootNear    │ fn(m, io)    │ fn(m, io)    │ fn(m,e,io)→? │ │
//! │  │ …            │              │              │              │ │
//! │  └──────────────┴──────────────┴──────────────┴──────────────┘ │
//! └────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every dispatched event goes to `on_event` of the **current** phase.
//! If it returns `Some(next)`, the engine runs `on_exit` for the current
//! phase, then `on_enter` for the next.  Handlers receive the
//! [`Mission`] (context, config, active maneuver) and the port bundle.
//!
//! Two events are handled before the table in every phase: the sensor
//! poll timer (poll the detector, re-arm) and the guide-tape timer
//! (arm the back-tape trigger).

pub mod context;
pub mod states;

use log::{debug, info};

use crate::app::ports::{MissionIo, ReleaseGate};
use crate::config::MissionConfig;
use crate::drive::Side;
use crate::events::Event;
use crate::maneuver::{ActiveManeuver, Maneuver};
use crate::sensors::SensorEventDetector;
use crate::timers::TimerId;
use context::MissionContext;

// ---------------------------------------------------------------------------
// Phase identity
// ---------------------------------------------------------------------------

/// Top-level mission phases.
/// Must stay in sync with the table built in [`states::build_phase_table`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Phase {
    Init = 0,
    FindBeacon = 1,
    FindWall = 2,
    Pivot = 3,
    AlignFront = 4,
    FollowWall = 5,
    ShootNear = 6,
    ReverseToWall = 7,
    AlignRear = 8,
    CollisionLeaveRealign = 9,
    CollisionReturnRealign = 10,
    ShootMid = 11,
    ShootFar = 12,
    Reload = 13,
}

impl Phase {
    pub const COUNT: usize = 14;

    pub const ALL: [Self; Self::COUNT] = [
        Self::Init,
        Self::FindBeacon,
        Self::FindWall,
        Self::Pivot,
        Self::AlignFront,
        Self::FollowWall,
        Self::ShootNear,
        Self::ReverseToWall,
        Self::AlignRear,
        Self::CollisionLeaveRealign,
        Self::CollisionReturnRealign,
        Self::ShootMid,
        Self::ShootFar,
        Self::Reload,
    ];

    /// Convert an index back to `Phase`.  Out-of-range asserts in debug
    /// builds and falls back to `FindBeacon`, the safe restart point.
    pub fn from_index(idx: usize) -> Self {
        Self::ALL.get(idx).copied().unwrap_or_else(|| {
            debug_assert!(false, "invalid phase index: {idx}");
            Self::FindBeacon
        })
    }

    pub fn is_shooting(self) -> bool {
        matches!(self, Self::ShootNear | Self::ShootMid | Self::ShootFar)
    }
}

// ---------------------------------------------------------------------------
// Handler data and function-pointer types
// ---------------------------------------------------------------------------

/// Everything a phase handler may read or write.
pub struct Mission {
    pub ctx: MissionContext,
    pub config: MissionConfig,
    /// Sub-machine owned by the current shoot phase.
    pub active: ActiveManeuver,
    /// Set by a shoot phase when its maneuver hands back control.
    pub completed: Option<Maneuver>,
}

/// Signature for `on_enter` and `on_exit` actions.
pub type PhaseActionFn = fn(&mut Mission, &mut dyn MissionIo);

/// Signature for the event handler.
/// Returns `Some(next)` to trigger a transition, or `None` to stay.
pub type PhaseEventFn = fn(&mut Mission, &Event, &mut dyn MissionIo) -> Option<Phase>;

/// Static descriptor for a single phase.
pub struct PhaseDescriptor {
    pub id: Phase,
    pub name: &'static str,
    pub on_enter: Option<PhaseActionFn>,
    pub on_exit: Option<PhaseActionFn>,
    pub on_event: PhaseEventFn,
}

// ---------------------------------------------------------------------------
// FSM engine
// ---------------------------------------------------------------------------

pub struct Fsm {
    /// Fixed-size table indexed by `Phase as usize`.
    table: [PhaseDescriptor; Phase::COUNT],
    current: usize,
    transitions: u32,
}

impl Fsm {
    pub fn new(table: [PhaseDescriptor; Phase::COUNT], initial: Phase) -> Self {
        Self {
            table,
            current: initial as usize,
            transitions: 0,
        }
    }

    /// Run the initial `on_enter`.  Call once before the first dispatch.
    pub fn start(&mut self, m: &mut Mission, io: &mut dyn MissionIo) {
        info!("mission starting in phase: {}", self.table[self.current].name);
        m.ctx.phase = self.current_phase();
        if let Some(enter) = self.table[self.current].on_enter {
            enter(m, io);
        }
    }

    /// Hand `event` to the current phase and follow any transition.
    pub fn dispatch(&mut self, m: &mut Mission, event: &Event, io: &mut dyn MissionIo) {
        if let Some(next) = (self.table[self.current].on_event)(m, event, io) {
            self.transition(next, m, io);
        }
    }

    /// Jump to `next` regardless of the current phase's handler.
    pub fn force_transition(&mut self, next: Phase, m: &mut Mission, io: &mut dyn MissionIo) {
        if next as usize != self.current {
            self.transition(next, m, io);
        }
    }

    pub fn current_phase(&self) -> Phase {
        Phase::from_index(self.current)
    }

    pub fn name(&self, phase: Phase) -> &'static str {
        self.table[phase as usize].name
    }

    /// Transitions taken since construction.
    pub fn transitions(&self) -> u32 {
        self.transitions
    }

    fn transition(&mut self, next: Phase, m: &mut Mission, io: &mut dyn MissionIo) {
        let next_idx = next as usize;
        info!(
            "mission transition: {} -> {}",
            self.table[self.current].name, self.table[next_idx].name
        );

        if let Some(exit) = self.table[self.current].on_exit {
            exit(m, io);
        }

        self.current = next_idx;
        self.transitions = self.transitions.wrapping_add(1);
        m.ctx.phase = next;

        if let Some(enter) = self.table[self.current].on_enter {
            enter(m, io);
        }
    }
}

// ---------------------------------------------------------------------------
// Mission controller
// ---------------------------------------------------------------------------

/// Top-level controller: engine, mission data, and the sensor detector.
pub struct MissionController {
    fsm: Fsm,
    mission: Mission,
    detector: SensorEventDetector,
}

impl MissionController {
    /// Build the controller.  `side` is provisional until [`start`](Self::start)
    /// samples the selector.
    pub fn new(config: MissionConfig, side: Side) -> Self {
        let detector = SensorEventDetector::new(&config.sensors);
        Self {
            fsm: Fsm::new(states::build_phase_table(), Phase::Init),
            mission: Mission {
                ctx: MissionContext::new(side),
                config,
                active: ActiveManeuver::None,
                completed: None,
            },
            detector,
        }
    }

    /// Sample the side selector, close the gate, start polling, and post
    /// `Event::Init`.
    pub fn start(&mut self, io: &mut dyn MissionIo) {
        let side = io.read_side_selector();
        self.mission.ctx = MissionContext::new(side);
        io.set_release(ReleaseGate::Closed);
        io.start_timer(TimerId::SensorPoll, self.mission.config.sensors.poll_period_ticks);
        self.fsm.start(&mut self.mission, io);
        io.post(Event::Init);
        info!("mission armed, side={:?}", side);
    }

    /// Process one dequeued event.  Returns the maneuver that completed
    /// while handling it, if any.
    pub fn handle(&mut self, event: &Event, io: &mut dyn MissionIo) -> Option<Maneuver> {
        match event {
            Event::Timeout(TimerId::SensorPoll) => {
                io.start_timer(TimerId::SensorPoll, self.mission.config.sensors.poll_period_ticks);
                self.detector.poll(io);
                return None;
            }
            Event::Timeout(TimerId::GuideTape) => {
                debug!("guide tape armed");
                self.mission.ctx.tape_armed = true;
                return None;
            }
            _ => {}
        }

        self.fsm.dispatch(&mut self.mission, event, io);
        self.mission.completed.take()
    }

    pub fn phase(&self) -> Phase {
        self.fsm.current_phase()
    }

    pub fn phase_name(&self) -> &'static str {
        self.fsm.name(self.phase())
    }

    pub fn context(&self) -> &MissionContext {
        &self.mission.ctx
    }

    pub fn config(&self) -> &MissionConfig {
        &self.mission.config
    }

    pub fn active_maneuver(&self) -> &ActiveManeuver {
        &self.mission.active
    }

    pub fn transitions(&self) -> u32 {
        self.fsm.transitions()
    }

    /// Jump straight to `phase`, running exit/enter actions.
    pub fn force_phase(&mut self, phase: Phase, io: &mut dyn MissionIo) {
        self.fsm.force_transition(phase, &mut self.mission, io);
    }

    /// Mutable context access for test setup.
    #[cfg(test)]
    pub(crate) fn context_mut(&mut self) -> &mut MissionContext {
        &mut self.mission.ctx
    }
}
