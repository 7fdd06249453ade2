//! Aim-and-shoot sub-machines.
//!
//! Each maneuver turns the chassis toward a hoop, opens the release gate,
//! turns back, and hands control to the mission controller by returning
//! `Event::ManeuverDone`.  The controller holds at most one of them at a
//! time in an [`ActiveManeuver`] and forwards every event to it.
//!
//! ```text
//!  Init ──start──▶ Settle ──settle timer──▶ Turn ──turn timer──▶ Shooting
//!    ▲                                                   │ shot timer
//!    └──── ManeuverDone ◀──turn-back timer──── TurnBack ◀┘
//! ```
//!
//! On entry the parent holds the chassis (stopped, or creeping backwards
//! for the far shot) and the maneuver waits in `Settle` before turning.
//! A maneuver reads the mission `side` (passed in on every call) but never
//! writes mission state.

pub mod far;
pub mod mid;
pub mod near;

use log::info;

use crate::app::ports::{MissionIo, ReleaseGate};
use crate::config::{MissionConfig, TimingConfig};
use crate::drive::Side;
use crate::events::Event;
use crate::timers::TimerId;
use far::FarShot;
use mid::MidShot;
use near::NearShot;

/// Which scoring maneuver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Maneuver {
    Near,
    Mid,
    Far,
}

/// Private phase of a maneuver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShotPhase {
    Init,
    /// Waiting for the chassis to settle (far: for the parent's creep).
    Settle,
    Turn,
    Shooting,
    TurnBack,
}

/// The sub-machine owned by the current shoot phase, if any.
#[derive(Debug, Default)]
pub enum ActiveManeuver {
    #[default]
    None,
    Near(NearShot),
    Mid(MidShot),
    Far(FarShot),
}

impl ActiveManeuver {
    /// Build `kind` and move it out of `Init`.
    pub fn begin(kind: Maneuver, config: &MissionConfig, io: &mut dyn MissionIo) -> Self {
        info!("maneuver {:?}: start", kind);
        match kind {
            Maneuver::Near => {
                let mut shot = NearShot::new();
                shot.start(config, io);
                Self::Near(shot)
            }
            Maneuver::Mid => {
                let mut shot = MidShot::new();
                shot.start(config, io);
                Self::Mid(shot)
            }
            Maneuver::Far => {
                let mut shot = FarShot::new();
                shot.start();
                Self::Far(shot)
            }
        }
    }

    pub fn kind(&self) -> Option<Maneuver> {
        match self {
            Self::None => None,
            Self::Near(_) => Some(Maneuver::Near),
            Self::Mid(_) => Some(Maneuver::Mid),
            Self::Far(_) => Some(Maneuver::Far),
        }
    }

    pub fn phase(&self) -> Option<ShotPhase> {
        match self {
            Self::None => None,
            Self::Near(s) => Some(s.phase()),
            Self::Mid(s) => Some(s.phase()),
            Self::Far(s) => Some(s.phase()),
        }
    }

    /// Forward one event.  Returns `Some(Event::ManeuverDone(_))` exactly
    /// once, when the turn back finishes.
    pub fn run(
        &mut self,
        event: &Event,
        side: Side,
        config: &MissionConfig,
        io: &mut dyn MissionIo,
    ) -> Option<Event> {
        let done = match self {
            Self::None => None,
            Self::Near(s) => s.run(event, side, config, io),
            Self::Mid(s) => s.run(event, side, config, io),
            Self::Far(s) => s.run(event, side, config, io),
        };
        if let Some(Event::ManeuverDone(kind)) = done {
            info!("maneuver {:?}: complete", kind);
        }
        done
    }
}

// ── Release gate helpers shared by all maneuvers ──────────────

/// Open the gate and start both the hold and the total-shot timers.
pub(crate) fn open_gate(io: &mut dyn MissionIo, timing: &TimingConfig) {
    io.set_release(ReleaseGate::Open);
    io.start_timer(TimerId::BallRelease, timing.release_hold_ticks);
    io.start_timer(TimerId::Shot, timing.shot_ticks);
}

pub(crate) fn close_gate(io: &mut dyn MissionIo) {
    io.set_release(ReleaseGate::Closed);
}
