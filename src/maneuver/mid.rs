//! Mid shot: single shot with a sensed turn length.
//!
//! If the trailing range sensor already reads closer than the "close"
//! threshold, the robot is nearly square to the hoop and only a short
//! turn is needed.

use log::info;

use super::{ShotPhase, close_gate, open_gate};
use crate::app::ports::MissionIo;
use crate::config::MissionConfig;
use crate::drive::{Side, WheelPair, drive};
use crate::events::Event;
use crate::maneuver::Maneuver;
use crate::timers::TimerId;

#[derive(Debug)]
pub struct MidShot {
    phase: ShotPhase,
    turn_ticks: u32,
}

impl MidShot {
    pub fn new() -> Self {
        Self {
            phase: ShotPhase::Init,
            turn_ticks: 0,
        }
    }

    pub fn phase(&self) -> ShotPhase {
        self.phase
    }

    /// Reset and hold still for the settle time.
    pub fn start(&mut self, config: &MissionConfig, io: &mut dyn MissionIo) {
        *self = Self::new();
        io.start_timer(TimerId::MidTurn, config.timing.settle_ticks);
        self.phase = ShotPhase::Settle;
    }

    /// The turn length is sensed once the chassis is at rest.
    fn begin_turn(&mut self, side: Side, config: &MissionConfig, io: &mut dyn MissionIo) {
        let cfg = &config.mid;
        let reading = io.read_range(side.trailing_sensor());
        self.turn_ticks = if reading < cfg.close_threshold {
            cfg.short_turn_ticks
        } else {
            cfg.turn_ticks
        };
        info!("mid: trailing range {} -> turn {} ticks", reading, self.turn_ticks);
        drive(io, side, cfg.turn);
        io.start_timer(TimerId::MidTurn, self.turn_ticks);
        self.phase = ShotPhase::Turn;
    }

    pub fn run(
        &mut self,
        event: &Event,
        side: Side,
        config: &MissionConfig,
        io: &mut dyn MissionIo,
    ) -> Option<Event> {
        match (self.phase, *event) {
            (ShotPhase::Settle, Event::Timeout(TimerId::MidTurn)) => {
                self.begin_turn(side, config, io);
                None
            }
            (ShotPhase::Turn, Event::Timeout(TimerId::MidTurn)) => {
                drive(io, side, WheelPair::STOP);
                open_gate(io, &config.timing);
                self.phase = ShotPhase::Shooting;
                None
            }
            (ShotPhase::Shooting, Event::Timeout(TimerId::BallRelease)) => {
                close_gate(io);
                None
            }
            (ShotPhase::Shooting, Event::Timeout(TimerId::Shot)) => {
                close_gate(io);
                drive(io, side, config.mid.turn_back);
                let back = self.turn_ticks.saturating_add(config.mid.turn_back_offset_ticks);
                io.start_timer(TimerId::MidTurn, back);
                self.phase = ShotPhase::TurnBack;
                None
            }
            (ShotPhase::TurnBack, Event::Timeout(TimerId::MidTurn)) => {
                drive(io, side, WheelPair::STOP);
                *self = Self::new();
                Some(Event::ManeuverDone(Maneuver::Mid))
            }
            _ => None,
        }
    }
}

impl Default for MidShot {
    fn default() -> Self {
        Self::new()
    }
}
