//! Far shot: wait out the parent's reverse creep, then turn, fire once,
//! and turn back.  Only reachable when `far.enabled` is set.

use super::{ShotPhase, close_gate, open_gate};
use crate::app::ports::MissionIo;
use crate::config::MissionConfig;
use crate::drive::{Side, WheelPair, drive};
use crate::events::Event;
use crate::maneuver::Maneuver;
use crate::timers::TimerId;

#[derive(Debug)]
pub struct FarShot {
    phase: ShotPhase,
}

impl FarShot {
    pub fn new() -> Self {
        Self {
            phase: ShotPhase::Init,
        }
    }

    pub fn phase(&self) -> ShotPhase {
        self.phase
    }

    /// The parent has already started the creep and its timer.
    pub fn start(&mut self) {
        self.phase = ShotPhase::Settle;
    }

    pub fn run(
        &mut self,
        event: &Event,
        side: Side,
        config: &MissionConfig,
        io: &mut dyn MissionIo,
    ) -> Option<Event> {
        let cfg = &config.far;
        match (self.phase, *event) {
            (ShotPhase::Settle, Event::Timeout(TimerId::MoveForward)) => {
                drive(io, side, cfg.turn);
                io.start_timer(TimerId::FarTurn, cfg.turn_ticks);
                self.phase = ShotPhase::Turn;
                None
            }
            (ShotPhase::Turn, Event::Timeout(TimerId::FarTurn)) => {
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
                drive(io, side, cfg.turn_back);
                let back = cfg.turn_ticks.saturating_add(cfg.turn_back_offset_ticks);
                io.start_timer(TimerId::FarTurn, back);
                self.phase = ShotPhase::TurnBack;
                None
            }
            (ShotPhase::TurnBack, Event::Timeout(TimerId::FarTurn)) => {
                drive(io, side, WheelPair::STOP);
                *self = Self::new();
                Some(Event::ManeuverDone(Maneuver::Far))
            }
            _ => None,
        }
    }
}

impl Default for FarShot {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::MockIo;

    #[test]
    fn waits_for_creep_before_turning() {
        let cfg = MissionConfig::default();
        let mut io = MockIo::new();
        let mut shot = FarShot::new();
        shot.start();
        assert_eq!(shot.phase(), ShotPhase::Settle);
        assert_eq!(shot.run(&Event::Timeout(TimerId::FarTurn), Side::Right, &cfg, &mut io), None);
        assert_eq!(shot.phase(), ShotPhase::Settle);

        shot.run(&Event::Timeout(TimerId::MoveForward), Side::Right, &cfg, &mut io);
        assert_eq!(shot.phase(), ShotPhase::Turn);
        assert_eq!(io.timer(TimerId::FarTurn), Some(200));
    }

    #[test]
    fn full_sequence_completes_once() {
        let cfg = MissionConfig::default();
        let mut io = MockIo::new();
        let mut shot = FarShot::new();
        shot.start();
        let script = [
            Event::Timeout(TimerId::MoveForward),
            Event::Timeout(TimerId::FarTurn),
            Event::Timeout(TimerId::BallRelease),
            Event::Timeout(TimerId::Shot),
            Event::Timeout(TimerId::FarTurn),
            Event::Timeout(TimerId::FarTurn),
        ];
        let out: Vec<_> = script
            .iter()
            .filter_map(|e| shot.run(e, Side::Left, &cfg, &mut io))
            .collect();
        assert_eq!(out, vec![Event::ManeuverDone(Maneuver::Far)]);
        assert!(io.started.contains(&(TimerId::FarTurn, 300)));
        assert_eq!(shot.phase(), ShotPhase::Init);
    }
}
