//! Near shot: turn, fire twice, turn back.
//!
//! Two aim modes:
//! - `Fixed` turns for a configured tick count.
//! - `BeaconReferenced` sweeps until the beacon shows up and measures how
//!   long that took; the turn back is proportional to the measured sweep.
//!   If the beacon never shows, the sweep timeout stands in for it.
//!
//! Between the two shots the gate stays closed for the launcher to
//! recover (`second_shot_delay_ticks`).

use log::{info, warn};

use super::{ShotPhase, close_gate, open_gate};
use crate::app::ports::MissionIo;
use crate::config::{AimMode, MissionConfig};
use crate::drive::{Side, WheelPair, drive};
use crate::events::Event;
use crate::maneuver::Maneuver;
use crate::timers::TimerId;

#[derive(Debug)]
pub struct NearShot {
    phase: ShotPhase,
    shots: u8,
    /// Shot timer is currently timing the launcher recovery.
    recovering: bool,
    /// Measured or configured turn length.
    turn_ticks: u32,
    /// Sweep start (`now()`), beacon-referenced mode only.
    sweep_started: Option<u32>,
}

impl NearShot {
    pub fn new() -> Self {
        Self {
            phase: ShotPhase::Init,
            shots: 0,
            recovering: false,
            turn_ticks: 0,
            sweep_started: None,
        }
    }

    pub fn phase(&self) -> ShotPhase {
        self.phase
    }

    pub fn shots_fired(&self) -> u8 {
        self.shots
    }

    /// Reset and hold still for the settle time.
    pub fn start(&mut self, config: &MissionConfig, io: &mut dyn MissionIo) {
        *self = Self::new();
        io.start_timer(TimerId::NearTurn, config.timing.settle_ticks);
        self.phase = ShotPhase::Settle;
    }

    fn begin_turn(&mut self, side: Side, config: &MissionConfig, io: &mut dyn MissionIo) {
        let cfg = &config.near;
        match cfg.aim {
            AimMode::Fixed => {
                self.turn_ticks = cfg.turn_ticks;
                drive(io, side, cfg.turn);
                io.start_timer(TimerId::NearTurn, cfg.turn_ticks);
            }
            AimMode::BeaconReferenced => {
                self.sweep_started = Some(io.now());
                drive(io, side, cfg.sweep);
                io.start_timer(TimerId::NearTurn, cfg.sweep_timeout_ticks);
            }
        }
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
            (ShotPhase::Settle, Event::Timeout(TimerId::NearTurn)) => {
                self.begin_turn(side, config, io);
                None
            }
            (ShotPhase::Turn, Event::BeaconPresent) => {
                if let Some(t0) = self.sweep_started {
                    self.turn_ticks = io.now().wrapping_sub(t0);
                    io.stop_timer(TimerId::NearTurn);
                    info!("near: beacon after {} ticks", self.turn_ticks);
                    self.fire(side, config, io);
                }
                None
            }
            (ShotPhase::Turn, Event::Timeout(TimerId::NearTurn)) => {
                if self.sweep_started.is_some() {
                    warn!("near: sweep timed out without beacon");
                    self.turn_ticks = config.near.sweep_timeout_ticks;
                }
                self.fire(side, config, io);
                None
            }
            (ShotPhase::Shooting, Event::Timeout(TimerId::BallRelease)) => {
                close_gate(io);
                None
            }
            (ShotPhase::Shooting, Event::Timeout(TimerId::Shot)) => {
                if self.recovering {
                    self.recovering = false;
                    self.fire(side, config, io);
                } else if self.shots < config.near.shots {
                    self.recovering = true;
                    io.start_timer(TimerId::Shot, config.near.second_shot_delay_ticks);
                } else {
                    close_gate(io);
                    drive(io, side, config.near.turn_back);
                    io.start_timer(TimerId::NearTurn, self.turn_back_ticks(config));
                    self.phase = ShotPhase::TurnBack;
                }
                None
            }
            (ShotPhase::TurnBack, Event::Timeout(TimerId::NearTurn)) => {
                drive(io, side, WheelPair::STOP);
                *self = Self::new();
                Some(Event::ManeuverDone(Maneuver::Near))
            }
            _ => None,
        }
    }

    fn fire(&mut self, side: Side, config: &MissionConfig, io: &mut dyn MissionIo) {
        drive(io, side, WheelPair::STOP);
        open_gate(io, &config.timing);
        self.shots += 1;
        self.phase = ShotPhase::Shooting;
        info!("near: shot {}", self.shots);
    }

    fn turn_back_ticks(&self, config: &MissionConfig) -> u32 {
        let cfg = &config.near;
        let base = match cfg.aim {
            AimMode::Fixed => self.turn_ticks,
            AimMode::BeaconReferenced => {
                let scaled = u64::from(self.turn_ticks) * u64::from(cfg.gain_num)
                    / u64::from(cfg.gain_den.max(1));
                u32::try_from(scaled).unwrap_or(u32::MAX)
            }
        };
        base.saturating_add(cfg.turn_back_offset_ticks)
    }
}

impl Default for NearShot {
    fn default() -> Self {
        Self::new()
    }
}
