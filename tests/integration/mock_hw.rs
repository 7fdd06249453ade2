//! Mock robot for integration tests.
//!
//! Sensor readings are plain fields the test scripts; every actuator call
//! is recorded so tests can assert on the full command history.

use hoopbot::app::events::MissionEvent;
use hoopbot::app::ports::{ActuatorPort, EventSink, ReleaseGate, SensorPort};
use hoopbot::drive::{Side, Wheel, WheelPair, speed_in_range};
use hoopbot::error::ActuatorError;
use hoopbot::events::{BumperMask, RangeChannel, TapeMask};

// ── Actuator call record ──────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActuatorCall {
    Wheel(Wheel, i16),
    Launcher(Wheel, i16),
    Release(ReleaseGate),
}

// ── MockRobot ─────────────────────────────────────────────────

pub struct MockRobot {
    pub side: Side,
    pub tape: TapeMask,
    pub left: u16,
    pub right: u16,
    pub front_left: u16,
    pub front_right: u16,
    pub bumpers: BumperMask,
    pub wire: bool,
    pub beacon: bool,

    pub wheels: WheelPair,
    pub gate: ReleaseGate,
    pub calls: Vec<ActuatorCall>,
}

#[allow(dead_code)]
impl MockRobot {
    /// Everything far and quiet.
    pub fn new(side: Side) -> Self {
        Self {
            side,
            tape: TapeMask::default(),
            left: 1000,
            right: 1000,
            front_left: 1000,
            front_right: 1000,
            bumpers: BumperMask::NONE,
            wire: false,
            beacon: false,
            wheels: WheelPair::STOP,
            gate: ReleaseGate::Closed,
            calls: Vec::new(),
        }
    }

    pub fn gate_opens(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| **c == ActuatorCall::Release(ReleaseGate::Open))
            .count()
    }

    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }
}

impl SensorPort for MockRobot {
    fn read_tape(&mut self) -> TapeMask {
        self.tape
    }

    fn read_range(&mut self, channel: RangeChannel) -> u16 {
        match channel {
            RangeChannel::Left => self.left,
            RangeChannel::Right => self.right,
            RangeChannel::FrontLeft => self.front_left,
            RangeChannel::FrontRight => self.front_right,
        }
    }

    fn read_bumpers(&mut self) -> BumperMask {
        self.bumpers
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

impl ActuatorPort for MockRobot {
    fn set_wheel_speed(&mut self, wheel: Wheel, speed: i16) -> Result<(), ActuatorError> {
        if !speed_in_range(speed) {
            return Err(ActuatorError::SpeedOutOfRange(speed));
        }
        match wheel {
            Wheel::Left => self.wheels.left = speed,
            Wheel::Right => self.wheels.right = speed,
        }
        self.calls.push(ActuatorCall::Wheel(wheel, speed));
        Ok(())
    }

    fn set_launcher_speed(&mut self, wheel: Wheel, speed: i16) -> Result<(), ActuatorError> {
        if !speed_in_range(speed) {
            return Err(ActuatorError::SpeedOutOfRange(speed));
        }
        self.calls.push(ActuatorCall::Launcher(wheel, speed));
        Ok(())
    }

    fn set_release(&mut self, gate: ReleaseGate) {
        self.gate = gate;
        self.calls.push(ActuatorCall::Release(gate));
    }
}

// ── Event sink ────────────────────────────────────────────────

#[derive(Default)]
pub struct LogSink {
    pub events: Vec<MissionEvent>,
}

#[allow(dead_code)]
impl LogSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phases(&self) -> Vec<hoopbot::fsm::Phase> {
        self.events
            .iter()
            .filter_map(|e| match e {
                MissionEvent::PhaseChanged { to, .. } => Some(*to),
                _ => None,
            })
            .collect()
    }

    pub fn contains(&self, event: &MissionEvent) -> bool {
        self.events.contains(event)
    }
}

impl EventSink for LogSink {
    fn emit(&mut self, event: &MissionEvent) {
        self.events.push(*event);
    }
}
