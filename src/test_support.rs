//! In-crate mock for unit tests: implements every port, records every
//! command, and lets tests script sensor readings.

use crate::drive::{Side, Wheel, WheelPair, speed_in_range};
use crate::error::ActuatorError;
use crate::events::{BumperMask, Event, RangeChannel, TapeMask};
use crate::app::ports::{ActuatorPort, EventPort, ReleaseGate, SensorPort, TimerPort};
use crate::timers::TimerId;

pub(crate) struct MockIo {
    // -- Scripted sensors --
    pub side: Side,
    pub tape: TapeMask,
    /// Left, Right, FrontLeft, FrontRight.
    pub ranges: [u16; 4],
    pub bumpers: BumperMask,
    pub wire: bool,
    pub beacon: bool,

    // -- Recorded outputs --
    pub wheels: WheelPair,
    pub launcher: WheelPair,
    pub gate: ReleaseGate,
    pub gate_log: Vec<ReleaseGate>,
    pub wheel_log: Vec<WheelPair>,
    pub timers: [Option<u32>; TimerId::COUNT],
    pub started: Vec<(TimerId, u32)>,
    pub posted: Vec<Event>,
    pub now: u32,
}

impl MockIo {
    pub fn new() -> Self {
        Self {
            side: Side::Right,
            tape: TapeMask::default(),
            ranges: [1000; 4],
            bumpers: BumperMask::NONE,
            wire: false,
            beacon: false,
            wheels: WheelPair::STOP,
            launcher: WheelPair::STOP,
            gate: ReleaseGate::Closed,
            gate_log: Vec::new(),
            wheel_log: Vec::new(),
            timers: [None; TimerId::COUNT],
            started: Vec::new(),
            posted: Vec::new(),
            now: 0,
        }
    }

    pub fn with_side(side: Side) -> Self {
        Self { side, ..Self::new() }
    }

    pub fn set_range(&mut self, channel: RangeChannel, value: u16) {
        self.ranges[range_index(channel)] = value;
    }

    pub fn running(&self, id: TimerId) -> bool {
        self.timers[id as usize].is_some()
    }

    pub fn timer(&self, id: TimerId) -> Option<u32> {
        self.timers[id as usize]
    }
}

fn range_index(channel: RangeChannel) -> usize {
    match channel {
        RangeChannel::Left => 0,
        RangeChannel::Right => 1,
        RangeChannel::FrontLeft => 2,
        RangeChannel::FrontRight => 3,
    }
}

impl SensorPort for MockIo {
    fn read_tape(&mut self) -> TapeMask {
        self.tape
    }

    fn read_range(&mut self, channel: RangeChannel) -> u16 {
        self.ranges[range_index(channel)]
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

impl ActuatorPort for MockIo {
    fn set_wheel_speed(&mut self, wheel: Wheel, speed: i16) -> Result<(), ActuatorError> {
        if !speed_in_range(speed) {
            return Err(ActuatorError::SpeedOutOfRange(speed));
        }
        match wheel {
            Wheel::Left => self.wheels.left = speed,
            Wheel::Right => self.wheels.right = speed,
        }
        self.wheel_log.push(self.wheels);
        Ok(())
    }

    fn set_launcher_speed(&mut self, wheel: Wheel, speed: i16) -> Result<(), ActuatorError> {
        if !speed_in_range(speed) {
            return Err(ActuatorError::SpeedOutOfRange(speed));
        }
        match wheel {
            Wheel::Left => self.launcher.left = speed,
            Wheel::Right => self.launcher.right = speed,
        }
        Ok(())
    }

    fn set_release(&mut self, gate: ReleaseGate) {
        self.gate = gate;
        self.gate_log.push(gate);
    }
}

impl TimerPort for MockIo {
    fn start_timer(&mut self, id: TimerId, ticks: u32) {
        self.timers[id as usize] = Some(ticks);
        self.started.push((id, ticks));
    }

    fn stop_timer(&mut self, id: TimerId) {
        self.timers[id as usize] = None;
    }

    fn now(&self) -> u32 {
        self.now
    }
}

impl EventPort for MockIo {
    fn post(&mut self, event: Event) -> bool {
        self.posted.push(event);
        true
    }
}
