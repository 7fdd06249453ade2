//! Hardware adapter: bridges real peripherals to domain port traits.
//!
//! Owns every input pin, range channel, motor, and the release servo,
//! and exposes them through [`SensorPort`] and [`ActuatorPort`].  This is
//! the only module that touches actual hardware, and only through
//! `embedded-hal` traits plus [`AnalogInput`].
//!
//! A failed read is logged, counted, and reported as the safe reading:
//! "far" for a range channel, inactive for a digital input.

use embedded_hal::digital::InputPin;
use log::warn;

use crate::app::ports::{ActuatorPort, ReleaseGate, SensorPort};
use crate::drive::{Side, Wheel};
use crate::drivers::analog::AnalogInput;
use crate::drivers::motor::SpeedControl;
use crate::drivers::release_gate::ReleaseActuator;
use crate::error::{ActuatorError, SensorError};
use crate::events::{BumperMask, RangeChannel, TapeMask};

/// Digital inputs, all active high.
pub struct DigitalInputs<I> {
    pub front_tape: I,
    pub back_tape: I,
    pub bumper_front_left: I,
    pub bumper_front_right: I,
    pub bumper_back_left: I,
    pub bumper_back_right: I,
    pub boundary_wire: I,
    pub beacon: I,
    /// High selects a right-wall start.
    pub side_select: I,
}

/// One analog channel per range sensor.
pub struct RangeInputs<A> {
    pub left: A,
    pub right: A,
    pub front_left: A,
    pub front_right: A,
}

/// Drive and launcher motors.
pub struct Motors<M> {
    pub left_wheel: M,
    pub right_wheel: M,
    pub left_launcher: M,
    pub right_launcher: M,
}

/// Concrete adapter that combines all hardware behind port traits.
pub struct HardwareAdapter<I, A, M, G> {
    inputs: DigitalInputs<I>,
    ranges: RangeInputs<A>,
    motors: Motors<M>,
    gate: G,
    read_faults: u32,
}

impl<I, A, M, G> HardwareAdapter<I, A, M, G>
where
    I: InputPin,
    A: AnalogInput,
    M: SpeedControl,
    G: ReleaseActuator,
{
    pub fn new(inputs: DigitalInputs<I>, ranges: RangeInputs<A>, motors: Motors<M>, gate: G) -> Self {
        Self {
            inputs,
            ranges,
            motors,
            gate,
            read_faults: 0,
        }
    }

    /// Reads that failed and were replaced by the safe value.
    pub fn read_faults(&self) -> u32 {
        self.read_faults
    }

    pub fn motors(&self) -> &Motors<M> {
        &self.motors
    }

    pub fn gate(&self) -> &G {
        &self.gate
    }
}

/// Read one pin, falling back to inactive.
fn level<I: InputPin>(pin: &mut I, what: &str, faults: &mut u32) -> bool {
    match pin.is_high() {
        Ok(high) => high,
        Err(_) => {
            *faults = faults.wrapping_add(1);
            warn!("{}: {}", what, SensorError::GpioReadFailed);
            false
        }
    }
}

// ── SensorPort implementation ─────────────────────────────────

impl<I, A, M, G> SensorPort for HardwareAdapter<I, A, M, G>
where
    I: InputPin,
    A: AnalogInput,
    M: SpeedControl,
    G: ReleaseActuator,
{
    fn read_tape(&mut self) -> TapeMask {
        let faults = &mut self.read_faults;
        let mut bits = 0;
        if level(&mut self.inputs.front_tape, "front tape", faults) {
            bits |= TapeMask::FRONT;
        }
        if level(&mut self.inputs.back_tape, "back tape", faults) {
            bits |= TapeMask::BACK;
        }
        TapeMask(bits)
    }

    fn read_range(&mut self, channel: RangeChannel) -> u16 {
        let input = match channel {
            RangeChannel::Left => &mut self.ranges.left,
            RangeChannel::Right => &mut self.ranges.right,
            RangeChannel::FrontLeft => &mut self.ranges.front_left,
            RangeChannel::FrontRight => &mut self.ranges.front_right,
        };
        match input.read_raw() {
            Ok(raw) => raw,
            Err(e) => {
                self.read_faults = self.read_faults.wrapping_add(1);
                warn!("range {:?}: {} ({:?})", channel, SensorError::AdcReadFailed, e);
                u16::MAX
            }
        }
    }

    fn read_bumpers(&mut self) -> BumperMask {
        let faults = &mut self.read_faults;
        let pins = [
            (&mut self.inputs.bumper_front_left, BumperMask::FRONT_LEFT, "bumper FL"),
            (&mut self.inputs.bumper_front_right, BumperMask::FRONT_RIGHT, "bumper FR"),
            (&mut self.inputs.bumper_back_left, BumperMask::BACK_LEFT, "bumper BL"),
            (&mut self.inputs.bumper_back_right, BumperMask::BACK_RIGHT, "bumper BR"),
        ];
        let mut bits = 0;
        for (pin, bit, what) in pins {
            if level(pin, what, faults) {
                bits |= bit;
            }
        }
        BumperMask(bits)
    }

    fn read_boundary_wire(&mut self) -> bool {
        level(&mut self.inputs.boundary_wire, "boundary wire", &mut self.read_faults)
    }

    fn read_beacon(&mut self) -> bool {
        level(&mut self.inputs.beacon, "beacon", &mut self.read_faults)
    }

    fn read_side_selector(&mut self) -> Side {
        if level(&mut self.inputs.side_select, "side select", &mut self.read_faults) {
            Side::Right
        } else {
            Side::Left
        }
    }
}

// ── ActuatorPort implementation ───────────────────────────────

impl<I, A, M, G> ActuatorPort for HardwareAdapter<I, A, M, G>
where
    I: InputPin,
    A: AnalogInput,
    M: SpeedControl,
    G: ReleaseActuator,
{
    fn set_wheel_speed(&mut self, wheel: Wheel, speed: i16) -> Result<(), ActuatorError> {
        match wheel {
            Wheel::Left => self.motors.left_wheel.set_speed(speed),
            Wheel::Right => self.motors.right_wheel.set_speed(speed),
        }
    }

    fn set_launcher_speed(&mut self, wheel: Wheel, speed: i16) -> Result<(), ActuatorError> {
        match wheel {
            Wheel::Left => self.motors.left_launcher.set_speed(speed),
            Wheel::Right => self.motors.right_launcher.set_speed(speed),
        }
    }

    fn set_release(&mut self, gate: ReleaseGate) {
        if let Err(e) = self.gate.set_gate(gate) {
            warn!("release gate {:?}: {}", gate, e);
        }
    }
}
