//! DC motor driver for one half of a dual H-bridge.
//!
//! Two direction inputs select forward / reverse / coast and a PWM enable
//! sets the magnitude.  Speeds are signed in [-1000, 1000].
//!
//! ## Ordering
//!
//! The enable is dropped to zero before the direction pins change, so a
//! reversal never drives the bridge at speed with both inputs in flight.

use embedded_hal::digital::OutputPin;
use embedded_hal::pwm::SetDutyCycle;

use crate::drive::{MAX_SPEED, speed_in_range};
use crate::error::ActuatorError;

/// Signed speed command for one motor.
pub trait SpeedControl {
    /// Out-of-range values are refused and leave the motor unchanged.
    fn set_speed(&mut self, speed: i16) -> Result<(), ActuatorError>;

    /// Last accepted command.
    fn speed(&self) -> i16;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Reverse,
    Coast,
}

impl Direction {
    fn of(speed: i16) -> Self {
        match speed {
            s if s > 0 => Self::Forward,
            s if s < 0 => Self::Reverse,
            _ => Self::Coast,
        }
    }
}

pub struct HBridge<P, D> {
    enable: P,
    in1: D,
    in2: D,
    speed: i16,
    direction: Direction,
}

impl<P: SetDutyCycle, D: OutputPin> HBridge<P, D> {
    /// Takes the pins as-is; call [`SpeedControl::set_speed`] with 0 to
    /// put the bridge in a known state.
    pub fn new(enable: P, in1: D, in2: D) -> Self {
        Self {
            enable,
            in1,
            in2,
            speed: 0,
            direction: Direction::Coast,
        }
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Give the pins back.
    pub fn release(self) -> (P, D, D) {
        (self.enable, self.in1, self.in2)
    }

    fn write_direction(&mut self, dir: Direction) -> Result<(), ActuatorError> {
        let (a, b) = match dir {
            Direction::Forward => (true, false),
            Direction::Reverse => (false, true),
            Direction::Coast => (false, false),
        };
        self.in1
            .set_state(a.into())
            .map_err(|_| ActuatorError::GpioWriteFailed)?;
        self.in2
            .set_state(b.into())
            .map_err(|_| ActuatorError::GpioWriteFailed)
    }

    fn write_duty(&mut self, magnitude: u16) -> Result<(), ActuatorError> {
        self.enable
            .set_duty_cycle_fraction(magnitude, MAX_SPEED as u16)
            .map_err(|_| ActuatorError::PwmWriteFailed)
    }
}

impl<P: SetDutyCycle, D: OutputPin> SpeedControl for HBridge<P, D> {
    fn set_speed(&mut self, speed: i16) -> Result<(), ActuatorError> {
        if !speed_in_range(speed) {
            return Err(ActuatorError::SpeedOutOfRange(speed));
        }

        let dir = Direction::of(speed);
        if dir != self.direction {
            self.write_duty(0)?;
            self.write_direction(dir)?;
            self.direction = dir;
        }
        self.write_duty(speed.unsigned_abs())?;
        self.speed = speed;
        Ok(())
    }

    fn speed(&self) -> i16 {
        self.speed
    }
}
