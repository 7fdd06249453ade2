//! Ball release gate on a hobby servo.
//!
//! 50 Hz frame; 2.0 ms pulse holds the ball, 1.0 ms lets it through.

use embedded_hal::pwm::SetDutyCycle;

use crate::app::ports::ReleaseGate;
use crate::error::ActuatorError;

pub const SERVO_PERIOD_US: u16 = 20_000;
pub const CLOSED_PULSE_US: u16 = 2_000;
pub const OPEN_PULSE_US: u16 = 1_000;

pub trait ReleaseActuator {
    fn set_gate(&mut self, gate: ReleaseGate) -> Result<(), ActuatorError>;

    fn gate(&self) -> ReleaseGate;
}

pub struct ReleaseServo<P> {
    pwm: P,
    gate: ReleaseGate,
}

impl<P: SetDutyCycle> ReleaseServo<P> {
    /// `pwm` must already run at a 20 ms period.  The gate starts closed.
    pub fn new(pwm: P) -> Result<Self, ActuatorError> {
        let mut servo = Self {
            pwm,
            gate: ReleaseGate::Closed,
        };
        servo.write(ReleaseGate::Closed)?;
        Ok(servo)
    }

    fn write(&mut self, gate: ReleaseGate) -> Result<(), ActuatorError> {
        let pulse = match gate {
            ReleaseGate::Open => OPEN_PULSE_US,
            ReleaseGate::Closed => CLOSED_PULSE_US,
        };
        self.pwm
            .set_duty_cycle_fraction(pulse, SERVO_PERIOD_US)
            .map_err(|_| ActuatorError::PwmWriteFailed)
    }
}

impl<P: SetDutyCycle> ReleaseActuator for ReleaseServo<P> {
    fn set_gate(&mut self, gate: ReleaseGate) -> Result<(), ActuatorError> {
        self.write(gate)?;
        self.gate = gate;
        Ok(())
    }

    fn gate(&self) -> ReleaseGate {
        self.gate
    }
}
