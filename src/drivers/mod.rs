//! Actuator drivers and analog input abstraction.
//!
//! Drivers are generic over `embedded-hal` 1.0 traits so the same code
//! runs against a board HAL or host-side mock pins.

pub mod analog;
pub mod motor;
pub mod release_gate;
