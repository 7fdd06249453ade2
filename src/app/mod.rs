//! Application core: mission orchestration behind port traits.
//!
//! The [`service::MissionService`] owns the controller, the event queue,
//! and the timer bank.  All interaction with hardware happens through the
//! **port traits** defined in [`ports`], keeping this layer fully testable
//! without real peripherals.

pub mod events;
pub mod ports;
pub mod service;
