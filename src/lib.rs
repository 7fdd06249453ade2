//! Hoopbot mission core.
//!
//! Exposes the pure-logic modules (event detection, mission state machine,
//! aim-and-shoot maneuvers) for integration testing and for the board
//! start-up glue.  Hardware is reached only through the port traits in
//! [`app::ports`] and the `embedded-hal` based [`adapters::hardware`].

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod config;
pub mod drive;
pub mod drivers;
pub mod error;
pub mod events;
pub mod fsm;
pub mod maneuver;
pub mod sensors;
pub mod timers;

#[cfg(test)]
pub(crate) mod test_support;
