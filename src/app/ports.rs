//! Port traits: the hexagonal boundary between mission logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ MissionController (domain)
//! ```
//!
//! Driven adapters (sensors, actuators, event sinks) implement these
//! traits.  State handlers receive everything at once as
//! `&mut dyn MissionIo`, so a handler can read a range sensor, command the
//! wheels, and start a timer while processing one event.

use crate::drive::{Side, Wheel};
use crate::error::ActuatorError;
use crate::events::{BumperMask, Event, EventQueue, RangeChannel, TapeMask};
use crate::timers::{TimerBank, TimerId};

// ───────────────────────────────────────────────────────────────
// Sensor port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port.  Implementations never fail: an unreadable channel
/// reports "far" (`u16::MAX`) or "absent" (`false` / empty mask).
pub trait SensorPort {
    /// Front/back tape contact bits.
    fn read_tape(&mut self) -> TapeMask;

    /// Raw analog range reading; lower is closer.
    fn read_range(&mut self, channel: RangeChannel) -> u16;

    /// Raw, undebounced bumper mask.
    fn read_bumpers(&mut self) -> BumperMask;

    /// Raw boundary-wire contact.
    fn read_boundary_wire(&mut self) -> bool;

    /// Raw beacon detector output.
    fn read_beacon(&mut self) -> bool;

    /// Start-side selector switch.
    fn read_side_selector(&mut self) -> Side;
}

// ───────────────────────────────────────────────────────────────
// Actuator port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Release gate position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseGate {
    Open,
    Closed,
}

/// Write-side port.  Speeds are signed magnitudes in [-1000, 1000];
/// anything outside is refused with
/// [`ActuatorError::SpeedOutOfRange`] and changes nothing.
pub trait ActuatorPort {
    fn set_wheel_speed(&mut self, wheel: Wheel, speed: i16) -> Result<(), ActuatorError>;

    fn set_launcher_speed(&mut self, wheel: Wheel, speed: i16) -> Result<(), ActuatorError>;

    fn set_release(&mut self, gate: ReleaseGate);
}

// ───────────────────────────────────────────────────────────────
// Timer port
// ───────────────────────────────────────────────────────────────

/// One-shot timers.  `start_timer` re-arms a running timer.
pub trait TimerPort {
    fn start_timer(&mut self, id: TimerId, ticks: u32);

    fn stop_timer(&mut self, id: TimerId);

    /// Free-running tick counter.
    fn now(&self) -> u32;
}

impl TimerPort for TimerBank {
    fn start_timer(&mut self, id: TimerId, ticks: u32) {
        self.start(id, ticks);
    }

    fn stop_timer(&mut self, id: TimerId) {
        self.stop(id);
    }

    fn now(&self) -> u32 {
        TimerBank::now(self)
    }
}

// ───────────────────────────────────────────────────────────────
// Event port
// ───────────────────────────────────────────────────────────────

/// Enqueue an event for later dispatch.  Returns `false` if it was dropped.
pub trait EventPort {
    fn post(&mut self, event: Event) -> bool;
}

impl EventPort for EventQueue {
    fn post(&mut self, event: Event) -> bool {
        EventQueue::post(self, event)
    }
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The service emits structured [`MissionEvent`](super::events::MissionEvent)s
/// through this port.  Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::MissionEvent);
}

// ───────────────────────────────────────────────────────────────
// Combined handler I/O
// ───────────────────────────────────────────────────────────────

/// Everything a state handler may touch while processing one event.
pub trait MissionIo: SensorPort + ActuatorPort + TimerPort + EventPort {}

impl<T: SensorPort + ActuatorPort + TimerPort + EventPort> MissionIo for T {}
