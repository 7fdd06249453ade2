//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured mission events through
//! the `log` facade (serial console on the robot, captured in tests).
//! A radio telemetry adapter would implement the same trait.

use log::info;

use crate::app::events::MissionEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`MissionEvent`].
#[derive(Debug, Default)]
pub struct LogEventSink {
    emitted: u32,
}

impl LogEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Events logged so far.
    pub fn emitted(&self) -> u32 {
        self.emitted
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &MissionEvent) {
        self.emitted = self.emitted.wrapping_add(1);
        match event {
            MissionEvent::Started { side } => {
                info!("START | side={:?}", side);
            }
            MissionEvent::PhaseChanged { from, to } => {
                info!("PHASE | {:?} -> {:?}", from, to);
            }
            MissionEvent::SideFlipped(side) => {
                info!("FLIP  | now following the {:?} wall", side);
            }
            MissionEvent::ManeuverCompleted(kind) => {
                info!("SHOT  | {:?} maneuver complete", kind);
            }
        }
    }
}
