//! Outbound mission events.
//!
//! The [`MissionService`](super::service::MissionService) emits these
//! through the [`EventSink`](super::ports::EventSink) port.

use crate::drive::Side;
use crate::fsm::Phase;
use crate::maneuver::Maneuver;

/// Structured events emitted by the mission core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissionEvent {
    /// The mission has started on `side`.
    Started { side: Side },

    /// The controller moved between top-level phases.
    PhaseChanged { from: Phase, to: Phase },

    /// Collision recovery mirrored the rest of the mission.
    SideFlipped(Side),

    /// An aim-and-shoot maneuver handed control back.
    ManeuverCompleted(Maneuver),
}
