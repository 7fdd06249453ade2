//! Beacon presence: plain level-to-edge, no debounce.

use crate::events::Event;

#[derive(Default)]
pub struct BeaconEdge {
    /// Unknown until the first sample.
    present: Option<bool>,
}

impl BeaconEdge {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, present: bool) -> Option<Event> {
        if self.present == Some(present) {
            return None;
        }
        self.present = Some(present);
        Some(if present {
            Event::BeaconPresent
        } else {
            Event::BeaconAbsent
        })
    }
}
