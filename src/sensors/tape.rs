//! Tape contact edge detection.
//!
//! Each tape sensor is its own channel: the front and back bits of the
//! tape mask edge-trigger independently.  Both start untripped.

use crate::events::{Event, TapeMask, TapeSensor};

pub struct TapeEdge {
    sensor: TapeSensor,
    tripped: bool,
}

impl TapeEdge {
    pub fn new(sensor: TapeSensor) -> Self {
        Self { sensor, tripped: false }
    }

    /// Feed one sample of the full mask; emits only on a change of this
    /// sensor's bit.
    pub fn update(&mut self, mask: TapeMask) -> Option<Event> {
        let now = mask.contains(self.sensor);
        if now == self.tripped {
            return None;
        }
        self.tripped = now;
        Some(if now {
            Event::TapeTripped(self.sensor)
        } else {
            Event::TapeUntripped(self.sensor)
        })
    }

    pub fn is_tripped(&self) -> bool {
        self.tripped
    }
}
