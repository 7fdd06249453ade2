//! Boundary-wire contact debouncing.
//!
//! Contact must be seen on `depth` consecutive samples before the robot
//! counts as on the wire.  A single miss resets the run and forces
//! off-wire immediately.

use crate::events::Event;

pub struct WireDebouncer {
    depth: u8,
    run: u8,
    on_wire: bool,
}

impl WireDebouncer {
    pub fn new(depth: u8) -> Self {
        Self {
            depth: depth.max(1),
            run: 0,
            on_wire: false,
        }
    }

    pub fn update(&mut self, contact: bool) -> Option<Event> {
        if contact {
            self.run = self.run.saturating_add(1);
            if !self.on_wire && self.run >= self.depth {
                self.on_wire = true;
                return Some(Event::OnWire);
            }
            return None;
        }

        self.run = 0;
        if self.on_wire {
            self.on_wire = false;
            return Some(Event::OffWire);
        }
        None
    }

    pub fn on_wire(&self) -> bool {
        self.on_wire
    }
}
