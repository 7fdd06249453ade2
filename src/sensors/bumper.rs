//! Bumper mask debouncing.
//!
//! A raw mask becomes the stable value only after `depth` consecutive
//! identical samples (the first sample counts).  Only a change of the
//! stable value emits, and the event carries the whole mask, so a release
//! back to no contact emits `Bumped(BumperMask::NONE)`.

use crate::events::{BumperMask, Event};

pub struct BumperDebouncer {
    depth: u8,
    candidate: BumperMask,
    run: u8,
    stable: BumperMask,
}

impl BumperDebouncer {
    pub fn new(depth: u8) -> Self {
        Self {
            depth: depth.max(1),
            candidate: BumperMask::NONE,
            run: 0,
            stable: BumperMask::NONE,
        }
    }

    pub fn update(&mut self, raw: BumperMask) -> Option<Event> {
        if raw == self.candidate {
            self.run = self.run.saturating_add(1);
        } else {
            self.candidate = raw;
            self.run = 1;
        }

        if self.run >= self.depth && self.candidate != self.stable {
            self.stable = self.candidate;
            return Some(Event::Bumped(self.stable));
        }
        None
    }

    pub fn stable(&self) -> BumperMask {
        self.stable
    }
}
