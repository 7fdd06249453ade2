//! Analog wall-range classification with hysteresis.
//!
//! ```text
//!   reading:   0 ──── near ════ band ════ far ──── u16::MAX
//!   class:     InRange    (keep previous)     Far
//! ```
//!
//! The classification starts unknown, so the first definite reading
//! emits.  Readings inside the band never emit.

use crate::events::{Event, RangeChannel};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Proximity {
    InRange,
    Far,
}

pub struct RangeClassifier {
    channel: RangeChannel,
    near: u16,
    far: u16,
    class: Option<Proximity>,
}

impl RangeClassifier {
    pub fn new(channel: RangeChannel, near: u16, far: u16) -> Self {
        Self {
            channel,
            near,
            far,
            class: None,
        }
    }

    pub fn update(&mut self, reading: u16) -> Option<Event> {
        let next = if reading < self.near {
            Proximity::InRange
        } else if reading > self.far {
            Proximity::Far
        } else {
            return None;
        };
        if self.class == Some(next) {
            return None;
        }
        self.class = Some(next);
        Some(match next {
            Proximity::InRange => Event::WallInRange(self.channel),
            Proximity::Far => Event::WallFar(self.channel),
        })
    }

    pub fn channel(&self) -> RangeChannel {
        self.channel
    }

    pub fn class(&self) -> Option<Proximity> {
        self.class
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> RangeClassifier {
        RangeClassifier::new(RangeChannel::FrontRight, 250, 450)
    }

    #[test]
    fn first_definite_reading_emits() {
        let mut c = classifier();
        assert_eq!(c.update(300), None, "band reading leaves class unknown");
        assert_eq!(c.class(), None);
        assert_eq!(c.update(900), Some(Event::WallFar(RangeChannel::FrontRight)));
    }

    #[test]
    fn band_holds_previous_class() {
        let mut c = classifier();
        assert_eq!(c.update(100), Some(Event::WallInRange(RangeChannel::FrontRight)));
        assert_eq!(c.update(260), None);
        assert_eq!(c.update(449), None);
        assert_eq!(c.class(), Some(Proximity::InRange));
        assert_eq!(c.update(451), Some(Event::WallFar(RangeChannel::FrontRight)));
        assert_eq!(c.update(300), None);
        assert_eq!(c.update(249), Some(Event::WallInRange(RangeChannel::FrontRight)));
    }

    #[test]
    fn thresholds_are_exclusive() {
        let mut c = classifier();
        assert_eq!(c.update(250), None);
        assert_eq!(c.update(450), None);
    }

    #[test]
    fn repeated_samples_emit_once() {
        let mut c = classifier();
        let events: Vec<_> = [10, 20, 30, 40].into_iter().filter_map(|r| c.update(r)).collect();
        assert_eq!(events, vec![Event::WallInRange(RangeChannel::FrontRight)]);
    }
}
