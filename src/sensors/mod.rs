//! Sensor event detector: turns raw samples into edge events.
//!
//! The detector owns one classifier per channel group and is polled once
//! per sensor-poll period.  Every group posts at most one event per poll
//! and only when its classification changed, never per sample.
//!
//! | Group          | Rule                                   |
//! |----------------|----------------------------------------|
//! | front tape     | bit edge                               |
//! | back tape      | bit edge                               |
//! | range × 4      | near/far thresholds with hysteresis    |
//! | bumpers        | N identical samples, full mask carried |
//! | boundary wire  | N consecutive contacts, miss resets    |
//! | beacon         | level edge                             |

pub mod beacon;
pub mod bumper;
pub mod range;
pub mod tape;
pub mod wire;

use log::debug;

use crate::app::ports::{EventPort, SensorPort};
use crate::config::SensorConfig;
use crate::events::{Event, RangeChannel, TapeSensor};
use beacon::BeaconEdge;
use bumper::BumperDebouncer;
use range::RangeClassifier;
use tape::TapeEdge;
use wire::WireDebouncer;

pub struct SensorEventDetector {
    front_tape: TapeEdge,
    back_tape: TapeEdge,
    ranges: [RangeClassifier; 4],
    bumpers: BumperDebouncer,
    wire: WireDebouncer,
    beacon: BeaconEdge,
}

impl SensorEventDetector {
    pub fn new(config: &SensorConfig) -> Self {
        let near = config.range_near_threshold;
        let far = config.range_far_threshold;
        Self {
            front_tape: TapeEdge::new(TapeSensor::Front),
            back_tape: TapeEdge::new(TapeSensor::Back),
            ranges: RangeChannel::ALL.map(|ch| RangeClassifier::new(ch, near, far)),
            bumpers: BumperDebouncer::new(config.bumper_debounce),
            wire: WireDebouncer::new(config.wire_debounce),
            beacon: BeaconEdge::new(),
        }
    }

    /// Sample every channel once.  Events land in `io` contiguously, in
    /// table order.  Returns `true` if anything fired.
    pub fn poll<IO: SensorPort + EventPort + ?Sized>(&mut self, io: &mut IO) -> bool {
        let tape = self.check_tape(io);
        let range = self.check_range(io);
        let bump = self.check_bumpers(io);
        let wire = self.check_wire(io);
        let beacon = self.check_beacon(io);
        tape | range | bump | wire | beacon
    }

    pub fn check_tape<IO: SensorPort + EventPort + ?Sized>(&mut self, io: &mut IO) -> bool {
        let mask = io.read_tape();
        let front = emit(io, self.front_tape.update(mask));
        let back = emit(io, self.back_tape.update(mask));
        front | back
    }

    pub fn check_range<IO: SensorPort + EventPort + ?Sized>(&mut self, io: &mut IO) -> bool {
        let mut fired = false;
        for classifier in &mut self.ranges {
            let reading = io.read_range(classifier.channel());
            fired |= emit(io, classifier.update(reading));
        }
        fired
    }

    pub fn check_bumpers<IO: SensorPort + EventPort + ?Sized>(&mut self, io: &mut IO) -> bool {
        let raw = io.read_bumpers();
        emit(io, self.bumpers.update(raw))
    }

    pub fn check_wire<IO: SensorPort + EventPort + ?Sized>(&mut self, io: &mut IO) -> bool {
        let contact = io.read_boundary_wire();
        emit(io, self.wire.update(contact))
    }

    pub fn check_beacon<IO: SensorPort + EventPort + ?Sized>(&mut self, io: &mut IO) -> bool {
        let present = io.read_beacon();
        emit(io, self.beacon.update(present))
    }
}

fn emit<IO: EventPort + ?Sized>(io: &mut IO, event: Option<Event>) -> bool {
    match event {
        Some(e) => {
            debug!("detector: {:?}", e);
            io.post(e);
            true
        }
        None => false,
    }
}
