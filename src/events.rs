//! Mission events and the dispatch queue.
//!
//! Events are produced by:
//! - the sensor event detector (tape, range, bumper, wire, beacon edges)
//! - timer expiry (poll period, lap timers, maneuver timers)
//! - the service at start-up (`Init`)
//!
//! They are consumed one at a time, in enqueue order, by the mission
//! controller.
//!
//! ```text
//! ┌──────────────┐     ┌──────────────┐     ┌────────────────────┐
//! │ Detector     │────▶│              │     │                    │
//! │ TimerBank    │────▶│  EventQueue  │────▶│ MissionController  │
//! │ Service      │────▶│  (FIFO, 32)  │     │ (one at a time)    │
//! └──────────────┘     └──────────────┘     └────────────────────┘
//! ```

use heapless::Deque;
use log::warn;

use crate::maneuver::Maneuver;
use crate::timers::TimerId;

/// Maximum number of pending events.
pub const EVENT_QUEUE_CAP: usize = 32;

// ── Sensor identities ─────────────────────────────────────────

/// Reflective tape sensor under the chassis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TapeSensor {
    Front,
    Back,
}

/// Analog range channel.  `Left`/`Right` are the rear-mounted side
/// sensors; lower readings are closer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RangeChannel {
    Left,
    Right,
    FrontLeft,
    FrontRight,
}

impl RangeChannel {
    pub const ALL: [Self; 4] = [Self::Left, Self::Right, Self::FrontLeft, Self::FrontRight];

    pub fn is_front(self) -> bool {
        matches!(self, Self::FrontLeft | Self::FrontRight)
    }
}

/// Two-bit tape contact mask, as read from the tape port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TapeMask(pub u8);

impl TapeMask {
    pub const FRONT: u8 = 0b10;
    pub const BACK: u8 = 0b01;

    pub fn contains(self, sensor: TapeSensor) -> bool {
        let bit = match sensor {
            TapeSensor::Front => Self::FRONT,
            TapeSensor::Back => Self::BACK,
        };
        self.0 & bit != 0
    }
}

/// Four-bit bumper mask.  A zero mask means no contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct BumperMask(pub u8);

impl BumperMask {
    pub const NONE: Self = Self(0);
    pub const FRONT_LEFT: u8 = 0b1000;
    pub const FRONT_RIGHT: u8 = 0b0100;
    pub const BACK_LEFT: u8 = 0b0010;
    pub const BACK_RIGHT: u8 = 0b0001;

    pub fn any(self) -> bool {
        self.0 & 0b1111 != 0
    }

    pub fn any_front(self) -> bool {
        self.0 & (Self::FRONT_LEFT | Self::FRONT_RIGHT) != 0
    }

    pub fn any_back(self) -> bool {
        self.0 & (Self::BACK_LEFT | Self::BACK_RIGHT) != 0
    }
}

// ── Event ─────────────────────────────────────────────────────

/// A discrete notification, produced once and consumed once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// Posted once when the mission starts.
    Init,
    TapeTripped(TapeSensor),
    TapeUntripped(TapeSensor),
    /// Reading dropped below the near threshold.
    WallInRange(RangeChannel),
    /// Reading rose above the far threshold.
    WallFar(RangeChannel),
    /// Debounced bumper mask changed; carries the new stable mask.
    Bumped(BumperMask),
    OnWire,
    OffWire,
    BeaconPresent,
    BeaconAbsent,
    Timeout(TimerId),
    /// Synthesised by a maneuver when it has turned back.
    ManeuverDone(Maneuver),
}

// ── Queue ─────────────────────────────────────────────────────

/// Fixed-capacity FIFO feeding the controller.
pub struct EventQueue {
    events: Deque<Event, EVENT_QUEUE_CAP>,
    dropped: u32,
}

impl EventQueue {
    pub const fn new() -> Self {
        Self {
            events: Deque::new(),
            dropped: 0,
        }
    }

    /// Enqueue `event`.  Returns `false` if the queue is full (event dropped).
    pub fn post(&mut self, event: Event) -> bool {
        match self.events.push_back(event) {
            Ok(()) => true,
            Err(lost) => {
                self.dropped = self.dropped.saturating_add(1);
                warn!("event queue full, dropped {:?}", lost);
                false
            }
        }
    }

    /// Oldest pending event, if any.
    pub fn pop(&mut self) -> Option<Event> {
        self.events.pop_front()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    /// Events lost to a full queue since construction.
    pub fn dropped(&self) -> u32 {
        self.dropped
    }
}

impl Default for EventQueue {
    fn default() -> Self {
        Self::new()
    }
}
