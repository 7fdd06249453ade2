//! One-shot timer bank.
//!
//! One slot per [`TimerId`].  Starting a running timer re-arms it, so two
//! instances of the same timer can never coexist.  The bank knows nothing
//! about the controller: expiries are handed to an [`EventPort`] as
//! `Event::Timeout(id)`, the service points that at the event queue.
//!
//! ```text
//!  start(id, n) ──▶ ┌──────────────┐  advance(1) × n  ┌────────────┐
//!  stop(id)     ──▶ │  TimerBank   │ ───────────────▶ │ EventPort  │
//!                   │ [Option<u32>]│  Timeout(id)     │ (queue)    │
//!                   └──────────────┘                  └────────────┘
//! ```

use log::debug;

use crate::app::ports::EventPort;
use crate::events::Event;

// ═══════════════════════════════════════════════════════════════
//  Timer identity
// ═══════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TimerId {
    /// Fixed-period sensor poll.
    SensorPoll = 0,
    /// Arms the back-tape trigger once it expires.
    GuideTape = 1,
    /// Short forward (or reverse) creep.
    MoveForward = 2,
    /// Bounds Pivot and the alignment phases.
    WallTimeout = 3,
    /// Spin or creep after a collision.
    Realign = 4,
    Reload = 5,
    NearTurn = 6,
    MidTurn = 7,
    FarTurn = 8,
    /// Release gate hold time.
    BallRelease = 9,
    /// Total time for one shot.
    Shot = 10,
}

impl TimerId {
    pub const COUNT: usize = 11;

    pub const ALL: [Self; Self::COUNT] = [
        Self::SensorPoll,
        Self::GuideTape,
        Self::MoveForward,
        Self::WallTimeout,
        Self::Realign,
        Self::Reload,
        Self::NearTurn,
        Self::MidTurn,
        Self::FarTurn,
        Self::BallRelease,
        Self::Shot,
    ];
}

// ═══════════════════════════════════════════════════════════════
//  Timer bank
// ═══════════════════════════════════════════════════════════════

pub struct TimerBank {
    /// Ticks remaining per timer, indexed by `TimerId as usize`.
    remaining: [Option<u32>; TimerId::COUNT],
    /// Free-running tick counter (wraps).
    now: u32,
}

impl TimerBank {
    pub fn new() -> Self {
        Self {
            remaining: [None; TimerId::COUNT],
            now: 0,
        }
    }

    /// Arm `id` to expire after `ticks`.  Re-arms a running timer.
    /// A zero duration expires on the next tick.
    pub fn start(&mut self, id: TimerId, ticks: u32) {
        self.remaining[id as usize] = Some(ticks.max(1));
    }

    /// Cancel `id`.  No-op if it is not running.
    pub fn stop(&mut self, id: TimerId) {
        self.remaining[id as usize] = None;
    }

    pub fn is_running(&self, id: TimerId) -> bool {
        self.remaining[id as usize].is_some()
    }

    pub fn remaining(&self, id: TimerId) -> Option<u32> {
        self.remaining[id as usize]
    }

    pub fn now(&self) -> u32 {
        self.now
    }

    /// Move time forward by `ticks`, one tick at a time, posting a
    /// `Timeout` for every expiry.  Timers expiring on the same tick are
    /// posted in `TimerId` order.  Returns the number of expiries.
    pub fn advance(&mut self, ticks: u32, sink: &mut (impl EventPort + ?Sized)) -> usize {
        let mut fired = 0;
        for _ in 0..ticks {
            self.now = self.now.wrapping_add(1);
            for id in TimerId::ALL {
                let slot = &mut self.remaining[id as usize];
                match *slot {
                    Some(n) if n <= 1 => {
                        *slot = None;
                        debug!("timer {:?} expired at {}", id, self.now);
                        sink.post(Event::Timeout(id));
                        fired += 1;
                    }
                    Some(n) => *slot = Some(n - 1),
                    None => {}
                }
            }
        }
        fired
    }
}

impl Default for TimerBank {
    fn default() -> Self {
        Self::new()
    }
}

// ═══════════════════════════════════════════════════════════════
//  Tests
// ═══════════════════════════════════════════════════════════════
