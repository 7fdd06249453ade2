//! Application service, the hexagonal core.
//!
//! [`MissionService`] owns the mission controller, the event queue, and
//! the timer bank.  It is the run-to-completion loop: every elapsed tick
//! advances the timers, and every queued event is handled to completion
//! before the next one is taken.  Hardware is injected at call sites
//! through the port traits, making the whole loop testable with mocks.
//!
//! ```text
//!  SensorPort ──▶ ┌──────────────────────────────┐ ──▶ EventSink
//!                 │        MissionService        │
//! ActuatorPort ◀──│  Controller · Queue · Timers │
//!                 └──────────────────────────────┘
//! ```

use log::{debug, info};

use crate::config::MissionConfig;
use crate::drive::{Side, Wheel};
use crate::error::{ActuatorError, Result};
use crate::events::{BumperMask, Event, EventQueue, RangeChannel, TapeMask};
use crate::fsm::context::MissionContext;
use crate::fsm::{MissionController, Phase};
use crate::timers::{TimerBank, TimerId};

use super::events::MissionEvent;
use super::ports::{ActuatorPort, EventPort, EventSink, ReleaseGate, SensorPort, TimerPort};

// ───────────────────────────────────────────────────────────────
// Port bundle
// ───────────────────────────────────────────────────────────────

/// Joins the injected hardware with the service's own timers and queue
/// so the controller sees a single [`MissionIo`](super::ports::MissionIo).
struct Bus<'a, H: ?Sized> {
    hw: &'a mut H,
    timers: &'a mut TimerBank,
    queue: &'a mut EventQueue,
}

impl<H: SensorPort + ?Sized> SensorPort for Bus<'_, H> {
    fn read_tape(&mut self) -> TapeMask {
        self.hw.read_tape()
    }

    fn read_range(&mut self, channel: RangeChannel) -> u16 {
        self.hw.read_range(channel)
    }

    fn read_bumpers(&mut self) -> BumperMask {
        self.hw.read_bumpers()
    }

    fn read_boundary_wire(&mut self) -> bool {
        self.hw.read_boundary_wire()
    }

    fn read_beacon(&mut self) -> bool {
        self.hw.read_beacon()
    }

    fn read_side_selector(&mut self) -> Side {
        self.hw.read_side_selector()
    }
}

impl<H: ActuatorPort + ?Sized> ActuatorPort for Bus<'_, H> {
    fn set_wheel_speed(&mut self, wheel: Wheel, speed: i16) -> core::result::Result<(), ActuatorError> {
        self.hw.set_wheel_speed(wheel, speed)
    }

    fn set_launcher_speed(&mut self, wheel: Wheel, speed: i16) -> core::result::Result<(), ActuatorError> {
        self.hw.set_launcher_speed(wheel, speed)
    }

    fn set_release(&mut self, gate: ReleaseGate) {
        self.hw.set_release(gate);
    }
}

impl<H: ?Sized> TimerPort for Bus<'_, H> {
    fn start_timer(&mut self, id: TimerId, ticks: u32) {
        self.timers.start(id, ticks);
    }

    fn stop_timer(&mut self, id: TimerId) {
        self.timers.stop(id);
    }

    fn now(&self) -> u32 {
        self.timers.now()
    }
}

impl<H: ?Sized> EventPort for Bus<'_, H> {
    fn post(&mut self, event: Event) -> bool {
        self.queue.post(event)
    }
}

// ───────────────────────────────────────────────────────────────
// MissionService
// ───────────────────────────────────────────────────────────────

pub struct MissionService {
    controller: MissionController,
    queue: EventQueue,
    timers: TimerBank,
    /// Events handled since startup.
    handled: u64,
}

impl MissionService {
    /// Validate `config` and build the service.
    ///
    /// Does **not** start the mission; call [`start`](Self::start) next.
    pub fn new(config: MissionConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            controller: MissionController::new(config, Side::Right),
            queue: EventQueue::new(),
            timers: TimerBank::new(),
            handled: 0,
        })
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Sample the side selector, start the controller, and handle the
    /// initial event.
    pub fn start<H>(&mut self, hw: &mut H, sink: &mut impl EventSink)
    where
        H: SensorPort + ActuatorPort + ?Sized,
    {
        self.queue.clear();
        let mut bus = Bus {
            hw: &mut *hw,
            timers: &mut self.timers,
            queue: &mut self.queue,
        };
        self.controller.start(&mut bus);
        let side = self.controller.context().side;
        sink.emit(&MissionEvent::Started { side });
        info!("MissionService started, side={:?}", side);
        self.drain(hw, sink);
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Advance time by `elapsed` ticks, handling whatever fires after
    /// each one.  Returns the number of events handled.
    pub fn tick<H>(&mut self, elapsed: u32, hw: &mut H, sink: &mut impl EventSink) -> usize
    where
        H: SensorPort + ActuatorPort + ?Sized,
    {
        let mut handled = 0;
        for _ in 0..elapsed {
            self.timers.advance(1, &mut self.queue);
            handled += self.drain(hw, sink);
        }
        handled
    }

    /// Queue an event from outside the loop (e.g. a test harness or an
    /// interrupt hand-off).  Handled on the next [`tick`](Self::tick) or
    /// [`drain`](Self::drain).
    pub fn post(&mut self, event: Event) -> bool {
        self.queue.post(event)
    }

    /// Handle every queued event, including ones posted while handling.
    pub fn drain<H>(&mut self, hw: &mut H, sink: &mut impl EventSink) -> usize
    where
        H: SensorPort + ActuatorPort + ?Sized,
    {
        let mut bus = Bus {
            hw,
            timers: &mut self.timers,
            queue: &mut self.queue,
        };
        let mut count = 0;
        while let Some(event) = bus.queue.pop() {
            let from = self.controller.phase();
            let side = self.controller.context().side;
            debug!("handle {:?} in {}", event, self.controller.phase_name());

            if let Some(kind) = self.controller.handle(&event, &mut bus) {
                sink.emit(&MissionEvent::ManeuverCompleted(kind));
            }

            let to = self.controller.phase();
            if to != from {
                sink.emit(&MissionEvent::PhaseChanged { from, to });
            }
            let flipped = self.controller.context().side;
            if flipped != side {
                sink.emit(&MissionEvent::SideFlipped(flipped));
            }
            count += 1;
        }
        self.handled += count as u64;
        count
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn phase(&self) -> Phase {
        self.controller.phase()
    }

    pub fn context(&self) -> &MissionContext {
        self.controller.context()
    }

    pub fn controller(&self) -> &MissionController {
        &self.controller
    }

    pub fn pending_events(&self) -> usize {
        self.queue.len()
    }

    /// Events lost to a full queue since startup.
    pub fn dropped_events(&self) -> u32 {
        self.queue.dropped()
    }

    pub fn timer_remaining(&self, id: TimerId) -> Option<u32> {
        self.timers.remaining(id)
    }

    /// Ticks elapsed since construction.
    pub fn now(&self) -> u32 {
        self.timers.now()
    }

    pub fn events_handled(&self) -> u64 {
        self.handled
    }
}
