//! Mission context threaded through every state handler.
//!
//! `MissionContext` is the single long-lived record of cross-phase state.
//! Only the handler processing the current event writes it; maneuvers
//! get `side` by value and never see the rest.

use crate::drive::Side;

use super::Phase;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissionContext {
    /// Wall side.  Sampled at start, flipped only by collision recovery.
    pub side: Side,
    /// Current top-level phase (mirrors the engine's pointer).
    pub phase: Phase,
    /// Where an alignment detour returns to.
    pub last_phase: Phase,

    // -- Mode flags --
    /// A collision happened this lap; retired at Reload.
    pub collision_detected: bool,
    /// The guide-tape timer has expired, so the back tape counts.
    pub tape_armed: bool,
    pub near_done: bool,
    pub mid_done: bool,
    pub far_done: bool,

    // -- Pivot latches --
    /// Front-left sensor reported far during the current pivot.
    pub left_front_seen: bool,
    /// Front-right sensor reported far during the current pivot.
    pub right_front_seen: bool,
}

impl MissionContext {
    pub fn new(side: Side) -> Self {
        Self {
            side,
            phase: Phase::Init,
            last_phase: Phase::FollowWall,
            collision_detected: false,
            tape_armed: false,
            near_done: false,
            mid_done: false,
            far_done: false,
            left_front_seen: false,
            right_front_seen: false,
        }
    }

    /// Clear every one-shot flag of the lap.  `side`, `phase`, and
    /// `collision_detected` are left alone.
    pub fn reset_lap(&mut self) {
        self.tape_armed = false;
        self.near_done = false;
        self.mid_done = false;
        self.far_done = false;
        self.clear_latches();
    }

    pub fn clear_latches(&mut self) {
        self.left_front_seen = false;
        self.right_front_seen = false;
    }

    /// Latch for the leading sensor on the current side.
    pub fn front_seen(&self) -> bool {
        match self.side {
            Side::Left => self.left_front_seen,
            Side::Right => self.right_front_seen,
        }
    }

    pub fn set_front_seen(&mut self) {
        match self.side {
            Side::Left => self.left_front_seen = true,
            Side::Right => self.right_front_seen = true,
        }
    }

    /// True when every one-shot flag holds its initial value.
    pub fn lap_flags_clear(&self) -> bool {
        !(self.tape_armed
            || self.near_done
            || self.mid_done
            || self.far_done
            || self.left_front_seen
            || self.right_front_seen)
    }
}
