//! Orientation and wheel-command mirroring.
//!
//! Every wheel pair in the configuration is authored for a robot that
//! starts with the wall on its **right**.  A left start swaps the two
//! wheels, and the leading/trailing range sensors swap with them.  All
//! wheel commands in the controller and the maneuvers go through
//! [`WheelPair::mirrored`], so the two starts behave identically.

use log::warn;
use serde::{Deserialize, Serialize};

use crate::app::ports::ActuatorPort;
use crate::events::RangeChannel;

/// Which side of the robot faces the wall.  Sampled once from the
/// selector switch at mission start, flipped by collision recovery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn flip(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// The forward-facing range sensor on the wall side.
    pub fn leading_sensor(self) -> RangeChannel {
        match self {
            Self::Left => RangeChannel::FrontLeft,
            Self::Right => RangeChannel::FrontRight,
        }
    }

    /// The rear-mounted side range sensor on the wall side.
    pub fn trailing_sensor(self) -> RangeChannel {
        match self {
            Self::Left => RangeChannel::Left,
            Self::Right => RangeChannel::Right,
        }
    }
}

/// Physical wheel (drive or launcher) position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Wheel {
    Left,
    Right,
}

/// Signed speed command for both wheels, each in [-1000, 1000].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WheelPair {
    pub left: i16,
    pub right: i16,
}

impl WheelPair {
    pub const STOP: Self = Self::new(0, 0);

    pub const fn new(left: i16, right: i16) -> Self {
        Self { left, right }
    }

    /// Translate a right-authored pair into the command for `side`.
    pub fn mirrored(self, side: Side) -> Self {
        let (left, right) = mirror(side, self.left, self.right);
        Self { left, right }
    }

    /// Both magnitudes within the actuator contract.
    pub fn in_range(self) -> bool {
        speed_in_range(self.left) && speed_in_range(self.right)
    }
}

/// Largest accepted speed magnitude for wheel and launcher motors.
pub const MAX_SPEED: i16 = 1000;

pub fn speed_in_range(speed: i16) -> bool {
    (-MAX_SPEED..=MAX_SPEED).contains(&speed)
}

/// `(left, right)` as authored for [`Side::Right`] → the command for `side`.
pub fn mirror(side: Side, left: i16, right: i16) -> (i16, i16) {
    match side {
        Side::Right => (left, right),
        Side::Left => (right, left),
    }
}

/// Mirror `pair` for `side` and send it to the drive wheels.
///
/// A rejected wheel is logged and left as it was; the mission keeps going.
pub fn drive<A: ActuatorPort + ?Sized>(io: &mut A, side: Side, pair: WheelPair) {
    let cmd = pair.mirrored(side);
    if let Err(e) = io.set_wheel_speed(Wheel::Left, cmd.left) {
        warn!("drive: left wheel rejected: {}", e);
    }
    if let Err(e) = io.set_wheel_speed(Wheel::Right, cmd.right) {
        warn!("drive: right wheel rejected: {}", e);
    }
}

/// Spin both launcher wheels at `speed`.
pub fn spin_launcher<A: ActuatorPort + ?Sized>(io: &mut A, speed: i16) {
    for wheel in [Wheel::Left, Wheel::Right] {
        if let Err(e) = io.set_launcher_speed(wheel, speed) {
            warn!("launcher: {:?} rejected: {}", wheel, e);
        }
    }
}
