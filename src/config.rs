//! Mission configuration parameters
//!
//! Every threshold, debounce depth, timer duration, and wheel-speed pair
//! the mission uses.  Durations are in framework ticks (1 ms).  Wheel
//! pairs are `(left, right)` authored for a right-side start; see
//! [`crate::drive`] for mirroring.
//!
//! The document is JSON (serde); missing fields fall back to defaults.

use serde::{Deserialize, Serialize};

use crate::drive::{WheelPair, speed_in_range};
use crate::error::ConfigError;

/// Sensor polling and classification.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SensorConfig {
    /// Detector poll period (ticks)
    pub poll_period_ticks: u32,
    /// Range reading below this is "in range"
    pub range_near_threshold: u16,
    /// Range reading above this is "far"
    pub range_far_threshold: u16,
    /// Consecutive identical bumper samples before a mask is accepted
    pub bumper_debounce: u8,
    /// Consecutive contact samples before "on wire"
    pub wire_debounce: u8,
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            poll_period_ticks: 3,
            range_near_threshold: 250,
            range_far_threshold: 450,
            bumper_debounce: 6,
            wire_debounce: 4,
        }
    }
}

/// Lap timers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Delay after the beacon is found before the back tape counts
    pub guide_tape_ticks: u32,
    /// Creep past the tape before the near shot
    pub creep_ticks: u32,
    pub reload_ticks: u32,
    /// Pivot / align give-up time
    pub wall_timeout_ticks: u32,
    /// Spin or creep after a collision
    pub realign_ticks: u32,
    /// Stationary hold before a near or mid shot turns
    pub settle_ticks: u32,
    /// Release gate open time
    pub release_hold_ticks: u32,
    /// Total time for one shot
    pub shot_ticks: u32,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            guide_tape_ticks: 2000,
            creep_ticks: 500,
            reload_ticks: 4000,
            wall_timeout_ticks: 3000,
            realign_ticks: 800,
            settle_ticks: 200,
            release_hold_ticks: 600,
            shot_ticks: 1000,
        }
    }
}

/// Wheel commands per phase, `(left, right)` for a right-side start.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeedTable {
    pub spin: WheelPair,
    pub creep: WheelPair,
    pub find_wall: WheelPair,
    pub pivot: WheelPair,
    pub follow: WheelPair,
    pub align_front: WheelPair,
    pub reverse: WheelPair,
    pub align_rear: WheelPair,
    pub reverse_creep: WheelPair,
    /// Both launcher wheels
    pub launcher: i16,
}

impl Default for SpeedTable {
    fn default() -> Self {
        Self {
            spin: WheelPair::new(1000, -1000),
            creep: WheelPair::new(500, 500),
            find_wall: WheelPair::new(500, 250),
            pivot: WheelPair::new(0, 300),
            follow: WheelPair::new(400, 1000),
            align_front: WheelPair::new(1000, 400),
            reverse: WheelPair::new(-300, -500),
            align_rear: WheelPair::new(-500, -300),
            reverse_creep: WheelPair::new(-500, -500),
            launcher: -300,
        }
    }
}

/// How the near maneuver picks its turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AimMode {
    /// Turn for a fixed tick count.
    Fixed,
    /// Sweep until the beacon is seen; the sweep time sets the turn back.
    BeaconReferenced,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NearShotConfig {
    pub aim: AimMode,
    pub turn_ticks: u32,
    /// Balls released per maneuver
    pub shots: u8,
    /// Launcher recovery between shots
    pub second_shot_delay_ticks: u32,
    pub turn_back_offset_ticks: u32,
    pub turn: WheelPair,
    pub turn_back: WheelPair,
    /// Beacon-referenced sweep
    pub sweep: WheelPair,
    pub sweep_timeout_ticks: u32,
    /// Turn-back ticks = sweep ticks × gain_num / gain_den + offset
    pub gain_num: u32,
    pub gain_den: u32,
}

impl Default for NearShotConfig {
    fn default() -> Self {
        Self {
            aim: AimMode::Fixed,
            turn_ticks: 100,
            shots: 2,
            second_shot_delay_ticks: 1200,
            turn_back_offset_ticks: 40,
            turn: WheelPair::new(-100, 500),
            turn_back: WheelPair::new(100, -400),
            sweep: WheelPair::new(-300, 300),
            sweep_timeout_ticks: 2000,
            gain_num: 1,
            gain_den: 1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MidShotConfig {
    pub turn_ticks: u32,
    /// Used when the trailing sensor reads closer than `close_threshold`
    pub short_turn_ticks: u32,
    pub close_threshold: u16,
    pub turn_back_offset_ticks: u32,
    pub turn: WheelPair,
    pub turn_back: WheelPair,
}

impl Default for MidShotConfig {
    fn default() -> Self {
        Self {
            turn_ticks: 50,
            short_turn_ticks: 10,
            close_threshold: 450,
            turn_back_offset_ticks: 40,
            turn: WheelPair::new(0, 300),
            turn_back: WheelPair::new(0, -300),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FarShotConfig {
    /// Reinstates the third scoring maneuver
    pub enabled: bool,
    pub turn_ticks: u32,
    pub turn_back_offset_ticks: u32,
    pub turn: WheelPair,
    pub turn_back: WheelPair,
}

impl Default for FarShotConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            turn_ticks: 200,
            turn_back_offset_ticks: 100,
            turn: WheelPair::new(-100, 500),
            turn_back: WheelPair::new(100, -400),
        }
    }
}

/// Complete mission configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MissionConfig {
    pub sensors: SensorConfig,
    pub timing: TimingConfig,
    pub speeds: SpeedTable,
    pub near: NearShotConfig,
    pub mid: MidShotConfig,
    pub far: FarShotConfig,
}

impl MissionConfig {
    /// Parse a JSON document and validate it.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json).map_err(|_| ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would make the mission misbehave.
    /// Invalid values are refused, never clamped.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let s = &self.sensors;
        check(s.poll_period_ticks > 0, "poll_period_ticks must be > 0")?;
        check(
            s.range_near_threshold < s.range_far_threshold,
            "range_near_threshold must be below range_far_threshold",
        )?;
        check(s.bumper_debounce > 0, "bumper_debounce must be > 0")?;
        check(s.wire_debounce > 0, "wire_debounce must be > 0")?;

        let t = &self.timing;
        for ticks in [
            t.guide_tape_ticks,
            t.creep_ticks,
            t.reload_ticks,
            t.wall_timeout_ticks,
            t.realign_ticks,
            t.settle_ticks,
            t.release_hold_ticks,
            t.shot_ticks,
        ] {
            check(ticks > 0, "timer durations must be > 0")?;
        }
        check(
            t.release_hold_ticks < t.shot_ticks,
            "release_hold_ticks must be shorter than shot_ticks",
        )?;

        let v = &self.speeds;
        for pair in [
            v.spin,
            v.creep,
            v.find_wall,
            v.pivot,
            v.follow,
            v.align_front,
            v.reverse,
            v.align_rear,
            v.reverse_creep,
            self.near.turn,
            self.near.turn_back,
            self.near.sweep,
            self.mid.turn,
            self.mid.turn_back,
            self.far.turn,
            self.far.turn_back,
        ] {
            check(pair.in_range(), "wheel speeds must be within [-1000, 1000]")?;
        }
        check(speed_in_range(v.launcher), "launcher speed must be within [-1000, 1000]")?;

        check(self.near.shots > 0, "near.shots must be > 0")?;
        check(self.near.gain_den > 0, "near.gain_den must be > 0")?;
        check(self.near.turn_ticks > 0, "near.turn_ticks must be > 0")?;
        check(self.near.sweep_timeout_ticks > 0, "near.sweep_timeout_ticks must be > 0")?;
        check(self.mid.turn_ticks > 0, "mid.turn_ticks must be > 0")?;
        check(self.mid.short_turn_ticks > 0, "mid.short_turn_ticks must be > 0")?;
        check(self.far.turn_ticks > 0, "far.turn_ticks must be > 0")?;
        Ok(())
    }
}

fn check(ok: bool, reason: &'static str) -> Result<(), ConfigError> {
    if ok { Ok(()) } else { Err(ConfigError::ValidationFailed(reason)) }
}
