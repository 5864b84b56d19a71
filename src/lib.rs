//! Bullet Hell - deterministic simulation core for a top-down arcade shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (swept collisions, entity lifecycles, encounter state machine)
//! - `tuning`: Data-driven game balance
//! - `error`: Error types surfaced by the tick loop and config loaders

pub mod error;
pub mod sim;
pub mod tuning;

pub use error::{ConfigError, PatternError, Result, SimError};
pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation rate (ticks per second)
    pub const TICK_RATE: u64 = 60;

    /// Arena dimensions
    pub const ARENA_WIDTH: f32 = 640.0;
    pub const ARENA_HEIGHT: f32 = 480.0;

    /// Player defaults
    pub const PLAYER_RADIUS: f32 = 4.0;
    pub const PLAYER_GRAZE_RADIUS: f32 = 16.0;
    pub const PLAYER_HOME_X: f32 = ARENA_WIDTH / 2.0;
    pub const PLAYER_HOME_Y: f32 = ARENA_HEIGHT * 4.0 / 5.0;
    pub const PLAYER_INITIAL_LIFE: u32 = 6;

    /// Player shot defaults
    pub const PLAYER_BULLET_RADIUS: f32 = 3.0;
    pub const PLAYER_BULLET_SPEED: f32 = 10.0; // pixels per tick, straight up
    pub const PLAYER_BULLET_SPREAD: f32 = 10.0; // lateral offset of each barrel
    pub const PLAYER_BULLET_LIFT: f32 = 3.0; // spawn this far above the player

    /// Enemy defaults
    pub const ENEMY_RADIUS: f32 = 20.0;
    pub const ENEMY_HOME_X: f32 = ARENA_WIDTH / 2.0;
    pub const ENEMY_HOME_Y: f32 = ARENA_HEIGHT / 5.0;
    pub const ENEMY_MAX_LIFE: f32 = 100.0;

    /// Enemy bullet radius
    pub const BULLET_RADIUS: f32 = 3.0;
}

/// Player respawn point
#[inline]
pub fn player_home() -> Vec2 {
    Vec2::new(consts::PLAYER_HOME_X, consts::PLAYER_HOME_Y)
}

/// Enemy resting point between phases
#[inline]
pub fn enemy_home() -> Vec2 {
    Vec2::new(consts::ENEMY_HOME_X, consts::ENEMY_HOME_Y)
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}

/// Angle of the direction from `from` toward `to` (radians, screen space)
#[inline]
pub fn aim_angle(from: Vec2, to: Vec2) -> f32 {
    let d = to - from;
    d.y.atan2(d.x)
}
