//! Data-driven game balance
//!
//! Every gameplay constant that a designer might want to tweak lives here.
//! Loaded from JSON at startup and then passed around read-only.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::{PLAYER_GRAZE_RADIUS, PLAYER_INITIAL_LIFE, PLAYER_RADIUS};
use crate::error::ConfigError;

/// Gameplay tuning values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Player ===
    /// Lives at round start
    pub lives: u32,
    /// Invincibility window after a hit (ticks)
    pub invincible_ticks: u64,
    /// Autofire fires on ticks that are a multiple of this
    pub autofire_interval: u64,
    /// Graze sensing radius (must exceed the hit radius)
    pub graze_radius: f32,

    // === Scoring ===
    /// Score per graze
    pub graze_score: u64,
    /// Base bonus for clearing a phase
    pub clear_bonus: i64,
    /// Added to the clear bonus once per failure in the phase (negative)
    pub failure_penalty: i64,

    // === Enemy ===
    /// Life removed on a tick in which at least one player shot connected
    pub enemy_damage_per_hit: f32,
    /// Pause between phases (ticks)
    pub phase_delay_ticks: u64,
    /// Flashing countdown before the explosion (ticks)
    pub explode_delay_ticks: u64,
    /// Divisor of the remaining distance covered per tick when easing home
    pub enemy_ease: f32,
    /// Flash cadence while the enemy is going down (ticks)
    pub flash_interval: u64,
    /// Max flash offset from the enemy centre on each axis
    pub flash_jitter: f32,
    /// Fragments emitted by the explosion
    pub fragment_count: u32,
    /// Fragments further than this from the arena centre are dropped
    pub fragment_cull_radius: f32,

    // === Round flow ===
    /// Bullets this close to the player's home are cleared on a hit
    pub mercy_clear_radius: f32,
    /// Ticks in game over before a touch restarts the round
    pub restart_delay_ticks: u64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            // Player
            lives: PLAYER_INITIAL_LIFE,
            invincible_ticks: 180,
            autofire_interval: 5,
            graze_radius: PLAYER_GRAZE_RADIUS,

            // Scoring
            graze_score: 10,
            clear_bonus: 10_000,
            failure_penalty: -2_000,

            // Enemy
            enemy_damage_per_hit: 0.5,
            phase_delay_ticks: 180,
            explode_delay_ticks: 120,
            enemy_ease: 60.0,
            flash_interval: 15,
            flash_jitter: 25.0,
            fragment_count: 50,
            fragment_cull_radius: 500.0,

            // Round flow
            mercy_clear_radius: 300.0,
            restart_delay_ticks: 300,
        }
    }
}

impl Tuning {
    /// Parse and validate tuning from JSON. Missing keys take default values.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load tuning from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }

    /// Serialize to pretty JSON (for dumping the effective config)
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values that would break simulation invariants
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: &str| Err(ConfigError::Invalid(msg.to_string()));

        if self.lives == 0 {
            return invalid("lives must be at least 1");
        }
        if !(self.graze_radius > PLAYER_RADIUS) {
            return invalid("graze_radius must exceed the player hit radius");
        }
        if self.autofire_interval == 0 || self.flash_interval == 0 {
            return invalid("autofire_interval and flash_interval must be non-zero");
        }
        // The next phase and the explosion are scheduled for a later tick
        if self.phase_delay_ticks == 0 || self.explode_delay_ticks == 0 {
            return invalid("phase_delay_ticks and explode_delay_ticks must be non-zero");
        }
        if self.clear_bonus < 0 || self.failure_penalty > 0 {
            return invalid("clear_bonus must be >= 0 and failure_penalty <= 0");
        }
        if !(self.enemy_damage_per_hit > 0.0 && self.enemy_damage_per_hit.is_finite()) {
            return invalid("enemy_damage_per_hit must be positive");
        }
        if !(self.enemy_ease >= 1.0 && self.enemy_ease.is_finite()) {
            return invalid("enemy_ease must be >= 1");
        }
        if !(self.flash_jitter >= 0.0
            && self.fragment_cull_radius > 0.0
            && self.mercy_clear_radius >= 0.0)
        {
            return invalid("radii must be non-negative");
        }
        Ok(())
    }
}
