//! Game state and core simulation types
//!
//! The `World` is the single mutable root of the simulation. Everything the
//! renderer, HUD or audio layer needs is readable from here (or from a
//! serializable `Snapshot`).

use std::fmt;

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::arena::Arena;
use super::input::TickInput;
use super::lifecycle::Bounds;
use super::pattern::{FiredBullet, PatternRunner, RunnerHost};
use crate::consts::*;
use crate::error::PatternError;
use crate::tuning::Tuning;
use crate::{enemy_home, player_home};

/// Top-level mode of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameMode {
    /// Waiting to start
    Title,
    /// Active round
    Playing,
    /// Round over; animating out until restart
    GameOver,
}

/// How a round ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundOutcome {
    /// Enemy destroyed
    Cleared,
    /// Player ran out of lives
    Failed,
}

/// Things that happened during the last tick (for audio/HUD collaborators)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    ModeChanged(GameMode),
    PhaseStarted { index: usize },
    PhaseCleared { index: usize, bonus: u64 },
    EnemyExploded,
    PlayerHit { lives_left: u32 },
    Graze { pos: Vec2 },
}

/// The player's ship
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub prev_pos: Vec2,
    /// Hit radius
    pub radius: f32,
    /// Graze sensing radius (larger than the hit radius)
    pub graze_radius: f32,
    /// Invincible while `tick <= invincible_until_tick`
    pub invincible_until_tick: u64,
    pub life: u32,
    /// Struck by a bullet during the last collision pass
    pub hit: bool,
}

impl Player {
    pub fn new(tuning: &Tuning) -> Self {
        let home = player_home();
        Self {
            pos: home,
            prev_pos: home,
            radius: PLAYER_RADIUS,
            graze_radius: tuning.graze_radius,
            invincible_until_tick: 0,
            life: tuning.lives,
            hit: false,
        }
    }

    #[inline]
    pub fn is_invincible(&self, tick: u64) -> bool {
        tick <= self.invincible_until_tick
    }

    /// Can be grazed and hit this tick
    #[inline]
    pub fn is_vulnerable(&self, tick: u64) -> bool {
        !self.is_invincible(tick) && self.life > 0
    }
}

/// Enemy phase with its per-state data
pub enum EnemyPhase {
    /// Easing home until the next pattern starts
    Waiting { next_phase_start_tick: u64 },
    /// Driven by a bound pattern runner
    Running { runner: Box<dyn PatternRunner> },
    /// Life gone on the last pattern; counting down to the explosion
    Flashing { explode_tick: u64 },
    /// Destroyed
    Exploded,
}

impl fmt::Debug for EnemyPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Waiting {
                next_phase_start_tick,
            } => write!(f, "Waiting(start at {next_phase_start_tick})"),
            Self::Running { runner } => write!(f, "Running({runner:?})"),
            Self::Flashing { explode_tick } => write!(f, "Flashing(explode at {explode_tick})"),
            Self::Exploded => write!(f, "Exploded"),
        }
    }
}

/// Phase tag without the per-state data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyState {
    Waiting,
    Running,
    Flashing,
    Exploded,
}

/// The boss
#[derive(Debug)]
pub struct Enemy {
    pub pos: Vec2,
    pub prev_pos: Vec2,
    pub radius: f32,
    /// Life meter (0-100), meaningful while Running
    pub life: f32,
    /// Patterns completed so far / next pattern to bind
    pub pattern_index: usize,
    /// A player shot connected during the last collision pass
    pub hit: bool,
    pub phase: EnemyPhase,
}

impl Enemy {
    pub fn new(first_phase_tick: u64) -> Self {
        let home = enemy_home();
        Self {
            pos: home,
            prev_pos: home,
            radius: ENEMY_RADIUS,
            life: 0.0,
            pattern_index: 0,
            hit: false,
            phase: EnemyPhase::Waiting {
                next_phase_start_tick: first_phase_tick,
            },
        }
    }

    pub fn state(&self) -> EnemyState {
        match self.phase {
            EnemyPhase::Waiting { .. } => EnemyState::Waiting,
            EnemyPhase::Running { .. } => EnemyState::Running,
            EnemyPhase::Flashing { .. } => EnemyState::Flashing,
            EnemyPhase::Exploded => EnemyState::Exploded,
        }
    }

    pub fn next_phase_start_tick(&self) -> Option<u64> {
        match self.phase {
            EnemyPhase::Waiting {
                next_phase_start_tick,
            } => Some(next_phase_start_tick),
            _ => None,
        }
    }

    pub fn explode_tick(&self) -> Option<u64> {
        match self.phase {
            EnemyPhase::Flashing { explode_tick } => Some(explode_tick),
            _ => None,
        }
    }

    /// Player shots stop against the enemy (they only do damage while Running)
    pub fn absorbs_shots(&self) -> bool {
        matches!(
            self.phase,
            EnemyPhase::Waiting { .. } | EnemyPhase::Running { .. }
        )
    }

    pub fn is_defeated(&self) -> bool {
        matches!(self.phase, EnemyPhase::Exploded)
    }
}

/// Enemy-fired bullet
#[derive(Debug)]
pub struct Bullet {
    pub pos: Vec2,
    pub prev_pos: Vec2,
    pub radius: f32,
    /// Struck the player
    pub hit: bool,
    /// Graze already credited (at most once per bullet)
    pub grazed: bool,
    /// Removed by a bullet clear (phase clear or respawn)
    pub cancelled: bool,
    pub runner: Box<dyn PatternRunner>,
}

impl Bullet {
    pub fn spawn(fired: FiredBullet) -> Self {
        Self {
            pos: fired.position,
            prev_pos: fired.position,
            radius: BULLET_RADIUS,
            hit: false,
            grazed: false,
            cancelled: false,
            runner: fired.runner,
        }
    }

    /// Step the bullet's script. Cancelled bullets are frozen.
    pub fn update(
        &mut self,
        host: &dyn RunnerHost,
        rng: &mut Pcg32,
        fired: &mut Vec<FiredBullet>,
    ) -> Result<(), PatternError> {
        if self.cancelled {
            return Ok(());
        }
        self.prev_pos = self.pos;
        self.runner.advance(host, rng, fired)?;
        self.pos = self.runner.position();
        Ok(())
    }
}

/// Player shot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerBullet {
    pub pos: Vec2,
    pub prev_pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub hit: bool,
}

impl PlayerBullet {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            prev_pos: pos,
            vel: Vec2::new(0.0, -PLAYER_BULLET_SPEED),
            radius: PLAYER_BULLET_RADIUS,
            hit: false,
        }
    }
}

/// Cosmetic effect kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EffectKind {
    /// Blast while the enemy is going down
    Flash,
    /// Near miss spark
    Graze,
    /// Ring where the bullet struck the player
    BulletHit,
    /// Ring around the player on a hit
    PlayerHit,
}

/// Transient cosmetic effect
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Effect {
    pub kind: EffectKind,
    pub pos: Vec2,
    /// Radius at the end of the animation
    pub radius: f32,
    pub ticks: u32,
    pub ttl: u32,
}

impl Effect {
    fn new(kind: EffectKind, pos: Vec2, radius: f32, ttl: u32) -> Self {
        Self {
            kind,
            pos,
            radius,
            ticks: 0,
            ttl,
        }
    }

    pub fn flash(pos: Vec2) -> Self {
        Self::new(EffectKind::Flash, pos, 60.0, 30)
    }

    pub fn graze(pos: Vec2) -> Self {
        Self::new(EffectKind::Graze, pos, 12.0, 20)
    }

    pub fn bullet_hit(pos: Vec2) -> Self {
        Self::new(EffectKind::BulletHit, pos, 60.0, 60)
    }

    pub fn player_hit(pos: Vec2) -> Self {
        Self::new(EffectKind::PlayerHit, pos, 60.0, 60)
    }

    /// Animation progress (0-1)
    pub fn progress(&self) -> f32 {
        (self.ticks as f32 / self.ttl.max(1) as f32).min(1.0)
    }
}

/// Explosion debris
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fragment {
    pub pos: Vec2,
    pub vel: Vec2,
    pub ticks: u32,
}

/// Compact view of the world for HUDs and determinism checks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub tick: u64,
    pub mode: GameMode,
    pub outcome: Option<RoundOutcome>,
    pub score: u64,
    pub graze_count: u64,
    pub failures_in_phase: u32,
    pub player_pos: Vec2,
    pub player_life: u32,
    pub enemy_pos: Vec2,
    pub enemy_state: EnemyState,
    pub enemy_life: f32,
    pub pattern_index: usize,
    pub bullets: usize,
    pub player_bullets: usize,
    pub effects: usize,
    pub fragments: usize,
}

/// Complete simulation state
#[derive(Debug)]
pub struct World {
    /// Seed the RNG was created from
    pub seed: u64,
    /// Single source of randomness (pattern internals, then effect jitter)
    pub rng: Pcg32,
    pub tuning: Tuning,
    pub arena: Arena,
    pub mode: GameMode,
    /// Simulation ticks since the round started
    pub tick: u64,
    pub ticks_in_mode: u64,
    pub score: u64,
    pub graze_count: u64,
    pub failures_in_phase: u32,
    pub player: Player,
    pub enemy: Enemy,
    pub bullets: Vec<Bullet>,
    pub player_bullets: Vec<PlayerBullet>,
    pub effects: Vec<Effect>,
    pub fragments: Vec<Fragment>,
    /// Events raised during the last tick
    pub events: Vec<GameEvent>,
    pub outcome: Option<RoundOutcome>,
    /// The primary pointer currently steers the player. Dropped on a hit; a
    /// fresh touch is needed to take control again.
    pub pointer_grabbed: bool,
}

impl World {
    /// Create a world in Title mode with the given seed
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        let player = Player::new(&tuning);
        let enemy = Enemy::new(tuning.phase_delay_ticks);
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            tuning,
            arena: Arena::default(),
            mode: GameMode::Title,
            tick: 0,
            ticks_in_mode: 0,
            score: 0,
            graze_count: 0,
            failures_in_phase: 0,
            player,
            enemy,
            bullets: Vec::new(),
            player_bullets: Vec::new(),
            effects: Vec::new(),
            fragments: Vec::new(),
            events: Vec::new(),
            outcome: None,
            pointer_grabbed: false,
        }
    }

    /// Return to the startup state (Title, full life, empty collections, zero
    /// score). The RNG stream carries on so successive rounds differ.
    pub fn reset(&mut self) {
        self.player = Player::new(&self.tuning);
        self.enemy = Enemy::new(self.tuning.phase_delay_ticks);
        self.mode = GameMode::Title;
        self.tick = 0;
        self.ticks_in_mode = 0;
        self.score = 0;
        self.graze_count = 0;
        self.failures_in_phase = 0;
        self.bullets.clear();
        self.player_bullets.clear();
        self.effects.clear();
        self.fragments.clear();
        self.events.clear();
        self.outcome = None;
        self.pointer_grabbed = false;
        log::info!("World reset");
    }

    pub fn set_mode(&mut self, mode: GameMode) {
        log::info!("Mode {:?} -> {:?} at tick {}", self.mode, mode, self.tick);
        self.mode = mode;
        self.ticks_in_mode = 0;
        self.events.push(GameEvent::ModeChanged(mode));
    }

    /// Pointer movement to apply this tick, honouring the grab state
    pub fn pointer_delta(&mut self, input: &TickInput) -> Option<Vec2> {
        let pointer = input.pointer.as_ref()?;
        if pointer.just_touched {
            self.pointer_grabbed = true;
        }
        let delta = if self.pointer_grabbed {
            pointer.delta()
        } else {
            None
        };
        if pointer.just_released {
            self.pointer_grabbed = false;
        }
        delta
    }

    /// Culling bounds for the lifecycle pass
    pub fn bounds(&self) -> Bounds {
        Bounds {
            arena: self.arena,
            fragment_cull_radius: self.tuning.fragment_cull_radius,
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            tick: self.tick,
            mode: self.mode,
            outcome: self.outcome,
            score: self.score,
            graze_count: self.graze_count,
            failures_in_phase: self.failures_in_phase,
            player_pos: self.player.pos,
            player_life: self.player.life,
            enemy_pos: self.enemy.pos,
            enemy_state: self.enemy.state(),
            enemy_life: self.enemy.life,
            pattern_index: self.enemy.pattern_index,
            bullets: self.bullets.len(),
            player_bullets: self.player_bullets.len(),
            effects: self.effects.len(),
            fragments: self.fragments.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::input::Pointer;

    #[test]
    fn test_new_world_startup_state() {
        let world = World::new(42, Tuning::default());
        assert_eq!(world.mode, GameMode::Title);
        assert_eq!(world.player.life, 6);
        assert_eq!(world.score, 0);
        assert!(world.bullets.is_empty());
        assert_eq!(world.enemy.state(), EnemyState::Waiting);
        assert_eq!(world.enemy.next_phase_start_tick(), Some(180));
        assert!(world.player.graze_radius > world.player.radius);
    }

    #[test]
    fn test_reset_restores_startup_state() {
        let mut world = World::new(42, Tuning::default());
        world.mode = GameMode::GameOver;
        world.score = 1234;
        world.player.life = 0;
        world.player_bullets.push(PlayerBullet::new(Vec2::new(10.0, 10.0)));
        world.effects.push(Effect::flash(Vec2::ZERO));
        world.outcome = Some(RoundOutcome::Failed);

        world.reset();
        assert_eq!(world.mode, GameMode::Title);
        assert_eq!(world.score, 0);
        assert_eq!(world.player.life, world.tuning.lives);
        assert!(world.player_bullets.is_empty());
        assert!(world.effects.is_empty());
        assert_eq!(world.outcome, None);
    }

    #[test]
    fn test_invincibility_window() {
        let mut player = Player::new(&Tuning::default());
        player.invincible_until_tick = 200;
        assert!(player.is_invincible(200));
        assert!(!player.is_invincible(201));
        assert!(player.is_vulnerable(201));
        player.life = 0;
        assert!(!player.is_vulnerable(201));
    }

    #[test]
    fn test_pointer_needs_grab_before_moving() {
        let mut world = World::new(1, Tuning::default());
        let drag = TickInput {
            pointer: Some(Pointer {
                position: Vec2::new(15.0, 10.0),
                previous: Some(Vec2::new(10.0, 10.0)),
                just_touched: false,
                just_released: false,
            }),
        };
        // Not grabbed yet: the drag is ignored
        assert_eq!(world.pointer_delta(&drag), None);

        let touch = TickInput {
            pointer: Some(Pointer {
                position: Vec2::new(10.0, 10.0),
                previous: None,
                just_touched: true,
                just_released: false,
            }),
        };
        assert_eq!(world.pointer_delta(&touch), None);
        assert!(world.pointer_grabbed);
        assert_eq!(world.pointer_delta(&drag), Some(Vec2::new(5.0, 0.0)));
    }

    #[test]
    fn test_effect_progress() {
        let mut e = Effect::flash(Vec2::ZERO);
        assert_eq!(e.progress(), 0.0);
        e.ticks = 15;
        assert!((e.progress() - 0.5).abs() < 1e-6);
    }
}
