//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only, consumed in a fixed order
//! - Stable iteration order (collections keep insertion order)
//! - No rendering or platform dependencies

pub mod arena;
pub mod barrage;
pub mod collision;
pub mod enemy;
pub mod input;
pub mod lifecycle;
pub mod pattern;
pub mod player;
pub mod state;
pub mod tick;

pub use arena::Arena;
pub use barrage::{BarrageSet, BarrageSpec};
pub use collision::collide;
pub use input::{Pointer, PointerTracker, TickInput};
pub use pattern::{Aim, FiredBullet, PatternRunner, PatternSource, RunnerHost};
pub use state::{
    Bullet, Effect, EffectKind, Enemy, EnemyPhase, EnemyState, Fragment, GameEvent, GameMode,
    Player, PlayerBullet, RoundOutcome, Snapshot, World,
};
pub use tick::tick;
