//! Pattern-runner contract
//!
//! Bullet motion is scripted outside the core. A runner is advanced once per
//! tick, reports where the entity it drives is, and may fire new bullets, each
//! of which comes with its own runner. Runners read the shooter and target
//! positions through `RunnerHost` instead of capturing world state.

use std::fmt;

use glam::Vec2;
use rand::RngCore;

use crate::error::PatternError;

/// Read-only view of the world a runner aims with
pub trait RunnerHost {
    /// Where bullets are fired from (the enemy)
    fn shooter_position(&self) -> Vec2;
    /// What aimed bullets aim at (the player)
    fn target_position(&self) -> Vec2;
}

/// Live accessor over the enemy and player positions
///
/// Borrows the positions rather than copying them, so every query inside one
/// `advance()` sees the world as it currently is.
#[derive(Debug, Clone, Copy)]
pub struct Aim<'a> {
    pub shooter: &'a Vec2,
    pub target: &'a Vec2,
}

impl RunnerHost for Aim<'_> {
    #[inline]
    fn shooter_position(&self) -> Vec2 {
        *self.shooter
    }

    #[inline]
    fn target_position(&self) -> Vec2 {
        *self.target
    }
}

/// A bullet fired during `advance()`; the core wraps it into a `Bullet`
#[derive(Debug)]
pub struct FiredBullet {
    pub position: Vec2,
    pub runner: Box<dyn PatternRunner>,
}

/// One scripted entity: the enemy itself, or a bullet it fired
pub trait PatternRunner: fmt::Debug {
    /// Step the script by one tick. Any bullets fired are pushed to `fired`
    /// before returning. Randomness must come from `rng` only.
    fn advance(
        &mut self,
        host: &dyn RunnerHost,
        rng: &mut dyn RngCore,
        fired: &mut Vec<FiredBullet>,
    ) -> Result<(), PatternError>;

    /// Current position of the driven entity
    fn position(&self) -> Vec2;

    /// The script has finished; the driven bullet should disappear
    fn vanished(&self) -> bool;
}

/// Ordered collection of loaded attack patterns
///
/// Loaded once at startup and passed by reference into the tick loop.
pub trait PatternSource {
    /// Number of phases in the encounter
    fn pattern_count(&self) -> usize;

    /// Start pattern `index`, returning the runner that drives the enemy
    fn bind(
        &self,
        index: usize,
        host: &dyn RunnerHost,
    ) -> Result<Box<dyn PatternRunner>, PatternError>;
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aim_reads_through_references() {
        let mut shooter = Vec2::new(1.0, 2.0);
        let target = Vec2::new(3.0, 4.0);
        {
            let aim = Aim {
                shooter: &shooter,
                target: &target,
            };
            assert_eq!(aim.shooter_position(), Vec2::new(1.0, 2.0));
            assert_eq!(aim.target_position(), Vec2::new(3.0, 4.0));
        }
        shooter.x = 10.0;
        let aim = Aim {
            shooter: &shooter,
            target: &target,
        };
        assert_eq!(aim.shooter_position().x, 10.0);
    }
}
