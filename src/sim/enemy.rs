//! Enemy encounter state machine
//!
//! Waiting -> Running -> (Waiting -> Running)* -> Flashing -> Exploded.
//! Each Running phase is driven by one bound pattern runner. Depleting the
//! life meter clears the screen, pays the phase bonus and moves on to the
//! next pattern, or starts the explosion countdown after the last one.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;

use super::collision::collide;
use super::pattern::{Aim, PatternSource};
use super::player;
use super::state::{Bullet, Effect, EnemyPhase, Fragment, GameEvent, World};
use crate::consts::ENEMY_MAX_LIFE;
use crate::error::SimError;
use crate::{enemy_home, polar_to_cartesian};

/// Phase change decided during the per-state update
enum Transition {
    Bind,
    Deplete,
    Explode,
}

/// Player shots against the enemy
///
/// Shots are absorbed while Waiting or Running and fly through once the enemy
/// is going down. The enemy takes at most one hit flag per tick.
pub fn resolve_shots(world: &mut World) {
    let enemy = &mut world.enemy;
    if !enemy.absorbs_shots() {
        return;
    }
    for shot in world.player_bullets.iter_mut().filter(|s| !s.hit) {
        if collide(shot.pos, shot.prev_pos, shot.radius, enemy.pos, enemy.prev_pos, enemy.radius) {
            shot.hit = true;
            enemy.hit = true;
        }
    }
}

fn ease_home(pos: &mut Vec2, ease: f32) {
    *pos += (enemy_home() - *pos) / ease;
}

/// Advance the enemy one tick
///
/// Fails only if a pattern cannot be bound or its runner faults.
pub fn update(world: &mut World, patterns: &dyn PatternSource) -> Result<(), SimError> {
    let tick = world.tick;
    let hit = std::mem::take(&mut world.enemy.hit);
    if world.enemy.is_defeated() {
        return Ok(());
    }
    world.enemy.prev_pos = world.enemy.pos;

    let mut fired = Vec::new();
    let transition = match &mut world.enemy.phase {
        EnemyPhase::Waiting {
            next_phase_start_tick,
        } => {
            ease_home(&mut world.enemy.pos, world.tuning.enemy_ease);
            (tick == *next_phase_start_tick).then_some(Transition::Bind)
        }
        EnemyPhase::Running { runner } => {
            if hit {
                world.enemy.life = (world.enemy.life - world.tuning.enemy_damage_per_hit).max(0.0);
            }
            let aim = Aim {
                shooter: &world.enemy.pos,
                target: &world.player.pos,
            };
            runner.advance(&aim, &mut world.rng, &mut fired)?;
            world.enemy.pos = runner.position();
            (world.enemy.life <= 0.0).then_some(Transition::Deplete)
        }
        EnemyPhase::Flashing { explode_tick } => {
            ease_home(&mut world.enemy.pos, world.tuning.enemy_ease);
            if tick < *explode_tick && tick.is_multiple_of(world.tuning.flash_interval) {
                let jitter = world.tuning.flash_jitter;
                let offset = Vec2::new(
                    (world.rng.random::<f32>() * 2.0 - 1.0) * jitter,
                    (world.rng.random::<f32>() * 2.0 - 1.0) * jitter,
                );
                world.effects.push(Effect::flash(world.enemy.pos + offset));
            }
            (tick == *explode_tick).then_some(Transition::Explode)
        }
        EnemyPhase::Exploded => None,
    };

    world.bullets.extend(fired.into_iter().map(Bullet::spawn));

    match transition {
        Some(Transition::Bind) => bind_next(world, patterns)?,
        Some(Transition::Deplete) => clear_phase(world, patterns),
        Some(Transition::Explode) => explode(world),
        None => {}
    }
    Ok(())
}

fn bind_next(world: &mut World, patterns: &dyn PatternSource) -> Result<(), SimError> {
    let index = world.enemy.pattern_index;
    let aim = Aim {
        shooter: &world.enemy.pos,
        target: &world.player.pos,
    };
    let runner = patterns.bind(index, &aim)?;

    world.enemy.life = ENEMY_MAX_LIFE;
    world.enemy.pos = runner.position();
    world.enemy.phase = EnemyPhase::Running { runner };
    world.events.push(GameEvent::PhaseStarted { index });
    log::info!(
        "Phase {}/{} started at tick {}",
        index + 1,
        patterns.pattern_count(),
        world.tick
    );
    Ok(())
}

fn clear_phase(world: &mut World, patterns: &dyn PatternSource) {
    for bullet in world.bullets.iter_mut() {
        bullet.cancelled = true;
    }

    let index = world.enemy.pattern_index;
    let bonus = player::award_phase_clear(world);
    world.events.push(GameEvent::PhaseCleared { index, bonus });
    world.enemy.pattern_index += 1;

    if world.enemy.pattern_index < patterns.pattern_count() {
        world.enemy.phase = EnemyPhase::Waiting {
            next_phase_start_tick: world.tick.saturating_add(world.tuning.phase_delay_ticks),
        };
        log::info!("Phase {} cleared at tick {} (bonus {})", index + 1, world.tick, bonus);
    } else {
        world.enemy.phase = EnemyPhase::Flashing {
            explode_tick: world.tick.saturating_add(world.tuning.explode_delay_ticks),
        };
        log::info!("Final phase cleared at tick {} (bonus {})", world.tick, bonus);
    }
}

fn explode(world: &mut World) {
    let origin = world.enemy.pos;
    for _ in 0..world.tuning.fragment_count {
        let speed = 1.0 + 5.0 * world.rng.random::<f32>();
        let angle = TAU * world.rng.random::<f32>();
        world.fragments.push(Fragment {
            pos: origin,
            vel: polar_to_cartesian(speed, angle),
            ticks: 0,
        });
    }
    world.enemy.phase = EnemyPhase::Exploded;
    world.events.push(GameEvent::EnemyExploded);
    log::info!("Enemy exploded at tick {}", world.tick);
}
