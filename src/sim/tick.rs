//! Fixed timestep simulation tick
//!
//! Each Playing tick runs in three phases:
//! 1. Collision: graze, player hits and player shots, all tested on the
//!    `(prev_pos, pos)` pairs left by the previous tick
//! 2. Update: player, enemy, enemy bullets, player bullets, effects, fragments
//! 3. Compaction: every collection drops its dead entities
//!
//! Nothing is removed before phase 3, so collision flags set in phase 1 are
//! always seen by the update and culling that follow.

use super::enemy;
use super::input::TickInput;
use super::lifecycle::{compact, step_all};
use super::pattern::{Aim, PatternSource};
use super::player;
use super::state::{Bullet, GameMode, RoundOutcome, World};
use crate::error::SimError;

/// Run one simulation tick
///
/// Returns an error only when a pattern runner fails; the run should be
/// abandoned in that case.
pub fn tick(
    world: &mut World,
    input: &TickInput,
    patterns: &dyn PatternSource,
) -> Result<(), SimError> {
    world.events.clear();
    world.ticks_in_mode += 1;

    match world.mode {
        GameMode::Title => world.set_mode(GameMode::Playing),
        GameMode::Playing => tick_playing(world, input, patterns)?,
        GameMode::GameOver => tick_game_over(world, input),
    }

    Ok(())
}

fn tick_playing(
    world: &mut World,
    input: &TickInput,
    patterns: &dyn PatternSource,
) -> Result<(), SimError> {
    // === Collision ===
    player::resolve_graze(world);
    player::resolve_hits(world);
    enemy::resolve_shots(world);

    // === Update ===
    let delta = world.pointer_delta(input);
    player::update(world, delta);
    enemy::update(world, patterns)?;
    update_bullets(world)?;
    step_all(&mut world.player_bullets);
    step_all(&mut world.effects);
    step_all(&mut world.fragments);

    // === Compaction ===
    cull(world);

    if world.player.life == 0 {
        end_round(world, RoundOutcome::Failed);
    } else if world.enemy.is_defeated() {
        end_round(world, RoundOutcome::Cleared);
    }

    world.tick += 1;
    Ok(())
}

/// Enemy bullets freeze; everything else keeps animating
fn tick_game_over(world: &mut World, input: &TickInput) {
    let delta = world.pointer_delta(input);
    player::update(world, delta);
    step_all(&mut world.player_bullets);
    step_all(&mut world.effects);
    step_all(&mut world.fragments);
    cull(world);
    world.tick += 1;

    let touched = input.pointer.is_some_and(|p| p.just_touched);
    if touched && world.ticks_in_mode > world.tuning.restart_delay_ticks {
        world.reset();
    }
}

/// Advance every enemy bullet's runner; bullets fired by bullets join the
/// collection after the pass
fn update_bullets(world: &mut World) -> Result<(), SimError> {
    let mut fired = Vec::new();
    let aim = Aim {
        shooter: &world.enemy.pos,
        target: &world.player.pos,
    };
    for bullet in world.bullets.iter_mut() {
        bullet.update(&aim, &mut world.rng, &mut fired)?;
    }
    world.bullets.extend(fired.into_iter().map(Bullet::spawn));
    Ok(())
}

fn cull(world: &mut World) {
    let bounds = world.bounds();
    compact(&mut world.bullets, &bounds);
    compact(&mut world.player_bullets, &bounds);
    compact(&mut world.effects, &bounds);
    compact(&mut world.fragments, &bounds);
}

fn end_round(world: &mut World, outcome: RoundOutcome) {
    log::info!(
        "Round over: {:?} (score {}, grazes {}, tick {})",
        outcome,
        world.score,
        world.graze_count,
        world.tick
    );
    world.outcome = Some(outcome);
    world.set_mode(GameMode::GameOver);
}
