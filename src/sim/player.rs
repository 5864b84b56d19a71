//! Player subsystem: movement, respawn, autofire and graze/hit bookkeeping

use glam::Vec2;

use super::collision::collide;
use super::state::{Effect, GameEvent, PlayerBullet, World};
use crate::consts::{PLAYER_BULLET_LIFT, PLAYER_BULLET_SPREAD};
use crate::player_home;
use crate::tuning::Tuning;

/// Advance the player one tick
///
/// Respawns first if a bullet connected during the collision pass, then
/// applies the pointer movement and autofires.
pub fn update(world: &mut World, delta: Option<Vec2>) {
    let tick = world.tick;
    let player = &mut world.player;
    player.prev_pos = player.pos;

    if player.hit {
        player.pos = player_home();
        player.invincible_until_tick = tick.saturating_add(world.tuning.invincible_ticks);
        player.life = player.life.saturating_sub(1);
        player.hit = false;
        world.failures_in_phase += 1;
        log::info!(
            "Player respawned at tick {} ({} lives left, invincible until {})",
            tick,
            player.life,
            player.invincible_until_tick
        );
    }

    if let Some(delta) = delta {
        player.pos = world.arena.clamp(player.pos + delta);
    }

    if tick > player.invincible_until_tick
        && player.life > 0
        && tick.is_multiple_of(world.tuning.autofire_interval)
    {
        for side in [-1.0, 1.0] {
            let muzzle = player.pos + Vec2::new(side * PLAYER_BULLET_SPREAD, -PLAYER_BULLET_LIFT);
            world.player_bullets.push(PlayerBullet::new(muzzle));
        }
    }
}

/// Credit near misses against the player's graze radius (once per bullet)
pub fn resolve_graze(world: &mut World) {
    let player = &world.player;
    for bullet in world.bullets.iter_mut() {
        if bullet.grazed || bullet.cancelled {
            continue;
        }
        if !collide(
            bullet.pos,
            bullet.prev_pos,
            bullet.radius,
            player.pos,
            player.prev_pos,
            player.graze_radius,
        ) {
            continue;
        }

        bullet.grazed = true;
        world.graze_count += 1;
        world.score += world.tuning.graze_score;
        let spark = (bullet.pos + player.pos) * 0.5;
        world.effects.push(Effect::graze(spark));
        world.events.push(GameEvent::Graze { pos: spark });
    }
}

/// Resolve at most one bullet strike against the player
pub fn resolve_hits(world: &mut World) {
    let player = &world.player;
    if !player.is_vulnerable(world.tick) {
        return;
    }

    let struck = world.bullets.iter().position(|b| {
        !b.cancelled && collide(b.pos, b.prev_pos, b.radius, player.pos, player.prev_pos, player.radius)
    });
    let Some(index) = struck else {
        return;
    };

    let impact = world.bullets[index].pos;
    world.bullets[index].hit = true;
    world.player.hit = true;

    // Clear the area around the respawn point
    let home = player_home();
    let clear_sq = world.tuning.mercy_clear_radius * world.tuning.mercy_clear_radius;
    let mut cleared = 0;
    for bullet in world.bullets.iter_mut().filter(|b| !b.hit) {
        if bullet.pos.distance_squared(home) <= clear_sq {
            bullet.cancelled = true;
            cleared += 1;
        }
    }

    world.effects.push(Effect::bullet_hit(impact));
    world.effects.push(Effect::player_hit(world.player.pos));
    world.pointer_grabbed = false;

    let lives_left = world.player.life.saturating_sub(1);
    world.events.push(GameEvent::PlayerHit { lives_left });
    log::info!(
        "Player hit at tick {} ({} bullets cleared, {} lives left)",
        world.tick,
        cleared,
        lives_left
    );
}

/// Bonus for clearing a phase, never negative
pub fn phase_clear_bonus(failures: u32, tuning: &Tuning) -> u64 {
    let penalty = tuning.failure_penalty.saturating_mul(i64::from(failures));
    tuning.clear_bonus.saturating_add(penalty).max(0) as u64
}

/// Add the phase-clear bonus to the score and reset the failure counter
pub fn award_phase_clear(world: &mut World) -> u64 {
    let bonus = phase_clear_bonus(world.failures_in_phase, &world.tuning);
    world.score += bonus;
    world.failures_in_phase = 0;
    bonus
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::pattern::test_support::parked_bullet;
    use crate::sim::state::GameMode;

    fn playing_world() -> World {
        let mut world = World::new(5, Tuning::default());
        world.mode = GameMode::Playing;
        world.tick = 1000;
        world
    }

    #[test]
    fn test_graze_counts_once_per_bullet() {
        let mut world = playing_world();
        let near = world.player.pos + Vec2::new(10.0, 0.0);
        world.bullets.push(parked_bullet(near));

        resolve_graze(&mut world);
        resolve_graze(&mut world);
        resolve_graze(&mut world);

        assert_eq!(world.graze_count, 1);
        assert_eq!(world.score, world.tuning.graze_score);
        assert!(world.bullets[0].grazed);
        assert_eq!(world.effects.len(), 1);
        // Inside the graze radius but outside the hit radius
        resolve_hits(&mut world);
        assert!(!world.player.hit);
    }

    #[test]
    fn test_graze_but_no_hit_while_invincible() {
        let mut world = playing_world();
        world.player.invincible_until_tick = world.tick;
        world.bullets.push(parked_bullet(world.player.pos));

        resolve_graze(&mut world);
        resolve_hits(&mut world);
        assert_eq!(world.graze_count, 1);
        assert!(world.bullets[0].grazed);
        assert!(!world.player.hit);
        assert!(!world.bullets[0].hit);
    }

    #[test]
    fn test_single_hit_and_mercy_clear() {
        let mut world = playing_world();
        world.pointer_grabbed = true;
        let pos = world.player.pos;
        world.bullets.push(parked_bullet(pos));
        world.bullets.push(parked_bullet(pos + Vec2::new(1.0, 0.0)));
        world.bullets.push(parked_bullet(pos + Vec2::new(0.0, -200.0)));
        world.bullets.push(parked_bullet(Vec2::new(10.0, 10.0)));
        // Exactly on the clear radius
        world.bullets.push(parked_bullet(player_home() - Vec2::new(0.0, 300.0)));

        resolve_hits(&mut world);

        assert!(world.player.hit);
        assert_eq!(world.bullets.iter().filter(|b| b.hit).count(), 1);
        assert!(world.bullets[0].hit);
        assert!(world.bullets[1].cancelled);
        assert!(world.bullets[2].cancelled);
        assert!(!world.bullets[3].cancelled);
        assert!(world.bullets[4].cancelled);
        assert!(!world.pointer_grabbed);
        assert_eq!(world.effects.len(), 2);
        assert!(world.events.contains(&GameEvent::PlayerHit { lives_left: 5 }));
    }

    #[test]
    fn test_respawn_after_hit() {
        let mut world = playing_world();
        world.player.pos = Vec2::new(50.0, 60.0);
        world.player.hit = true;

        update(&mut world, Some(Vec2::new(3.0, 0.0)));

        assert_eq!(world.player.life, 5);
        assert_eq!(world.failures_in_phase, 1);
        assert_eq!(world.player.invincible_until_tick, 1180);
        assert_eq!(world.player.prev_pos, Vec2::new(50.0, 60.0));
        assert_eq!(world.player.pos, player_home() + Vec2::new(3.0, 0.0));
        assert!(!world.player.hit);
        // Invincible: no autofire
        assert!(world.player_bullets.is_empty());
    }

    #[test]
    fn test_huge_invincibility_window_saturates() {
        let mut world = playing_world();
        world.tuning.invincible_ticks = u64::MAX;
        world.player.hit = true;

        update(&mut world, None);
        assert_eq!(world.player.invincible_until_tick, u64::MAX);
        assert!(world.player.is_invincible(world.tick + 1));
    }

    #[test]
    fn test_movement_is_clamped() {
        let mut world = playing_world();
        update(&mut world, Some(Vec2::new(-5000.0, 5000.0)));
        assert_eq!(world.player.pos, Vec2::new(0.0, world.arena.height));
    }

    #[test]
    fn test_autofire_cadence() {
        let mut world = playing_world();
        update(&mut world, None);
        assert_eq!(world.player_bullets.len(), 2);
        let pos = world.player.pos;
        assert_eq!(world.player_bullets[0].pos, pos + Vec2::new(-10.0, -3.0));
        assert_eq!(world.player_bullets[1].pos, pos + Vec2::new(10.0, -3.0));
        assert_eq!(world.player_bullets[0].vel, Vec2::new(0.0, -10.0));

        world.tick += 1;
        update(&mut world, None);
        assert_eq!(world.player_bullets.len(), 2);

        world.tick += 4;
        world.player.life = 0;
        update(&mut world, None);
        assert_eq!(world.player_bullets.len(), 2);
    }

    #[test]
    fn test_phase_clear_bonus_is_clamped() {
        let tuning = Tuning::default();
        assert_eq!(phase_clear_bonus(0, &tuning), 10_000);
        assert_eq!(phase_clear_bonus(3, &tuning), 4_000);
        assert_eq!(phase_clear_bonus(5, &tuning), 0);
        assert_eq!(phase_clear_bonus(9, &tuning), 0);
        assert_eq!(phase_clear_bonus(u32::MAX, &tuning), 0);
    }

    #[test]
    fn test_award_resets_failures() {
        let mut world = playing_world();
        world.score = 100;
        world.failures_in_phase = 2;
        assert_eq!(award_phase_clear(&mut world), 6_000);
        assert_eq!(world.score, 6_100);
        assert_eq!(world.failures_in_phase, 0);
    }
}
