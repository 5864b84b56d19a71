//! Entity lifecycle: update every entity, then compact
//!
//! Collections are only ever shrunk here, once per tick, after every update
//! and collision pass has run. Compaction builds a new `Vec` holding the
//! survivors in their original order.

use super::arena::Arena;
use super::state::{Bullet, Effect, Fragment, PlayerBullet};

/// What the culling predicates need to know about the playfield
#[derive(Debug, Clone, Copy)]
pub struct Bounds {
    pub arena: Arena,
    pub fragment_cull_radius: f32,
}

/// Entity that decides whether it survives the end of the tick
pub trait Retain {
    fn retain(&self, bounds: &Bounds) -> bool;
}

/// Entity with a self-contained per-tick update
pub trait Step {
    fn step(&mut self);
}

/// Update every entity in order
pub fn step_all<T: Step>(items: &mut [T]) {
    for item in items.iter_mut() {
        item.step();
    }
}

/// Keep only retained entities, preserving order
pub fn compact<T: Retain>(items: &mut Vec<T>, bounds: &Bounds) {
    let before = items.len();
    *items = std::mem::take(items)
        .into_iter()
        .filter(|item| item.retain(bounds))
        .collect();
    let removed = before - items.len();
    if removed > 0 {
        log::trace!("Culled {} of {} entities", removed, before);
    }
}

impl Retain for Bullet {
    fn retain(&self, bounds: &Bounds) -> bool {
        !self.hit
            && !self.cancelled
            && !self.runner.vanished()
            && bounds.arena.intersects_circle(self.prev_pos, self.radius)
    }
}

impl Step for PlayerBullet {
    fn step(&mut self) {
        self.prev_pos = self.pos;
        self.pos += self.vel;
    }
}

impl Retain for PlayerBullet {
    fn retain(&self, bounds: &Bounds) -> bool {
        !self.hit && bounds.arena.intersects_circle(self.prev_pos, self.radius)
    }
}

impl Step for Effect {
    fn step(&mut self) {
        self.ticks += 1;
    }
}

impl Retain for Effect {
    fn retain(&self, _bounds: &Bounds) -> bool {
        self.ticks < self.ttl
    }
}

impl Step for Fragment {
    fn step(&mut self) {
        self.pos += self.vel;
        self.ticks += 1;
    }
}

impl Retain for Fragment {
    fn retain(&self, bounds: &Bounds) -> bool {
        let r = bounds.fragment_cull_radius;
        (self.pos - bounds.arena.center()).length_squared() < r * r
    }
}
