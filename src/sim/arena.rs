//! Playfield rectangle
//!
//! Screen-space coordinates: origin at the top-left, y grows downward.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::{ARENA_HEIGHT, ARENA_WIDTH};

/// The arena rectangle `[0, width] x [0, height]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Arena {
    pub width: f32,
    pub height: f32,
}

impl Default for Arena {
    fn default() -> Self {
        Self {
            width: ARENA_WIDTH,
            height: ARENA_HEIGHT,
        }
    }
}

impl Arena {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    /// Clamp a point componentwise into the arena (edges inclusive)
    #[inline]
    pub fn clamp(&self, p: Vec2) -> Vec2 {
        Vec2::new(p.x.clamp(0.0, self.width), p.y.clamp(0.0, self.height))
    }

    /// Does a circle's bounding square reach into the arena?
    ///
    /// Strict on every edge: a shot whose extent only touches an edge is gone.
    #[inline]
    pub fn intersects_circle(&self, center: Vec2, radius: f32) -> bool {
        center.x + radius > 0.0
            && center.x - radius < self.width
            && center.y + radius > 0.0
            && center.y - radius < self.height
    }
}
