//! Per-tick input
//!
//! The host polls its devices and hands the core one `TickInput` per tick.
//! `PointerTracker` does the bookkeeping for hosts that only see raw touch
//! lists or a mouse button.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Snapshot of the primary pointer for one tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pointer {
    pub position: Vec2,
    /// Position on the previous tick, if the pointer was down then
    pub previous: Option<Vec2>,
    /// Went down this tick
    pub just_touched: bool,
    /// Went up this tick
    pub just_released: bool,
}

impl Pointer {
    /// Movement since the previous tick
    #[inline]
    pub fn delta(&self) -> Option<Vec2> {
        self.previous.map(|prev| self.position - prev)
    }
}

/// Input for one simulation tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TickInput {
    pub pointer: Option<Pointer>,
}

impl TickInput {
    pub fn with_pointer(pointer: Pointer) -> Self {
        Self {
            pointer: Some(pointer),
        }
    }
}

/// Id used for the mouse in `sample_mouse`
const MOUSE_ID: u64 = u64::MAX;

/// Follows one primary touch across frames
///
/// The first touch seen while idle becomes primary. Other touches are ignored
/// until it lifts.
#[derive(Debug, Clone, Default)]
pub struct PointerTracker {
    primary: Option<u64>,
    last: Option<Vec2>,
}

impl PointerTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed the touches active this frame as `(id, position)` pairs
    pub fn sample(&mut self, touches: &[(u64, Vec2)]) -> TickInput {
        if let Some(id) = self.primary {
            if let Some(&(_, position)) = touches.iter().find(|(t, _)| *t == id) {
                let previous = self.last.replace(position);
                return TickInput::with_pointer(Pointer {
                    position,
                    previous,
                    just_touched: false,
                    just_released: false,
                });
            }

            // Primary lifted: report the release at its last position
            self.primary = None;
            let last = self.last.take();
            return match last {
                Some(position) => TickInput::with_pointer(Pointer {
                    position,
                    previous: Some(position),
                    just_touched: false,
                    just_released: true,
                }),
                None => TickInput::default(),
            };
        }

        match touches.first() {
            Some(&(id, position)) => {
                log::debug!("Pointer {} down at ({:.1}, {:.1})", id, position.x, position.y);
                self.primary = Some(id);
                self.last = Some(position);
                TickInput::with_pointer(Pointer {
                    position,
                    previous: None,
                    just_touched: true,
                    just_released: false,
                })
            }
            None => TickInput::default(),
        }
    }

    /// Feed the mouse: `Some(position)` while the button is held
    pub fn sample_mouse(&mut self, held_at: Option<Vec2>) -> TickInput {
        match held_at {
            Some(p) => self.sample(&[(MOUSE_ID, p)]),
            None => self.sample(&[]),
        }
    }

    pub fn is_down(&self) -> bool {
        self.primary.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_touch_drag_release_sequence() {
        let mut tracker = PointerTracker::new();
        let a = Vec2::new(100.0, 100.0);
        let b = Vec2::new(104.0, 97.0);

        let down = tracker.sample(&[(7, a)]).pointer.unwrap();
        assert!(down.just_touched);
        assert_eq!(down.delta(), None);

        let drag = tracker.sample(&[(7, b)]).pointer.unwrap();
        assert!(!drag.just_touched);
        assert_eq!(drag.delta(), Some(Vec2::new(4.0, -3.0)));

        let up = tracker.sample(&[]).pointer.unwrap();
        assert!(up.just_released);
        assert_eq!(up.position, b);
        assert_eq!(up.delta(), Some(Vec2::ZERO));

        assert_eq!(tracker.sample(&[]), TickInput::default());
        assert!(!tracker.is_down());
    }

    #[test]
    fn test_secondary_touch_is_ignored() {
        let mut tracker = PointerTracker::new();
        tracker.sample(&[(1, Vec2::new(10.0, 10.0))]);
        let p = tracker
            .sample(&[(2, Vec2::new(300.0, 300.0)), (1, Vec2::new(12.0, 10.0))])
            .pointer
            .unwrap();
        assert_eq!(p.position, Vec2::new(12.0, 10.0));
        assert_eq!(p.delta(), Some(Vec2::new(2.0, 0.0)));
    }

    #[test]
    fn test_mouse_behaves_like_a_touch() {
        let mut tracker = PointerTracker::new();
        assert!(tracker.sample_mouse(Some(Vec2::ONE)).pointer.unwrap().just_touched);
        assert!(tracker.is_down());
        assert!(tracker.sample_mouse(None).pointer.unwrap().just_released);
    }
}
