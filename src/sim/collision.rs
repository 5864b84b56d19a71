//! Continuous collision detection for fast circular bodies
//!
//! The tricky part of a bullet hell: bullets routinely travel further than
//! their own diameter in a single tick, so sampling positions once per tick
//! lets them tunnel straight through the player. Each body is instead treated
//! as a capsule - the segment it swept this tick (prev_pos -> pos) thickened by
//! its radius - and two bodies collide when their capsules overlap.

use std::cmp::Ordering;

use glam::Vec2;

/// Segments shorter than this (squared length) are treated as points
const DEGENERATE_EPS: f32 = 1e-12;

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    /// Box covering a capsule: both endpoints expanded by the radius
    #[inline]
    pub fn of_capsule(pos: Vec2, prev: Vec2, radius: f32) -> Self {
        let r = Vec2::splat(radius);
        Self {
            min: pos.min(prev) - r,
            max: pos.max(prev) + r,
        }
    }

    /// True unless the boxes are strictly separated on some axis.
    ///
    /// Touching boxes count as overlapping so the broad phase never rejects a
    /// pair that the exact test would report at exactly `ra + rb`.
    #[inline]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        !(self.min.x > other.max.x
            || self.min.y > other.max.y
            || self.max.x < other.min.x
            || self.max.y < other.min.y)
    }
}

/// A body's path over one tick
#[derive(Debug, Clone, Copy)]
struct Segment {
    start: Vec2,
    end: Vec2,
}

impl Segment {
    fn key(&self) -> [f32; 4] {
        [self.start.x, self.start.y, self.end.x, self.end.y]
    }
}

/// Total order over segments, used to fix evaluation order
fn cmp_segments(a: &Segment, b: &Segment) -> Ordering {
    a.key()
        .iter()
        .zip(b.key().iter())
        .map(|(x, y)| x.total_cmp(y))
        .find(|o| o.is_ne())
        .unwrap_or(Ordering::Equal)
}

/// Squared distance from point `p` to segment `a..b`
#[inline]
pub fn point_segment_distance_sq(p: Vec2, a: Vec2, b: Vec2) -> f32 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq <= DEGENERATE_EPS {
        return (p - a).length_squared();
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    (p - (a + ab * t)).length_squared()
}

/// True if the segments properly cross (each straddles the other's line)
fn segments_cross(p1: Vec2, q1: Vec2, p2: Vec2, q2: Vec2) -> bool {
    let straddles = |d1: f32, d2: f32| (d1 > 0.0 && d2 < 0.0) || (d1 < 0.0 && d2 > 0.0);

    let a = q1 - p1;
    let b = q2 - p2;
    straddles(a.perp_dot(p2 - p1), a.perp_dot(q2 - p1))
        && straddles(b.perp_dot(p1 - p2), b.perp_dot(q1 - p2))
}

/// Squared minimum distance between segments `p1..q1` and `p2..q2`
///
/// Zero when the segments cross; otherwise the closest pair always involves an
/// endpoint, so the minimum of the four endpoint-to-segment distances is exact.
/// Either segment may degenerate to a point (a stationary body).
pub fn segment_distance_sq(p1: Vec2, q1: Vec2, p2: Vec2, q2: Vec2) -> f32 {
    if segments_cross(p1, q1, p2, q2) {
        return 0.0;
    }

    point_segment_distance_sq(p1, p2, q2)
        .min(point_segment_distance_sq(q1, p2, q2))
        .min(point_segment_distance_sq(p2, p1, q1))
        .min(point_segment_distance_sq(q2, p1, q1))
}

/// Swept-capsule test between two moving circles
///
/// Each body moved from `prev_*` to `pos_*` this tick. Returns true iff the
/// minimum distance between the two swept segments is `<= r_a + r_b`; touching
/// counts as a hit. Pure: safe to call any number of times.
///
/// The arguments are put into a canonical order before the exact test so
/// `collide(a, b)` and `collide(b, a)` evaluate identical float operations.
pub fn collide(pos_a: Vec2, prev_a: Vec2, r_a: f32, pos_b: Vec2, prev_b: Vec2, r_b: f32) -> bool {
    // Broad phase
    let box_a = Aabb::of_capsule(pos_a, prev_a, r_a);
    let box_b = Aabb::of_capsule(pos_b, prev_b, r_b);
    if !box_a.overlaps(&box_b) {
        return false;
    }

    let seg_a = Segment {
        start: prev_a,
        end: pos_a,
    };
    let seg_b = Segment {
        start: prev_b,
        end: pos_b,
    };
    let (first, second) = match cmp_segments(&seg_a, &seg_b) {
        Ordering::Greater => (seg_b, seg_a),
        _ => (seg_a, seg_b),
    };

    let reach = r_a + r_b;
    segment_distance_sq(first.start, first.end, second.start, second.end) <= reach * reach
}
