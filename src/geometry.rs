//! 2D line-segment primitives shared by every later stage.
//!
//! The world is a flat plane: walls are segments, sprites are points that get
//! turned into segments facing the camera, and rays are segments running from
//! the projection plane out to the far distance. Everything the renderer needs
//! from geometry is "where do these two segments cross".

use std::f32::consts::{PI, TAU};

use glam::Vec2;

/// Slopes closer than this are treated as parallel, covering both the "never
/// cross" and the "collinear, infinitely many crossings" cases.
const PARALLEL_EPSILON: f32 = 1e-6;

/// Slack on the bounding box test. Candidate points found via a steep slope
/// lose a few ulps and can land just outside an axis-aligned segment.
const BOUNDS_EPSILON: f32 = 1e-4;

/// Vector pointing along `angle` (radians, counter-clockwise from +X) with
/// length `magnitude`.
#[inline]
pub fn vector_at(angle: f32, magnitude: f32) -> Vec2 {
    Vec2::from_angle(angle) * magnitude
}

/// Normalise an angle into `(-PI, PI]`.
#[inline]
pub fn wrap_angle(angle: f32) -> f32 {
    let a = angle.rem_euclid(TAU);
    if a > PI { a - TAU } else { a }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min: Vec2,
    pub max: Vec2,
}

impl BoundingBox {
    /// Inclusive on every edge, so a point sitting exactly on an axis-aligned
    /// segment is inside that segment's (zero-width) box.
    #[inline]
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.min.x - BOUNDS_EPSILON
            && p.x <= self.max.x + BOUNDS_EPSILON
            && p.y >= self.min.y - BOUNDS_EPSILON
            && p.y <= self.max.y + BOUNDS_EPSILON
    }
}

/// A line segment between two points in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line2 {
    pub start: Vec2,
    pub end: Vec2,
}

impl Line2 {
    #[inline]
    pub const fn new(start: Vec2, end: Vec2) -> Self {
        Self { start, end }
    }

    #[inline]
    pub fn is_vertical(&self) -> bool {
        self.end.x == self.start.x
    }

    #[inline]
    pub fn is_horizontal(&self) -> bool {
        self.end.y == self.start.y
    }

    /// `m` in `y = mx + b`. Meaningless for vertical segments.
    #[inline]
    pub fn slope(&self) -> f32 {
        (self.end.y - self.start.y) / (self.end.x - self.start.x)
    }

    /// `b` in `y = mx + b`. Meaningless for vertical segments.
    #[inline]
    pub fn y_intercept(&self) -> f32 {
        self.start.y - self.slope() * self.start.x
    }

    /// Point on the infinite line at `x`, measured from `start` so a steep
    /// line does not go through a huge intercept. Meaningless for vertical
    /// segments.
    #[inline]
    pub fn y_at(&self, x: f32) -> f32 {
        self.start.y + self.slope() * (x - self.start.x)
    }

    /// Point on the infinite line at `y`. Meaningless for horizontal segments.
    #[inline]
    pub fn x_at(&self, y: f32) -> f32 {
        self.start.x + (y - self.start.y) / self.slope()
    }

    #[inline]
    pub fn length(&self) -> f32 {
        self.start.distance(self.end)
    }

    /// Point at `t` along the segment, `t = 0` at `start` and `t = 1` at `end`.
    #[inline]
    pub fn lerp(&self, t: f32) -> Vec2 {
        self.start.lerp(self.end, t)
    }

    #[inline]
    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox {
            min: self.start.min(self.end),
            max: self.start.max(self.end),
        }
    }
}

/// Where two segments cross.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Intersection {
    pub point: Vec2,
    /// Normalised position of `point` along the second segment, `0` at its
    /// start and `1` at its end. Stretches across the whole segment, callers
    /// wanting a tiled texture multiply by the segment length first.
    pub t: f32,
}

/// Find the point where segments `a` and `b` cross within both extents.
///
/// Parallel, collinear and zero-length segments never intersect.
pub fn find_intersection(a: &Line2, b: &Line2) -> Option<Intersection> {
    let b_length = b.length();
    if a.start == a.end || b_length == 0.0 {
        return None;
    }

    // Everything below solves y = mx + b, so vertical (no slope) and
    // horizontal (zero slope) segments are pulled out first. Coordinates are
    // read back off the shallower line: on a steep one a tiny error in x is
    // multiplied by the slope.
    let candidate = if a.is_vertical() {
        if b.is_vertical() {
            return None;
        }
        let x = a.start.x;
        if b.is_horizontal() {
            Vec2::new(x, b.start.y)
        } else {
            Vec2::new(x, b.y_at(x))
        }
    } else if b.is_vertical() {
        let x = b.start.x;
        if a.is_horizontal() {
            Vec2::new(x, a.start.y)
        } else {
            Vec2::new(x, a.y_at(x))
        }
    } else if a.is_horizontal() {
        if b.is_horizontal() {
            return None;
        }
        let y = a.start.y;
        Vec2::new(b.x_at(y), y)
    } else if b.is_horizontal() {
        let y = b.start.y;
        Vec2::new(a.x_at(y), y)
    } else {
        let (m1, m2) = (a.slope(), b.slope());
        if (m1 - m2).abs() < PARALLEL_EPSILON {
            return None;
        }
        let x = (b.y_intercept() - a.y_intercept()) / (m1 - m2);
        let shallow = if m1.abs() <= m2.abs() { a } else { b };
        Vec2::new(x, shallow.y_at(x))
    };

    // The infinite lines cross at `candidate`; the segments only do if it is
    // inside both of them.
    if !a.bounding_box().contains(candidate) || !b.bounding_box().contains(candidate) {
        return None;
    }

    Some(Intersection {
        point: candidate,
        t: (b.start.distance(candidate) / b_length).min(1.0),
    })
}
