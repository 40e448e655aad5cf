use std::f32::consts::FRAC_PI_2;

use glam::Vec2;

use crate::error::{Error, Result};
use crate::geometry::{Line2, vector_at, wrap_angle};

/// A view into the level: a position, a facing direction and a flat
/// projection plane `near` units in front of the eye.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pos: Vec2,   // (x, y) position in world space
    yaw: f32,    // radians, counter-clockwise from +X
    near: f32,   // distance from the eye to the projection plane
    far: f32,    // nothing past this is drawn
    right: f32,  // half the width of the projection plane
    fov: f32,
}

impl Camera {
    pub fn new(pos: Vec2, yaw: f32, near: f32, far: f32, right: f32) -> Result<Self> {
        if !(near > 0.0) {
            return Err(Error::InvalidCamera("near must be greater than zero"));
        }
        if !(right > 0.0) {
            return Err(Error::InvalidCamera("right must be greater than zero"));
        }
        if !(far > near) {
            return Err(Error::InvalidCamera("far must be greater than near"));
        }
        Ok(Self {
            pos,
            yaw,
            near,
            far,
            right,
            fov: 2.0 * (near / right).atan(),
        })
    }

    #[inline]
    pub fn move_by(&mut self, delta: Vec2) {
        self.pos += delta;
    }

    /// Turn by `yaw_delta`. Yaw is kept in `(-PI, PI]` so it does not lose
    /// precision over a long session.
    #[inline]
    pub fn rotate(&mut self, yaw_delta: f32) {
        self.yaw = wrap_angle(self.yaw + yaw_delta);
    }

    #[inline]
    pub fn set_position(&mut self, pos: Vec2) {
        self.pos = pos;
    }

    #[inline]
    pub fn position(&self) -> Vec2 {
        self.pos
    }

    #[inline]
    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    #[inline]
    pub fn near(&self) -> f32 {
        self.near
    }

    #[inline]
    pub fn far(&self) -> f32 {
        self.far
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.right
    }

    #[inline]
    pub fn fov(&self) -> f32 {
        self.fov
    }

    /// Unit vector the camera is facing.
    #[inline]
    pub fn forward(&self) -> Vec2 {
        vector_at(self.yaw, 1.0)
    }

    /// The image plane in world space, perpendicular to the view direction.
    /// `start` is the left edge of the screen, `end` the right edge.
    pub fn projection_plane(&self) -> Line2 {
        let midpoint = self.pos + vector_at(self.yaw, self.near);
        Line2::new(
            midpoint + vector_at(self.yaw + FRAC_PI_2, self.right),
            midpoint + vector_at(self.yaw - FRAC_PI_2, self.right),
        )
    }

    /// Point on the projection plane for screen `column` of `width`, and the
    /// world-space angle of the ray from the eye through it.
    pub fn column_ray(&self, column: usize, width: usize) -> (Vec2, f32) {
        let plane_point = self.projection_plane().lerp(column as f32 / width as f32);
        let diff = plane_point - self.pos;
        (plane_point, diff.y.atan2(diff.x))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn rejects_bad_planes() {
        assert!(Camera::new(Vec2::ZERO, 0.0, 0.0, 8.0, 1.0).is_err());
        assert!(Camera::new(Vec2::ZERO, 0.0, 1.0, 8.0, -1.0).is_err());
        assert!(Camera::new(Vec2::ZERO, 0.0, 1.0, 0.5, 1.0).is_err());
        assert!(Camera::new(Vec2::ZERO, 0.0, 1.0, 8.0, 1.0).is_ok());
    }

    #[test]
    fn fov_from_near_and_right() {
        let cam = Camera::new(Vec2::ZERO, 0.0, 1.0, 8.0, 1.0).unwrap();
        assert!(close(cam.fov(), PI / 2.0));
    }

    #[test]
    fn plane_is_perpendicular_and_centred() {
        let cam = Camera::new(Vec2::new(1.0, 2.0), PI / 2.0, 0.5, 8.0, 2.0).unwrap();
        let plane = cam.projection_plane();

        let mid = plane.lerp(0.5);
        assert!(close(mid.x, 1.0));
        assert!(close(mid.y, 2.5));

        // facing +Y, the left edge of the screen is toward -X
        assert!(close(plane.start.x, -1.0));
        assert!(close(plane.end.x, 3.0));
        assert!(close((plane.end - plane.start).dot(cam.forward()), 0.0));
        assert!(close(plane.length(), 4.0));
    }

    #[test]
    fn centre_column_looks_straight_ahead() {
        let cam = Camera::new(Vec2::new(3.0, 3.0), 0.3, 0.25, 8.0, 0.5).unwrap();
        let (point, angle) = cam.column_ray(32, 64);
        assert!(close(angle, 0.3));
        assert!(close(point.distance(cam.position()), 0.25));

        let (_, left) = cam.column_ray(0, 64);
        let (_, right) = cam.column_ray(63, 64);
        assert!(left > 0.3);
        assert!(right < 0.3);
    }

    #[test]
    fn moves_and_turns() {
        let mut cam = Camera::new(Vec2::ZERO, 0.0, 1.0, 8.0, 1.0).unwrap();
        cam.move_by(Vec2::new(1.0, -2.0));
        cam.rotate(0.5);
        cam.rotate(0.25);
        assert_eq!(cam.position(), Vec2::new(1.0, -2.0));
        assert!(close(cam.yaw(), 0.75));
        cam.set_position(Vec2::new(4.0, 4.0));
        assert_eq!(cam.position(), Vec2::new(4.0, 4.0));
    }

    #[test]
    fn yaw_stays_wrapped() {
        let mut cam = Camera::new(Vec2::ZERO, 0.0, 1.0, 8.0, 1.0).unwrap();
        for _ in 0..10_000 {
            cam.rotate(0.37);
            assert!(cam.yaw() > -PI && cam.yaw() <= PI);
        }
        // 3700 rad is 588 whole turns plus about 5.49 rad
        let expected = wrap_angle(3700.0f64.rem_euclid(std::f64::consts::TAU) as f32);
        assert!((cam.yaw() - expected).abs() < 1e-2);

        cam.rotate(-cam.yaw() - 0.1);
        assert!(close(cam.yaw(), -0.1));
    }
}
