//! Stage one: one ray per screen column, intersected against all geometry.

use std::f32::consts::FRAC_PI_2;
use std::ops::Range;

use glam::Vec2;

use crate::camera::Camera;
use crate::geometry::{Line2, find_intersection, vector_at, wrap_angle};
use crate::world::Level;

/// Half the width of a sprite billboard, in world units.
pub const SPRITE_HALF_WIDTH: f32 = 0.5;

/// Largest `u` handed to the samplers, keeping it inside `[0, 1)`.
const MAX_U: f32 = 1.0 - f32::EPSILON;

/// A ray crossing a wall or sprite.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// Distance from the projection plane. Euclidean while hits are being
    /// gathered and sorted, fisheye-corrected by the time a caller sees it.
    pub distance: f32,
    /// Where the ray crossed, in world space.
    pub position: Vec2,
    pub texture: usize,
    /// Horizontal texture coordinate. The vertical one depends on the screen
    /// row and is worked out while rasterizing.
    pub u: f32,
}

/// Every hit along one ray, nearest first.
#[derive(Debug, Clone, Default)]
pub struct RenderCandidates {
    /// World-space angle of the ray.
    pub angle: f32,
    pub hits: Vec<RayHit>,
}

/// Cast a ray from `origin` along `direction` out to `max_distance`.
///
/// `reference_direction` is the camera's yaw. Sprites face it rather than the
/// ray, and the fisheye correction is taken relative to it.
pub fn cast_ray(
    level: &Level,
    origin: Vec2,
    direction: f32,
    reference_direction: f32,
    max_distance: f32,
    tile_walls: bool,
) -> RenderCandidates {
    let mut hits = collect_hits(
        level,
        origin,
        direction,
        reference_direction,
        max_distance,
        tile_walls,
    );

    // Occlusion order is settled on true distance above; only then is each
    // hit converted to distance from the plane for sizing.
    let correction = fisheye_correction(direction, reference_direction);
    for hit in &mut hits {
        hit.distance *= correction;
    }

    RenderCandidates {
        angle: direction,
        hits,
    }
}

/// Scale from euclidean distance along a ray to distance from the projection
/// plane, for a ray at `direction` seen by a camera facing `reference`.
#[inline]
pub fn fisheye_correction(direction: f32, reference: f32) -> f32 {
    (FRAC_PI_2 - wrap_angle(direction - reference).abs()).sin()
}

/// All hits along the ray, sorted by euclidean distance, uncorrected.
fn collect_hits(
    level: &Level,
    origin: Vec2,
    direction: f32,
    reference_direction: f32,
    max_distance: f32,
    tile_walls: bool,
) -> Vec<RayHit> {
    let ray = Line2::new(origin, origin + vector_at(direction, max_distance));
    let mut hits = Vec::new();

    for wall in &level.walls {
        if let Some(hit) = find_intersection(&ray, &wall.segment) {
            let u = if tile_walls {
                (hit.t * wall.segment.length()).fract()
            } else {
                hit.t
            };
            hits.push(RayHit {
                distance: origin.distance(hit.point),
                position: hit.point,
                texture: wall.texture,
                u: u.min(MAX_U),
            });
        }
    }

    // Billboards are perpendicular to the camera, not the ray, so a sprite
    // stays flat across the whole screen.
    let left = vector_at(reference_direction + FRAC_PI_2, SPRITE_HALF_WIDTH);
    for sprite in &level.sprites {
        let billboard = Line2::new(sprite.pos + left, sprite.pos - left);
        if let Some(hit) = find_intersection(&ray, &billboard) {
            hits.push(RayHit {
                distance: origin.distance(hit.point),
                position: hit.point,
                texture: sprite.texture,
                u: hit.t.min(MAX_U),
            });
        }
    }

    hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    hits
}

/// Cast the rays for `columns` of a `width`-column screen.
pub fn cast_rays(
    level: &Level,
    camera: &Camera,
    width: usize,
    columns: Range<usize>,
    tile_walls: bool,
) -> Vec<RenderCandidates> {
    columns
        .map(|column| {
            let (origin, angle) = camera.column_ray(column, width);
            cast_ray(level, origin, angle, camera.yaw(), camera.far(), tile_walls)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::Wall;

    fn wall_at_x(x: f32, texture: usize) -> Wall {
        Wall::new(Vec2::new(x, -4.0), Vec2::new(x, 4.0), texture)
    }

    #[test]
    fn perpendicular_wall_distance_before_and_after_correction() {
        let mut level = Level::default();
        level.walls.push(wall_at_x(5.0, 1));

        let raw = collect_hits(&level, Vec2::ZERO, 0.0, 0.3, 10.0, true);
        assert_eq!(raw.len(), 1);
        assert!((raw[0].distance - 5.0).abs() < 1e-4);

        let corrected = cast_ray(&level, Vec2::ZERO, 0.0, 0.3, 10.0, true);
        assert!(corrected.hits[0].distance < raw[0].distance);
        assert!((corrected.hits[0].distance - 5.0 * 0.3f32.cos()).abs() < 1e-4);

        // looking straight at it nothing changes
        let straight = cast_ray(&level, Vec2::ZERO, 0.0, 0.0, 10.0, true);
        assert!((straight.hits[0].distance - 5.0).abs() < 1e-4);
    }

    #[test]
    fn nothing_past_far() {
        let mut level = Level::default();
        level.walls.push(wall_at_x(5.0, 1));
        let candidates = cast_ray(&level, Vec2::ZERO, 0.0, 0.0, 4.0, true);
        assert!(candidates.hits.is_empty());
    }

    #[test]
    fn hits_come_back_nearest_first() {
        let mut level = Level::default();
        // pushed out of order on purpose
        level.walls.push(wall_at_x(7.0, 1));
        level.walls.push(wall_at_x(2.0, 2));
        level.walls.push(wall_at_x(4.5, 3));
        level.spawn_sprite(Vec2::new(3.0, 0.1), 4);

        let candidates = cast_ray(&level, Vec2::ZERO, 0.05, 0.0, 10.0, true);
        let textures: Vec<_> = candidates.hits.iter().map(|h| h.texture).collect();
        assert_eq!(textures, [2, 4, 3, 1]);
        for pair in candidates.hits.windows(2) {
            assert!(pair[0].distance <= pair[1].distance);
        }
    }

    #[test]
    fn correction_wraps_accumulated_yaw() {
        // A camera that has turned a full circle corrects the same as one
        // that has not.
        let a = fisheye_correction(0.2, 0.0);
        let b = fisheye_correction(0.2, std::f32::consts::TAU);
        assert!((a - b).abs() < 1e-5);
        assert!(fisheye_correction(0.0, 0.0) > 0.999);
    }

    #[test]
    fn wall_u_tiles_or_stretches() {
        let mut level = Level::default();
        // 8 units long, ray crosses 2.5 units from its start
        level.walls.push(Wall::new(Vec2::new(3.0, -2.5), Vec2::new(3.0, 5.5), 1));

        let tiled = cast_ray(&level, Vec2::ZERO, 0.0, 0.0, 10.0, true);
        assert!((tiled.hits[0].u - 0.5).abs() < 1e-4);

        let stretched = cast_ray(&level, Vec2::ZERO, 0.0, 0.0, 10.0, false);
        assert!((stretched.hits[0].u - 2.5 / 8.0).abs() < 1e-4);
    }

    #[test]
    fn sprite_faces_the_camera_not_the_ray() {
        let mut level = Level::default();
        level.spawn_sprite(Vec2::new(4.0, 0.0), 8);

        // an oblique ray still sees a billboard perpendicular to yaw 0,
        // i.e. the vertical segment x = 4
        let candidates = cast_ray(&level, Vec2::ZERO, 0.1, 0.0, 10.0, true);
        assert_eq!(candidates.hits.len(), 1);
        let hit = candidates.hits[0];
        assert!((hit.position.x - 4.0).abs() < 1e-4);
        // left half of the billboard from the camera's point of view
        assert!(hit.u < 0.5);
    }

    #[test]
    fn facing_straight_up_at_a_diagonal_wall() {
        // y = x; a camera looking along +Y casts a centre ray that is only
        // vertical up to rounding
        let mut level = Level::default();
        level.walls.push(Wall::new(Vec2::ZERO, Vec2::new(8.0, 8.0), 1));
        for i in 0..100 {
            let x = 2.5 + i as f32 * 0.05;
            let camera = Camera::new(Vec2::new(x, 1.0), FRAC_PI_2, 0.25, 10.0, 0.5).unwrap();
            let candidates = cast_rays(&level, &camera, 64, 32..33, true);
            let hits = &candidates[0].hits;
            assert_eq!(hits.len(), 1, "no hit from x = {x}");
            assert!(hits[0].position.distance(Vec2::splat(x)) < 1e-3);
            assert!((hits[0].distance - (x - 1.25)).abs() < 1e-3);
        }
    }

    #[test]
    fn one_candidate_list_per_column() {
        let mut level = Level::default();
        level.walls.push(wall_at_x(5.0, 1));
        let camera = Camera::new(Vec2::ZERO, 0.0, 0.5, 10.0, 0.5).unwrap();
        let candidates = cast_rays(&level, &camera, 40, 10..25, true);
        assert_eq!(candidates.len(), 15);
        assert!(candidates.iter().all(|c| c.hits.len() == 1));
    }
}
