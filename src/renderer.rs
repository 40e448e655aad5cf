//! Stage two: turn one column's hit list into pixels.
//!
//! Walls and sprites are centred on the horizon and sized by
//! `half_height / distance`. Rows no hit covers are floor or ceiling, found by
//! running the projection backwards from the screen row to a world position.
//! Every pixel written gets fogged last.

use glam::Vec2;

use crate::camera::Camera;
use crate::config::RenderConfig;
use crate::framebuffer::ColumnSpan;
use crate::geometry::vector_at;
use crate::raycast::{RenderCandidates, fisheye_correction};
use crate::texture::{Colour, TextureCache};

/// Hits nearer than this are drawn as if they were this far away, so the
/// on-screen size stays finite.
const MIN_DISTANCE: f32 = 1e-3;

const FOG_BANDS: f32 = 8.0;
const DITHER_STEPS: f32 = 4.0;

/// Untextured floor and ceiling colours.
const FLAT_CEILING: Colour = Colour::new(64, 0, 0);
const FLAT_FLOOR: Colour = Colour::new(64, 128, 255);

pub struct ColumnDrawer<'a> {
    camera: &'a Camera,
    textures: &'a TextureCache,
    config: &'a RenderConfig,
    half_height: usize,
}

impl<'a> ColumnDrawer<'a> {
    pub fn new(
        camera: &'a Camera,
        textures: &'a TextureCache,
        config: &'a RenderConfig,
        height: usize,
    ) -> Self {
        Self {
            camera,
            textures,
            config,
            half_height: height / 2,
        }
    }

    /// Fill screen column `x` of `span`, top to bottom.
    pub fn draw(&self, span: &mut ColumnSpan<'_>, x: usize, candidates: &RenderCandidates) {
        for y in 0..span.height() {
            let colour = self
                .wall_pixel(x, y, candidates)
                .unwrap_or_else(|| self.floor_pixel(x, y, candidates.angle));
            span.put(x, y, colour);
        }
    }

    /// The nearest opaque wall or sprite texel covering row `y`, if any.
    fn wall_pixel(&self, x: usize, y: usize, candidates: &RenderCandidates) -> Option<Colour> {
        let half = self.half_height as f32;
        let row = y as f32;

        for hit in &candidates.hits {
            let distance = hit.distance.max(MIN_DISTANCE);
            let wall_size = half / distance;
            let start = half - wall_size;
            let end = half + wall_size;
            if row < start || row >= end {
                continue;
            }

            let uv = Vec2::new(hit.u, (row - start) / (end - start));
            let texture = &self.textures[hit.texture];
            // cut-out test on the exact texel, filtering would smear the key
            if texture.sample_nearest(uv) == Colour::TRANSPARENT {
                continue;
            }
            let texel = if self.config.textures {
                texture.sample(uv, self.config.filter)
            } else {
                Colour::WHITE
            };
            return Some(self.fog(texel, distance, x, y));
        }
        None
    }

    fn floor_pixel(&self, x: usize, y: usize, angle: f32) -> Colour {
        let config = self.config;
        // the horizon row is infinitely far away
        if !config.draw_floor || y == self.half_height {
            return config.fog_colour;
        }

        let half = self.half_height as f32;
        let projected = half / (half - y as f32).abs();
        let distance = projected / fisheye_correction(angle, self.camera.yaw());
        let world = self.camera.position() + vector_at(angle, distance);

        let ceiling = y < self.half_height;
        let texel = if config.textures {
            let id = if ceiling {
                config.ceiling_texture
            } else if config.checkerboard_floor && odd_tile(world) {
                config.alt_floor_texture
            } else {
                config.floor_texture
            };
            let uv = Vec2::new(world.x.rem_euclid(1.0), world.y.rem_euclid(1.0));
            self.textures[id].sample(uv, config.filter)
        } else if ceiling {
            FLAT_CEILING
        } else {
            FLAT_FLOOR
        };

        self.fog(texel, projected, x, y)
    }

    fn fog(&self, colour: Colour, distance: f32, x: usize, y: usize) -> Colour {
        let config = self.config;
        if !config.fog {
            return colour;
        }
        let t = distance / (self.camera.far() * config.fog_scale_factor);
        let t = if config.dither_fog {
            dithered_fog(t, x, y)
        } else {
            t
        };
        colour.lerp(config.fog_colour, t)
    }
}

/// Snap `t` to one of `FOG_BANDS` levels, mixing in the level below on a
/// fixed pixel pattern. The further `t` sits into its band, the more pixels
/// keep the band's own level: none in the first quarter, every other pixel
/// (by `x + y` parity) in the second, then two in three, then three in four.
pub fn dithered_fog(t: f32, x: usize, y: usize) -> f32 {
    let scaled = t.max(0.0) * FOG_BANDS;
    let band = scaled.floor();
    let steps = ((scaled - band) * DITHER_STEPS) as usize + 1;
    let grade = band / FOG_BANDS;
    if (x + y) % steps != 0 {
        grade
    } else {
        (grade - 1.0 / FOG_BANDS).max(0.0)
    }
}

/// Whether the world tile containing `p` is an odd square of a checkerboard.
#[inline]
pub fn odd_tile(p: Vec2) -> bool {
    (p.x.floor() as i64 + p.y.floor() as i64).rem_euclid(2) == 1
}
