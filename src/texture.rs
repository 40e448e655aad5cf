//! Decoded textures and the two ways of reading them.
//!
//! Textures are stored as plain RGB triples, row-major, top row first. Both
//! samplers take normalised `uv` in `[0, 1)` and never index outside the
//! image: nearest clamps, bilinear wraps so tiled surfaces blend across the
//! seam.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Number of texture slots in a [`TextureCache`].
pub const MAX_TEXTURES: usize = 16;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Colour {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Colour {
    pub const BLACK: Colour = Colour::new(0, 0, 0);
    pub const WHITE: Colour = Colour::new(255, 255, 255);
    /// Reserved cut-out colour. Sprite texels of exactly this value are not
    /// drawn and let whatever is behind show through.
    pub const TRANSPARENT: Colour = Colour::new(255, 0, 255);

    #[inline]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Blend toward `other`, `t` clamped to `[0, 1]`.
    #[inline]
    pub fn lerp(self, other: Colour, t: f32) -> Colour {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t) as u8;
        Colour::new(
            mix(self.r, other.r),
            mix(self.g, other.g),
            mix(self.b, other.b),
        )
    }

    /// Fixed-point blend with an 8.8 weight, `w256` in `[0, 256]`.
    #[inline]
    fn lerp_fixed(self, other: Colour, w256: u32) -> Colour {
        let inv = 256 - w256;
        let mix = |a: u8, b: u8| ((a as u32 * inv + b as u32 * w256) >> 8) as u8;
        Colour::new(
            mix(self.r, other.r),
            mix(self.g, other.g),
            mix(self.b, other.b),
        )
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Filter {
    #[default]
    Nearest,
    Bilinear,
}

#[derive(Debug, Clone)]
pub struct Texture {
    width: usize,
    height: usize,
    pixels: Vec<Colour>,
}

impl Texture {
    /// Wrap decoded pixels. Panics if the buffer does not match the size, a
    /// loader handing over a short buffer is a bug, not bad input.
    pub fn new(width: usize, height: usize, pixels: Vec<Colour>) -> Self {
        assert!(width > 0 && height > 0, "texture must not be empty");
        assert_eq!(pixels.len(), width * height, "pixel buffer does not match size");
        Self {
            width,
            height,
            pixels,
        }
    }

    pub fn solid(width: usize, height: usize, colour: Colour) -> Self {
        Self::new(width, height, vec![colour; width * height])
    }

    /// Two-colour checkerboard with square cells of `cell` pixels.
    pub fn checker(size: usize, cell: usize, a: Colour, b: Colour) -> Self {
        let cell = cell.max(1);
        let pixels = (0..size * size)
            .map(|i| {
                let (x, y) = (i % size, i / size);
                if (x / cell + y / cell) % 2 == 0 { a } else { b }
            })
            .collect();
        Self::new(size, size, pixels)
    }

    /// Running-bond brick pattern with one-pixel mortar lines.
    pub fn bricks(size: usize, brick: Colour, mortar: Colour) -> Self {
        let course = (size / 4).max(2);
        let length = (size / 2).max(2);
        let pixels = (0..size * size)
            .map(|i| {
                let (x, y) = (i % size, i / size);
                let row = y / course;
                let shift = if row % 2 == 0 { 0 } else { length / 2 };
                if y % course == 0 || (x + shift) % length == 0 {
                    mortar
                } else {
                    brick
                }
            })
            .collect();
        Self::new(size, size, pixels)
    }

    /// A filled disc on a transparent background, for billboard sprites.
    pub fn disc(size: usize, fill: Colour, rim: Colour) -> Self {
        let centre = (size as f32 - 1.0) * 0.5;
        let radius = size as f32 * 0.5;
        let pixels = (0..size * size)
            .map(|i| {
                let p = Vec2::new((i % size) as f32, (i / size) as f32);
                let d = p.distance(Vec2::splat(centre));
                if d > radius {
                    Colour::TRANSPARENT
                } else if d > radius - 1.5 {
                    rim
                } else {
                    fill
                }
            })
            .collect();
        Self::new(size, size, pixels)
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> Colour {
        self.pixels[y * self.width + x]
    }

    #[inline]
    pub fn sample(&self, uv: Vec2, filter: Filter) -> Colour {
        match filter {
            Filter::Nearest => self.sample_nearest(uv),
            Filter::Bilinear => self.sample_bilinear(uv),
        }
    }

    /// Nearest texel: `uv * (size - 1)`, clamped and truncated.
    pub fn sample_nearest(&self, uv: Vec2) -> Colour {
        let hi = Vec2::new((self.width - 1) as f32, (self.height - 1) as f32);
        let coord = (uv * hi).clamp(Vec2::ZERO, hi);
        self.pixel(coord.x as usize, coord.y as usize)
    }

    /// Blend of the four texels around `uv`, wrapping at the edges.
    pub fn sample_bilinear(&self, uv: Vec2) -> Colour {
        let size = Vec2::new(self.width as f32, self.height as f32);
        // texel centres sit at half-integer coordinates
        let coord = size * uv - Vec2::splat(0.5);
        let base = coord.floor();
        let frac = coord - base;

        let x0 = wrap_index(base.x as i64, self.width);
        let x1 = wrap_index(base.x as i64 + 1, self.width);
        let y0 = wrap_index(base.y as i64, self.height);
        let y1 = wrap_index(base.y as i64 + 1, self.height);

        let wx = (frac.x * 256.0).round().clamp(0.0, 256.0) as u32;
        let wy = (frac.y * 256.0).round().clamp(0.0, 256.0) as u32;

        // down each column first, then across
        let left = self.pixel(x0, y0).lerp_fixed(self.pixel(x0, y1), wy);
        let right = self.pixel(x1, y0).lerp_fixed(self.pixel(x1, y1), wy);
        left.lerp_fixed(right, wx)
    }
}

#[inline]
fn wrap_index(i: i64, len: usize) -> usize {
    i.rem_euclid(len as i64) as usize
}

/// Textures indexed by small integer ids. Filled once by a loader, then only
/// read, so every worker can share it without locking.
pub struct TextureCache {
    slots: [Option<Texture>; MAX_TEXTURES],
}

impl TextureCache {
    pub fn new() -> Self {
        Self {
            slots: std::array::from_fn(|_| None),
        }
    }

    /// Panics if `id` is outside the cache, ids are fixed at build time.
    pub fn insert(&mut self, id: usize, texture: Texture) {
        assert!(id < MAX_TEXTURES, "texture id {id} out of range");
        self.slots[id] = Some(texture);
    }

    #[inline]
    pub fn get(&self, id: usize) -> Option<&Texture> {
        self.slots.get(id).and_then(Option::as_ref)
    }
}

impl Default for TextureCache {
    fn default() -> Self {
        Self::new()
    }
}

impl std::ops::Index<usize> for TextureCache {
    type Output = Texture;

    /// Lookup for ids already checked with [`TextureCache::get`].
    #[inline]
    fn index(&self, id: usize) -> &Texture {
        match self.get(id) {
            Some(texture) => texture,
            None => panic!("texture id {id} was not validated before rendering"),
        }
    }
}
