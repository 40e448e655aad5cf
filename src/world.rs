use glam::Vec2;
use log::warn;

use crate::error::{Error, Result};
use crate::geometry::Line2;
use crate::texture::TextureCache;

pub struct Wall {
    pub segment: Line2, // (x, y) start/end in world space
    pub texture: usize,
}

impl Wall {
    pub fn new(start: Vec2, end: Vec2, texture: usize) -> Self {
        Self {
            segment: Line2::new(start, end),
            texture,
        }
    }
}

/// A point object drawn as a camera-facing billboard.
pub struct Sprite {
    pub pos: Vec2,
    pub texture: usize,
}

/// Level geometry. Read-only while a frame is rendering, anything that edits
/// it needs `&mut` and so can only run between frames.
#[derive(Default)]
pub struct Level {
    pub walls: Vec<Wall>,
    pub sprites: Vec<Sprite>,
    pub player_start: Vec2,
}

impl Level {
    pub fn spawn_sprite(&mut self, pos: Vec2, texture: usize) {
        self.sprites.push(Sprite { pos, texture });
    }

    /// Check every texture id against the cache. Loaders are expected to do
    /// this once; the pipeline repeats it per frame so a bad id never reaches
    /// the rasterizer.
    pub fn validate(&self, textures: &TextureCache) -> Result<()> {
        for wall in &self.walls {
            if textures.get(wall.texture).is_none() {
                warn!("wall {:?} references missing texture {}", wall.segment, wall.texture);
                return Err(Error::InvalidTextureId {
                    id: wall.texture,
                    owner: "wall",
                });
            }
        }
        for sprite in &self.sprites {
            if textures.get(sprite.texture).is_none() {
                warn!("sprite at {} references missing texture {}", sprite.pos, sprite.texture);
                return Err(Error::InvalidTextureId {
                    id: sprite.texture,
                    owner: "sprite",
                });
            }
        }
        Ok(())
    }
}
