//! Built-in level and procedural textures for the viewer.

use glam::Vec2;

use crate::texture::{Colour, Texture, TextureCache};
use crate::world::{Level, Wall};

pub const BRICK: usize = 1;
pub const STONE: usize = 2;
pub const FLOOR: usize = 3;
pub const COLUMN: usize = 4;
pub const CEILING: usize = 6;
pub const BARREL: usize = 8;

const TEXTURE_SIZE: usize = 32;

pub fn demo_textures() -> TextureCache {
    let mut cache = TextureCache::new();
    cache.insert(
        BRICK,
        Texture::bricks(TEXTURE_SIZE, Colour::new(140, 58, 40), Colour::new(96, 92, 88)),
    );
    cache.insert(
        STONE,
        Texture::checker(TEXTURE_SIZE, 8, Colour::new(110, 110, 104), Colour::new(84, 84, 80)),
    );
    cache.insert(
        FLOOR,
        Texture::checker(TEXTURE_SIZE, 16, Colour::new(70, 60, 44), Colour::new(58, 50, 36)),
    );
    cache.insert(
        COLUMN,
        Texture::checker(TEXTURE_SIZE, 4, Colour::new(170, 160, 120), Colour::new(130, 120, 90)),
    );
    cache.insert(CEILING, Texture::solid(4, 4, Colour::new(40, 36, 48)));
    cache.insert(
        BARREL,
        Texture::disc(TEXTURE_SIZE, Colour::new(160, 110, 30), Colour::new(50, 40, 20)),
    );
    cache
}

/// Closed polygon of walls through `corners`, last corner back to the first.
fn polygon(level: &mut Level, corners: &[Vec2], texture: usize) {
    for (i, &start) in corners.iter().enumerate() {
        let end = corners[(i + 1) % corners.len()];
        level.walls.push(Wall::new(start, end, texture));
    }
}

/// An 8x8 room with a stone alcove, two square pillars and a few barrels.
pub fn demo_level() -> Level {
    let mut level = Level {
        player_start: Vec2::new(1.5, 1.5),
        ..Level::default()
    };

    polygon(
        &mut level,
        &[
            Vec2::new(0.0, 0.0),
            Vec2::new(8.0, 0.0),
            Vec2::new(8.0, 8.0),
            Vec2::new(0.0, 8.0),
        ],
        BRICK,
    );

    // alcove wall jutting in from the north side
    level.walls.push(Wall::new(Vec2::new(5.0, 8.0), Vec2::new(5.0, 6.0), STONE));
    level.walls.push(Wall::new(Vec2::new(5.0, 6.0), Vec2::new(7.0, 6.0), STONE));

    for centre in [Vec2::new(3.0, 3.0), Vec2::new(5.5, 3.5)] {
        let h = 0.4;
        polygon(
            &mut level,
            &[
                centre + Vec2::new(-h, -h),
                centre + Vec2::new(h, -h),
                centre + Vec2::new(h, h),
                centre + Vec2::new(-h, h),
            ],
            COLUMN,
        );
    }

    // a diagonal wall, so not everything is axis aligned
    level.walls.push(Wall::new(Vec2::new(1.0, 5.0), Vec2::new(2.5, 6.5), STONE));

    for pos in [Vec2::new(6.5, 1.5), Vec2::new(2.0, 6.8), Vec2::new(6.8, 7.0)] {
        level.spawn_sprite(pos, BARREL);
    }

    level
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_level_only_uses_loaded_textures() {
        let textures = demo_textures();
        let level = demo_level();
        assert!(level.validate(&textures).is_ok());
        assert_eq!(level.walls.len(), 4 + 2 + 8 + 1);
        assert_eq!(level.sprites.len(), 3);
    }

    #[test]
    fn default_surfaces_are_loaded() {
        let textures = demo_textures();
        let config = crate::config::RenderConfig::default();
        for id in [config.floor_texture, config.alt_floor_texture, config.ceiling_texture] {
            assert!(textures.get(id).is_some());
        }
    }
}
