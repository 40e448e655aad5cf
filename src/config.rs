//! Per-frame rendering options.

use std::fs;
use std::path::Path;

use log::info;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::texture::{Colour, Filter};

/// Everything that changes how a frame looks without changing what is in it.
/// Passed by reference into each render, never touched mid-frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub fog: bool,
    /// Ordered dither between fog bands instead of a smooth blend.
    pub dither_fog: bool,
    pub filter: Filter,
    /// When off, walls and sprites are drawn flat white.
    pub textures: bool,
    /// When off, everything that is not a wall is fog coloured.
    pub draw_floor: bool,
    /// Alternate floor textures by world tile parity.
    pub checkerboard_floor: bool,
    /// Repeat wall textures once per world unit instead of stretching them
    /// over the whole wall.
    pub tile_wall_textures: bool,
    pub fog_colour: Colour,
    /// Fog is computed from projected distance but the draw cutoff is
    /// euclidean; this pulls full fog in a little so the cutoff is hidden.
    pub fog_scale_factor: f32,
    pub floor_texture: usize,
    pub alt_floor_texture: usize,
    pub ceiling_texture: usize,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            fog: true,
            dither_fog: true,
            filter: Filter::Nearest,
            textures: true,
            draw_floor: true,
            checkerboard_floor: false,
            tile_wall_textures: true,
            fog_colour: Colour::new(24, 24, 32),
            fog_scale_factor: 0.75,
            floor_texture: 3,
            alt_floor_texture: 2,
            ceiling_texture: 6,
        }
    }
}

impl RenderConfig {
    /// Read a TOML file. Missing keys fall back to the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("couldn't read {path:?}: {e}")))?;
        let config = Self::from_toml(&text)?;
        info!("Loaded render config from {path:?}");
        Ok(config)
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| Error::Config(e.to_string()))
    }

    /// Texture ids the rasterizer may look up for floor and ceiling.
    pub(crate) fn surface_textures(&self) -> impl Iterator<Item = (usize, &'static str)> {
        let floor = self.draw_floor && self.textures;
        let alt = floor && self.checkerboard_floor;
        [
            (floor, self.floor_texture, "floor"),
            (alt, self.alt_floor_texture, "alternate floor"),
            (floor, self.ceiling_texture, "ceiling"),
        ]
        .into_iter()
        .filter_map(|(used, id, owner)| used.then_some((id, owner)))
    }
}
