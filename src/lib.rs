//! A 2.5D raycasting renderer.
//!
//! Walls are arbitrary line segments on a flat map, sprites are billboards
//! that always face the camera. Each frame casts one ray per screen column,
//! sorts what it hits by distance and fills the column from the nearest
//! opaque hit, with fog and a reverse-projected floor and ceiling. Columns are
//! split between a fixed pool of worker threads.

pub mod camera;
pub mod config;
pub mod demo;
pub mod error;
pub mod framebuffer;
pub mod geometry;
pub mod pipeline;
pub mod pool;
pub mod raycast;
pub mod renderer;
pub mod texture;
pub mod world;

pub use camera::Camera;
pub use config::RenderConfig;
pub use error::{Error, Result};
pub use framebuffer::{Framebuffer, PixelFormat, SurfaceLayout};
pub use pipeline::RenderPipeline;
pub use texture::{Colour, Filter, Texture, TextureCache};
pub use world::{Level, Sprite, Wall};
