//! Frame entry point: validate, split the screen, cast and draw in parallel.

use log::warn;

use crate::camera::Camera;
use crate::config::RenderConfig;
use crate::error::{Error, Result};
use crate::framebuffer::Framebuffer;
use crate::pool::{WorkerPool, partition_columns};
use crate::raycast::cast_rays;
use crate::renderer::ColumnDrawer;
use crate::texture::TextureCache;
use crate::world::Level;

/// Owns the textures and the worker threads; everything else is borrowed
/// per frame.
pub struct RenderPipeline {
    textures: TextureCache,
    pool: WorkerPool,
}

impl RenderPipeline {
    pub fn new(textures: TextureCache, workers: usize) -> Result<Self> {
        Ok(Self {
            textures,
            pool: WorkerPool::new(workers)?,
        })
    }

    #[inline]
    pub fn textures(&self) -> &TextureCache {
        &self.textures
    }

    #[inline]
    pub fn workers(&self) -> usize {
        self.pool.workers()
    }

    /// Draw one frame of `level` as seen by `camera` into `framebuffer`.
    ///
    /// Every column is written exactly once, by whichever worker owns it, and
    /// the call returns only after all of them are done. If a texture id is
    /// bad the frame is refused before anything is drawn.
    pub fn render(
        &self,
        level: &Level,
        camera: &Camera,
        framebuffer: &mut Framebuffer,
        config: &RenderConfig,
    ) -> Result<()> {
        self.validate(level, config)?;

        let width = framebuffer.width();
        let ranges = partition_columns(width, self.pool.workers());
        let drawer = ColumnDrawer::new(camera, &self.textures, config, framebuffer.height());
        let spans = framebuffer.split_columns(&ranges);

        self.pool.run(spans, |_, mut span| {
            let columns = span.columns();
            let candidates = cast_rays(
                level,
                camera,
                width,
                columns.clone(),
                config.tile_wall_textures,
            );
            for (x, column) in columns.zip(&candidates) {
                drawer.draw(&mut span, x, column);
            }
        });
        Ok(())
    }

    fn validate(&self, level: &Level, config: &RenderConfig) -> Result<()> {
        level.validate(&self.textures)?;
        for (id, owner) in config.surface_textures() {
            if self.textures.get(id).is_none() {
                warn!("{owner} texture {id} is not loaded");
                return Err(Error::InvalidTextureId { id, owner });
            }
        }
        Ok(())
    }
}
