use std::path::PathBuf;

use argh::FromArgs;

use raycaster::RenderConfig;
use raycaster::texture::Filter;

/// Walk around the demo level.
#[derive(Debug, Clone, FromArgs)]
pub struct CLIOptions {
    /// verbose level: off, error, warn, info, debug
    #[argh(option)]
    pub verbose: Option<log::LevelFilter>,
    /// internal framebuffer width in pixels
    #[argh(option, default = "320")]
    pub width: usize,
    /// internal framebuffer height in pixels
    #[argh(option, default = "180")]
    pub height: usize,
    /// number of render worker threads
    #[argh(option, default = "6")]
    pub threads: usize,
    /// distance from the camera to the projection plane
    #[argh(option, default = "0.01")]
    pub near: f32,
    /// draw distance
    #[argh(option, default = "6.0")]
    pub far: f32,
    /// half the width of the projection plane
    #[argh(option, default = "0.01")]
    pub right: f32,
    /// path to a TOML render config
    #[argh(option)]
    pub config: Option<PathBuf>,
    /// start with bilinear filtering on
    #[argh(switch)]
    pub bilinear: bool,
    /// start with fog off
    #[argh(switch)]
    pub no_fog: bool,
}

impl CLIOptions {
    /// Load the config file if one was given, then apply the switches on top.
    pub fn render_config(&self) -> raycaster::Result<RenderConfig> {
        let mut config = match &self.config {
            Some(path) => RenderConfig::load(path)?,
            None => RenderConfig::default(),
        };
        if self.bilinear {
            config.filter = Filter::Bilinear;
        }
        if self.no_fog {
            config.fog = false;
        }
        Ok(config)
    }
}
