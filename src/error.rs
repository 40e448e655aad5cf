use crate::framebuffer::SurfaceLayout;

/// Error type for the rendering core and its startup checks.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("unsupported pixel layout: {0:?}")]
    UnsupportedPixelFormat(SurfaceLayout),

    #[error("texture id {id} used by {owner} has no texture loaded")]
    InvalidTextureId { id: usize, owner: &'static str },

    #[error("invalid camera: {0}")]
    InvalidCamera(&'static str),

    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("config error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;
