use thiserror::Error;

/// Errors originating from the computation pipeline.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("invalid image dimensions: {width}×{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("computation cancelled")]
    Cancelled,

    #[error("failed to spawn compute thread: {0}")]
    Spawn(#[source] std::io::Error),

    #[error(transparent)]
    Core(#[from] mandelview_core::CoreError),
}
