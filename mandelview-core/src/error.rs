use thiserror::Error;

/// Errors originating from the core math and navigation types.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid max iteration: {0} (must be >= 1)")]
    InvalidMaxIteration(u32),

    #[error("invalid view: {reason}")]
    InvalidView { reason: String },
}
