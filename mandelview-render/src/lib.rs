pub mod buffer;
pub mod colorize;
pub mod controller;
pub mod engine;
pub mod error;
pub mod grid;
pub mod palette;
pub mod reproject;
pub mod session;
pub mod task;

pub use buffer::{RasterSnapshot, RenderBuffer};
pub use colorize::colorize;
pub use controller::{CompletedCompute, ComputeController, ControllerPhase, PollOutcome};
pub use engine::{compute, ComputeParams};
pub use error::RenderError;
pub use grid::IterationGrid;
pub use palette::{ColorScheme, Palette, PALETTE_SIZE};
pub use reproject::{project, OffscreenIndicator, PixelRect, Projection, RasterFrame, RectF};
pub use session::{FractalSession, PointerButton, SessionSettings, TickOutcome};
pub use task::{ComputeHandle, TaskOutput, TaskProgress};

/// Convenience result type for the render crate.
pub type Result<T> = std::result::Result<T, RenderError>;
