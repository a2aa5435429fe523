pub mod entry;
pub mod error;
pub mod escape;
pub mod history;
pub mod mandelbrot;
pub mod navigation;
pub mod point;
pub mod precision;
pub mod view;

#[cfg(feature = "arbitrary-precision")]
pub mod arbitrary;

// Re-export primary types for convenience.
#[cfg(feature = "arbitrary-precision")]
pub use arbitrary::MandelbrotArbitrary;
pub use entry::{EntryTarget, EntryValue, NumericEntry};
pub use error::CoreError;
pub use escape::{EscapeTime, IterationLimit};
pub use history::ViewHistory;
pub use mandelbrot::Mandelbrot;
pub use point::Point;
pub use precision::{precision_bits, PrecisionMode};
pub use view::View;

/// Convenience result type for the core crate.
pub type Result<T> = std::result::Result<T, CoreError>;

/// Whether the arbitrary-precision kernel was compiled in.
pub const fn supports_arbitrary_precision() -> bool {
    cfg!(feature = "arbitrary-precision")
}
