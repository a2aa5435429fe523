use crate::error::CoreError;
use crate::point::Point;

/// Squared bailout radius: an orbit with `|z|² > 4` is certain to diverge.
pub const BAILOUT_SQ: f64 = 4.0;

/// Validated iteration bound shared by every kernel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IterationLimit(u32);

impl IterationLimit {
    pub const DEFAULT: u32 = 200;

    pub fn new(max_iteration: u32) -> crate::Result<Self> {
        if max_iteration < 1 {
            return Err(CoreError::InvalidMaxIteration(max_iteration));
        }
        Ok(Self(max_iteration))
    }

    #[inline]
    pub fn get(self) -> u32 {
        self.0
    }
}

impl Default for IterationLimit {
    fn default() -> Self {
        Self(Self::DEFAULT)
    }
}

/// Escape-time kernel for the quadratic Mandelbrot map.
///
/// Implementations return the number of steps `z ← z² + c` (from `z₀ = 0`)
/// taken while `|z|² <= 4`, capped at [`max_iteration`](Self::max_iteration).
/// A result equal to the cap means the point did not escape.
///
/// Drivers are generic over `E: EscapeTime` so the hot loop is statically
/// dispatched.
pub trait EscapeTime {
    /// Iterate a single point.
    ///
    /// For absolute kernels `point` is the complex-plane coordinate. When
    /// [`uses_delta_coordinates`](Self::uses_delta_coordinates) is `true` it is
    /// the offset from the kernel's stored centre (see [`crate::View::pixel_delta`]).
    fn escape_time(&self, point: Point) -> u32;

    fn max_iteration(&self) -> u32;

    fn uses_delta_coordinates(&self) -> bool {
        false
    }
}
