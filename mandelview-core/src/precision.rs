use serde::{Deserialize, Serialize};
use tracing::warn;

/// Arithmetic used by the escape-time kernel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrecisionMode {
    /// Hardware `f64`.
    #[default]
    Standard,
    /// Software floats whose mantissa grows with the zoom.
    Arbitrary,
}

impl PrecisionMode {
    /// Resolve the mode that will actually run.
    ///
    /// `Arbitrary` degrades to `Standard` when the crate was built without the
    /// `arbitrary-precision` feature.
    pub fn effective(self) -> Self {
        match self {
            Self::Arbitrary if !crate::supports_arbitrary_precision() => {
                warn!("arbitrary precision not compiled in, falling back to standard");
                Self::Standard
            }
            mode => mode,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Standard => Self::Arbitrary,
            Self::Arbitrary => Self::Standard,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Arbitrary => "arbitrary",
        }
    }
}

/// Smallest mantissa width ever used.
pub const MIN_PRECISION_BITS: usize = 10;

/// Mantissa bits for the arbitrary kernel at a given zoom:
/// `max(10, floor(10 + 4 ln zoom))`.
///
/// Non-finite or non-positive zooms get the minimum.
pub fn precision_bits(zoom: f64) -> usize {
    if !zoom.is_finite() || zoom <= 0.0 {
        return MIN_PRECISION_BITS;
    }
    let bits = (10.0 + 4.0 * zoom.ln()).floor();
    if bits <= MIN_PRECISION_BITS as f64 {
        MIN_PRECISION_BITS
    } else {
        bits as usize
    }
}
