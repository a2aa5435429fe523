use dashu_float::FBig;

use crate::error::CoreError;
use crate::escape::{EscapeTime, IterationLimit};
use crate::point::Point;
use crate::precision::{precision_bits, MIN_PRECISION_BITS};
use crate::view::View;

/// Software-float kernel for zooms beyond the reach of `f64`.
///
/// The view centre is held at `precision` mantissa bits and every pixel is
/// evaluated as `centre + delta`, with the addition itself carried out in
/// software. Points passed to [`escape_time`](EscapeTime::escape_time) are
/// deltas from the centre, not absolute coordinates.
#[derive(Debug, Clone)]
pub struct MandelbrotArbitrary {
    limit: IterationLimit,
    precision: usize,
    center_x: FBig,
    center_y: FBig,
    four: FBig,
}

impl MandelbrotArbitrary {
    pub fn new(center: Point, limit: IterationLimit, precision: usize) -> crate::Result<Self> {
        let precision = precision.max(MIN_PRECISION_BITS);
        let center_x = to_fbig(center.x, precision).ok_or_else(|| CoreError::InvalidView {
            reason: format!("centre x {} has no arbitrary-precision form", center.x),
        })?;
        let center_y = to_fbig(center.y, precision).ok_or_else(|| CoreError::InvalidView {
            reason: format!("centre y {} has no arbitrary-precision form", center.y),
        })?;
        let four = to_fbig(4.0, precision).unwrap_or(FBig::ZERO);
        Ok(Self {
            limit,
            precision,
            center_x,
            center_y,
            four,
        })
    }

    /// Kernel for `view`, with the mantissa width derived from its zoom.
    pub fn for_view(view: &View, limit: IterationLimit) -> crate::Result<Self> {
        Self::new(view.offset(), limit, precision_bits(view.zoom))
    }

    pub fn precision(&self) -> usize {
        self.precision
    }
}

fn to_fbig(value: f64, precision: usize) -> Option<FBig> {
    if value == 0.0 {
        return Some(FBig::ZERO.with_precision(precision).value());
    }
    FBig::try_from(value)
        .ok()
        .map(|v| v.with_precision(precision).value())
}

impl EscapeTime for MandelbrotArbitrary {
    fn escape_time(&self, delta: Point) -> u32 {
        let max_iteration = self.limit.get();
        let zero = to_fbig(0.0, self.precision).unwrap_or(FBig::ZERO);
        let dx = to_fbig(delta.x, self.precision).unwrap_or_else(|| zero.clone());
        let dy = to_fbig(delta.y, self.precision).unwrap_or_else(|| zero.clone());
        let cx = &self.center_x + &dx;
        let cy = &self.center_y + &dy;

        let mut x = zero.clone();
        let mut y = zero;
        let mut iteration = 0;
        while iteration < max_iteration {
            let x2 = &x * &x;
            let y2 = &y * &y;
            if &x2 + &y2 > self.four {
                break;
            }
            let xy = &x * &y;
            y = &(&xy + &xy) + &cy;
            x = &(&x2 - &y2) + &cx;
            iteration += 1;
        }
        iteration
    }

    fn max_iteration(&self) -> u32 {
        self.limit.get()
    }

    fn uses_delta_coordinates(&self) -> bool {
        true
    }
}
