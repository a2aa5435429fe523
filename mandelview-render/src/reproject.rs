//! Preview geometry: where the last rendered raster lands in the current
//! window while the next computation is still running.

use mandelview_core::{Point, View};
use tracing::debug;

/// Tolerance when snapping source edges to whole pixels.
const SNAP_EPSILON: f64 = 1e-6;
/// Gap between the window border and the off-screen arrow tip.
pub const INDICATOR_MARGIN: f64 = 30.0;
pub const ARROW_LENGTH: f64 = 24.0;
pub const ARROW_HALF_WIDTH: f64 = 10.0;

/// A view rendered (or to be rendered) at a given pixel size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RasterFrame {
    pub view: View,
    pub width: u32,
    pub height: u32,
}

impl RasterFrame {
    fn is_valid(&self) -> bool {
        self.width > 0
            && self.height > 0
            && self.view.zoom > 0.0
            && self.view.zoom.is_finite()
            && self.view.offset_x.is_finite()
            && self.view.offset_y.is_finite()
    }
}

/// Whole-pixel rectangle in the old raster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Rectangle in window pixels. May extend past the window by less than one
/// old pixel after snapping; the painter clips it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RectF {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl RectF {
    pub fn from_corners(min: Point, max: Point) -> Self {
        Self {
            x: min.x,
            y: min.y,
            width: max.x - min.x,
            height: max.y - min.y,
        }
    }

    pub fn min(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn max(&self) -> Point {
        Point::new(self.x + self.width, self.y + self.height)
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

/// Arrow pointing from the window centre toward an off-screen raster.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OffscreenIndicator {
    /// Radians, measured from +x toward +y (screen y grows downward).
    pub angle: f64,
    /// Where the ray from the window centre meets the inset border.
    pub tip: Point,
    /// Arrow-head base corners, behind `tip`.
    pub left: Point,
    pub right: Point,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Projection {
    pub source: Option<PixelRect>,
    pub dest: Option<RectF>,
    pub indicator: Option<OffscreenIndicator>,
}

/// Affine map from old-raster pixels to new-window pixels.
#[derive(Debug, Clone, Copy)]
struct PixelMap {
    scale: f64,
    translate: Point,
}

impl PixelMap {
    fn between(last: &RasterFrame, next: &RasterFrame) -> Self {
        let scale = next.view.zoom / last.view.zoom;
        // new = (old - last_half) * scale + (last_offset - next_offset) * next_zoom + next_half
        let last_half = Point::new(last.width as f64 / 2.0, last.height as f64 / 2.0);
        let next_half = Point::new(next.width as f64 / 2.0, next.height as f64 / 2.0);
        let shift = last.view.offset() - next.view.offset();
        let translate = Point::new(
            next_half.x + shift.x * next.view.zoom - last_half.x * scale,
            next_half.y + shift.y * next.view.zoom - last_half.y * scale,
        );
        Self { scale, translate }
    }

    fn forward(&self, p: Point) -> Point {
        Point::new(
            p.x * self.scale + self.translate.x,
            p.y * self.scale + self.translate.y,
        )
    }

    fn inverse(&self, p: Point) -> Point {
        Point::new(
            (p.x - self.translate.x) / self.scale,
            (p.y - self.translate.y) / self.scale,
        )
    }
}

/// Compute how the raster rendered for `last` should be drawn into the
/// window described by `next`.
///
/// The source is the part of the old raster that is still visible, snapped
/// outward to whole pixels. The destination is that exact source mapped into
/// the new window, so fractional pans shift the image by the same fraction
/// instead of jumping a pixel. When nothing of the old raster is visible an
/// off-screen indicator is returned instead. Degenerate frames yield an empty
/// projection.
pub fn project(last: &RasterFrame, next: &RasterFrame) -> Projection {
    if !last.is_valid() || !next.is_valid() {
        return Projection::default();
    }

    let (last_w, last_h) = (last.width as f64, last.height as f64);
    if last == next {
        return Projection {
            source: Some(PixelRect {
                x: 0,
                y: 0,
                width: last.width,
                height: last.height,
            }),
            dest: Some(RectF {
                x: 0.0,
                y: 0.0,
                width: last_w,
                height: last_h,
            }),
            indicator: None,
        };
    }

    let map = PixelMap::between(last, next);
    if !map.scale.is_finite() || map.scale <= 0.0 {
        return Projection::default();
    }
    let extent = RectF::from_corners(
        map.forward(Point::ORIGIN),
        map.forward(Point::new(last_w, last_h)),
    );
    let (next_w, next_h) = (next.width as f64, next.height as f64);

    let visible = extent.x < next_w
        && extent.max().x > 0.0
        && extent.y < next_h
        && extent.max().y > 0.0;
    if !visible {
        debug!(centre = %extent.center(), "Last raster is off-screen");
        return Projection {
            indicator: Some(indicator(extent.center(), next_w, next_h)),
            ..Projection::default()
        };
    }

    // Window corners in old-raster pixels, clamped to the raster.
    let a = map.inverse(Point::ORIGIN);
    let b = map.inverse(Point::new(next_w, next_h));
    let (Some((x0, x1)), Some((y0, y1))) = (span(a.x, b.x, last_w), span(a.y, b.y, last_h))
    else {
        return Projection::default();
    };

    let source = PixelRect {
        x: x0 as u32,
        y: y0 as u32,
        width: (x1 - x0) as u32,
        height: (y1 - y0) as u32,
    };
    let dest = RectF::from_corners(
        map.forward(Point::new(x0, y0)),
        map.forward(Point::new(x1, y1)),
    );
    Projection {
        source: Some(source),
        dest: Some(dest),
        indicator: None,
    }
}

/// Whole-pixel source span covering `[lo, hi]`, clamped to `[0, limit]`.
///
/// Under extreme magnification the epsilon snap can collapse a sub-pixel span
/// onto a single boundary; plain floor/ceil then keeps at least one pixel.
fn span(lo: f64, hi: f64, limit: f64) -> Option<(f64, f64)> {
    let (lo, hi) = (lo.max(0.0), hi.min(limit));
    let (start, end) = (snap_down(lo).min(limit), snap_up(hi).max(0.0));
    if end > start {
        return Some((start, end));
    }
    let (start, end) = (lo.floor().min(limit), hi.ceil().max(0.0));
    if end > start {
        return Some((start, end));
    }
    // Span narrower than one f64 step: take the pixel it sits on.
    let start = lo.floor().min(limit - 1.0).max(0.0);
    (limit >= 1.0).then_some((start, start + 1.0))
}

#[inline]
fn snap_down(v: f64) -> f64 {
    (v + SNAP_EPSILON).floor()
}

#[inline]
fn snap_up(v: f64) -> f64 {
    (v - SNAP_EPSILON).ceil()
}

fn indicator(target: Point, width: f64, height: f64) -> OffscreenIndicator {
    let centre = Point::new(width / 2.0, height / 2.0);
    let angle = (target.y - centre.y).atan2(target.x - centre.x);
    let dir = Point::new(angle.cos(), angle.sin());

    let half_x = (width / 2.0 - INDICATOR_MARGIN).max(0.0);
    let half_y = (height / 2.0 - INDICATOR_MARGIN).max(0.0);
    let tx = if dir.x.abs() > f64::EPSILON {
        half_x / dir.x.abs()
    } else {
        f64::INFINITY
    };
    let ty = if dir.y.abs() > f64::EPSILON {
        half_y / dir.y.abs()
    } else {
        f64::INFINITY
    };
    let t = tx.min(ty);
    let tip = Point::new(centre.x + dir.x * t, centre.y + dir.y * t);

    let base = Point::new(tip.x - dir.x * ARROW_LENGTH, tip.y - dir.y * ARROW_LENGTH);
    let perp = Point::new(-dir.y * ARROW_HALF_WIDTH, dir.x * ARROW_HALF_WIDTH);
    OffscreenIndicator {
        angle,
        tip,
        left: base + perp,
        right: base - perp,
    }
}
