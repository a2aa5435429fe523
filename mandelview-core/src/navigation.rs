//! Pan, zoom and rubber-band math on [`View`]s.
//!
//! Every function is pure: it takes the current view and the window size and
//! returns the next view. History bookkeeping lives with the caller.

use crate::point::Point;
use crate::view::View;

/// Zoom factor per mouse-wheel notch.
pub const WHEEL_ZOOM_FACTOR: f64 = 1.3;
/// Zoom factor per `+`/`-` key press.
pub const KEY_ZOOM_FACTOR: f64 = 1.6;
/// Arrow-key pan distance in screen pixels.
pub const KEY_PAN_PIXELS: f64 = 80.0;
/// Pointer travel (pixels) before a press becomes a drag.
pub const DRAG_THRESHOLD: f64 = 2.0;
/// Both sides of a selection must exceed this many pixels.
pub const MIN_SELECTION: f64 = 10.0;

/// Direction of an arrow-key pan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanDirection {
    Up,
    Down,
    Left,
    Right,
}

impl PanDirection {
    fn unit(self) -> Point {
        match self {
            Self::Up => Point::new(0.0, -1.0),
            Self::Down => Point::new(0.0, 1.0),
            Self::Left => Point::new(-1.0, 0.0),
            Self::Right => Point::new(1.0, 0.0),
        }
    }
}

/// Replace the zoom, clamped to [`View::MIN_ZOOM`]..=[`View::MAX_ZOOM`].
fn rezoom(view: &View, zoom: f64) -> View {
    let zoom = if zoom.is_nan() {
        view.zoom
    } else {
        zoom.clamp(View::MIN_ZOOM, View::MAX_ZOOM)
    };
    View { zoom, ..*view }
}

/// `next` if it is a valid view, otherwise `view` unchanged.
fn checked(view: &View, next: View) -> View {
    View::new(next.zoom, next.offset_x, next.offset_y).unwrap_or(*view)
}

/// Scale the zoom by `factor` while keeping the fractal point under
/// `cursor` (pixel coordinates) fixed on screen.
pub fn zoom_at(view: &View, cursor: Point, width: u32, height: u32, factor: f64) -> View {
    let before = view.screen_to_fractal(cursor.x, cursor.y, width, height);
    let zoomed = rezoom(view, view.zoom * factor);
    let after = zoomed.screen_to_fractal(cursor.x, cursor.y, width, height);
    checked(view, zoomed.with_offset(zoomed.offset() + (before - after)))
}

/// Scale the zoom about the window centre.
pub fn zoom_center(view: &View, factor: f64) -> View {
    rezoom(view, view.zoom * factor)
}

/// Move the view so the content follows a pointer moved by `delta` pixels.
pub fn drag(view: &View, delta: Point) -> View {
    let shift = Point::new(delta.x / view.zoom, delta.y / view.zoom);
    checked(view, view.with_offset(view.offset() - shift))
}

/// Arrow-key pan by [`KEY_PAN_PIXELS`] screen pixels.
pub fn pan(view: &View, direction: PanDirection) -> View {
    let unit = direction.unit();
    let step = KEY_PAN_PIXELS / view.zoom;
    checked(
        view,
        view.with_offset(view.offset() + Point::new(unit.x * step, unit.y * step)),
    )
}

/// Zoom into the rectangle spanned by two pixel corners.
///
/// Returns `None` unless both sides exceed [`MIN_SELECTION`] pixels. The new
/// centre is the midpoint of the corners and the zoom grows by the smaller of
/// the two window-to-selection ratios, so the whole selection stays visible.
pub fn zoom_to_selection(
    view: &View,
    start: Point,
    end: Point,
    width: u32,
    height: u32,
) -> Option<View> {
    let (x1, x2) = (start.x.min(end.x), start.x.max(end.x));
    let (y1, y2) = (start.y.min(end.y), start.y.max(end.y));
    let (rect_w, rect_h) = (x2 - x1, y2 - y1);
    if !(rect_w > MIN_SELECTION && rect_h > MIN_SELECTION) {
        return None;
    }

    let a = view.screen_to_fractal(x1, y1, width, height);
    let b = view.screen_to_fractal(x2, y2, width, height);
    let ratio = (width as f64 / rect_w).min(height as f64 / rect_h);
    let next = rezoom(view, view.zoom * ratio).with_offset(a.midpoint(b));
    View::new(next.zoom, next.offset_x, next.offset_y).ok()
}

/// Whether a pointer that travelled `delta` pixels since the press counts as
/// a drag rather than a click.
pub fn exceeds_drag_threshold(delta: Point) -> bool {
    delta.x.abs() > DRAG_THRESHOLD || delta.y.abs() > DRAG_THRESHOLD
}

/// Continuous actions that share one history entry while repeated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContinuousAction {
    Pan(PanDirection),
    ZoomIn,
    ZoomOut,
}
