use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::point::Point;

/// The visible region of the complex plane.
///
/// The centre of the window maps to `(offset_x, offset_y)` and `zoom` is the
/// number of pixels per complex-plane unit. The view carries no pixel
/// dimensions; every mapping takes the window size explicitly so the same view
/// can be projected onto rasters of different sizes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct View {
    /// Pixels per complex-plane unit. Always positive and finite.
    pub zoom: f64,
    /// Real coordinate of the window centre.
    pub offset_x: f64,
    /// Imaginary coordinate of the window centre.
    pub offset_y: f64,
}

impl View {
    pub const DEFAULT_ZOOM: f64 = 200.0;
    pub const DEFAULT_OFFSET_X: f64 = -0.5;
    pub const DEFAULT_OFFSET_Y: f64 = 0.0;
    /// Navigation never zooms out past this.
    pub const MIN_ZOOM: f64 = 1e-3;
    /// Navigation never zooms in past this.
    pub const MAX_ZOOM: f64 = 1e300;

    /// Create a view, rejecting non-positive or non-finite zoom and
    /// non-finite offsets.
    pub fn new(zoom: f64, offset_x: f64, offset_y: f64) -> crate::Result<Self> {
        if zoom <= 0.0 || !zoom.is_finite() {
            return Err(CoreError::InvalidView {
                reason: format!("zoom must be positive and finite, got {zoom}"),
            });
        }
        if !offset_x.is_finite() || !offset_y.is_finite() {
            return Err(CoreError::InvalidView {
                reason: format!("offset must be finite, got ({offset_x}, {offset_y})"),
            });
        }
        Ok(Self {
            zoom,
            offset_x,
            offset_y,
        })
    }

    /// The window centre as a complex-plane point.
    #[inline]
    pub fn offset(&self) -> Point {
        Point::new(self.offset_x, self.offset_y)
    }

    /// Map pixel coordinates to the complex plane.
    ///
    /// `fx = (px - width/2) / zoom + offset_x`, likewise for y. Pixel y grows
    /// downward and so does the imaginary part.
    #[inline]
    pub fn screen_to_fractal(&self, px: f64, py: f64, width: u32, height: u32) -> Point {
        let delta = self.pixel_delta(px, py, width, height);
        Point::new(delta.x + self.offset_x, delta.y + self.offset_y)
    }

    /// Inverse of [`screen_to_fractal`](Self::screen_to_fractal).
    #[inline]
    pub fn fractal_to_screen(&self, fx: f64, fy: f64, width: u32, height: u32) -> Point {
        Point::new(
            (fx - self.offset_x) * self.zoom + width as f64 / 2.0,
            (fy - self.offset_y) * self.zoom + height as f64 / 2.0,
        )
    }

    /// Complex-plane distance from the window centre to a pixel.
    ///
    /// The arbitrary-precision kernel adds this delta to a centre held at full
    /// precision instead of receiving an already-rounded absolute coordinate.
    #[inline]
    pub fn pixel_delta(&self, px: f64, py: f64, width: u32, height: u32) -> Point {
        Point::new(
            (px - width as f64 / 2.0) / self.zoom,
            (py - height as f64 / 2.0) / self.zoom,
        )
    }

    /// Return a copy with the offset replaced.
    pub fn with_offset(self, offset: Point) -> Self {
        Self {
            offset_x: offset.x,
            offset_y: offset.y,
            ..self
        }
    }
}

impl Default for View {
    fn default() -> Self {
        Self {
            zoom: Self::DEFAULT_ZOOM,
            offset_x: Self::DEFAULT_OFFSET_X,
            offset_y: Self::DEFAULT_OFFSET_Y,
        }
    }
}

impl std::fmt::Display for View {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "zoom {} at ({}, {})",
            self.zoom, self.offset_x, self.offset_y
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    #[test]
    fn centre_pixel_maps_to_offset() {
        let view = View::new(200.0, -0.5, 0.0).unwrap();
        let p = view.screen_to_fractal(50.0, 50.0, 100, 100);
        assert_eq!(p, Point::new(-0.5, 0.0));
    }

    #[test]
    fn corners_span_window_over_zoom() {
        let view = View::new(100.0, 0.0, 0.0).unwrap();
        let tl = view.screen_to_fractal(0.0, 0.0, 400, 200);
        let br = view.screen_to_fractal(400.0, 200.0, 400, 200);
        assert!((tl.x - (-2.0)).abs() < EPSILON);
        assert!((tl.y - (-1.0)).abs() < EPSILON);
        assert!((br.x - 2.0).abs() < EPSILON);
        assert!((br.y - 1.0).abs() < EPSILON);
    }

    #[test]
    fn round_trip_recovers_every_pixel() {
        let view = View::new(347.25, -0.743643887, 0.131825904).unwrap();
        let (w, h) = (64, 48);
        for py in 0..h {
            for px in 0..w {
                let f = view.screen_to_fractal(px as f64, py as f64, w, h);
                let s = view.fractal_to_screen(f.x, f.y, w, h);
                assert!((s.x - px as f64).abs() < 1e-6, "x drift at ({px}, {py})");
                assert!((s.y - py as f64).abs() < 1e-6, "y drift at ({px}, {py})");
            }
        }
    }

    #[test]
    fn pixel_delta_ignores_offset() {
        let a = View::new(50.0, 3.0, -7.0).unwrap();
        let b = View::new(50.0, 0.0, 0.0).unwrap();
        assert_eq!(
            a.pixel_delta(10.0, 20.0, 80, 60),
            b.pixel_delta(10.0, 20.0, 80, 60)
        );
    }

    #[test]
    fn invalid_zoom_rejected() {
        assert!(View::new(0.0, 0.0, 0.0).is_err());
        assert!(View::new(-1.0, 0.0, 0.0).is_err());
        assert!(View::new(f64::INFINITY, 0.0, 0.0).is_err());
        assert!(View::new(f64::NAN, 0.0, 0.0).is_err());
    }

    #[test]
    fn invalid_offset_rejected() {
        assert!(View::new(1.0, f64::NAN, 0.0).is_err());
        assert!(View::new(1.0, 0.0, f64::NEG_INFINITY).is_err());
    }

    #[test]
    fn serde_round_trip() {
        let view = View::new(1.5e6, -0.75, 0.1).unwrap();
        let json = serde_json::to_string(&view).unwrap();
        let back: View = serde_json::from_str(&json).unwrap();
        assert_eq!(view, back);
    }
}
