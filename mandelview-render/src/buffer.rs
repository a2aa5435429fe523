use std::time::Duration;

use mandelview_core::View;

/// An RGBA pixel buffer representing a colored frame.
#[derive(Debug, Clone)]
pub struct RenderBuffer {
    pub width: u32,
    pub height: u32,
    /// RGBA pixel data, 4 bytes per pixel, row-major order.
    pub pixels: Vec<u8>,
}

impl RenderBuffer {
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let i = (y as usize * self.width as usize + x as usize) * 4;
        [
            self.pixels[i],
            self.pixels[i + 1],
            self.pixels[i + 2],
            self.pixels[i + 3],
        ]
    }
}

/// The last fully rendered frame and the view it shows.
///
/// Only a completed, non-stale computation may replace it. It is the sole
/// source for reprojection and for recoloring without recomputing.
#[derive(Debug, Clone)]
pub struct RasterSnapshot {
    pub view: View,
    pub buffer: RenderBuffer,
    pub grid: crate::IterationGrid,
    /// Bumped on every replacement so the UI knows when to re-upload.
    pub generation: u64,
    /// Wall time the computation took.
    pub elapsed: Duration,
}

impl RasterSnapshot {
    pub fn width(&self) -> u32 {
        self.buffer.width
    }

    pub fn height(&self) -> u32 {
        self.buffer.height
    }

    pub fn frame(&self) -> crate::RasterFrame {
        crate::RasterFrame {
            view: self.view,
            width: self.buffer.width,
            height: self.buffer.height,
        }
    }
}
