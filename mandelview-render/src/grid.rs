/// Per-pixel escape counts for a full frame.
///
/// This is the raw output of the engine before coloring. Keeping it separate
/// from the RGBA raster enables instant palette and antialiasing changes
/// without recomputing.
#[derive(Debug, Clone)]
pub struct IterationGrid {
    pub width: u32,
    pub height: u32,
    /// Cap the counts were computed with. A cell equal to it did not escape.
    pub max_iteration: u32,
    /// Largest count present in `data`.
    pub actual_max: u32,
    /// Row-major counts, each in `1..=max_iteration`.
    pub data: Vec<u32>,
}

impl IterationGrid {
    pub fn new(width: u32, height: u32, max_iteration: u32) -> Self {
        Self {
            width,
            height,
            max_iteration,
            actual_max: 0,
            data: vec![0; width as usize * height as usize],
        }
    }

    /// Reuse `spare` when it already has the requested size, otherwise
    /// allocate a fresh grid.
    pub fn reuse_or_new(
        spare: Option<IterationGrid>,
        width: u32,
        height: u32,
        max_iteration: u32,
    ) -> Self {
        match spare {
            Some(mut grid) if grid.width == width && grid.height == height => {
                grid.max_iteration = max_iteration;
                grid.actual_max = 0;
                grid
            }
            _ => Self::new(width, height, max_iteration),
        }
    }

    #[inline]
    pub fn get(&self, x: u32, y: u32) -> u32 {
        self.data[(y * self.width + x) as usize]
    }

    pub fn pixel_count(&self) -> usize {
        self.data.len()
    }

    /// Recompute `actual_max` from the stored counts.
    pub fn refresh_actual_max(&mut self) {
        self.actual_max = self.data.iter().copied().max().unwrap_or(0);
    }
}
