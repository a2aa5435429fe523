use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Instant;

use rayon::prelude::*;
use tracing::{debug, info};

use mandelview_core::{EscapeTime, IterationLimit, Mandelbrot, PrecisionMode, View};

use crate::error::RenderError;
use crate::grid::IterationGrid;
use crate::task::TaskProgress;

/// Immutable parameters of one computation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComputeParams {
    pub view: View,
    pub max_iteration: u32,
    pub width: u32,
    pub height: u32,
    pub antialiasing: bool,
    pub precision: PrecisionMode,
}

impl ComputeParams {
    /// Reject zero-sized frames and a zero iteration cap.
    pub fn validate(&self) -> crate::Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(RenderError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        IterationLimit::new(self.max_iteration)?;
        Ok(())
    }
}

/// Fill `grid` with escape counts for `params`.
///
/// Rows run in parallel on the rayon pool. After every finished row the
/// shared progress is raised to `rows_done * 100 / height`; the cancellation
/// flag is checked before each row starts. A cancelled computation returns
/// [`RenderError::Cancelled`] and its partial grid is dropped.
///
/// `grid` is reused when its size matches and reallocated otherwise.
pub fn compute(
    params: &ComputeParams,
    grid: IterationGrid,
    progress: &TaskProgress,
) -> crate::Result<IterationGrid> {
    params.validate()?;
    let limit = IterationLimit::new(params.max_iteration)?;
    let grid = IterationGrid::reuse_or_new(
        Some(grid),
        params.width,
        params.height,
        params.max_iteration,
    );

    match params.precision.effective() {
        #[cfg(feature = "arbitrary-precision")]
        PrecisionMode::Arbitrary => {
            let kernel = mandelview_core::MandelbrotArbitrary::for_view(&params.view, limit)?;
            debug!(bits = kernel.precision(), "Using arbitrary-precision kernel");
            fill(&kernel, params, grid, progress)
        }
        _ => fill(&Mandelbrot::new(limit), params, grid, progress),
    }
}

fn fill<E: EscapeTime + Sync>(
    kernel: &E,
    params: &ComputeParams,
    mut grid: IterationGrid,
    progress: &TaskProgress,
) -> crate::Result<IterationGrid> {
    let start = Instant::now();
    let (width, height) = (params.width, params.height);
    let view = params.view;
    let delta = kernel.uses_delta_coordinates();
    let rows_done = AtomicU32::new(0);

    debug!(width, height, max_iteration = params.max_iteration, %view, "Starting computation");

    grid.data
        .par_chunks_mut(width as usize)
        .enumerate()
        .for_each(|(py, row)| {
            if progress.is_cancelled() {
                return;
            }
            for (px, cell) in row.iter_mut().enumerate() {
                let point = if delta {
                    view.pixel_delta(px as f64, py as f64, width, height)
                } else {
                    view.screen_to_fractal(px as f64, py as f64, width, height)
                };
                *cell = kernel.escape_time(point);
            }
            let done = rows_done.fetch_add(1, Ordering::Relaxed) + 1;
            progress.report((done as u64 * 100 / height as u64) as u32);
        });

    if progress.is_cancelled() {
        debug!(
            rows_done = rows_done.load(Ordering::Relaxed),
            "Computation cancelled"
        );
        return Err(RenderError::Cancelled);
    }

    grid.refresh_actual_max();
    info!(
        elapsed_ms = start.elapsed().as_millis(),
        width,
        height,
        actual_max = grid.actual_max,
        "Computation complete"
    );
    Ok(grid)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(width: u32, height: u32, max_iteration: u32) -> ComputeParams {
        ComputeParams {
            view: View::new(200.0, -0.5, 0.0).unwrap(),
            max_iteration,
            width,
            height,
            antialiasing: false,
            precision: PrecisionMode::Standard,
        }
    }

    #[test]
    fn centre_of_default_view_is_interior() {
        let p = params(100, 100, 200);
        let progress = TaskProgress::new();
        let grid = compute(&p, IterationGrid::new(1, 1, 1), &progress).unwrap();
        assert_eq!(grid.width, 100);
        assert_eq!(grid.get(50, 50), 200);
        assert_eq!(grid.actual_max, 200);
        assert_eq!(progress.percent(), 100);
    }

    #[test]
    fn counts_stay_within_cap() {
        let p = params(64, 48, 75);
        let grid = compute(&p, IterationGrid::new(64, 48, 75), &TaskProgress::new()).unwrap();
        assert!(grid.data.iter().all(|&n| (1..=75).contains(&n)));
        assert_eq!(grid.actual_max, *grid.data.iter().max().unwrap());
    }

    #[test]
    fn matches_direct_kernel_evaluation() {
        let p = params(40, 30, 120);
        let grid = compute(&p, IterationGrid::new(40, 30, 120), &TaskProgress::new()).unwrap();
        let kernel = Mandelbrot::new(IterationLimit::new(120).unwrap());
        for py in 0..30 {
            for px in 0..40 {
                let c = p.view.screen_to_fractal(px as f64, py as f64, 40, 30);
                assert_eq!(grid.get(px, py), kernel.escape_time(c));
            }
        }
    }

    #[test]
    fn cancelled_before_start_returns_cancelled() {
        let p = params(32, 32, 100);
        let progress = TaskProgress::new();
        progress.cancel();
        let result = compute(&p, IterationGrid::new(32, 32, 100), &progress);
        assert!(matches!(result, Err(RenderError::Cancelled)));
        assert_eq!(progress.percent(), 0);
    }

    #[test]
    fn zero_dimensions_rejected() {
        let p = params(0, 10, 100);
        let result = compute(&p, IterationGrid::new(1, 1, 1), &TaskProgress::new());
        assert!(matches!(
            result,
            Err(RenderError::InvalidDimensions { width: 0, height: 10 })
        ));
    }

    #[test]
    fn zero_max_iteration_rejected() {
        let p = params(8, 8, 0);
        let result = compute(&p, IterationGrid::new(8, 8, 1), &TaskProgress::new());
        assert!(matches!(result, Err(RenderError::Core(_))));
    }

    #[cfg(feature = "arbitrary-precision")]
    #[test]
    fn arbitrary_mode_fills_grid() {
        let mut p = params(24, 16, 60);
        p.precision = PrecisionMode::Arbitrary;
        let grid = compute(&p, IterationGrid::new(24, 16, 60), &TaskProgress::new()).unwrap();
        assert_eq!(grid.get(12, 8), 60);
        assert!(grid.data.iter().all(|&n| (1..=60).contains(&n)));
    }
}
