use rayon::prelude::*;

use crate::buffer::RenderBuffer;
use crate::grid::IterationGrid;
use crate::palette::{Palette, PALETTE_SIZE};

const INTERIOR: [u8; 4] = [0, 0, 0, 255];

/// Count at `(x, y)`, averaged with its orthogonal neighbors when
/// `antialiasing` is on. Edge pixels average over the neighbors they have.
#[inline]
fn sample(grid: &IterationGrid, x: u32, y: u32, antialiasing: bool) -> u32 {
    let centre = grid.get(x, y);
    if !antialiasing {
        return centre;
    }
    let mut sum = centre as u64;
    let mut count = 1u64;
    if x > 0 {
        sum += grid.get(x - 1, y) as u64;
        count += 1;
    }
    if x + 1 < grid.width {
        sum += grid.get(x + 1, y) as u64;
        count += 1;
    }
    if y > 0 {
        sum += grid.get(x, y - 1) as u64;
        count += 1;
    }
    if y + 1 < grid.height {
        sum += grid.get(x, y + 1) as u64;
        count += 1;
    }
    (sum / count) as u32
}

/// Palette index for an escaped count. A zero `actual_max` maps to 0.
#[inline]
fn palette_index(value: u32, actual_max: u32) -> usize {
    if actual_max == 0 {
        return 0;
    }
    (value as u64 * (PALETTE_SIZE as u64 - 1) / actual_max as u64) as usize
}

/// Color a single cell.
pub fn color_at(
    grid: &IterationGrid,
    palette: &Palette,
    x: u32,
    y: u32,
    antialiasing: bool,
) -> [u8; 4] {
    let value = sample(grid, x, y, antialiasing);
    if value == grid.max_iteration {
        INTERIOR
    } else {
        palette.color(palette_index(value, grid.actual_max))
    }
}

/// Colorize an entire iteration grid into an RGBA pixel buffer.
pub fn colorize(grid: &IterationGrid, palette: &Palette, antialiasing: bool) -> RenderBuffer {
    let width = grid.width;
    let mut pixels = vec![0u8; grid.pixel_count() * 4];
    if width > 0 {
        pixels
            .par_chunks_mut(width as usize * 4)
            .enumerate()
            .for_each(|(y, row)| {
                for (x, pixel) in row.chunks_exact_mut(4).enumerate() {
                    let c = color_at(grid, palette, x as u32, y as u32, antialiasing);
                    pixel.copy_from_slice(&c);
                }
            });
    }
    RenderBuffer {
        width,
        height: grid.height,
        pixels,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::ColorScheme;

    fn grid(width: u32, height: u32, max: u32, data: &[u32]) -> IterationGrid {
        let mut g = IterationGrid::new(width, height, max);
        g.data.copy_from_slice(data);
        g.refresh_actual_max();
        g
    }

    #[test]
    fn interior_is_black() {
        let g = grid(2, 1, 100, &[100, 10]);
        let p = ColorScheme::Grayscale.palette();
        assert_eq!(color_at(&g, &p, 0, 0, false), [0, 0, 0, 255]);
    }

    #[test]
    fn index_scales_by_actual_max() {
        // actual_max = 60, so 30 → 30 * 255 / 60 = 127.
        let g = grid(3, 1, 100, &[30, 60, 1]);
        let p = ColorScheme::Grayscale.palette();
        assert_eq!(color_at(&g, &p, 0, 0, false), p.color(127));
        assert_eq!(color_at(&g, &p, 1, 0, false), p.color(255));
        assert_eq!(color_at(&g, &p, 2, 0, false), p.color(4));
    }

    #[test]
    fn zero_actual_max_uses_first_entry() {
        let mut g = IterationGrid::new(1, 1, 5);
        g.data[0] = 0;
        g.actual_max = 0;
        let p = ColorScheme::Grayscale.palette();
        assert_eq!(color_at(&g, &p, 0, 0, false), p.color(0));
    }

    #[test]
    fn antialiasing_averages_existing_neighbors() {
        // 3×3 grid, centre 10 surrounded by 20s orthogonally.
        #[rustfmt::skip]
        let g = grid(3, 3, 1000, &[
            1, 20, 1,
            20, 10, 20,
            1, 20, 1,
        ]);
        // (10 + 4·20) / 5 = 18
        assert_eq!(sample(&g, 1, 1, true), 18);
        // Corner: (1 + 20 + 20) / 3 = 13
        assert_eq!(sample(&g, 0, 0, true), 13);
        // Edge: (20 + 1 + 1 + 10) / 4 = 8
        assert_eq!(sample(&g, 1, 0, true), 8);
        assert_eq!(sample(&g, 1, 1, false), 10);
    }

    #[test]
    fn single_pixel_antialiasing_is_identity() {
        let g = grid(1, 1, 50, &[7]);
        assert_eq!(sample(&g, 0, 0, true), 7);
    }

    #[test]
    fn antialiased_interior_only_black_when_average_hits_cap() {
        let g = grid(2, 1, 100, &[100, 50]);
        let p = ColorScheme::Grayscale.palette();
        // (100 + 50) / 2 = 75, no longer interior.
        assert_ne!(color_at(&g, &p, 0, 0, true), [0, 0, 0, 255]);
        assert_eq!(color_at(&g, &p, 0, 0, false), [0, 0, 0, 255]);
    }

    #[test]
    fn colorize_produces_correct_size() {
        let g = IterationGrid::new(64, 48, 256);
        let rb = colorize(&g, &Palette::default(), true);
        assert_eq!(rb.width, 64);
        assert_eq!(rb.height, 48);
        assert_eq!(rb.pixels.len(), 64 * 48 * 4);
    }

    #[test]
    fn colorize_matches_per_pixel_color() {
        let g = grid(4, 2, 9, &[1, 2, 3, 9, 4, 5, 6, 7]);
        let p = ColorScheme::Rainbow.palette();
        let rb = colorize(&g, &p, false);
        for y in 0..2 {
            for x in 0..4 {
                assert_eq!(rb.pixel(x, y), color_at(&g, &p, x, y, false));
            }
        }
    }

    #[test]
    fn palette_index_never_decreases_with_count() {
        for actual_max in [1, 7, 200, 255, 256, 1000, u32::MAX] {
            let mut previous = 0;
            for value in (0..=actual_max.min(5000)).chain([actual_max]) {
                let index = palette_index(value, actual_max);
                assert!(index >= previous, "index fell at {value}/{actual_max}");
                assert!(index < PALETTE_SIZE);
                previous = index;
            }
            assert_eq!(palette_index(actual_max, actual_max), PALETTE_SIZE - 1);
        }
    }

    #[test]
    fn every_scheme_colors_by_rising_index() {
        let mut grid = IterationGrid::new(64, 1, 1000);
        for (x, cell) in grid.data.iter_mut().enumerate() {
            *cell = x as u32 * 3;
        }
        grid.refresh_actual_max();
        for scheme in ColorScheme::ALL {
            let palette = scheme.palette();
            for x in 0..64 {
                let expected = palette.color(palette_index(x * 3, grid.actual_max));
                assert_eq!(color_at(&grid, &palette, x, 0, false), expected);
            }
        }
    }
}
