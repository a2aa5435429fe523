use crate::escape::{EscapeTime, IterationLimit, BAILOUT_SQ};
use crate::point::Point;

/// Standard double-precision kernel.
///
/// Accurate until the zoom approaches the precision floor of `f64`
/// (around 1e15 pixels per unit), where banding starts to show.
#[derive(Debug, Clone, Copy)]
pub struct Mandelbrot {
    limit: IterationLimit,
}

impl Mandelbrot {
    pub fn new(limit: IterationLimit) -> Self {
        Self { limit }
    }
}

impl Default for Mandelbrot {
    fn default() -> Self {
        Self::new(IterationLimit::default())
    }
}

/// Returns `true` if `c` lies inside the main cardioid.
#[inline]
fn in_cardioid(x: f64, y: f64) -> bool {
    let y2 = y * y;
    let q = (x - 0.25) * (x - 0.25) + y2;
    q * (q + (x - 0.25)) <= 0.25 * y2
}

/// Returns `true` if `c` lies inside the period-2 bulb.
#[inline]
fn in_period2_bulb(x: f64, y: f64) -> bool {
    (x + 1.0) * (x + 1.0) + y * y <= 0.0625
}

impl EscapeTime for Mandelbrot {
    fn escape_time(&self, c: Point) -> u32 {
        let max_iteration = self.limit.get();

        // Both regions are interior, so the orbit would run to the cap anyway.
        if in_cardioid(c.x, c.y) || in_period2_bulb(c.x, c.y) {
            return max_iteration;
        }

        let (mut x, mut y) = (0.0f64, 0.0f64);
        let mut iteration = 0;
        while x * x + y * y <= BAILOUT_SQ && iteration < max_iteration {
            let xtemp = x * x - y * y + c.x;
            y = 2.0 * x * y + c.y;
            x = xtemp;
            iteration += 1;
        }
        iteration
    }

    fn max_iteration(&self) -> u32 {
        self.limit.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mb(max: u32) -> Mandelbrot {
        Mandelbrot::new(IterationLimit::new(max).unwrap())
    }

    #[test]
    fn origin_never_escapes() {
        for max in [1, 7, 200, 5000] {
            assert_eq!(mb(max).escape_time(Point::ORIGIN), max);
        }
    }

    #[test]
    fn point_outside_radius_escapes_after_one_step() {
        // z₀ = 0 always passes the first check, z₁ = c fails it.
        assert_eq!(mb(200).escape_time(Point::new(3.0, 0.0)), 1);
        assert_eq!(mb(200).escape_time(Point::new(-2.0, 2.0)), 1);
    }

    #[test]
    fn two_sits_on_the_boundary() {
        // z₁ = 2 gives |z|² = 4, still inside; z₂ = 6 escapes.
        assert_eq!(mb(200).escape_time(Point::new(2.0, 0.0)), 2);
    }

    #[test]
    fn one_escapes_after_three_steps() {
        // 0 → 1 → 2 → 5
        assert_eq!(mb(200).escape_time(Point::new(1.0, 0.0)), 3);
    }

    #[test]
    fn cardioid_and_bulb_are_interior() {
        assert_eq!(mb(300).escape_time(Point::new(-0.5, 0.0)), 300);
        assert_eq!(mb(300).escape_time(Point::new(-1.0, 0.0)), 300);
        assert_eq!(mb(300).escape_time(Point::new(0.24, 0.0)), 300);
    }

    #[test]
    fn shortcut_agrees_with_plain_iteration() {
        // -0.1 + 0.1i is inside the cardioid; iterate it without the shortcut.
        let c = Point::new(-0.1, 0.1);
        let (mut x, mut y) = (0.0f64, 0.0f64);
        let mut n = 0;
        while x * x + y * y <= BAILOUT_SQ && n < 500 {
            let t = x * x - y * y + c.x;
            y = 2.0 * x * y + c.y;
            x = t;
            n += 1;
        }
        assert_eq!(n, 500);
        assert_eq!(mb(500).escape_time(c), 500);
    }

    #[test]
    fn result_never_exceeds_cap() {
        let m = mb(64);
        for i in 0..50 {
            for j in 0..50 {
                let c = Point::new(-2.5 + i as f64 * 0.07, -1.5 + j as f64 * 0.06);
                assert!(m.escape_time(c) <= 64);
            }
        }
    }

    #[test]
    fn deterministic_results() {
        let m = mb(256);
        let points = [
            Point::new(-0.75, 0.1),
            Point::new(0.3, 0.5),
            Point::new(-1.25, 0.02),
            Point::new(0.28, 0.53),
        ];
        let run1: Vec<_> = points.iter().map(|&c| m.escape_time(c)).collect();
        let run2: Vec<_> = points.iter().map(|&c| m.escape_time(c)).collect();
        assert_eq!(run1, run2);
    }

    #[test]
    fn zero_limit_rejected() {
        assert!(IterationLimit::new(0).is_err());
    }
}
