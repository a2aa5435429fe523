use serde::{Deserialize, Serialize};
use std::ops::{Add, Sub};

/// A point in either pixel space or the complex plane.
///
/// Both spaces share the same axis orientation (x to the right, y downward),
/// so one type serves the mapper in both directions.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Self = Self { x: 0.0, y: 0.0 };

    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Halfway point between `self` and `other`.
    #[inline]
    pub fn midpoint(self, other: Self) -> Self {
        Self::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }
}

impl Add for Point {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl std::fmt::Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn midpoint_is_average() {
        let m = Point::new(-1.0, 2.0).midpoint(Point::new(3.0, -4.0));
        assert_eq!(m, Point::new(1.0, -1.0));
    }

    #[test]
    fn add_and_sub_are_inverse() {
        let a = Point::new(0.25, -0.5);
        let b = Point::new(1.5, 2.0);
        assert_eq!((a + b) - b, a);
    }
}
