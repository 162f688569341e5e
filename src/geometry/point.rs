//! 2D point / vector.

use std::fmt;
use std::ops::{Add, Div, Neg, Sub};

use serde::{Deserialize, Serialize};

/// A point or offset in model space.
///
/// Ideas store their position as an offset relative to their parent, so the
/// same type doubles as a translation vector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate (grows downwards, as on screen).
    pub y: f64,
}

impl Point {
    /// The origin.
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    /// Create a new point.
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Component-wise sum.
    #[inline]
    pub fn plus(self, other: Point) -> Point {
        Point::new(self.x + other.x, self.y + other.y)
    }

    /// Component-wise difference.
    #[inline]
    pub fn minus(self, other: Point) -> Point {
        Point::new(self.x - other.x, self.y - other.y)
    }

    /// Divide both components by `scale`.
    #[inline]
    pub fn divide(self, scale: f64) -> Point {
        Point::new(self.x / scale, self.y / scale)
    }

    /// Euclidean distance to `other`.
    #[inline]
    pub fn distance(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Squared Euclidean distance to `other`.
    #[inline]
    pub fn distance_2(self, other: Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    /// Length of the vector from the origin.
    #[inline]
    pub fn length(self) -> f64 {
        self.distance(Point::ZERO)
    }

    /// Mirror the point across the vertical axis.
    #[inline]
    pub fn mirrored(self) -> Point {
        Point::new(-self.x, self.y)
    }
}

impl Add for Point {
    type Output = Point;

    #[inline]
    fn add(self, rhs: Point) -> Point {
        self.plus(rhs)
    }
}

impl Sub for Point {
    type Output = Point;

    #[inline]
    fn sub(self, rhs: Point) -> Point {
        self.minus(rhs)
    }
}

impl Div<f64> for Point {
    type Output = Point;

    #[inline]
    fn div(self, rhs: f64) -> Point {
        self.divide(rhs)
    }
}

impl Neg for Point {
    type Output = Point;

    #[inline]
    fn neg(self) -> Point {
        Point::new(-self.x, -self.y)
    }
}

impl From<(f64, f64)> for Point {
    #[inline]
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arithmetic() {
        let a = Point::new(3.0, 4.0);
        let b = Point::new(1.0, -2.0);

        assert_eq!(a.plus(b), Point::new(4.0, 2.0));
        assert_eq!(a.minus(b), Point::new(2.0, 6.0));
        assert_eq!(a.divide(2.0), Point::new(1.5, 2.0));
        assert_eq!(a + b, a.plus(b));
        assert_eq!(a - b, a.minus(b));
        assert_eq!(-a, Point::new(-3.0, -4.0));
    }

    #[test]
    fn test_distance_and_length() {
        let a = Point::new(3.0, 4.0);
        assert_eq!(a.length(), 5.0);
        assert_eq!(a.distance(Point::new(3.0, 0.0)), 4.0);
        assert_eq!(a.distance_2(Point::ZERO), 25.0);
    }

    #[test]
    fn test_mirrored() {
        assert_eq!(Point::new(-7.0, 2.0).mirrored(), Point::new(7.0, 2.0));
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Point::new(1.0, 2.5)), "(1, 2.5)");
    }
}
