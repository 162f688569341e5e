//! Axis-aligned rectangle.

use serde::{Deserialize, Serialize};

use super::Point;

/// An axis-aligned rectangle described by its top-left corner and size.
///
/// `right`, `bottom` and `center` are derived on demand.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    /// Create a new rectangle.
    #[inline]
    pub const fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Create a rectangle of the given size centered on `center`.
    #[inline]
    pub fn centered(center: Point, width: f64, height: f64) -> Self {
        Self::new(center.x - width / 2.0, center.y - height / 2.0, width, height)
    }

    #[inline]
    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    #[inline]
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    #[inline]
    pub fn center(&self) -> Point {
        Point::new(self.left + self.width / 2.0, self.top + self.height / 2.0)
    }

    #[inline]
    pub fn left_top(&self) -> Point {
        Point::new(self.left, self.top)
    }

    /// Smallest rectangle containing both `self` and `other`.
    pub fn union(&self, other: &Rect) -> Rect {
        let left = self.left.min(other.left);
        let top = self.top.min(other.top);
        Rect::new(
            left,
            top,
            self.right().max(other.right()) - left,
            self.bottom().max(other.bottom()) - top,
        )
    }

    /// Translate by `offset`.
    #[inline]
    pub fn plus(&self, offset: Point) -> Rect {
        Rect::new(self.left + offset.x, self.top + offset.y, self.width, self.height)
    }

    /// Translate by the negation of `offset`.
    #[inline]
    pub fn minus(&self, offset: Point) -> Rect {
        Rect::new(self.left - offset.x, self.top - offset.y, self.width, self.height)
    }

    /// Scale position and size uniformly by `1 / scale`.
    #[inline]
    pub fn divide(&self, scale: f64) -> Rect {
        Rect::new(
            self.left / scale,
            self.top / scale,
            self.width / scale,
            self.height / scale,
        )
    }

    /// Whether `point` lies inside the rectangle (edges inclusive).
    #[inline]
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.left
            && point.x <= self.right()
            && point.y >= self.top
            && point.y <= self.bottom()
    }

    /// Whether the vertical extents of `self` and `other` overlap by more
    /// than `tolerance`.
    #[inline]
    pub fn overlaps_vertically(&self, other: &Rect, tolerance: f64) -> bool {
        self.top.max(other.top) + tolerance < self.bottom().min(other.bottom())
    }
}
