//! Geometric helpers shared by the area tree and the segmentation operators.
//!
//! Provides:
//! - `Rect`, an axis-aligned integer rectangle with inclusive corners
//! - `HasBounds`, implemented by everything that occupies a rectangle on the page

use std::fmt;

use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle `(x1, y1) - (x2, y2)` with inclusive corners.
///
/// The y axis grows downwards (screen coordinates). A rectangle with
/// `x2 == x1 - 1` or `y2 == y1 - 1` is empty; anything narrower is invalid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

impl Rect {
    pub const fn new(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Creates a rectangle from its top-left corner and its size.
    pub const fn from_size(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self::new(x, y, x + width - 1, y + height - 1)
    }

    pub fn width(&self) -> i32 {
        self.x2 - self.x1 + 1
    }

    pub fn height(&self) -> i32 {
        self.y2 - self.y1 + 1
    }

    /// Square area in pixels (0 for empty rectangles).
    pub fn area(&self) -> i64 {
        if self.is_empty() {
            0
        } else {
            i64::from(self.width()) * i64::from(self.height())
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width() <= 0 || self.height() <= 0
    }

    /// Grows this rectangle so that it encloses `other` as well.
    pub fn expand_to_enclose(&mut self, other: &Rect) {
        self.x1 = self.x1.min(other.x1);
        self.y1 = self.y1.min(other.y1);
        self.x2 = self.x2.max(other.x2);
        self.y2 = self.y2.max(other.y2);
    }

    /// Returns the smallest rectangle enclosing both.
    pub fn union(&self, other: &Rect) -> Rect {
        let mut ret = *self;
        ret.expand_to_enclose(other);
        ret
    }

    /// Returns the common part of both rectangles (possibly empty).
    pub fn intersection(&self, other: &Rect) -> Rect {
        Rect::new(
            self.x1.max(other.x1),
            self.y1.max(other.y1),
            self.x2.min(other.x2),
            self.y2.min(other.y2),
        )
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        self.x1 <= x && x <= self.x2 && self.y1 <= y && y <= self.y2
    }

    /// True if `other` lies entirely inside this rectangle.
    pub fn encloses(&self, other: &Rect) -> bool {
        self.x1 <= other.x1 && self.y1 <= other.y1 && self.x2 >= other.x2 && self.y2 >= other.y2
    }

    pub fn intersects(&self, other: &Rect) -> bool {
        self.x1 <= other.x2 && other.x1 <= self.x2 && self.y1 <= other.y2 && other.y1 <= self.y2
    }

    /// True if the x ranges of the rectangles overlap.
    pub fn is_hoverlap(&self, other: &Rect) -> bool {
        self.x1 <= other.x2 && other.x1 <= self.x2
    }

    /// True if the y ranges of the rectangles overlap.
    pub fn is_voverlap(&self, other: &Rect) -> bool {
        self.y1 <= other.y2 && other.y1 <= self.y2
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{},{},{},{}]", self.x1, self.y1, self.x2, self.y2)
    }
}

/// Trait for objects that occupy a rectangle on the page.
pub trait HasBounds {
    fn bounds(&self) -> Rect;

    fn x1(&self) -> i32 {
        self.bounds().x1
    }

    fn y1(&self) -> i32 {
        self.bounds().y1
    }

    fn x2(&self) -> i32 {
        self.bounds().x2
    }

    fn y2(&self) -> i32 {
        self.bounds().y2
    }

    fn width(&self) -> i32 {
        self.bounds().width()
    }

    fn height(&self) -> i32 {
        self.bounds().height()
    }
}

impl HasBounds for Rect {
    fn bounds(&self) -> Rect {
        *self
    }
}
