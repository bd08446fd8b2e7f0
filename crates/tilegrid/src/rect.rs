//! Integer pixel rectangles.
//!
//! A [`Rect`] is anchored at its top-left pixel and spans `width × height`
//! pixels. The far edges are inclusive: a 16-wide rectangle at `x = 0` covers
//! pixels `0..=15`, so [`Rect::right`] returns 15.

use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle in world pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge (inclusive).
    pub x: i32,
    /// Top edge (inclusive).
    pub y: i32,
    /// Width in pixels.
    pub width: i32,
    /// Height in pixels.
    pub height: i32,
}

impl Rect {
    /// Creates a rectangle from its top-left corner and size.
    #[must_use]
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Returns the rightmost covered pixel column.
    #[must_use]
    pub const fn right(&self) -> i32 {
        self.x + self.width - 1
    }

    /// Returns the bottom covered pixel row.
    #[must_use]
    pub const fn bottom(&self) -> i32 {
        self.y + self.height - 1
    }

    /// Returns true if the rectangle covers at least one pixel.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Returns the rectangle moved by `delta`.
    #[must_use]
    pub fn translated(&self, delta: IVec2) -> Self {
        Self::new(self.x + delta.x, self.y + delta.y, self.width, self.height)
    }

    /// Returns the geometric center in floating point.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn center(&self) -> Vec2 {
        Vec2::new(
            self.x as f32 + self.width as f32 / 2.0,
            self.y as f32 + self.height as f32 / 2.0,
        )
    }

    /// Returns true if the two rectangles share at least one pixel.
    #[must_use]
    pub const fn intersects(&self, other: &Rect) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }
        self.x <= other.right()
            && other.x <= self.right()
            && self.y <= other.bottom()
            && other.y <= self.bottom()
    }

    /// Returns true if the pixel lies inside the rectangle.
    #[must_use]
    pub const fn contains(&self, px: i32, py: i32) -> bool {
        px >= self.x && px <= self.right() && py >= self.y && py <= self.bottom()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inclusive_edges() {
        let r = Rect::new(0, 0, 16, 8);
        assert_eq!(r.right(), 15);
        assert_eq!(r.bottom(), 7);
        assert!(r.contains(15, 7));
        assert!(!r.contains(16, 7));
    }

    #[test]
    fn intersection_is_symmetric() {
        let a = Rect::new(0, 0, 10, 10);
        let b = Rect::new(9, 9, 5, 5);
        let c = Rect::new(10, 0, 5, 5);

        assert!(a.intersects(&b));
        assert!(b.intersects(&a));
        assert!(!a.intersects(&c));
        assert!(!c.intersects(&a));
    }

    #[test]
    fn empty_rect_never_intersects() {
        let a = Rect::new(0, 0, 10, 10);
        let empty = Rect::new(2, 2, 0, 4);
        assert!(empty.is_empty());
        assert!(!a.intersects(&empty));
    }

    #[test]
    fn serialization_roundtrip() {
        let r = Rect::new(-4, 2, 24, 12);
        let json = serde_json::to_string(&r).unwrap();
        let deserialized: Rect = serde_json::from_str(&json).unwrap();
        assert_eq!(r, deserialized);
    }

    #[test]
    fn translation_and_center() {
        let r = Rect::new(4, 6, 8, 4).translated(IVec2::new(-4, 2));
        assert_eq!(r, Rect::new(0, 8, 8, 4));
        assert_eq!(r.center(), Vec2::new(4.0, 10.0));
    }
}
