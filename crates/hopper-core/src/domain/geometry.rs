//! Rectangle primitives shared by the monitor and window models.
//!
//! Two shapes are used throughout the crate:
//!
//! - [`Rect`] is the edge form (`left`, `top`, `right`, `bottom`) that Win32
//!   reports for monitors, work areas and window frames.  `right` and `bottom`
//!   are exclusive.
//! - [`TargetRect`] is the origin + size form (`x`, `y`, `width`, `height`)
//!   that positioning calls such as `SetWindowPos` expect.
//!
//! All values are logical units.  Coordinates may be negative: in a
//! multi-monitor desktop, a display placed left of or above the primary one
//! has a negative origin.

/// An axis-aligned rectangle in edge form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    pub left: i32,
    pub top: i32,
    /// Exclusive right edge.
    pub right: i32,
    /// Exclusive bottom edge.
    pub bottom: i32,
}

impl Rect {
    /// Creates a rectangle from its four edges.
    pub const fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Creates a rectangle from an origin and a size.
    pub const fn from_origin_size(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            left: x,
            top: y,
            right: x + width,
            bottom: y + height,
        }
    }

    pub const fn width(&self) -> i32 {
        self.right - self.left
    }

    pub const fn height(&self) -> i32 {
        self.bottom - self.top
    }

    /// Returns `true` when the rectangle has no area (`right <= left` or
    /// `bottom <= top`).
    pub const fn is_degenerate(&self) -> bool {
        self.right <= self.left || self.bottom <= self.top
    }

    /// Area of the intersection with `other`, or 0 when they do not overlap.
    ///
    /// Rectangles that only share an edge do not overlap.
    pub fn overlap_area(&self, other: &Rect) -> i64 {
        let left = self.left.max(other.left);
        let top = self.top.max(other.top);
        let right = self.right.min(other.right);
        let bottom = self.bottom.min(other.bottom);

        if left < right && top < bottom {
            i64::from(right - left) * i64::from(bottom - top)
        } else {
            0
        }
    }

    /// Returns `true` when this rectangle covers `other` on all four edges
    /// (inclusive, so an exactly equal rectangle counts as covering).
    pub const fn covers(&self, other: &Rect) -> bool {
        self.left <= other.left
            && self.top <= other.top
            && self.right >= other.right
            && self.bottom >= other.bottom
    }

    /// Converts to origin + size form.
    pub const fn to_target(&self) -> TargetRect {
        TargetRect {
            x: self.left,
            y: self.top,
            width: self.width(),
            height: self.height(),
        }
    }
}

/// A placement request in origin + size form.
///
/// Produced by the geometry mapper and consumed by the placement executor.
/// It has no identity; two equal values describe the same placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TargetRect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl TargetRect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Converts to edge form.
    pub const fn to_rect(&self) -> Rect {
        Rect::from_origin_size(self.x, self.y, self.width, self.height)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_width_and_height_are_edge_differences() {
        let rect = Rect::new(100, 50, 1100, 850);
        assert_eq!(rect.width(), 1000);
        assert_eq!(rect.height(), 800);
    }

    #[test]
    fn test_rect_with_negative_origin_has_positive_size() {
        let rect = Rect::new(-2560, -200, 0, 1240);
        assert_eq!(rect.width(), 2560);
        assert_eq!(rect.height(), 1440);
        assert!(!rect.is_degenerate());
    }

    #[test]
    fn test_rect_is_degenerate_when_right_not_greater_than_left() {
        assert!(Rect::new(10, 10, 10, 20).is_degenerate());
        assert!(Rect::new(10, 10, 20, 5).is_degenerate());
    }

    #[test]
    fn test_overlap_area_of_partially_overlapping_rects() {
        let a = Rect::new(0, 0, 100, 100);
        let b = Rect::new(50, 50, 150, 150);
        assert_eq!(a.overlap_area(&b), 2500);
        assert_eq!(b.overlap_area(&a), 2500);
    }

    #[test]
    fn test_overlap_area_is_zero_for_edge_sharing_rects() {
        let a = Rect::new(0, 0, 1920, 1080);
        let b = Rect::new(1920, 0, 3840, 1080);
        assert_eq!(a.overlap_area(&b), 0);
    }

    #[test]
    fn test_overlap_area_does_not_overflow_for_large_rects() {
        let a = Rect::new(-40_000, -40_000, 40_000, 40_000);
        assert_eq!(a.overlap_area(&a), 6_400_000_000);
    }

    #[test]
    fn test_covers_is_inclusive_on_all_edges() {
        let monitor = Rect::new(0, 0, 1920, 1080);
        assert!(monitor.covers(&monitor));
        assert!(Rect::new(-8, -8, 1928, 1088).covers(&monitor));
        assert!(!Rect::new(0, 0, 1919, 1080).covers(&monitor));
    }

    #[test]
    fn test_target_rect_converts_to_and_from_edge_form() {
        let target = TargetRect::new(-1500, 100, 800, 600);
        let rect = target.to_rect();
        assert_eq!(rect, Rect::new(-1500, 100, -700, 700));
        assert_eq!(rect.to_target(), target);
    }
}
