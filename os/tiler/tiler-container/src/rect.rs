use core::fmt;
use tiler_addresses::{GridPoint, GridSize};

/// Inclusive slot rectangle `{x0,y0}..={x1,y1}`.
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct Rect {
    pub x0: u16,
    pub y0: u16,
    pub x1: u16,
    pub y1: u16,
}

impl Rect {
    #[inline]
    #[must_use]
    pub const fn new(x0: u16, y0: u16, x1: u16, y1: u16) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// `width`×`height` rectangle with its top-left slot at `(x, y)`.
    ///
    /// Both extents must be non-zero.
    #[inline]
    #[must_use]
    pub const fn with_size(x: u16, y: u16, width: u16, height: u16) -> Self {
        Self::new(x, y, x + width - 1, y + height - 1)
    }

    #[inline]
    #[must_use]
    pub const fn cell(x: u16, y: u16) -> Self {
        Self::new(x, y, x, y)
    }

    #[inline]
    #[must_use]
    pub const fn width(&self) -> u16 {
        self.x1 - self.x0 + 1
    }

    #[inline]
    #[must_use]
    pub const fn height(&self) -> u16 {
        self.y1 - self.y0 + 1
    }

    #[inline]
    #[must_use]
    pub const fn size(&self) -> GridSize {
        GridSize::new(self.width(), self.height())
    }

    /// Number of slots covered.
    #[inline]
    #[must_use]
    pub const fn area(&self) -> usize {
        self.width() as usize * self.height() as usize
    }

    #[inline]
    #[must_use]
    pub const fn origin(&self) -> GridPoint {
        GridPoint::new(self.x0, self.y0)
    }

    #[inline]
    #[must_use]
    pub const fn overlaps(&self, other: &Self) -> bool {
        self.x0 <= other.x1 && other.x0 <= self.x1 && self.y0 <= other.y1 && other.y0 <= self.y1
    }

    #[inline]
    #[must_use]
    pub const fn contains(&self, point: GridPoint) -> bool {
        self.x0 <= point.x && point.x <= self.x1 && self.y0 <= point.y && point.y <= self.y1
    }

    /// Whether the rectangle can hold a `width`×`height` block.
    #[inline]
    #[must_use]
    pub const fn fits(&self, width: u16, height: u16) -> bool {
        self.width() >= width && self.height() >= height
    }
}

impl fmt::Debug for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({},{})-({},{})",
            self.x0, self.y0, self.x1, self.y1
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extents_are_inclusive() {
        let r = Rect::with_size(3, 4, 10, 2);
        assert_eq!(r, Rect::new(3, 4, 12, 5));
        assert_eq!((r.width(), r.height(), r.area()), (10, 2, 20));
    }

    #[test]
    fn overlap_is_symmetric_and_touching_is_not_overlap() {
        let a = Rect::with_size(0, 0, 10, 10);
        let b = Rect::with_size(10, 0, 5, 5);
        let c = Rect::with_size(9, 9, 5, 5);
        assert!(!a.overlaps(&b) && !b.overlaps(&a));
        assert!(a.overlaps(&c) && c.overlaps(&a));
    }
}
