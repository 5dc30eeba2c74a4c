use crate::Rect;

/// Which side of an existing area a placement grew out of.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FitSide {
    /// First area of an empty container, placed at the origin.
    Origin,
    Left,
    Top,
    Right,
    Bottom,
}

impl FitSide {
    /// Probe order for each existing area.
    pub const PROBES: [Self; 4] = [Self::Left, Self::Top, Self::Right, Self::Bottom];
}

/// A placed rectangle and whatever backs it.
#[derive(Debug)]
pub struct Area<B> {
    rect: Rect,
    side: FitSide,
    backing: B,
}

impl<B> Area<B> {
    pub(crate) const fn new(rect: Rect, side: FitSide, backing: B) -> Self {
        Self {
            rect,
            side,
            backing,
        }
    }

    #[inline]
    #[must_use]
    pub const fn rect(&self) -> Rect {
        self.rect
    }

    #[inline]
    #[must_use]
    pub const fn side(&self) -> FitSide {
        self.side
    }

    /// Slots covered, which is also the number of backing pages.
    #[inline]
    #[must_use]
    pub const fn page_count(&self) -> usize {
        self.rect.area()
    }

    #[inline]
    #[must_use]
    pub const fn backing(&self) -> &B {
        &self.backing
    }

    #[inline]
    pub const fn backing_mut(&mut self) -> &mut B {
        &mut self.backing
    }

    #[inline]
    #[must_use]
    pub fn into_backing(self) -> B {
        self.backing
    }
}
