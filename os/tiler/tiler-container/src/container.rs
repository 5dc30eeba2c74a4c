use crate::{Area, FitSide, Rect};
use alloc::vec::Vec;
use core::fmt;
use log::{debug, trace};
use tiler_addresses::GridPoint;
use tiler_info::geometry::{CONTAINER_HEIGHT, CONTAINER_WIDTH};
use tiler_sync::SpinLock;

#[derive(Debug, Copy, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ContainerError {
    #[error("a {width}x{height} block cannot exist in this container")]
    BadSize { width: u16, height: u16 },
    #[error("no free region for a {width}x{height} block")]
    NoSpace { width: u16, height: u16 },
    #[error("no area starts at ({x}, {y})")]
    NotFound { x: u16, y: u16 },
}

/// A failed placement, handing the backing back to the caller.
pub struct Rejected<B> {
    pub error: ContainerError,
    pub backing: B,
}

impl<B> fmt::Debug for Rejected<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rejected")
            .field("error", &self.error)
            .finish_non_exhaustive()
    }
}

/// The slot grid and the areas placed in it.
///
/// Placement and removal each run under one container-wide lock.
///
/// ```rust
/// # use tiler_container::*;
/// let grid = Container2D::<()>::with_hardware_geometry();
/// let a = grid.place(10, 10, ()).unwrap();
/// let b = grid.place(10, 10, ()).unwrap();
/// assert_eq!(a, Rect::new(0, 0, 9, 9));
/// assert_eq!(b, Rect::new(0, 10, 9, 19));
///
/// grid.remove(0, 0).unwrap();
/// assert_eq!(grid.areas(), [b]);
/// ```
pub struct Container2D<B> {
    width: u16,
    height: u16,
    areas: SpinLock<Vec<Area<B>>>,
}

impl<B> Container2D<B> {
    #[must_use]
    pub const fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            areas: SpinLock::new(Vec::new()),
        }
    }

    /// The full 256×128 tiler grid.
    #[must_use]
    pub const fn with_hardware_geometry() -> Self {
        Self::new(CONTAINER_WIDTH, CONTAINER_HEIGHT)
    }

    #[inline]
    #[must_use]
    pub const fn width(&self) -> u16 {
        self.width
    }

    #[inline]
    #[must_use]
    pub const fn height(&self) -> u16 {
        self.height
    }

    /// Place a `width`×`height` block next to the existing areas.
    ///
    /// # Errors
    /// - [`ContainerError::BadSize`] for empty blocks or blocks larger than
    ///   the grid.
    /// - [`ContainerError::NoSpace`] if no probe yields a large enough free
    ///   rectangle.
    ///
    /// Either way the backing comes back in [`Rejected`].
    pub fn place(&self, width: u16, height: u16, backing: B) -> Result<Rect, Rejected<B>> {
        if width == 0 || height == 0 || width > self.width || height > self.height {
            return Err(Rejected {
                error: ContainerError::BadSize { width, height },
                backing,
            });
        }

        self.areas.with_lock(|areas| {
            let grid = Grid {
                width: self.width,
                height: self.height,
                areas: areas.as_slice(),
            };
            let Some((rect, side)) = grid.best_fit(width, height) else {
                debug!("no space for {width}x{height} among {} areas", areas.len());
                return Err(Rejected {
                    error: ContainerError::NoSpace { width, height },
                    backing,
                });
            };

            debug!("placed {width}x{height} at {rect:?} via {side:?}");
            areas.push(Area::new(rect, side, backing));
            Ok(rect)
        })
    }

    /// Detach the area whose top-left slot is `(x, y)`.
    ///
    /// # Errors
    /// [`ContainerError::NotFound`] if no area starts there.
    pub fn remove(&self, x: u16, y: u16) -> Result<Area<B>, ContainerError> {
        self.areas.with_lock(|areas| {
            let index = areas
                .iter()
                .position(|a| a.rect().x0 == x && a.rect().y0 == y)
                .ok_or(ContainerError::NotFound { x, y })?;
            let area = areas.remove(index);
            debug!("removed area {:?}", area.rect());
            Ok(area)
        })
    }

    /// Run `f` on the area whose top-left slot is `(x, y)`.
    pub fn with_area<R>(&self, x: u16, y: u16, f: impl FnOnce(&Area<B>) -> R) -> Option<R> {
        self.areas.with_lock(|areas| {
            areas
                .iter()
                .find(|a| a.rect().x0 == x && a.rect().y0 == y)
                .map(f)
        })
    }

    /// Rectangle of the area whose top-left slot is `(x, y)`.
    #[must_use]
    pub fn find(&self, x: u16, y: u16) -> Option<Rect> {
        self.with_area(x, y, Area::rect)
    }

    /// Rectangle of the area covering `point`, if any.
    #[must_use]
    pub fn area_containing(&self, point: GridPoint) -> Option<Rect> {
        self.areas.with_lock(|areas| {
            areas
                .iter()
                .map(Area::rect)
                .find(|r| r.contains(point))
        })
    }

    /// Snapshot of all rectangles in insertion order.
    #[must_use]
    pub fn areas(&self) -> Vec<Rect> {
        self.areas
            .with_lock(|areas| areas.iter().map(Area::rect).collect())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.areas.with_lock(|areas| areas.len())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Slots covered by all areas together.
    #[must_use]
    pub fn occupied_slots(&self) -> usize {
        self.areas
            .with_lock(|areas| areas.iter().map(Area::page_count).sum())
    }

    /// Detach every area, oldest first.
    pub fn drain(&self) -> Vec<Area<B>> {
        self.areas.with_lock(core::mem::take)
    }
}

impl<B> Default for Container2D<B> {
    fn default() -> Self {
        Self::with_hardware_geometry()
    }
}

/// The free rectangle measured from one side of one area.
#[derive(Debug)]
struct Probe {
    side: FitSide,
    /// First free slot found along the side.
    anchor: GridPoint,
    free: Rect,
}

impl Probe {
    /// Block position inside the free rectangle: flush with the side it grew
    /// from, and with the perpendicular edge nearer the anchor.
    const fn place(&self, width: u16, height: u16) -> Rect {
        let f = self.free;
        let near_start_x = self.anchor.x - f.x0 <= f.x1 - self.anchor.x;
        let near_start_y = self.anchor.y - f.y0 <= f.y1 - self.anchor.y;

        let x = match self.side {
            FitSide::Left => f.x1 + 1 - width,
            FitSide::Top | FitSide::Bottom if !near_start_x => f.x1 + 1 - width,
            _ => f.x0,
        };
        let y = match self.side {
            FitSide::Top => f.y1 + 1 - height,
            FitSide::Left | FitSide::Right if !near_start_y => f.y1 + 1 - height,
            _ => f.y0,
        };
        Rect::with_size(x, y, width, height)
    }
}

/// Read-only view of the grid used during one placement.
struct Grid<'a, B> {
    width: u16,
    height: u16,
    areas: &'a [Area<B>],
}

impl<B> Grid<'_, B> {
    fn is_free(&self, r: Rect) -> bool {
        r.x1 < self.width && r.y1 < self.height && !self.areas.iter().any(|a| a.rect().overlaps(&r))
    }

    fn best_fit(&self, width: u16, height: u16) -> Option<(Rect, FitSide)> {
        if self.areas.is_empty() {
            return Some((Rect::with_size(0, 0, width, height), FitSide::Origin));
        }

        let mut best: Option<Probe> = None;
        for area in self.areas {
            for side in FitSide::PROBES {
                let Some(probe) = self.probe(area.rect(), side) else {
                    continue;
                };
                trace!("probe {:?} {side:?}: free {:?}", area.rect(), probe.free);
                if !probe.free.fits(width, height) {
                    continue;
                }
                if best
                    .as_ref()
                    .is_none_or(|b| probe.free.area() < b.free.area())
                {
                    best = Some(probe);
                }
            }
        }

        best.map(|p| (p.place(width, height), p.side))
    }

    /// Measure the free rectangle growing out of `side` of `around`.
    fn probe(&self, around: Rect, side: FitSide) -> Option<Probe> {
        let (anchor, line) = match side {
            FitSide::Origin => return None,
            FitSide::Left => {
                let x = around.x0.checked_sub(1)?;
                let y = (around.y0..=around.y1).find(|&y| self.is_free(Rect::cell(x, y)))?;
                let mut x0 = x;
                while x0 > 0 && self.is_free(Rect::cell(x0 - 1, y)) {
                    x0 -= 1;
                }
                (GridPoint::new(x, y), Rect::new(x0, y, x, y))
            }
            FitSide::Top => {
                let y = around.y0.checked_sub(1)?;
                let x = (around.x0..=around.x1).find(|&x| self.is_free(Rect::cell(x, y)))?;
                let mut y0 = y;
                while y0 > 0 && self.is_free(Rect::cell(x, y0 - 1)) {
                    y0 -= 1;
                }
                (GridPoint::new(x, y), Rect::new(x, y0, x, y))
            }
            FitSide::Right => {
                let x = around.x1 + 1;
                let y = (around.y0..=around.y1).find(|&y| self.is_free(Rect::cell(x, y)))?;
                let mut x1 = x;
                while self.is_free(Rect::cell(x1 + 1, y)) {
                    x1 += 1;
                }
                (GridPoint::new(x, y), Rect::new(x, y, x1, y))
            }
            FitSide::Bottom => {
                let y = around.y1 + 1;
                let x = (around.x0..=around.x1).find(|&x| self.is_free(Rect::cell(x, y)))?;
                let mut y1 = y;
                while self.is_free(Rect::cell(x, y1 + 1)) {
                    y1 += 1;
                }
                (GridPoint::new(x, y), Rect::new(x, y, x, y1))
            }
        };

        let free = match side {
            FitSide::Left | FitSide::Right => self.grow_vertically(line),
            _ => self.grow_horizontally(line),
        };
        Some(Probe { side, anchor, free })
    }

    fn grow_vertically(&self, mut r: Rect) -> Rect {
        while self.is_free(Rect::new(r.x0, r.y1 + 1, r.x1, r.y1 + 1)) {
            r.y1 += 1;
        }
        while r.y0 > 0 && self.is_free(Rect::new(r.x0, r.y0 - 1, r.x1, r.y0 - 1)) {
            r.y0 -= 1;
        }
        r
    }

    fn grow_horizontally(&self, mut r: Rect) -> Rect {
        while self.is_free(Rect::new(r.x1 + 1, r.y0, r.x1 + 1, r.y1)) {
            r.x1 += 1;
        }
        while r.x0 > 0 && self.is_free(Rect::new(r.x0 - 1, r.y0, r.x0 - 1, r.y1)) {
            r.x0 -= 1;
        }
        r
    }
}
