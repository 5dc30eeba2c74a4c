use crate::{CodecError, PixelFormat};
use core::fmt;
use tiler_info::geometry::{
    CONTAINER_HEIGHT, CONTAINER_SLOTS, CONTAINER_WIDTH, PAGE_SIZE, ROW_ALIGN_BYTES,
};

/// A slot coordinate in the container grid.
#[derive(Copy, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GridPoint {
    pub x: u16,
    pub y: u16,
}

impl GridPoint {
    #[inline]
    #[must_use]
    pub const fn new(x: u16, y: u16) -> Self {
        Self { x, y }
    }
}

impl fmt::Debug for GridPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// A block extent in slots.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct GridSize {
    pub width: u16,
    pub height: u16,
}

impl GridSize {
    #[inline]
    #[must_use]
    pub const fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }

    /// Number of pages backing a block of this size.
    #[inline]
    #[must_use]
    pub const fn pages(self) -> usize {
        self.width as usize * self.height as usize
    }
}

/// Grid extent needed for a `width`×`height` block of `format`.
///
/// For the 2D formats the width is rounded up so that every row spans a
/// multiple of 128 bytes of slot row. For [`PixelFormat::Page`], `width` is a
/// byte length and `height` is ignored; the pages wrap across grid rows.
/// A run longer than one row reserves whole rows, so every slot of the
/// returned extent is backed by a page: 300 pages take 2 rows of 256, i.e.
/// 512 pages.
///
/// ```rust
/// # use tiler_addresses::*;
/// // 8-bit slots are 64 bytes wide, so widths round up to two slots.
/// assert_eq!(block_size(PixelFormat::Bit8, 64, 64)?, GridSize::new(2, 1));
/// assert_eq!(block_size(PixelFormat::Bit32, 100, 33)?, GridSize::new(4, 2));
/// assert_eq!(block_size(PixelFormat::Page, 300 * 4096, 0)?, GridSize::new(256, 2));
/// assert_eq!(block_size(PixelFormat::Page, 300 * 4096, 0)?.pages(), 512);
/// # Ok::<(), CodecError>(())
/// ```
///
/// # Errors
/// [`CodecError::BadSize`] for empty blocks and blocks exceeding the grid.
#[allow(clippy::cast_possible_truncation, clippy::cast_lossless)]
pub const fn block_size(format: PixelFormat, width: u32, height: u32) -> Result<GridSize, CodecError> {
    let bad = CodecError::BadSize {
        format,
        width,
        height,
    };

    if let PixelFormat::Page = format {
        if width == 0 {
            return Err(bad);
        }
        let pages = (width as u64).div_ceil(PAGE_SIZE) as usize;
        if pages > CONTAINER_SLOTS {
            return Err(bad);
        }
        let w = if pages < CONTAINER_WIDTH as usize {
            pages
        } else {
            CONTAINER_WIDTH as usize
        };
        let h = pages.div_ceil(CONTAINER_WIDTH as usize);
        return Ok(GridSize::new(w as u16, h as u16));
    }

    if width == 0 || height == 0 {
        return Err(bad);
    }

    let g = format.geometry();
    let align = if g.row_bytes() >= ROW_ALIGN_BYTES {
        1
    } else {
        ROW_ALIGN_BYTES / g.row_bytes()
    };
    let w = width.div_ceil(g.width).next_multiple_of(align);
    let h = height.div_ceil(g.height);
    if w > CONTAINER_WIDTH as u32 || h > CONTAINER_HEIGHT as u32 {
        return Err(bad);
    }

    Ok(GridSize::new(w as u16, h as u16))
}
