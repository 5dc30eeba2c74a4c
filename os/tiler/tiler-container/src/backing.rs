use crate::Area;
use tiler_addresses::PixelFormat;
use tiler_alloc::dma::{DmaAlloc, DmaBuffer};
use tiler_alloc::{PageGroup, PagePool, PageSource, Unreleased};

/// Memory and metadata behind one tiler block.
#[derive(Debug)]
pub struct AreaBacking {
    format: PixelFormat,
    width: u32,
    height: u32,
    pages: PageGroup,
    table: DmaBuffer,
}

impl AreaBacking {
    /// `table` must already list the bus addresses of `pages` in row-major
    /// slot order.
    #[must_use]
    pub const fn new(
        format: PixelFormat,
        width: u32,
        height: u32,
        pages: PageGroup,
        table: DmaBuffer,
    ) -> Self {
        Self {
            format,
            width,
            height,
            pages,
            table,
        }
    }

    #[inline]
    #[must_use]
    pub const fn format(&self) -> PixelFormat {
        self.format
    }

    /// Requested width: pixels, or bytes for [`PixelFormat::Page`].
    #[inline]
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    #[must_use]
    pub const fn pages(&self) -> &PageGroup {
        &self.pages
    }

    #[inline]
    #[must_use]
    pub const fn table(&self) -> &DmaBuffer {
        &self.table
    }

    /// Free the table and return the pages to `pool`.
    ///
    /// # Errors
    /// Whatever [`PagePool::release_group`] reports, with the pages the pool
    /// refused. The table is freed regardless.
    pub fn release<S, D>(
        self,
        pool: &PagePool<S>,
        dma: &mut D,
    ) -> Result<(), Unreleased<PageGroup>>
    where
        S: PageSource,
        D: DmaAlloc + ?Sized,
    {
        dma.free(self.table);
        pool.release_group(self.pages)
    }
}

impl Area<AreaBacking> {
    /// Tear the area down. Call only after it left the container.
    ///
    /// # Errors
    /// See [`AreaBacking::release`].
    pub fn release<S, D>(
        self,
        pool: &PagePool<S>,
        dma: &mut D,
    ) -> Result<(), Unreleased<PageGroup>>
    where
        S: PageSource,
        D: DmaAlloc + ?Sized,
    {
        self.into_backing().release(pool, dma)
    }
}
