use alloc::vec::Vec;
use tiler_addresses::PhysicalPage;

/// Opaque handle the page source attaches to each page it hands out.
#[repr(transparent)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct PageHandle(pub usize);

/// One 4 KiB physical page owned by the pool or by exactly one area.
///
/// Not `Clone`: a frame has exactly one owner at a time.
#[derive(Debug, PartialEq, Eq)]
pub struct PageFrame {
    page: PhysicalPage,
    handle: PageHandle,
}

impl PageFrame {
    #[inline]
    #[must_use]
    pub const fn new(page: PhysicalPage, handle: PageHandle) -> Self {
        Self { page, handle }
    }

    #[inline]
    #[must_use]
    pub const fn page(&self) -> PhysicalPage {
        self.page
    }

    #[inline]
    #[must_use]
    pub const fn handle(&self) -> PageHandle {
        self.handle
    }
}

/// Provider of physical pages, typically the kernel's page allocator.
pub trait PageSource {
    /// Allocate one page, or `None` when the source is exhausted.
    fn alloc_page(&mut self) -> Option<PageFrame>;

    /// Return a page previously produced by [`alloc_page`](Self::alloc_page).
    fn free_page(&mut self, frame: PageFrame);

    /// Write back and invalidate CPU caches for `page` so the device
    /// observes memory coherently.
    fn flush(&mut self, page: PhysicalPage);
}

/// Pages acquired together for one area, in table order.
#[derive(Debug, Default)]
pub struct PageGroup {
    frames: Vec<PageFrame>,
}

impl PageGroup {
    pub(crate) const fn from_frames(frames: Vec<PageFrame>) -> Self {
        Self { frames }
    }

    pub(crate) fn into_frames(self) -> Vec<PageFrame> {
        self.frames
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Physical pages in table order.
    pub fn pages(&self) -> impl ExactSizeIterator<Item = PhysicalPage> + '_ {
        self.frames.iter().map(PageFrame::page)
    }
}
