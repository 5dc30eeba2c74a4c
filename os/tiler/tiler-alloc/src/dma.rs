//! Device-visible buffers for PAT page tables and refill descriptors.

use core::fmt;
use core::ptr::NonNull;
use crate::PageGroup;
use tiler_addresses::PhysicalAddress;
use tiler_sync::SpinLock;

#[derive(Debug, Copy, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DmaError {
    #[error("no DMA memory for {words} words")]
    OutOfMemory { words: usize },
    #[error("DMA buffer at {0} is not reachable by the device")]
    Unaddressable(PhysicalAddress),
}

/// Physically contiguous, word-addressed memory shared with the device.
///
/// Owned exclusively: the value is the only CPU-side handle to the memory
/// until it is given back through [`DmaAlloc::free`].
pub struct DmaBuffer {
    phys: PhysicalAddress,
    cpu: NonNull<u32>,
    words: usize,
}

// SAFETY: the buffer is uniquely owned and carries no thread affinity.
unsafe impl Send for DmaBuffer {}

impl DmaBuffer {
    /// # Safety
    /// - `cpu` must point to `words` writable, initialised `u32`s that stay
    ///   valid until the buffer is returned to its allocator.
    /// - `phys` must be the device-visible address of the same memory.
    /// - Nothing else may access the memory while this value exists.
    #[must_use]
    pub const unsafe fn from_raw_parts(
        phys: PhysicalAddress,
        cpu: NonNull<u32>,
        words: usize,
    ) -> Self {
        Self { phys, cpu, words }
    }

    #[inline]
    #[must_use]
    pub const fn phys(&self) -> PhysicalAddress {
        self.phys
    }

    /// Device address of the buffer as the 32-bit value the PAT registers
    /// take.
    ///
    /// # Errors
    /// [`DmaError::Unaddressable`] if the buffer lies above 4 GiB.
    pub const fn bus_address(&self) -> Result<u32, DmaError> {
        match self.phys.as_bus_u32() {
            Some(addr) => Ok(addr),
            None => Err(DmaError::Unaddressable(self.phys)),
        }
    }

    #[inline]
    #[must_use]
    pub const fn cpu_ptr(&self) -> NonNull<u32> {
        self.cpu
    }

    #[inline]
    #[must_use]
    pub const fn words(&self) -> usize {
        self.words
    }

    #[inline]
    #[must_use]
    pub const fn as_slice(&self) -> &[u32] {
        // SAFETY: guaranteed by `from_raw_parts`.
        unsafe { core::slice::from_raw_parts(self.cpu.as_ptr(), self.words) }
    }

    #[inline]
    #[must_use]
    pub const fn as_mut_slice(&mut self) -> &mut [u32] {
        // SAFETY: guaranteed by `from_raw_parts`; `&mut self` makes it unique.
        unsafe { core::slice::from_raw_parts_mut(self.cpu.as_ptr(), self.words) }
    }

    /// Write the bus address of every page of `pages`, in order, from word 0.
    ///
    /// # Errors
    /// - [`DmaError::OutOfMemory`] if the buffer is shorter than the group.
    /// - [`DmaError::Unaddressable`] for a page above 4 GiB; the table is
    ///   left partially written.
    pub fn write_page_table(&mut self, pages: &PageGroup) -> Result<(), DmaError> {
        if pages.len() > self.words {
            return Err(DmaError::OutOfMemory { words: pages.len() });
        }
        let table = self.as_mut_slice();
        for (slot, page) in table.iter_mut().zip(pages.pages()) {
            let base = page.base();
            *slot = base.as_bus_u32().ok_or(DmaError::Unaddressable(base))?;
        }
        Ok(())
    }
}

impl fmt::Debug for DmaBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DmaBuffer")
            .field("phys", &self.phys)
            .field("words", &self.words)
            .finish_non_exhaustive()
    }
}

/// Allocator of [`DmaBuffer`]s, typically the platform's coherent DMA pool.
pub trait DmaAlloc {
    /// A zeroed buffer of `words` 32-bit words.
    ///
    /// # Errors
    /// [`DmaError::OutOfMemory`] when the allocator cannot satisfy the request.
    fn alloc(&mut self, words: usize) -> Result<DmaBuffer, DmaError>;

    /// Give a buffer back. It must have come from this allocator.
    fn free(&mut self, buffer: DmaBuffer);
}

/// A shared allocator behind a lock; every call takes the lock for its own
/// duration only.
impl<D: DmaAlloc> DmaAlloc for &SpinLock<D> {
    fn alloc(&mut self, words: usize) -> Result<DmaBuffer, DmaError> {
        self.with_lock(|dma| dma.alloc(words))
    }

    fn free(&mut self, buffer: DmaBuffer) {
        self.with_lock(|dma| dma.free(buffer));
    }
}
