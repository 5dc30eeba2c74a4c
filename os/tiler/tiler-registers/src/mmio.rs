use crate::RegisterBlock;
use core::ptr::{read_volatile, write_volatile};

/// The DMM register window, accessed with volatile 32-bit loads and stores.
///
/// ```ignore
/// let regs = unsafe { MmioRegisterBlock::new(dmm_base, offsets::BLOCK_SIZE) };
/// let status = PatStatus::load(&regs, 0);
/// ```
#[derive(Debug)]
pub struct MmioRegisterBlock {
    base: usize,
    size: usize,
}

impl MmioRegisterBlock {
    /// # Safety
    /// - `base` must be the virtual address of the mapped DMM register window,
    ///   mapped with device (uncached) attributes and at least `size` bytes long.
    /// - The mapping must stay valid for the lifetime of the value.
    /// - No other driver may program the PAT engines concurrently.
    #[inline]
    #[must_use]
    pub const unsafe fn new(base: usize, size: usize) -> Self {
        Self { base, size }
    }

    #[inline]
    #[must_use]
    pub const fn base(&self) -> usize {
        self.base
    }

    #[inline]
    #[must_use]
    pub const fn size(&self) -> usize {
        self.size
    }
}

impl RegisterBlock for MmioRegisterBlock {
    #[inline]
    fn read32(&self, offset: usize) -> u32 {
        debug_assert!(offset + 4 <= self.size, "MMIO read32 offset out of bounds");
        debug_assert!(offset.is_multiple_of(4), "MMIO read32 offset not aligned");
        // SAFETY: `new` guarantees a valid device mapping covering `offset`.
        unsafe { read_volatile((self.base + offset) as *const u32) }
    }

    #[inline]
    fn write32(&self, offset: usize, value: u32) {
        debug_assert!(offset + 4 <= self.size, "MMIO write32 offset out of bounds");
        debug_assert!(offset.is_multiple_of(4), "MMIO write32 offset not aligned");
        // SAFETY: `new` guarantees a valid device mapping covering `offset`.
        unsafe { write_volatile((self.base + offset) as *mut u32, value) }
    }
}

