use tiler_addresses::{PhysicalAddress, PixelFormat};
use tiler_alloc::PoolStats;
use tiler_container::Rect;

/// Description of an allocated block.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct BlockInfo {
    pub format: PixelFormat,
    /// Requested width: pixels, or bytes for [`PixelFormat::Page`].
    pub width: u32,
    pub height: u32,
    /// Slots occupied in the container.
    pub rect: Rect,
    pub page_count: usize,
    /// Physical address of the block's PAT table.
    pub table: PhysicalAddress,
}

/// Occupancy counters of a tiler instance.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct TilerStats {
    pub pool: PoolStats,
    pub areas: usize,
    pub occupied_slots: usize,
    /// Blocks held back after a refill fault.
    pub quarantined: usize,
}
