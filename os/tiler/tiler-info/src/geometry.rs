//! # Grid and Register Geometry

/// Size of one physical page and of one grid slot, in bytes.
pub const PAGE_SIZE: u64 = 4096;

/// `log2(PAGE_SIZE)`.
pub const PAGE_SHIFT: u32 = 12;

/// log2 of the slot width in 8-bit pixels.
pub const SLOT_WIDTH_BITS: u32 = 6;

/// log2 of the slot height in 8-bit pixels.
pub const SLOT_HEIGHT_BITS: u32 = 6;

/// log2 of the container width in 8-bit pixels.
pub const CONTAINER_WIDTH_BITS: u32 = 14;

/// log2 of the container height in 8-bit pixels.
pub const CONTAINER_HEIGHT_BITS: u32 = 13;

/// Grid width in slots.
pub const CONTAINER_WIDTH: u16 = 1 << (CONTAINER_WIDTH_BITS - SLOT_WIDTH_BITS);

/// Grid height in slots.
pub const CONTAINER_HEIGHT: u16 = 1 << (CONTAINER_HEIGHT_BITS - SLOT_HEIGHT_BITS);

/// Total number of slots (and therefore pages) the grid can map.
pub const CONTAINER_SLOTS: usize = CONTAINER_WIDTH as usize * CONTAINER_HEIGHT as usize;

/// Minimum horizontal alignment of a 2D block, in bytes of slot row.
pub const ROW_ALIGN_BYTES: u32 = 128;

/// Number of parallel PAT refill engines (area-descriptor slots).
pub const PAT_ENGINES: u8 = 4;

/// Number of PAT lookup tables selectable through the view registers.
pub const PAT_LUTS: u8 = 4;

/// Bit position of the access mode inside a tiled address.
pub const ACCESS_MODE_SHIFT: u32 = 27;

const _: () = {
    assert!(1 << PAGE_SHIFT == PAGE_SIZE);
    assert!(1 << (SLOT_WIDTH_BITS + SLOT_HEIGHT_BITS) == PAGE_SIZE);
    assert!(CONTAINER_WIDTH == 256);
    assert!(CONTAINER_HEIGHT == 128);
    assert!(CONTAINER_WIDTH_BITS + CONTAINER_HEIGHT_BITS == ACCESS_MODE_SHIFT);
};
