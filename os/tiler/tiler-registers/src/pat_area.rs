use bitfield_struct::bitfield;
use tiler_info::geometry::PAT_ENGINES;

/// `PAT_AREA[n]`: inclusive slot rectangle a refill writes.
#[bitfield(u32)]
#[derive(PartialEq, Eq)]
pub struct PatArea {
    /// Bits 0..7: left column.
    #[bits(8)]
    pub x0: u8,
    /// Bits 8..15: top row.
    #[bits(8)]
    pub y0: u8,
    /// Bits 16..23: right column (inclusive).
    #[bits(8)]
    pub x1: u8,
    /// Bits 24..31: bottom row (inclusive).
    #[bits(8)]
    pub y1: u8,
}

register!(
    PatArea,
    offset = crate::offsets::PAT_AREA,
    stride = crate::offsets::ENGINE_STRIDE,
    count = PAT_ENGINES;
    LoadRegister, StoreRegister
);

impl PatArea {
    /// Area covering columns `x0..=x1` and rows `y0..=y1`.
    #[must_use]
    pub const fn from_corners(x0: u8, y0: u8, x1: u8, y1: u8) -> Self {
        Self::new().with_x0(x0).with_y0(y0).with_x1(x1).with_y1(y1)
    }

    /// Number of slots (and table entries) the area covers.
    #[must_use]
    pub const fn slots(self) -> usize {
        let w = (self.x1() as usize + 1).saturating_sub(self.x0() as usize);
        let h = (self.y1() as usize + 1).saturating_sub(self.y0() as usize);
        w * h
    }
}
