use bitfield_struct::bitfield;
use tiler_info::geometry::PAT_ENGINES;

/// `PAT_STATUS[n]`: engine state and latched error flags (read only).
#[bitfield(u32)]
#[derive(PartialEq, Eq)]
pub struct PatStatus {
    /// Bit 0: engine idle and accepting a new area.
    pub ready: bool,
    /// Bit 1: descriptor registers hold a valid area.
    pub valid: bool,
    /// Bit 2: refill in progress.
    pub run: bool,
    /// Bit 3: last refill finished.
    pub done: bool,
    /// Bit 4: working through a linked descriptor chain.
    pub linked: bool,
    #[bits(2)]
    _reserved_5_6: u8,
    /// Bit 7: engine bypassed.
    pub bypassed: bool,
    #[bits(2)]
    _reserved_8_9: u8,
    /// Bit 10: invalid descriptor.
    pub err_inv_descr: bool,
    /// Bit 11: invalid table data.
    pub err_inv_data: bool,
    /// Bit 12: area register written while running.
    pub err_upd_area: bool,
    /// Bit 13: control register written while running.
    pub err_upd_ctrl: bool,
    /// Bit 14: data register written while running.
    pub err_upd_data: bool,
    /// Bit 15: access violation.
    pub err_access: bool,
    #[bits(16)]
    _reserved_16_31: u16,
}

register!(
    PatStatus,
    offset = crate::offsets::PAT_STATUS,
    stride = 4,
    count = PAT_ENGINES;
    LoadRegister
);

impl PatStatus {
    /// Mask of the latched error bits.
    pub const ERROR_MASK: u32 = 0xFC00;

    #[inline]
    #[must_use]
    pub const fn has_error(self) -> bool {
        self.into_bits() & Self::ERROR_MASK != 0
    }
}
