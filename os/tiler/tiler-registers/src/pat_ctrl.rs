use bitfield_struct::bitfield;
use tiler_info::geometry::PAT_ENGINES;

/// Order in which the engine walks the area while consuming table entries.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[repr(u8)]
pub enum RefillDirection {
    /// Row-major, left to right, top to bottom.
    #[default]
    RowMajor = 0,
    /// Any other raw value the hardware reports.
    Other = 0xF,
}

impl RefillDirection {
    #[must_use]
    pub const fn from_bits(bits: u8) -> Self {
        match bits {
            0 => Self::RowMajor,
            _ => Self::Other,
        }
    }

    #[must_use]
    pub const fn into_bits(self) -> u8 {
        self as u8
    }
}

/// `PAT_CTRL[n]`: refill control word; writing `start` kicks the engine.
#[bitfield(u32)]
#[derive(PartialEq, Eq)]
pub struct PatCtrl {
    /// Bits 0..3: start the refill when non-zero.
    #[bits(4)]
    pub start: u8,
    /// Bits 4..7: traversal direction.
    #[bits(4, default = RefillDirection::RowMajor)]
    pub direction: RefillDirection,
    /// Bits 8..15: target lookup table.
    #[bits(8)]
    pub lut_id: u8,
    /// Bits 16..27: synchronisation tag.
    #[bits(12)]
    pub sync: u16,
    /// Bits 28..31: initiator id.
    #[bits(4)]
    pub initiator: u8,
}

register!(
    PatCtrl,
    offset = crate::offsets::PAT_CTRL,
    stride = crate::offsets::ENGINE_STRIDE,
    count = PAT_ENGINES;
    LoadRegister, StoreRegister
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_positions() {
        let ctrl = PatCtrl::new()
            .with_start(1)
            .with_lut_id(2)
            .with_sync(0xABC)
            .with_initiator(0x5);
        assert_eq!(ctrl.into_bits(), 0x5ABC_0201);
        assert_eq!(ctrl.direction(), RefillDirection::RowMajor);
    }
}
