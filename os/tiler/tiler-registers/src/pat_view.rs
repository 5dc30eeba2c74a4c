use bitfield_struct::bitfield;

/// `PAT_VIEW[n]`: lookup table selected per initiator, one nibble each.
#[bitfield(u32)]
#[derive(PartialEq, Eq)]
pub struct PatView {
    #[bits(4)]
    pub initiator0: u8,
    #[bits(4)]
    pub initiator1: u8,
    #[bits(4)]
    pub initiator2: u8,
    #[bits(4)]
    pub initiator3: u8,
    #[bits(4)]
    pub initiator4: u8,
    #[bits(4)]
    pub initiator5: u8,
    #[bits(4)]
    pub initiator6: u8,
    #[bits(4)]
    pub initiator7: u8,
}

register!(
    PatView,
    offset = crate::offsets::PAT_VIEW,
    stride = 4,
    count = crate::offsets::PAT_VIEW_COUNT;
    LoadRegister, StoreRegister
);

impl PatView {
    /// Every initiator on `lut`.
    #[must_use]
    pub const fn uniform(lut: u8) -> Self {
        let lut = lut & 0xF;
        Self::new()
            .with_initiator0(lut)
            .with_initiator1(lut)
            .with_initiator2(lut)
            .with_initiator3(lut)
            .with_initiator4(lut)
            .with_initiator5(lut)
            .with_initiator6(lut)
            .with_initiator7(lut)
    }
}

/// `PAT_VIEW_MAP[n]`: container base of each view, one byte per view.
#[bitfield(u32)]
#[derive(PartialEq, Eq)]
pub struct PatViewMap {
    #[bits(8)]
    pub view0: u8,
    #[bits(8)]
    pub view1: u8,
    #[bits(8)]
    pub view2: u8,
    #[bits(8)]
    pub view3: u8,
}

register!(
    PatViewMap,
    offset = crate::offsets::PAT_VIEW_MAP,
    stride = 4,
    count = crate::offsets::PAT_VIEW_MAP_COUNT;
    LoadRegister, StoreRegister
);

/// `PAT_VIEW_MAP_BASE`: enables the view map.
#[bitfield(u32)]
#[derive(PartialEq, Eq)]
pub struct PatViewMapBase {
    #[bits(31)]
    _reserved_0_30: u32,
    /// Bit 31: view map in use.
    pub enable: bool,
}

register!(PatViewMapBase, offset = crate::offsets::PAT_VIEW_MAP_BASE; LoadRegister, StoreRegister);
