use bitfield_struct::bitfield;

/// `PAT_CONFIG`: global refill mode per engine.
#[bitfield(u32)]
#[derive(PartialEq, Eq)]
pub struct PatConfig {
    /// Bit 0: engine 0 follows descriptor chains from `PAT_DESCR`.
    pub auto_engine0: bool,
    /// Bit 1: engine 1 follows descriptor chains.
    pub auto_engine1: bool,
    /// Bit 2: engine 2 follows descriptor chains.
    pub auto_engine2: bool,
    /// Bit 3: engine 3 follows descriptor chains.
    pub auto_engine3: bool,
    #[bits(28)]
    _reserved_4_31: u32,
}

register!(PatConfig, offset = crate::offsets::PAT_CONFIG; LoadRegister, StoreRegister);

impl PatConfig {
    /// Every engine in automatic (descriptor chain) mode, or none.
    #[must_use]
    pub const fn all_engines(automatic: bool) -> Self {
        Self::new()
            .with_auto_engine0(automatic)
            .with_auto_engine1(automatic)
            .with_auto_engine2(automatic)
            .with_auto_engine3(automatic)
    }
}
