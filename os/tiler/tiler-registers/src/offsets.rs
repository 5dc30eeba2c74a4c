//! Byte offsets of the PAT registers from the DMM block base.

pub const PAT_CONFIG: usize = 0x410;
pub const PAT_VIEW: usize = 0x420;
pub const PAT_VIEW_MAP: usize = 0x440;
pub const PAT_VIEW_MAP_BASE: usize = 0x460;
pub const PAT_IRQ_EOI: usize = 0x478;
pub const PAT_IRQSTATUS_RAW: usize = 0x480;
pub const PAT_IRQSTATUS: usize = 0x490;
pub const PAT_IRQENABLE_SET: usize = 0x4A0;
pub const PAT_IRQENABLE_CLR: usize = 0x4B0;
pub const PAT_STATUS: usize = 0x4C0;
pub const PAT_DESCR: usize = 0x500;
pub const PAT_AREA: usize = 0x504;
pub const PAT_CTRL: usize = 0x508;
pub const PAT_DATA: usize = 0x50C;

/// Number of `PAT_VIEW` registers.
pub const PAT_VIEW_COUNT: u8 = 2;

/// Number of `PAT_VIEW_MAP` registers.
pub const PAT_VIEW_MAP_COUNT: u8 = 4;

/// Distance between the register groups of two refill engines.
pub const ENGINE_STRIDE: usize = 0x10;

/// Size of the register window the driver touches.
pub const BLOCK_SIZE: usize = 0x800;

#[inline]
#[must_use]
pub const fn pat_status(engine: u8) -> usize {
    PAT_STATUS + 4 * engine as usize
}

#[inline]
#[must_use]
pub const fn pat_descr(engine: u8) -> usize {
    PAT_DESCR + ENGINE_STRIDE * engine as usize
}

#[inline]
#[must_use]
pub const fn pat_area(engine: u8) -> usize {
    PAT_AREA + ENGINE_STRIDE * engine as usize
}

#[inline]
#[must_use]
pub const fn pat_ctrl(engine: u8) -> usize {
    PAT_CTRL + ENGINE_STRIDE * engine as usize
}

#[inline]
#[must_use]
pub const fn pat_data(engine: u8) -> usize {
    PAT_DATA + ENGINE_STRIDE * engine as usize
}
