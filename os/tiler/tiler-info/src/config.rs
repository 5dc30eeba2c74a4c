//! # Runtime Configuration

use crate::geometry::PAT_ENGINES;
use utils_accessors_derive::Accessors;

/// How the PAT programmer hands an area to the hardware.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum RefillMode {
    /// Direct register writes followed by a completion poll.
    #[default]
    Manual,
    /// One register write pointing at an in-memory descriptor chain.
    Automatic,
}

/// Settings for one tiler instance.
///
/// ```
/// use tiler_info::{RefillMode, TilerConfig};
///
/// let cfg = TilerConfig::new()
///     .with_refill_batch(16)
///     .with_refill_mode(RefillMode::Automatic);
/// assert_eq!(cfg.refill_batch(), 16);
/// assert!(cfg.validate().is_ok());
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq, Accessors)]
pub struct TilerConfig {
    /// Pages pulled from the page source per pool refill.
    refill_batch: usize,
    refill_mode: RefillMode,
    /// Read back every PAT area/data register write and compare.
    verify_writes: bool,
    /// Upper bound on status polls per wait.
    poll_budget: u32,
    /// PAT engine slot used for refills (`0..PAT_ENGINES`).
    engine: u8,
    /// Lookup table the refill writes into.
    lut_id: u8,
    /// 4-bit initiator id placed in the control word.
    initiator: u8,
    /// 12-bit sync field placed in the control word.
    sync: u16,
    /// Skip the not-ready / already-running pre-check.
    force_refill: bool,
}

impl TilerConfig {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            refill_batch: 64,
            refill_mode: RefillMode::Manual,
            verify_writes: true,
            poll_budget: 1_000_000,
            engine: 0,
            lut_id: 0,
            initiator: 0,
            sync: 0,
            force_refill: false,
        }
    }

    /// Check the value ranges the hardware and pool accept.
    ///
    /// # Errors
    /// The first out-of-range field.
    pub const fn validate(&self) -> Result<(), ConfigError> {
        if self.refill_batch == 0 {
            return Err(ConfigError::EmptyRefillBatch);
        }
        if self.engine >= PAT_ENGINES {
            return Err(ConfigError::EngineOutOfRange(self.engine));
        }
        if self.initiator > 0xF {
            return Err(ConfigError::InitiatorOutOfRange(self.initiator));
        }
        if self.sync > 0xFFF {
            return Err(ConfigError::SyncOutOfRange(self.sync));
        }
        Ok(())
    }
}

impl Default for TilerConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("refill batch must hold at least one page")]
    EmptyRefillBatch,
    #[error("PAT engine {0} does not exist")]
    EngineOutOfRange(u8),
    #[error("initiator {0:#x} does not fit in 4 bits")]
    InitiatorOutOfRange(u8),
    #[error("sync {0:#x} does not fit in 12 bits")]
    SyncOutOfRange(u16),
}
