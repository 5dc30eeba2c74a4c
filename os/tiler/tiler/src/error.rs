use tiler_addresses::{CodecError, TiledAddress};
use tiler_alloc::PoolError;
use tiler_alloc::dma::DmaError;
use tiler_container::ContainerError;
use tiler_info::ConfigError;
use tiler_pat::PatError;

#[derive(Debug, Copy, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TilerError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Codec(#[from] CodecError),
    #[error(transparent)]
    Container(#[from] ContainerError),
    #[error(transparent)]
    Pool(#[from] PoolError),
    #[error(transparent)]
    Dma(#[from] DmaError),
    /// The refill engine was busy; nothing was changed and the call may be
    /// retried.
    #[error("refill engine busy: {0}")]
    Busy(PatError),
    /// The configured refill engine does not exist. Retrying cannot help.
    #[error("invalid refill engine: {0}")]
    InvalidEngine(PatError),
    /// The refill failed in hardware; the block is quarantined.
    #[error("hardware fault: {0}")]
    HardwareFault(PatError),
    #[error("no block at {0}")]
    NotFound(TiledAddress),
    #[error("cannot pack {count} buffers of width {width} into width {max_width}")]
    BadPacking {
        count: usize,
        width: u32,
        max_width: u32,
    },
}

impl TilerError {
    /// Unknown format id.
    #[must_use]
    pub const fn is_bad_format(&self) -> bool {
        matches!(self, Self::Codec(CodecError::BadFormat(_)))
    }

    /// Empty block, or one that can never fit the grid.
    #[must_use]
    pub const fn is_bad_size(&self) -> bool {
        matches!(
            self,
            Self::Codec(CodecError::BadSize { .. })
                | Self::Container(ContainerError::BadSize { .. })
                | Self::BadPacking { .. }
        )
    }

    /// The grid has no free region large enough right now.
    #[must_use]
    pub const fn is_out_of_space(&self) -> bool {
        matches!(self, Self::Container(ContainerError::NoSpace { .. }))
    }

    /// Pages or DMA memory ran out.
    #[must_use]
    pub const fn is_out_of_memory(&self) -> bool {
        matches!(
            self,
            Self::Pool(PoolError::OutOfMemory { .. }) | Self::Dma(DmaError::OutOfMemory { .. })
        )
    }

    #[must_use]
    pub const fn is_hardware_fault(&self) -> bool {
        matches!(self, Self::HardwareFault(_))
    }

    /// The refill may succeed if tried again later.
    #[must_use]
    pub const fn is_busy(&self) -> bool {
        matches!(self, Self::Busy(_))
    }

    /// Sort a refill failure into busy, caller bug and hardware fault.
    pub(crate) const fn from_refill(err: PatError) -> Self {
        if err.is_retryable() {
            Self::Busy(err)
        } else if let PatError::InvalidAreaIndex(_) = err {
            Self::InvalidEngine(err)
        } else {
            Self::HardwareFault(err)
        }
    }
}
