use tiler_registers::{PatIrqEvents, PatStatus};

#[derive(Debug, Copy, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PatError {
    #[error("PAT engine {0} is not ready")]
    NotReady(u8),
    #[error("PAT engine {0} is already running a refill")]
    AlreadyRunning(u8),
    #[error("PAT engine {0} rejected an invalid descriptor")]
    InvalidDescriptor(u8),
    #[error("PAT engine {0} rejected invalid table data")]
    InvalidData(u8),
    #[error("PAT engine {0} registers changed unexpectedly")]
    UnexpectedUpdate(u8),
    #[error("PAT engine {0} reported an access violation")]
    UnexpectedAccess(u8),
    #[error("PAT engine {0} missed its lookup table")]
    LutMiss(u8),
    #[error("PAT engine index {0} is out of range")]
    InvalidAreaIndex(u8),
    #[error("PAT engine {engine} did not finish within {polls} polls")]
    Timeout { engine: u8, polls: u32 },
}

impl PatError {
    /// The engine was busy or not yet ready; the same call may succeed later.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::NotReady(_) | Self::AlreadyRunning(_))
    }

    /// The hardware reported a configuration fault. The area being refilled
    /// is unusable and must be torn down.
    #[must_use]
    pub const fn is_hardware_fault(&self) -> bool {
        matches!(
            self,
            Self::InvalidDescriptor(_)
                | Self::InvalidData(_)
                | Self::UnexpectedUpdate(_)
                | Self::UnexpectedAccess(_)
                | Self::LutMiss(_)
        )
    }

    /// The first latched error in `status`, if any.
    pub(crate) const fn from_status(engine: u8, status: PatStatus) -> Option<Self> {
        if status.err_inv_descr() {
            Some(Self::InvalidDescriptor(engine))
        } else if status.err_inv_data() {
            Some(Self::InvalidData(engine))
        } else if status.err_upd_area() || status.err_upd_ctrl() || status.err_upd_data() {
            Some(Self::UnexpectedUpdate(engine))
        } else if status.err_access() {
            Some(Self::UnexpectedAccess(engine))
        } else {
            None
        }
    }

    /// The first error event in `events`, if any.
    pub(crate) const fn from_events(engine: u8, events: PatIrqEvents) -> Option<Self> {
        if events.err_inv_dsc() {
            Some(Self::InvalidDescriptor(engine))
        } else if events.err_inv_data() {
            Some(Self::InvalidData(engine))
        } else if events.err_upd_area() || events.err_upd_ctrl() || events.err_upd_data() {
            Some(Self::UnexpectedUpdate(engine))
        } else if events.err_lut_miss() {
            Some(Self::LutMiss(engine))
        } else {
            None
        }
    }
}
