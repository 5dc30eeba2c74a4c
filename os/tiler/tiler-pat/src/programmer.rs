use crate::PatError;
use log::{debug, info, trace, warn};
use tiler_info::geometry::{PAT_ENGINES, PAT_LUTS};
use tiler_info::{RefillMode, TilerConfig};
use tiler_registers::barrier::full_barrier;
use tiler_registers::offsets::{self, PAT_VIEW_COUNT, PAT_VIEW_MAP_COUNT};
use tiler_registers::{
    LoadRegister, PatArea, PatConfig, PatDescriptor, PatCtrl, PatIrqEnableSet, PatIrqEvents, PatIrqStatus,
    PatIrqStatusRaw, PatStatus, PatView, PatViewMap, PatViewMapBase, RefillDirection,
    RegisterBlock, StoreRegister,
};
use tiler_sync::{PollBudget, spin_until};

/// Engine state as seen by the status query.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum EngineState {
    /// Idle and accepting an area.
    Ready,
    /// A refill is in progress.
    Running,
    /// Neither ready nor running, e.g. right after reset.
    NotReady,
}

/// Result of one completion poll.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Completion {
    Pending,
    Done,
}

/// Drives the PAT refill engines through a [`RegisterBlock`].
///
/// Not internally synchronised: one refill sequence at a time per engine is
/// the caller's responsibility.
pub struct PatProgrammer<R> {
    regs: R,
    budget: PollBudget,
    verify_writes: bool,
    force: bool,
    ctrl: PatCtrl,
}

impl<R: RegisterBlock> PatProgrammer<R> {
    /// Wrap `regs` with the refill parameters from `config`.
    pub fn new(regs: R, config: &TilerConfig) -> Self {
        let ctrl = PatCtrl::new()
            .with_direction(RefillDirection::RowMajor)
            .with_lut_id(config.lut_id())
            .with_sync(config.sync() & 0xFFF)
            .with_initiator(config.initiator() & 0xF);
        Self {
            regs,
            budget: PollBudget::new(config.poll_budget()),
            verify_writes: config.verify_writes(),
            force: config.force_refill(),
            ctrl,
        }
    }

    #[inline]
    pub const fn registers(&self) -> &R {
        &self.regs
    }

    pub fn into_registers(self) -> R {
        self.regs
    }

    /// In-memory descriptor for an automatic refill of `area` from `table`.
    #[must_use]
    pub const fn descriptor(&self, area: PatArea, table: u32) -> PatDescriptor {
        PatDescriptor::new(area, self.ctrl.with_start(1), table)
    }

    /// Global PAT setup: every view on LUT 0, view map enabled, all engine
    /// events except LUT miss enabled, and the refill mode for all engines.
    pub fn init(&self, mode: RefillMode) {
        for view in 0..PAT_VIEW_COUNT {
            PatView::uniform(0).store(&self.regs, view);
        }
        for map in 0..PAT_VIEW_MAP_COUNT {
            PatViewMap::new().store(&self.regs, map);
        }
        PatViewMapBase::new().with_enable(true).store(&self.regs, 0);
        PatIrqStatus::uniform(PatIrqEvents::ALL).store(&self.regs, 0);
        PatIrqEnableSet::uniform(PatIrqEvents::ENABLED).store(&self.regs, 0);
        PatConfig::all_engines(mode == RefillMode::Automatic).store(&self.regs, 0);
        full_barrier();
        info!("PAT initialised for {mode:?} refill, {PAT_ENGINES} engines, {PAT_LUTS} LUTs");
    }

    /// Current state of `engine`, or the fault it has latched.
    ///
    /// # Errors
    /// [`PatError::InvalidAreaIndex`] or the latched hardware fault.
    pub fn status(&self, engine: u8) -> Result<EngineState, PatError> {
        check_engine(engine)?;
        let status = PatStatus::load(&self.regs, engine);
        if let Some(err) = PatError::from_status(engine, status) {
            return Err(err);
        }
        Ok(if status.run() {
            EngineState::Running
        } else if status.ready() {
            EngineState::Ready
        } else {
            EngineState::NotReady
        })
    }

    /// Program `area` with the page table at bus address `table` by direct
    /// register writes and wait for the engine to finish.
    ///
    /// # Errors
    /// - [`PatError::InvalidAreaIndex`] for a bad engine.
    /// - [`PatError::NotReady`] / [`PatError::AlreadyRunning`] unless forced.
    /// - A hardware fault from the status, a verify mismatch or the
    ///   completion events.
    /// - [`PatError::Timeout`] when the poll budget runs out.
    pub fn refill_manual(&self, engine: u8, area: PatArea, table: u32) -> Result<(), PatError> {
        match self.status(engine)? {
            EngineState::Running if !self.force => return Err(PatError::AlreadyRunning(engine)),
            EngineState::NotReady if !self.force => return Err(PatError::NotReady(engine)),
            _ => {}
        }

        self.clear_events(engine);

        self.write_checked(engine, offsets::pat_area(engine), area.into_bits())?;
        self.write_checked(engine, offsets::pat_data(engine), table)?;

        self.ctrl.with_start(1).store(&self.regs, engine);
        full_barrier();
        debug!(
            "PAT engine {engine}: manual refill of ({},{})-({},{}) from {table:#010x}",
            area.x0(),
            area.y0(),
            area.x1(),
            area.y1()
        );

        self.wait_completion(engine)?;

        let status = PatStatus::load(&self.regs, engine);
        if let Some(err) = PatError::from_status(engine, status) {
            warn!("PAT engine {engine}: late fault {err}");
            return Err(err);
        }
        Ok(())
    }

    /// Hand the descriptor chain at bus address `descriptor` to `engine`.
    ///
    /// Returns immediately; use [`poll_completion`](Self::poll_completion)
    /// or [`wait_completion`](Self::wait_completion).
    ///
    /// # Errors
    /// [`PatError::InvalidAreaIndex`] for a bad engine.
    pub fn refill_auto(&self, engine: u8, descriptor: u32) -> Result<(), PatError> {
        check_engine(engine)?;
        self.clear_events(engine);
        self.regs.write32(offsets::pat_descr(engine), descriptor);
        full_barrier();
        debug!("PAT engine {engine}: descriptor chain at {descriptor:#010x}");
        Ok(())
    }

    /// Check once whether `engine` finished. A finished refill has its
    /// events cleared.
    ///
    /// # Errors
    /// [`PatError::InvalidAreaIndex`] or the fault reported by the events.
    pub fn poll_completion(&self, engine: u8) -> Result<Completion, PatError> {
        check_engine(engine)?;
        let events = PatIrqStatusRaw::load(&self.regs, 0).engine(engine);
        if let Some(err) = PatError::from_events(engine, events) {
            warn!("PAT engine {engine}: refill failed with {err} (events {:#04x})", events.into_bits());
            self.clear_events(engine);
            return Err(err);
        }
        if events.is_refill_done() {
            self.clear_events(engine);
            trace!("PAT engine {engine}: refill done");
            return Ok(Completion::Done);
        }
        Ok(Completion::Pending)
    }

    /// Poll until `engine` finishes, at most the configured budget times.
    ///
    /// # Errors
    /// As [`poll_completion`](Self::poll_completion), plus
    /// [`PatError::Timeout`].
    pub fn wait_completion(&self, engine: u8) -> Result<(), PatError> {
        spin_until(self.budget, || match self.poll_completion(engine) {
            Ok(Completion::Pending) => None,
            Ok(Completion::Done) => Some(Ok(())),
            Err(err) => Some(Err(err)),
        })
        .map_err(|timeout| {
            warn!("PAT engine {engine}: no completion after {} polls", timeout.polls);
            PatError::Timeout {
                engine,
                polls: timeout.polls,
            }
        })?
    }

    /// Write-1-to-clear every event bit of `engine`.
    fn clear_events(&self, engine: u8) {
        PatIrqStatus::new()
            .with_engine(engine, PatIrqEvents::ALL)
            .store(&self.regs, 0);
        full_barrier();
    }

    /// Write `value` at `offset`; with verification on, read it back.
    fn write_checked(&self, engine: u8, offset: usize, value: u32) -> Result<(), PatError> {
        self.regs.write32(offset, value);
        full_barrier();
        if self.verify_writes {
            let read = self.regs.read32(offset);
            if read != value {
                warn!("PAT engine {engine}: wrote {value:#010x} at {offset:#x}, read {read:#010x}");
                return Err(PatError::UnexpectedUpdate(engine));
            }
        }
        Ok(())
    }
}

const fn check_engine(engine: u8) -> Result<(), PatError> {
    if engine < PAT_ENGINES {
        Ok(())
    } else {
        Err(PatError::InvalidAreaIndex(engine))
    }
}
