//! In-memory model of the DMM PAT registers.

#![allow(dead_code)]

use std::collections::BTreeMap;
use tiler_registers::{PatIrqEvents, RegisterBlock, offsets};
use tiler_sync::SpinLock;

pub struct SimState {
    regs: BTreeMap<usize, u32>,
    raw_events: u32,
    /// Every write in order.
    pub writes: Vec<(usize, u32)>,
    /// `PAT_STATUS[n]` as read by the driver.
    pub status: [u32; 4],
    /// Events raised when a refill starts; clean completion if `None`.
    pub fault: Option<PatIrqEvents>,
    /// Refills never complete.
    pub hang: bool,
    /// Reads of this offset return a flipped bit.
    pub corrupt: Option<usize>,
    /// Status latched once a refill ran.
    pub late_status: Option<u32>,
    /// `(engine, PAT_AREA, PAT_DATA or PAT_DESCR)` per started refill.
    pub refills: Vec<(u8, u32, u32)>,
}

pub struct SimDmm {
    pub state: SpinLock<SimState>,
}

pub const READY: u32 = 1;

impl SimDmm {
    pub fn new() -> Self {
        Self {
            state: SpinLock::new(SimState {
                regs: BTreeMap::new(),
                raw_events: 0,
                writes: Vec::new(),
                status: [READY; 4],
                fault: None,
                hang: false,
                corrupt: None,
                late_status: None,
                refills: Vec::new(),
            }),
        }
    }

    pub fn with<R>(&self, f: impl FnOnce(&mut SimState) -> R) -> R {
        self.state.with_lock(f)
    }

    pub fn reg(&self, offset: usize) -> u32 {
        self.with(|s| s.regs.get(&offset).copied().unwrap_or(0))
    }

    /// Offsets written, in order.
    pub fn write_offsets(&self) -> Vec<usize> {
        self.with(|s| s.writes.iter().map(|&(o, _)| o).collect())
    }

    pub fn clear_log(&self) {
        self.with(|s| s.writes.clear());
    }
}

impl SimState {
    fn start(&mut self, engine: u8, table: u32) {
        let area = self
            .regs
            .get(&offsets::pat_area(engine))
            .copied()
            .unwrap_or(0);
        self.refills.push((engine, area, table));
        if self.hang {
            return;
        }
        let events = self.fault.unwrap_or(PatIrqEvents::REFILL_DONE);
        self.raw_events |= u32::from(events.into_bits()) << (8 * u32::from(engine));
        if let Some(status) = self.late_status {
            self.status[usize::from(engine)] = status;
        }
    }
}

fn engine_of(offset: usize, base: usize, stride: usize) -> Option<u8> {
    let rel = offset.checked_sub(base)?;
    (rel % stride == 0 && rel / stride < 4).then(|| u8::try_from(rel / stride).unwrap())
}

impl RegisterBlock for SimDmm {
    fn read32(&self, offset: usize) -> u32 {
        self.with(|s| {
            if let Some(engine) = engine_of(offset, offsets::PAT_STATUS, 4) {
                return s.status[usize::from(engine)];
            }
            let value = match offset {
                offsets::PAT_IRQSTATUS_RAW | offsets::PAT_IRQSTATUS => s.raw_events,
                _ => s.regs.get(&offset).copied().unwrap_or(0),
            };
            if s.corrupt == Some(offset) {
                value ^ 1
            } else {
                value
            }
        })
    }

    fn write32(&self, offset: usize, value: u32) {
        self.with(|s| {
            s.writes.push((offset, value));
            if offset == offsets::PAT_IRQSTATUS {
                s.raw_events &= !value;
                return;
            }
            s.regs.insert(offset, value);
            if let Some(engine) = engine_of(offset, offsets::PAT_CTRL, offsets::ENGINE_STRIDE) {
                if value & 0xF != 0 {
                    let table = s.regs.get(&offsets::pat_data(engine)).copied().unwrap_or(0);
                    s.start(engine, table);
                }
            } else if let Some(engine) =
                engine_of(offset, offsets::PAT_DESCR, offsets::ENGINE_STRIDE)
            {
                s.start(engine, value);
            }
        });
    }
}
