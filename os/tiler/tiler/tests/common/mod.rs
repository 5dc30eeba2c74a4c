//! Host-side stand-ins for the DMM, the page allocator and DMA memory.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::rc::Rc;
use std::ptr::NonNull;
use tiler::{
    DmaAlloc, DmaBuffer, DmaError, PageFrame, PageHandle, PageSource, PhysicalAddress,
    PhysicalPage, RegisterBlock, Tiler, TilerConfig,
};
use tiler_registers::{PatIrqEvents, offsets};
use tiler_sync::SpinLock;

pub const READY: u32 = 1;

/// PAT register file that completes every refill at once unless told
/// otherwise.
pub struct SimDmm {
    state: SpinLock<SimState>,
}

pub struct SimState {
    regs: BTreeMap<usize, u32>,
    raw_events: u32,
    pub status: [u32; 4],
    /// Events raised by the next refills instead of a clean completion.
    pub fault: Option<PatIrqEvents>,
    pub hang: bool,
    /// `(engine, PAT_AREA, PAT_DATA or PAT_DESCR)` per started refill.
    pub refills: Vec<(u8, u32, u32)>,
}

impl SimDmm {
    pub fn new() -> Self {
        Self {
            state: SpinLock::new(SimState {
                regs: BTreeMap::new(),
                raw_events: 0,
                status: [READY; 4],
                fault: None,
                hang: false,
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

    pub fn refills(&self) -> Vec<(u8, u32, u32)> {
        self.with(|s| s.refills.clone())
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
        if !self.hang {
            let events = self.fault.unwrap_or(PatIrqEvents::REFILL_DONE);
            self.raw_events |= u32::from(events.into_bits()) << (8 * u32::from(engine));
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
            match offset {
                offsets::PAT_IRQSTATUS_RAW | offsets::PAT_IRQSTATUS => s.raw_events,
                _ => s.regs.get(&offset).copied().unwrap_or(0),
            }
        })
    }

    fn write32(&self, offset: usize, value: u32) {
        self.with(|s| {
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

/// Page source with an optional cap on outstanding pages.
#[derive(Debug, Default)]
pub struct Pages {
    next: u64,
    pub limit: Option<u64>,
    pub allocated: u64,
    pub returned: u64,
    pub flushed: u64,
}

impl Pages {
    pub fn limited(limit: u64) -> Self {
        Self {
            limit: Some(limit),
            ..Self::default()
        }
    }

    pub const fn outstanding(&self) -> u64 {
        self.allocated - self.returned
    }
}

impl PageSource for Pages {
    fn alloc_page(&mut self) -> Option<PageFrame> {
        if self.limit.is_some_and(|limit| self.outstanding() >= limit) {
            return None;
        }
        self.next += 1;
        self.allocated += 1;
        Some(PageFrame::new(
            PhysicalPage::from_frame_number(0x8_0000 + self.next),
            PageHandle(usize::try_from(self.next).unwrap()),
        ))
    }

    fn free_page(&mut self, _frame: PageFrame) {
        self.returned += 1;
    }

    fn flush(&mut self, _page: PhysicalPage) {
        self.flushed += 1;
    }
}

/// What the DMA fake has handed out, shared with the test.
#[derive(Debug, Default)]
pub struct DmaLog {
    pub live: BTreeSet<u64>,
    pub freed: Vec<u64>,
}

/// Heap-backed DMA memory with made-up 32-bit bus addresses.
#[derive(Debug)]
pub struct HostDma {
    next_bus: u64,
    pub log: Rc<RefCell<DmaLog>>,
}

impl HostDma {
    pub fn new() -> Self {
        Self {
            next_bus: 0x9000_0000,
            log: Rc::default(),
        }
    }

    /// Buffers allocated and not yet freed.
    pub fn live(&self) -> usize {
        self.log.borrow().live.len()
    }
}

impl DmaAlloc for HostDma {
    fn alloc(&mut self, words: usize) -> Result<DmaBuffer, DmaError> {
        let mem = vec![0u32; words].into_boxed_slice();
        let cpu = NonNull::new(Box::into_raw(mem).cast::<u32>()).unwrap();
        let phys = PhysicalAddress::new(self.next_bus);
        self.next_bus += 0x4000;
        self.log.borrow_mut().live.insert(phys.as_u64());
        Ok(unsafe { DmaBuffer::from_raw_parts(phys, cpu, words) })
    }

    fn free(&mut self, buffer: DmaBuffer) {
        let bus = buffer.phys().as_u64();
        let raw = std::ptr::slice_from_raw_parts_mut(buffer.cpu_ptr().as_ptr(), buffer.words());
        drop(unsafe { Box::from_raw(raw) });
        let mut log = self.log.borrow_mut();
        assert!(log.live.remove(&bus), "double free of {bus:#x}");
        log.freed.push(bus);
    }
}

pub type TestTiler<'a> = Tiler<Pages, HostDma, &'a SimDmm>;

pub fn tiler(sim: &SimDmm, config: TilerConfig) -> TestTiler<'_> {
    tiler_with_dma_log(sim, config).0
}

pub fn tiler_with_dma_log(
    sim: &SimDmm,
    config: TilerConfig,
) -> (TestTiler<'_>, Rc<RefCell<DmaLog>>) {
    let dma = HostDma::new();
    let log = Rc::clone(&dma.log);
    (Tiler::new(config, Pages::default(), dma, sim).unwrap(), log)
}
