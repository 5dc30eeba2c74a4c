mod common;

use common::{READY, SimDmm, tiler, tiler_with_dma_log};
use tiler::{GridPoint, PatError, PixelFormat, RefillMode, TilerConfig, TilerError};
use tiler_registers::{PatIrqEvents, offsets};

#[test]
fn refill_fault_quarantines_the_block() {
    let sim = SimDmm::new();
    let tiler = tiler(&sim, TilerConfig::new());
    let keep = tiler.allocate(PixelFormat::Bit8, 128, 64).unwrap();

    sim.with(|s| s.fault = Some(PatIrqEvents::new().with_err_inv_data(true)));
    let err = tiler.allocate(PixelFormat::Bit16, 256, 128).unwrap_err();
    assert_eq!(err, TilerError::HardwareFault(PatError::InvalidData(0)));

    let stats = tiler.stats();
    assert_eq!(stats.areas, 1);
    assert_eq!(stats.quarantined, 1);
    // 2 pages for the kept block, 4×4 held by the quarantine.
    assert_eq!(stats.pool.used, 2 + 16);
    let held = tiler.quarantined();
    assert_eq!(held.len(), 1);
    assert_eq!(held[0].size().pages(), 16);

    // The slots went back to the grid; the next block may reuse them.
    sim.with(|s| s.fault = None);
    let next = tiler.allocate(PixelFormat::Bit16, 256, 128).unwrap();
    let a = tiler.query(keep).unwrap().rect;
    let b = tiler.query(next).unwrap().rect;
    assert!(!a.overlaps(&b));
    assert_eq!(tiler.stats().pool.used, 2 + 16 + 16);
}

#[test]
fn quarantined_pages_are_reclaimed_exactly_once() {
    let sim = SimDmm::new();
    let tiler = tiler(&sim, TilerConfig::new());

    sim.with(|s| s.fault = Some(PatIrqEvents::new().with_err_upd_ctrl(true)));
    assert!(tiler.allocate(PixelFormat::Page, 3 * 4096, 1).unwrap_err().is_hardware_fault());
    assert!(tiler.allocate(PixelFormat::Page, 2 * 4096, 1).unwrap_err().is_hardware_fault());
    assert_eq!(tiler.stats().pool.used, 5);

    assert_eq!(tiler.reclaim_quarantined(), Ok(5));
    assert_eq!(tiler.reclaim_quarantined(), Ok(0));
    let stats = tiler.stats();
    assert_eq!((stats.pool.used, stats.quarantined), (0, 0));
    assert!(tiler.quarantined().is_empty());
}

#[test]
fn hung_engine_times_out_and_quarantines() {
    let sim = SimDmm::new();
    let tiler = tiler(&sim, TilerConfig::new().with_poll_budget(16));

    sim.with(|s| s.hang = true);
    let err = tiler.allocate(PixelFormat::Bit32, 32, 32).unwrap_err();

    assert_eq!(
        err,
        TilerError::HardwareFault(PatError::Timeout {
            engine: 0,
            polls: 16
        })
    );
    assert_eq!(tiler.stats().quarantined, 1);
    assert_eq!(tiler.stats().areas, 0);
}

#[test]
fn busy_engine_leaves_nothing_behind() {
    let sim = SimDmm::new();
    let tiler = tiler(&sim, TilerConfig::new());

    sim.with(|s| s.status[0] = READY | 0b100);
    let err = tiler.allocate(PixelFormat::Bit8, 64, 64).unwrap_err();
    assert_eq!(err, TilerError::Busy(PatError::AlreadyRunning(0)));

    sim.with(|s| s.status[0] = 0);
    let err = tiler.allocate(PixelFormat::Bit8, 64, 64).unwrap_err();
    assert_eq!(err, TilerError::Busy(PatError::NotReady(0)));

    let stats = tiler.stats();
    assert_eq!((stats.areas, stats.quarantined, stats.pool.used), (0, 0, 0));
    assert!(sim.refills().is_empty());

    sim.with(|s| s.status[0] = READY);
    let addr = tiler.allocate(PixelFormat::Bit8, 64, 64).unwrap();
    assert_eq!(addr.decode().grid, GridPoint::new(0, 0));
}

#[test]
fn shutdown_returns_quarantined_and_live_memory() {
    let sim = SimDmm::new();
    let tiler = tiler(&sim, TilerConfig::new().with_refill_batch(8));

    tiler.allocate(PixelFormat::Bit8, 1000, 100).unwrap();
    tiler.allocate(PixelFormat::Bit32, 64, 64).unwrap();
    sim.with(|s| s.fault = Some(PatIrqEvents::new().with_err_inv_dsc(true)));
    assert!(tiler.allocate(PixelFormat::Bit16, 64, 64).is_err());

    let parts = tiler.shutdown().unwrap();
    assert!(parts.source.allocated > 0);
    assert_eq!(parts.source.outstanding(), 0);
    assert_eq!(parts.dma.live(), 0);
}

#[test]
fn automatic_fault_holds_the_descriptor_until_reclaim() {
    let sim = SimDmm::new();
    let config = TilerConfig::new().with_refill_mode(RefillMode::Automatic);
    let (tiler, dma) = tiler_with_dma_log(&sim, config);
    let keep = tiler.allocate(PixelFormat::Bit8, 128, 64).unwrap();
    // The kept block's table; its descriptor was freed after completion.
    assert_eq!(dma.borrow().live.len(), 1);

    sim.with(|s| s.fault = Some(PatIrqEvents::new().with_err_inv_dsc(true)));
    let err = tiler.allocate(PixelFormat::Bit32, 64, 64).unwrap_err();
    assert!(err.is_hardware_fault(), "{err}");
    assert_eq!(tiler.stats().quarantined, 1);

    let descriptor = u64::from(sim.reg(offsets::pat_descr(0)));
    {
        let log = dma.borrow();
        // Kept table, quarantined table and the faulted descriptor.
        assert_eq!(log.live.len(), 3);
        assert!(log.live.contains(&descriptor));
        assert!(!log.freed.contains(&descriptor));
    }

    sim.with(|s| s.fault = None);
    assert_eq!(tiler.reclaim_quarantined(), Ok(4));
    {
        let log = dma.borrow();
        assert_eq!(log.live.len(), 1);
        assert!(log.freed.contains(&descriptor));
    }
    assert!(tiler.query(keep).is_ok());
}

#[test]
fn automatic_hang_times_out_and_keeps_the_descriptor() {
    let sim = SimDmm::new();
    let config = TilerConfig::new()
        .with_refill_mode(RefillMode::Automatic)
        .with_poll_budget(4);
    let (tiler, dma) = tiler_with_dma_log(&sim, config);

    sim.with(|s| s.hang = true);
    let err = tiler.allocate(PixelFormat::Bit16, 64, 32).unwrap_err();
    assert_eq!(
        err,
        TilerError::HardwareFault(PatError::Timeout {
            engine: 0,
            polls: 4
        })
    );
    assert_eq!(tiler.stats().quarantined, 1);
    assert_eq!(tiler.stats().areas, 0);

    let descriptor = u64::from(sim.reg(offsets::pat_descr(0)));
    assert_eq!(dma.borrow().live.len(), 2);
    assert!(dma.borrow().live.contains(&descriptor));

    // A new block must not be handed the descriptor's memory.
    sim.with(|s| s.hang = false);
    let next = tiler.allocate(PixelFormat::Bit16, 64, 32).unwrap();
    let table = tiler.query(next).unwrap().table.as_u64();
    assert_ne!(table, descriptor);
    assert!(dma.borrow().live.contains(&descriptor));

    assert_eq!(tiler.reclaim_quarantined(), Ok(1));
    assert_eq!(dma.borrow().live.len(), 1);
    assert_eq!(tiler.reclaim_quarantined(), Ok(0));
}
