use std::cell::Cell;
use std::rc::Rc;
use tiler_addresses::PhysicalPage;
use tiler_alloc::{PageFrame, PageHandle, PagePool, PageSource, PoolError, PoolStats};

/// Source whose failure point can be moved while the pool owns it.
struct Flaky {
    next: u64,
    fail_after: Rc<Cell<u64>>,
    allocated: Rc<Cell<u64>>,
    returned: Rc<Cell<u64>>,
}

impl PageSource for Flaky {
    fn alloc_page(&mut self) -> Option<PageFrame> {
        if self.allocated.get() - self.returned.get() >= self.fail_after.get() {
            return None;
        }
        self.next += 1;
        self.allocated.set(self.allocated.get() + 1);
        Some(PageFrame::new(
            PhysicalPage::from_frame_number(self.next),
            PageHandle(0),
        ))
    }

    fn free_page(&mut self, _frame: PageFrame) {
        self.returned.set(self.returned.get() + 1);
    }

    fn flush(&mut self, _page: PhysicalPage) {}
}

struct Probe {
    fail_after: Rc<Cell<u64>>,
    allocated: Rc<Cell<u64>>,
    returned: Rc<Cell<u64>>,
}

fn flaky(limit: u64) -> (Flaky, Probe) {
    let fail_after = Rc::new(Cell::new(limit));
    let allocated = Rc::new(Cell::new(0));
    let returned = Rc::new(Cell::new(0));
    (
        Flaky {
            next: 0,
            fail_after: fail_after.clone(),
            allocated: allocated.clone(),
            returned: returned.clone(),
        },
        Probe {
            fail_after,
            allocated,
            returned,
        },
    )
}

#[test]
fn empty_pool_refill_failure_leaves_no_trace() {
    // The source can deliver 3 pages but the batch asks for 8.
    let (source, probe) = flaky(3);
    let pool = PagePool::new(source, 8);

    assert_eq!(pool.acquire(), Err(PoolError::OutOfMemory { requested: 8 }));
    assert_eq!(pool.stats(), PoolStats::default());
    assert_eq!(probe.allocated.get(), 3);
    assert_eq!(probe.returned.get(), 3);
}

#[test]
fn acquire_triggers_exactly_one_batch() {
    let (source, probe) = flaky(100);
    let pool = PagePool::new(source, 8);

    let frame = pool.acquire().unwrap();
    assert_eq!(probe.allocated.get(), 8);
    assert_eq!(pool.stats(), PoolStats { free: 7, used: 1, total: 8 });

    // Exhaust the source: the next refill fails and the pool stays as it was.
    probe.fail_after.set(8);
    let group = pool.acquire_group(7).unwrap();
    assert_eq!(pool.acquire(), Err(PoolError::OutOfMemory { requested: 8 }));
    assert_eq!(pool.stats(), PoolStats { free: 0, used: 8, total: 8 });

    pool.release(frame).unwrap();
    pool.release_group(group).unwrap();
    assert_eq!(pool.drain(), Ok(8));
    assert_eq!(probe.returned.get(), 8);
}

#[test]
fn accounting_holds_across_mixed_operations() {
    let (source, _probe) = flaky(1_000);
    let pool = PagePool::new(source, 5);
    let mut held = Vec::new();
    let mut groups = Vec::new();

    for round in 0..40usize {
        if round % 3 == 0 {
            groups.push(pool.acquire_group(round % 7 + 1).unwrap());
        } else {
            held.push(pool.acquire().unwrap());
        }
        if round % 4 == 0 {
            if let Some(frame) = held.pop() {
                pool.release(frame).unwrap();
            }
        }
        if round % 5 == 0 {
            if let Some(group) = groups.pop() {
                pool.release_group(group).unwrap();
            }
        }
        let stats = pool.stats();
        assert_eq!(stats.free + stats.used, stats.total);
        let expected_used = held.len() + groups.iter().map(tiler_alloc::PageGroup::len).sum::<usize>();
        assert_eq!(stats.used, expected_used);
    }
}

#[test]
fn rejected_group_comes_back_whole() {
    let (source, probe) = flaky(100);
    let pool = PagePool::new(source, 4);
    let group = pool.acquire_group(3).unwrap();
    let first = group.pages().next().unwrap();

    // A second pool never handed these pages out.
    let (other_source, _) = flaky(100);
    let other = PagePool::new(other_source, 4);
    let rejected = other.release_group(group).unwrap_err();

    assert_eq!(rejected.error, PoolError::NotOwned(first));
    assert_eq!(rejected.pages.len(), 3);
    assert_eq!(other.stats(), PoolStats::default());

    // The caller still owns the group and can return it where it belongs.
    pool.release_group(rejected.pages).unwrap();
    assert_eq!(pool.drain(), Ok(4));
    assert_eq!(probe.returned.get(), 4);
}
