use crate::{PageFrame, PageGroup, PageSource};
use alloc::collections::BTreeSet;
use alloc::vec::Vec;
use log::{debug, trace, warn};
use tiler_addresses::PhysicalPage;
use tiler_sync::SpinLock;

#[derive(Debug, Copy, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PoolError {
    #[error("page source exhausted while refilling {requested} pages")]
    OutOfMemory { requested: usize },
    #[error("page {0} was not handed out by this pool")]
    NotOwned(PhysicalPage),
    #[error("{0} pages are still in use")]
    InUse(usize),
}

/// A release the pool refused. The pages come back to the caller, who
/// still owns them.
#[derive(Debug, thiserror::Error)]
#[error("{error}")]
pub struct Unreleased<T> {
    pub error: PoolError,
    pub pages: T,
}

/// Pool counters; `free + used == total` at all times.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct PoolStats {
    pub free: usize,
    pub used: usize,
    /// Pages currently obtained from the source.
    pub total: usize,
}

struct PoolState<S> {
    source: S,
    free: Vec<PageFrame>,
    used: BTreeSet<PhysicalPage>,
    total: usize,
}

impl<S: PageSource> PoolState<S> {
    /// Pull `count` pages from the source onto the free stack.
    ///
    /// All or nothing: a partial batch goes straight back to the source.
    fn refill(&mut self, count: usize) -> Result<(), PoolError> {
        let mut batch = Vec::with_capacity(count);
        while batch.len() < count {
            let Some(frame) = self.source.alloc_page() else {
                warn!(
                    "page source failed after {} of {count} pages, returning partial batch",
                    batch.len()
                );
                for frame in batch {
                    self.source.free_page(frame);
                }
                return Err(PoolError::OutOfMemory { requested: count });
            };
            self.source.flush(frame.page());
            batch.push(frame);
        }

        debug!("page pool refilled with {count} pages");
        self.total += count;
        self.free.extend(batch);
        Ok(())
    }

    fn take(&mut self) -> Option<PageFrame> {
        let frame = self.free.pop()?;
        self.used.insert(frame.page());
        Some(frame)
    }

    fn stats(&self) -> PoolStats {
        PoolStats {
            free: self.free.len(),
            used: self.used.len(),
            total: self.total,
        }
    }
}

/// Batch-refilled pool of physical pages.
///
/// ```rust
/// # use tiler_alloc::*;
/// # use tiler_addresses::PhysicalPage;
/// struct Counter(u64);
/// impl PageSource for Counter {
///     fn alloc_page(&mut self) -> Option<PageFrame> {
///         self.0 += 1;
///         Some(PageFrame::new(PhysicalPage::from_frame_number(self.0), PageHandle(0)))
///     }
///     fn free_page(&mut self, _: PageFrame) {}
///     fn flush(&mut self, _: PhysicalPage) {}
/// }
///
/// let pool = PagePool::new(Counter(0), 8);
/// let group = pool.acquire_group(3)?;
/// assert_eq!(pool.stats(), PoolStats { free: 5, used: 3, total: 8 });
/// pool.release_group(group).map_err(|u| u.error)?;
/// assert_eq!(pool.stats().free, 8);
/// # Ok::<(), PoolError>(())
/// ```
pub struct PagePool<S> {
    state: SpinLock<PoolState<S>>,
    refill_batch: usize,
}

impl<S: PageSource> PagePool<S> {
    /// An empty pool refilling `refill_batch` pages at a time (at least one).
    pub fn new(source: S, refill_batch: usize) -> Self {
        Self {
            state: SpinLock::new(PoolState {
                source,
                free: Vec::new(),
                used: BTreeSet::new(),
                total: 0,
            }),
            refill_batch: refill_batch.max(1),
        }
    }

    #[inline]
    #[must_use]
    pub const fn refill_batch(&self) -> usize {
        self.refill_batch
    }

    /// Take one page; refills one batch if the free stack is empty.
    ///
    /// # Errors
    /// [`PoolError::OutOfMemory`] if the refill fails. Not retried.
    pub fn acquire(&self) -> Result<PageFrame, PoolError> {
        self.state.with_lock(|state| {
            if state.free.is_empty() {
                state.refill(self.refill_batch)?;
            }
            state.take().ok_or(PoolError::OutOfMemory { requested: 1 })
        })
    }

    /// Take `count` pages atomically, refilling whole batches as needed.
    ///
    /// # Errors
    /// [`PoolError::OutOfMemory`] if the source cannot cover the shortfall;
    /// nothing is taken in that case.
    pub fn acquire_group(&self, count: usize) -> Result<PageGroup, PoolError> {
        self.state.with_lock(|state| {
            let missing = count.saturating_sub(state.free.len());
            if missing > 0 {
                let batches = missing.div_ceil(self.refill_batch);
                state.refill(batches * self.refill_batch)?;
            }

            let mut frames = Vec::with_capacity(count);
            for _ in 0..count {
                frames.extend(state.take());
            }
            trace!("acquired group of {count} pages");
            Ok(PageGroup::from_frames(frames))
        })
    }

    /// Put `frame` back on the free stack.
    ///
    /// # Errors
    /// [`PoolError::NotOwned`] if the frame is not currently handed out; the
    /// frame is handed back.
    pub fn release(&self, frame: PageFrame) -> Result<(), Unreleased<PageFrame>> {
        self.state.with_lock(|state| {
            if !state.used.remove(&frame.page()) {
                return Err(Unreleased {
                    error: PoolError::NotOwned(frame.page()),
                    pages: frame,
                });
            }
            state.free.push(frame);
            Ok(())
        })
    }

    /// Return every page of `group` in one step.
    ///
    /// # Errors
    /// [`PoolError::NotOwned`] if any page is not currently handed out; the
    /// pool is left untouched and the whole group is handed back.
    pub fn release_group(&self, group: PageGroup) -> Result<(), Unreleased<PageGroup>> {
        self.state.with_lock(|state| {
            let not_owned = group.pages().find(|p| !state.used.contains(p));
            if let Some(page) = not_owned {
                return Err(Unreleased {
                    error: PoolError::NotOwned(page),
                    pages: group,
                });
            }
            for frame in group.into_frames() {
                state.used.remove(&frame.page());
                state.free.push(frame);
            }
            Ok(())
        })
    }

    #[must_use]
    pub fn stats(&self) -> PoolStats {
        self.state.with_lock(|state| state.stats())
    }

    /// Hand every free page back to the source.
    ///
    /// Returns the number of pages released.
    ///
    /// # Errors
    /// [`PoolError::InUse`] while any page is still handed out.
    pub fn drain(&self) -> Result<usize, PoolError> {
        self.state.with_lock(|state| {
            if !state.used.is_empty() {
                return Err(PoolError::InUse(state.used.len()));
            }
            let count = state.free.len();
            for frame in state.free.drain(..) {
                state.source.free_page(frame);
            }
            state.total -= count;
            debug!("page pool drained {count} pages");
            Ok(count)
        })
    }

    /// Tear the pool down and return the source.
    ///
    /// Pages still on the free stack are dropped without being returned;
    /// call [`drain`](Self::drain) first.
    pub fn into_source(self) -> S {
        self.state.into_inner().source
    }
}
