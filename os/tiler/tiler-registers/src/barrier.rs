//! Memory barriers for register and DMA ordering.
//!
//! Every mutating PAT register sequence ends with one of these before a
//! dependent read; descriptor and table writes in DMA memory are fenced
//! before the register write that hands them to the engine.

use core::sync::atomic::{Ordering, fence};

/// Loads before the barrier complete before loads after it.
#[inline]
pub fn read_barrier() {
    fence(Ordering::Acquire);
}

/// Stores before the barrier complete before stores after it.
#[inline]
pub fn write_barrier() {
    fence(Ordering::Release);
}

/// All memory operations before the barrier complete before any after it.
#[inline]
pub fn full_barrier() {
    fence(Ordering::SeqCst);
}
