//! # Synchronization primitives for the tiler core
//!
//! - [`SpinLock`]: the coarse lock guarding the page pool, the container and
//!   the PAT engine. Critical sections are short and CPU-only except for page
//!   acquisition, which may wait on the page source.
//! - [`poll::spin_until`]: bounded busy-wait used for every hardware poll.

#![cfg_attr(not(any(test, doctest)), no_std)]
#![allow(unsafe_code)]

pub mod poll;
mod spin_lock;

pub use poll::{PollBudget, PollTimeout, spin_until};
pub use spin_lock::{SpinLock, SpinLockGuard};
