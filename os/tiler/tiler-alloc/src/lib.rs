//! # Tiler Backing Memory
//!
//! Physical pages and DMA buffers behind tiler areas.
//!
//! ```text
//! ┌──────────────┐  alloc_page/free_page  ┌──────────────────────┐
//! │  PageSource  │◄───────────────────────│       PagePool       │
//! │  (OS pages)  │  batches of N, flushed │ free stack │ used set│
//! └──────────────┘                        └──────────┬───────────┘
//!                                                    │ acquire_group(n)
//!                                          ┌─────────▼──────────┐
//!                                          │  PageGroup (area)  │
//!                                          └────────────────────┘
//! ```
//!
//! The pool pulls pages from the source in fixed batches and only grows
//! while running; [`PagePool::drain`] hands unused pages back on teardown.
//! Every mutation happens under one pool-wide [`SpinLock`](tiler_sync::SpinLock).
//!
//! [`dma`] holds the device-visible buffers the PAT engine reads page tables
//! and descriptors from.

#![cfg_attr(not(any(test, doctest)), no_std)]
#![allow(unsafe_code)]

extern crate alloc;

pub mod dma;
mod frame;
mod pool;

pub use frame::{PageFrame, PageGroup, PageHandle, PageSource};
pub use pool::{PagePool, PoolError, PoolStats, Unreleased};
