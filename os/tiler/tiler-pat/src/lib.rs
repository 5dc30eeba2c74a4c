//! # PAT Refill Programming
//!
//! Binds an area's page list into the tiler's page-address-translation table
//! through one of the four refill engines.
//!
//! Manual refill:
//!
//! ```text
//!  STATUS[n] ──► clear IRQ[n] ──► AREA[n] (verify) ──► DATA[n] (verify)
//!      │                                                   │
//!  fault / busy                                            ▼
//!   rejected           poll IRQSTATUS_RAW ◄── barrier ◄── CTRL[n].start
//!                            │
//!                 dst|lst ───┴──► clear IRQ[n] ──► re-read STATUS[n]
//! ```
//!
//! Automatic refill writes a single `DESCR[n]` pointing at a descriptor
//! chain in DMA memory; completion is then polled separately.
//!
//! Every poll is bounded by the configured budget and ends in
//! [`PatError::Timeout`] when exhausted.

#![cfg_attr(not(any(test, doctest)), no_std)]

mod error;
mod programmer;

pub use error::PatError;
pub use programmer::{Completion, EngineState, PatProgrammer};
