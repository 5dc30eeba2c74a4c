//! # Tiler
//!
//! Allocator for the DMM tiler: hands out rectangular blocks of the tiled
//! address space, backs them with physical pages and programs the page
//! attribute table (PAT) so the hardware translates tiled accesses into
//! those pages.
//!
//! ```text
//!   allocate(format, w, h)
//!        │
//!        ├─► block_size ──────────── slots needed
//!        ├─► PagePool ────────────── one page per slot
//!        ├─► DmaAlloc ────────────── PAT table, bus addresses in slot order
//!        ├─► Container2D ─────────── best-fit rectangle in the slot grid
//!        ├─► PatProgrammer ───────── refill the rectangle from the table
//!        └─► TiledAddress ────────── base of the block, natural orientation
//! ```
//!
//! A refill that fails in hardware leaves the block quarantined: its slots
//! are given back to the grid but its pages and table stay out of the pool
//! until [`Tiler::reclaim_quarantined`] is called after the engine was reset.
//!
//! The tiler is generic over where its memory comes from ([`PageSource`],
//! [`DmaAlloc`]) and how the registers are reached ([`RegisterBlock`]), so
//! the same code drives real MMIO or a simulated register file.

#![cfg_attr(not(any(test, doctest)), no_std)]

extern crate alloc;

mod error;
mod info;
pub mod packing;
mod instance;

pub use error::TilerError;
pub use info::{BlockInfo, TilerStats};
pub use packing::PackedAllocation;
pub use instance::{Tiler, TilerParts};

pub use tiler_addresses::{
    CodecError, GridPoint, Orientation, PhysicalAddress, PhysicalPage, PixelFormat, PixelPoint,
    TiledAddress,
};
pub use tiler_alloc::dma::{DmaAlloc, DmaBuffer, DmaError};
pub use tiler_alloc::{
    PageFrame, PageGroup, PageHandle, PageSource, PoolError, PoolStats, Unreleased,
};
pub use tiler_container::{ContainerError, Rect};
pub use tiler_info::{ConfigError, RefillMode, TilerConfig};
pub use tiler_pat::PatError;
#[cfg(feature = "mmio")]
pub use tiler_registers::MmioRegisterBlock;
pub use tiler_registers::RegisterBlock;
