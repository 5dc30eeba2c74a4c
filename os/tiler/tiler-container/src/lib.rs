//! # Tiler Container
//!
//! Best-fit placement of rectangular areas inside the fixed slot grid.
//!
//! Areas never overlap. A new block is placed next to an existing area: for
//! every side of every area the largest free rectangle growing out of that
//! side is measured, and the block goes into the smallest such rectangle
//! that still fits it.
//!
//! ```text
//!   0                                  W-1
//!   ┌──────┬───────────────────────────┐
//!   │ A    │  right of A               │
//!   ├──────┘  (246 × 128)              │
//!   │ below A                          │
//!   │ (256 × 118)   ◄── smaller: wins  │
//!   └──────────────────────────────────┘ H-1
//! ```
//!
//! Each area carries a backing value `B`; for the tiler this is an
//! [`AreaBacking`] holding its pages and PAT table.

#![cfg_attr(not(any(test, doctest)), no_std)]

extern crate alloc;

mod area;
mod backing;
mod container;
mod rect;

pub use area::{Area, FitSide};
pub use backing::AreaBacking;
pub use container::{Container2D, ContainerError, Rejected};
pub use rect::Rect;
