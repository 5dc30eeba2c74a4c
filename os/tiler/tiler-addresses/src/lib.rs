//! # Tiler Address Types and Codec
//!
//! Strongly typed addresses for the tiling unit, and the pure functions that
//! translate between block sizes, grid coordinates and tiled addresses.
//!
//! | Type | Meaning |
//! |------|---------|
//! | [`PhysicalAddress`] / [`PhysicalPage`] | System RAM behind a grid slot (4 KiB frames only). |
//! | [`PixelFormat`] | Access mode of a block; selects the slot geometry. |
//! | [`GridSize`] / [`GridPoint`] | Extents and coordinates in slots. |
//! | [`Orientation`] | Rotate-90 and mirror bits of a view. |
//! | [`TiledAddress`] | 32-bit container address: mode, orientation, offset. |
//!
//! ## Tiled address layout
//!
//! ```text
//!  31   30   29   28  27  26                                   0
//! ┌────┬────┬────┬───────┬─────────────────────────────────────┐
//! │ROT │YINV│XINV│ MODE  │ offset = (y:x or x:y) << alignment  │
//! └────┴────┴────┴───────┴─────────────────────────────────────┘
//! ```
//!
//! The offset interleaves the pixel coordinates; mirroring XORs a coordinate
//! with its mask and rotation swaps which coordinate is major. Both are pure
//! address transforms: the same slots are reached through every view.
//!
//! ```rust
//! # use tiler_addresses::*;
//! let addr = TiledAddress::encode(PixelFormat::Bit8, GridPoint::new(3, 5), Orientation::NATURAL)?;
//! assert_eq!(addr.decode().grid, GridPoint::new(3, 5));
//!
//! let rotated = addr.reorient(Orientation::from_rotation(90, false).unwrap());
//! assert_ne!(rotated, addr);
//! assert_eq!(rotated.decode().grid, GridPoint::new(3, 5));
//! # Ok::<(), CodecError>(())
//! ```

#![cfg_attr(not(any(test, doctest)), no_std)]

mod format;
mod grid;
mod orientation;
mod physical;
mod tiled;

pub use format::{PixelFormat, SlotGeometry};
pub use grid::{GridPoint, GridSize, block_size};
pub use orientation::Orientation;
pub use physical::{PhysicalAddress, PhysicalPage};
pub use tiled::{Decoded, PixelPoint, TiledAddress};

/// Failures of the address codec and the size computation.
#[derive(Debug, Copy, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    #[error("unknown pixel format id {0}")]
    BadFormat(u8),
    #[error("block of {width}x{height} cannot be mapped for {format:?}")]
    BadSize {
        format: PixelFormat,
        width: u32,
        height: u32,
    },
    #[error("pixel ({x}, {y}) lies outside the {format:?} container")]
    CoordinateOutOfRange { format: PixelFormat, x: u32, y: u32 },
}
