//! # Typed DMM/PAT Registers
//!
//! Register models for the page-address-translation (PAT) part of the tiler,
//! an offset table, and the [`RegisterBlock`] seam through which every access
//! goes. The real block is memory mapped ([`MmioRegisterBlock`]); tests plug
//! in a simulated one.
//!
//! ```rust
//! # use tiler_registers::*;
//! # use core::cell::Cell;
//! struct Scratch([Cell<u32>; 0x200]);
//! impl RegisterBlock for Scratch {
//!     fn read32(&self, offset: usize) -> u32 { self.0[(offset - 0x400) / 4].get() }
//!     fn write32(&self, offset: usize, value: u32) { self.0[(offset - 0x400) / 4].set(value) }
//! }
//!
//! let regs = Scratch(core::array::from_fn(|_| Cell::new(0)));
//! PatArea::new().with_x1(9).with_y1(9).store(&regs, 2);
//! assert_eq!(regs.read32(offsets::pat_area(2)), 0x0909_0000);
//! assert_eq!(PatArea::load(&regs, 2).x1(), 9);
//! ```

#![cfg_attr(not(any(test, doctest)), no_std)]
#![allow(unsafe_code)]

/// Implements [`Register`] (and the requested access traits) for a type with
/// `from_bits`/`into_bits` over `u32`.
macro_rules! register {
    ($ty:ty, offset = $offset:expr $(, stride = $stride:expr, count = $count:expr)?; $($access:ident),+) => {
        impl $crate::Register for $ty {
            const OFFSET: usize = $offset;
            $(
                const STRIDE: usize = $stride;
                const COUNT: u8 = $count;
            )?

            #[inline]
            fn from_raw(raw: u32) -> Self {
                Self::from_bits(raw)
            }

            #[inline]
            fn into_raw(self) -> u32 {
                self.into_bits()
            }
        }

        $(impl $crate::$access for $ty {})+
    };
}

pub mod barrier;
mod descriptor;
mod irq;
#[cfg(feature = "mmio")]
mod mmio;
pub mod offsets;
mod pat_area;
mod pat_config;
mod pat_ctrl;
mod pat_status;
mod pat_view;

pub use descriptor::PatDescriptor;
pub use irq::{PatIrqEnableClr, PatIrqEnableSet, PatIrqEvents, PatIrqStatus, PatIrqStatusRaw};
#[cfg(feature = "mmio")]
pub use mmio::MmioRegisterBlock;
pub use pat_area::PatArea;
pub use pat_config::PatConfig;
pub use pat_ctrl::{PatCtrl, RefillDirection};
pub use pat_status::PatStatus;
pub use pat_view::{PatView, PatViewMap, PatViewMapBase};

/// 32-bit register access at byte offsets from the block base.
///
/// Implementations perform exactly one device access per call; ordering
/// between calls is the caller's job (see [`barrier`]).
pub trait RegisterBlock {
    fn read32(&self, offset: usize) -> u32;
    fn write32(&self, offset: usize, value: u32);
}

impl<T: RegisterBlock + ?Sized> RegisterBlock for &T {
    #[inline]
    fn read32(&self, offset: usize) -> u32 {
        (**self).read32(offset)
    }

    #[inline]
    fn write32(&self, offset: usize, value: u32) {
        (**self).write32(offset, value);
    }
}

/// A typed register with one or more instances in the block.
pub trait Register: Copy {
    /// Byte offset of instance 0.
    const OFFSET: usize;
    /// Byte distance between consecutive instances.
    const STRIDE: usize = 0;
    /// Number of instances.
    const COUNT: u8 = 1;

    fn from_raw(raw: u32) -> Self;
    fn into_raw(self) -> u32;

    /// Byte offset of instance `index`.
    #[inline]
    #[must_use]
    fn offset(index: u8) -> usize {
        debug_assert!(index < Self::COUNT, "register index out of range");
        Self::OFFSET + usize::from(index) * Self::STRIDE
    }
}

pub trait LoadRegister: Register {
    #[inline]
    fn load<B: RegisterBlock + ?Sized>(block: &B, index: u8) -> Self {
        Self::from_raw(block.read32(Self::offset(index)))
    }
}

pub trait StoreRegister: Register {
    #[inline]
    fn store<B: RegisterBlock + ?Sized>(self, block: &B, index: u8) {
        block.write32(Self::offset(index), self.into_raw());
    }
}
