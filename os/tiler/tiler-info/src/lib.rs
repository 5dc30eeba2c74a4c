//! # Tiler Hardware Constants and Configuration
//!
//! Single source of truth for the numbers every other tiler crate agrees on,
//! and for the runtime knobs of the manager.
//!
//! ## Geometry ([`geometry`])
//!
//! The tiling unit exposes a fixed grid of page-sized *slots*:
//!
//! ```text
//!            x: 0 ............................. 255
//!          ┌─────────────────────────────────────┐
//!  y: 0    │ slot = one 4 KiB physical page      │
//!   .      │ 8-bit : 64×64 px per slot           │
//!   .      │ 16-bit: 64×32 px per slot           │
//!   .      │ 32-bit: 32×32 px per slot           │
//!  y: 127  │                                     │
//!          └─────────────────────────────────────┘
//! ```
//!
//! Seen in pixel space the container is `2^14 × 2^13` for 8-bit data; the
//! address codec derives its bit widths from these constants.
//!
//! ## Configuration ([`config`])
//!
//! [`TilerConfig`](config::TilerConfig) carries pool, PAT and polling
//! settings. It is `Copy`, validated once at init, and built with the
//! `with_*` methods generated by `utils-accessors-derive`.

#![cfg_attr(not(any(test, doctest)), no_std)]

pub mod config;
pub mod geometry;

pub use config::{ConfigError, RefillMode, TilerConfig};
