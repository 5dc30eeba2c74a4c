//! Packing of equal-sized buffers into shared blocks.
//!
//! A row of the container may hold several buffers side by side when the
//! caller tolerates a wider stride. Instead of searching for a layout, the
//! number of buffers per block is looked up in a fixed table keyed by the
//! buffer count (1..=8) and the buffers that fit in one row (1..=4). Larger
//! counts are planned in chunks of eight.

use alloc::vec::Vec;
use tiler_addresses::TiledAddress;

/// Most buffers per row the table distinguishes.
pub const MAX_PER_ROW: usize = 4;

/// Largest count planned in one table lookup.
pub const MAX_CHUNK: usize = 8;

/// `LAYOUTS[per_row - 1][count - 1]` lists the group sizes, largest first.
const LAYOUTS: [[&[u8]; MAX_CHUNK]; MAX_PER_ROW] = [
    [
        &[1],
        &[1, 1],
        &[1, 1, 1],
        &[1, 1, 1, 1],
        &[1, 1, 1, 1, 1],
        &[1, 1, 1, 1, 1, 1],
        &[1, 1, 1, 1, 1, 1, 1],
        &[1, 1, 1, 1, 1, 1, 1, 1],
    ],
    [
        &[1],
        &[2],
        &[2, 1],
        &[2, 2],
        &[2, 2, 1],
        &[2, 2, 2],
        &[2, 2, 2, 1],
        &[2, 2, 2, 2],
    ],
    [
        &[1],
        &[2],
        &[3],
        &[2, 2],
        &[3, 2],
        &[3, 3],
        &[3, 2, 2],
        &[3, 3, 2],
    ],
    [
        &[1],
        &[2],
        &[3],
        &[4],
        &[3, 2],
        &[3, 3],
        &[4, 3],
        &[4, 4],
    ],
];

/// Group sizes for `count` buffers with at most `per_row` side by side.
///
/// `per_row` is clamped to `1..=MAX_PER_ROW`.
///
/// ```rust
/// # use tiler::packing::plan;
/// assert_eq!(plan(5, 3), [3, 2]);
/// assert_eq!(plan(10, 4), [4, 4, 2]);
/// assert!(plan(0, 2).is_empty());
/// ```
#[must_use]
pub fn plan(count: usize, per_row: usize) -> Vec<usize> {
    let row = LAYOUTS[per_row.clamp(1, MAX_PER_ROW) - 1];
    let mut groups = Vec::new();
    let mut left = count;
    while left > 0 {
        let chunk = left.min(MAX_CHUNK);
        groups.extend(row[chunk - 1].iter().map(|&g| usize::from(g)));
        left -= chunk;
    }
    groups
}

/// Result of a packed allocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackedAllocation {
    /// Base address of every block, as returned by the tiler.
    pub groups: Vec<TiledAddress>,
    /// Address of every buffer, in request order.
    pub buffers: Vec<TiledAddress>,
}
