mod common;

use common::{SimDmm, tiler};
use tiler::{PixelFormat, PixelPoint, TilerConfig, TilerError};

#[test]
fn buffers_share_blocks_within_the_width_limit() {
    let sim = SimDmm::new();
    let tiler = tiler(&sim, TilerConfig::new());

    // 64-pixel 8-bit buffers take two slots (128 pixels) each; four fit in 512.
    let packed = tiler
        .allocate_packed(PixelFormat::Bit8, 5, 64, 64, 512)
        .unwrap();

    assert_eq!(packed.groups.len(), 2);
    assert_eq!(packed.buffers.len(), 5);
    assert_eq!(tiler.stats().areas, 2);

    let widths: Vec<u32> = packed
        .groups
        .iter()
        .map(|&g| tiler.query(g).unwrap().width)
        .collect();
    assert_eq!(widths, [3 * 128, 2 * 128]);
    assert!(widths.iter().all(|&w| w <= 512));

    let origin = packed.groups[0].decode().pixel;
    for (i, buffer) in packed.buffers[..3].iter().enumerate() {
        let pixel = buffer.decode().pixel;
        assert_eq!(
            pixel,
            PixelPoint {
                x: origin.x + 128 * u32::try_from(i).unwrap(),
                y: origin.y
            }
        );
    }
    assert_eq!(packed.buffers[3], packed.groups[1]);

    assert!(tiler.free_packed(&packed).is_empty());
    assert_eq!(tiler.stats().areas, 0);
    assert_eq!(tiler.stats().pool.used, 0);
}

#[test]
fn large_counts_are_split_into_chunks() {
    let sim = SimDmm::new();
    let tiler = tiler(&sim, TilerConfig::new());

    let packed = tiler
        .allocate_packed(PixelFormat::Bit32, 10, 32, 32, 4 * 32)
        .unwrap();

    let per_group: Vec<u32> = packed
        .groups
        .iter()
        .map(|&g| tiler.query(g).unwrap().width / 32)
        .collect();
    assert_eq!(per_group, [4, 4, 2]);
    assert_eq!(packed.buffers.len(), 10);
}

#[test]
fn too_narrow_or_linear_packing_is_rejected() {
    let sim = SimDmm::new();
    let tiler = tiler(&sim, TilerConfig::new());

    let err = tiler
        .allocate_packed(PixelFormat::Bit8, 2, 64, 64, 100)
        .unwrap_err();
    assert_eq!(
        err,
        TilerError::BadPacking {
            count: 2,
            width: 64,
            max_width: 100
        }
    );
    assert!(err.is_bad_size());

    assert!(
        tiler
            .allocate_packed(PixelFormat::Page, 2, 4096, 1, 1 << 20)
            .is_err()
    );
    assert!(
        tiler
            .allocate_packed(PixelFormat::Bit8, 0, 64, 64, 512)
            .is_err()
    );
    assert_eq!(tiler.stats().areas, 0);
}

#[test]
fn failed_group_unwinds_the_earlier_ones() {
    let sim = SimDmm::new();
    let tiler = tiler(&sim, TilerConfig::new());

    // Leave room for one full-height group of two, not for a second.
    let filler = tiler.allocate(PixelFormat::Bit32, 252 * 32, 128 * 32).unwrap();
    let err = tiler
        .allocate_packed(PixelFormat::Bit32, 4, 64, 128 * 32, 128)
        .unwrap_err();

    assert!(err.is_out_of_space(), "{err}");
    let stats = tiler.stats();
    assert_eq!(stats.areas, 1);
    assert_eq!(stats.pool.used, 252 * 128);
    tiler.free(filler).unwrap();
}
