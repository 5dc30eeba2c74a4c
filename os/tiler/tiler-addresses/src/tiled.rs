use crate::{CodecError, GridPoint, Orientation, PixelFormat};
use bitfield_struct::bitfield;
use core::fmt;

/// 32-bit address of a pixel inside the tiler container.
///
/// Derived on demand from an area's base slot; never stored by the
/// allocator. Re-encoding with another [`Orientation`] yields the address of
/// the same memory seen through a rotated or mirrored view.
#[bitfield(u32, debug = false)]
#[derive(PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TiledAddress {
    /// Bits 0..26: interleaved coordinates shifted by the format alignment.
    #[bits(27)]
    pub offset: u32,

    /// Bits 27..28: access mode.
    #[bits(2, default = PixelFormat::Bit8)]
    pub format: PixelFormat,

    /// Bit 29: x coordinate mirrored.
    pub x_invert: bool,

    /// Bit 30: y coordinate mirrored.
    pub y_invert: bool,

    /// Bit 31: x-major (rotated) addressing.
    pub rotate: bool,
}

/// A pixel coordinate inside the container, in the block's pixel units.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct PixelPoint {
    pub x: u32,
    pub y: u32,
}

/// Everything recoverable from a [`TiledAddress`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Decoded {
    pub format: PixelFormat,
    pub orientation: Orientation,
    /// Unmirrored, unrotated pixel coordinate.
    pub pixel: PixelPoint,
    /// Slot containing [`pixel`](Self::pixel).
    pub grid: GridPoint,
}

impl TiledAddress {
    /// Address of the top-left pixel of grid slot `slot`.
    ///
    /// # Errors
    /// [`CodecError::CoordinateOutOfRange`] if the slot lies outside the grid.
    pub fn encode(
        format: PixelFormat,
        slot: GridPoint,
        orientation: Orientation,
    ) -> Result<Self, CodecError> {
        let g = format.geometry();
        let x = u32::from(slot.x) * g.width;
        let y = u32::from(slot.y) * g.height;
        Self::encode_pixel(format, PixelPoint { x, y }, orientation)
    }

    /// Address of pixel `pixel`, in the format's pixel units.
    ///
    /// # Errors
    /// [`CodecError::CoordinateOutOfRange`] if the pixel lies outside the
    /// container.
    pub const fn encode_pixel(
        format: PixelFormat,
        pixel: PixelPoint,
        orientation: Orientation,
    ) -> Result<Self, CodecError> {
        let g = format.geometry();
        let (x_mask, y_mask) = (g.x_mask(), g.y_mask());
        if pixel.x > x_mask || pixel.y > y_mask {
            return Err(CodecError::CoordinateOutOfRange {
                format,
                x: pixel.x,
                y: pixel.y,
            });
        }

        let x = if orientation.x_invert() {
            pixel.x ^ x_mask
        } else {
            pixel.x
        };
        let y = if orientation.y_invert() {
            pixel.y ^ y_mask
        } else {
            pixel.y
        };
        let interleaved = if orientation.rotate_90() {
            (x << g.y_bits) + y
        } else {
            (y << g.x_bits) + x
        };

        Ok(Self::new()
            .with_offset(interleaved << g.alignment)
            .with_format(format)
            .with_x_invert(orientation.x_invert())
            .with_y_invert(orientation.y_invert())
            .with_rotate(orientation.rotate_90()))
    }

    #[inline]
    #[must_use]
    pub const fn orientation(self) -> Orientation {
        Orientation::new()
            .with_x_invert(self.x_invert())
            .with_y_invert(self.y_invert())
            .with_rotate_90(self.rotate())
    }

    /// Undo rotation and mirroring to recover the pixel and slot.
    #[must_use]
    pub const fn decode(self) -> Decoded {
        let format = self.format();
        let g = format.geometry();
        let interleaved = self.offset() >> g.alignment;

        let (x, y) = if self.rotate() {
            (interleaved >> g.y_bits, interleaved & g.y_mask())
        } else {
            (interleaved & g.x_mask(), interleaved >> g.x_bits)
        };
        let x = if self.x_invert() { x ^ g.x_mask() } else { x };
        let y = if self.y_invert() { y ^ g.y_mask() } else { y };

        #[allow(clippy::cast_possible_truncation)]
        let grid = GridPoint::new((x / g.width) as u16, (y / g.height) as u16);
        Decoded {
            format,
            orientation: self.orientation(),
            pixel: PixelPoint { x, y },
            grid,
        }
    }

    /// The same pixel seen through `orientation`.
    ///
    /// The decoded coordinate always fits, so the re-encode cannot fail.
    #[must_use]
    pub const fn reorient(self, orientation: Orientation) -> Self {
        let decoded = self.decode();
        match Self::encode_pixel(decoded.format, decoded.pixel, orientation) {
            Ok(addr) => addr,
            Err(_) => self,
        }
    }

    /// The same pixel in the natural view.
    #[inline]
    #[must_use]
    pub const fn natural(self) -> Self {
        self.reorient(Orientation::NATURAL)
    }
}

impl fmt::Debug for TiledAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TA(0x{:08X})", self.into_bits())
    }
}

impl fmt::Display for TiledAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:08X}", self.into_bits())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_orientations() -> impl Iterator<Item = Orientation> {
        (0u8..8).map(Orientation::from_bits)
    }

    #[test]
    fn origin_encodes_to_mode_only() {
        for format in PixelFormat::ALL {
            let addr = TiledAddress::encode(format, GridPoint::new(0, 0), Orientation::NATURAL)
                .unwrap();
            assert_eq!(addr.into_bits(), u32::from(format.into_bits()) << 27);
            assert_eq!(addr.decode().grid, GridPoint::new(0, 0));
        }
    }

    #[test]
    fn page_mode_offset_is_linear_page_index() {
        let addr =
            TiledAddress::encode(PixelFormat::Page, GridPoint::new(5, 2), Orientation::NATURAL)
                .unwrap();
        assert_eq!(addr.offset(), (2 * 256 + 5) * 4096);
    }

    #[test]
    fn natural_8bit_layout() {
        let addr = TiledAddress::encode_pixel(
            PixelFormat::Bit8,
            PixelPoint { x: 3, y: 2 },
            Orientation::NATURAL,
        )
        .unwrap();
        assert_eq!(addr.offset(), (2 << 14) + 3);
    }

    #[test]
    fn round_trip_every_orientation() {
        for format in PixelFormat::ALL {
            for o in all_orientations() {
                for slot in [GridPoint::new(0, 0), GridPoint::new(17, 9), GridPoint::new(255, 127)] {
                    let addr = TiledAddress::encode(format, slot, o).unwrap();
                    let d = addr.decode();
                    assert_eq!(d.grid, slot, "{format:?} {o:?}");
                    assert_eq!(d.orientation, o);
                    assert_eq!(d.format, format);
                }
            }
        }
    }

    #[test]
    fn reorient_is_idempotent() {
        let base =
            TiledAddress::encode(PixelFormat::Bit16, GridPoint::new(40, 7), Orientation::NATURAL)
                .unwrap();
        for o in all_orientations() {
            let once = base.reorient(o);
            assert_eq!(once.reorient(o), once);
            assert_eq!(once.reorient(once.orientation()), once);
            assert_eq!(once.natural(), base);
        }
    }

    #[test]
    fn inversions_mirror_coordinates() {
        let o = Orientation::new().with_x_invert(true);
        let addr = TiledAddress::encode_pixel(PixelFormat::Bit8, PixelPoint { x: 0, y: 0 }, o)
            .unwrap();
        assert_eq!(addr.offset(), (1 << 14) - 1);
    }

    #[test]
    fn out_of_range() {
        let err = TiledAddress::encode_pixel(
            PixelFormat::Bit32,
            PixelPoint { x: 1 << 13, y: 0 },
            Orientation::NATURAL,
        );
        assert!(matches!(err, Err(CodecError::CoordinateOutOfRange { .. })));
        assert!(
            TiledAddress::encode(PixelFormat::Bit8, GridPoint::new(256, 0), Orientation::NATURAL)
                .is_err()
        );
    }
}
