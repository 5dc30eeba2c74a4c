use bitfield_struct::bitfield;

/// View transform of a tiled address.
///
/// The three bits map one-to-one onto bits 29..31 of a
/// [`TiledAddress`](crate::TiledAddress). Rotation swaps the major
/// coordinate; the inversions mirror a coordinate by XOR with its mask.
///
/// ```rust
/// # use tiler_addresses::Orientation;
/// let o = Orientation::from_rotation(90, false).unwrap();
/// assert!(o.rotate_90() && o.y_invert() && !o.x_invert());
/// assert_eq!(o.rotation(), (90, false));
/// assert!(Orientation::from_rotation(45, false).is_none());
/// ```
#[bitfield(u8)]
#[derive(PartialEq, Eq, Hash)]
pub struct Orientation {
    /// Mirror the x coordinate.
    pub x_invert: bool,
    /// Mirror the y coordinate.
    pub y_invert: bool,
    /// Swap the major coordinate (x-major instead of y-major).
    pub rotate_90: bool,
    #[bits(5)]
    _reserved_3_7: u8,
}

impl Orientation {
    /// The unrotated, unmirrored view.
    pub const NATURAL: Self = Self::new();

    /// Clockwise rotation by `degrees`, optionally mirrored horizontally
    /// before rotating. Only multiples of 90 are accepted.
    #[must_use]
    pub const fn from_rotation(degrees: u16, mirror: bool) -> Option<Self> {
        let base = match degrees % 360 {
            0 => Self::new(),
            90 => Self::new().with_rotate_90(true).with_y_invert(true),
            180 => Self::new().with_x_invert(true).with_y_invert(true),
            270 => Self::new().with_rotate_90(true).with_x_invert(true),
            _ => return None,
        };
        Some(if mirror {
            base.with_x_invert(!base.x_invert())
        } else {
            base
        })
    }

    /// Inverse of [`from_rotation`](Self::from_rotation): clockwise degrees
    /// and whether the view is mirrored.
    #[must_use]
    pub const fn rotation(self) -> (u16, bool) {
        match (self.rotate_90(), self.x_invert(), self.y_invert()) {
            (false, false, false) => (0, false),
            (false, true, true) => (180, false),
            (false, true, false) => (0, true),
            (false, false, true) => (180, true),
            (true, false, true) => (90, false),
            (true, true, false) => (270, false),
            (true, true, true) => (90, true),
            (true, false, false) => (270, true),
        }
    }

    #[inline]
    #[must_use]
    pub const fn is_natural(self) -> bool {
        !self.rotate_90() && !self.x_invert() && !self.y_invert()
    }

    /// The three orientation bits as they sit in bits 29..31 of an address.
    #[inline]
    #[must_use]
    #[allow(clippy::cast_lossless)]
    pub const fn address_bits(self) -> u32 {
        (self.into_bits() as u32 & 0b111) << 29
    }
}
