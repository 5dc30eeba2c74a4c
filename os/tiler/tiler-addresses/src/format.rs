use crate::CodecError;
use tiler_info::geometry::{
    CONTAINER_HEIGHT_BITS, CONTAINER_WIDTH_BITS, SLOT_HEIGHT_BITS, SLOT_WIDTH_BITS,
};

/// Access mode of a tiled block.
///
/// The discriminant is the 2-bit mode field of a [`TiledAddress`](crate::TiledAddress).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum PixelFormat {
    /// One byte per pixel; slots of 64×64 pixels.
    #[default]
    Bit8 = 0,
    /// Two bytes per pixel; slots of 64×32 pixels.
    Bit16 = 1,
    /// Four bytes per pixel; slots of 32×32 pixels.
    Bit32 = 2,
    /// Linear page mode; a slot is one page.
    Page = 3,
}

/// Shape of one grid slot for a given format.
///
/// `x_bits + y_bits + alignment` is always 27, the width of the offset field.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SlotGeometry {
    /// Slot width in pixels.
    pub width: u32,
    /// Slot height in pixels.
    pub height: u32,
    /// Bytes per pixel.
    pub bytes_per_pixel: u32,
    /// Bits of the pixel x coordinate.
    pub x_bits: u32,
    /// Bits of the pixel y coordinate.
    pub y_bits: u32,
    /// Low offset bits below the interleaved coordinates.
    pub alignment: u32,
}

impl SlotGeometry {
    const fn from_shifts(x_shift: u32, y_shift: u32, bytes_per_pixel: u32) -> Self {
        Self {
            width: 1 << (SLOT_WIDTH_BITS - x_shift),
            height: 1 << (SLOT_HEIGHT_BITS - y_shift),
            bytes_per_pixel,
            x_bits: CONTAINER_WIDTH_BITS - x_shift,
            y_bits: CONTAINER_HEIGHT_BITS - y_shift,
            alignment: x_shift + y_shift,
        }
    }

    #[inline]
    #[must_use]
    pub const fn x_mask(&self) -> u32 {
        (1 << self.x_bits) - 1
    }

    #[inline]
    #[must_use]
    pub const fn y_mask(&self) -> u32 {
        (1 << self.y_bits) - 1
    }

    /// Bytes in one pixel row of a slot.
    #[inline]
    #[must_use]
    pub const fn row_bytes(&self) -> u32 {
        self.width * self.bytes_per_pixel
    }
}

impl PixelFormat {
    pub const ALL: [Self; 4] = [Self::Bit8, Self::Bit16, Self::Bit32, Self::Page];

    #[inline]
    #[must_use]
    pub const fn from_bits(bits: u8) -> Self {
        match bits & 0b11 {
            0 => Self::Bit8,
            1 => Self::Bit16,
            2 => Self::Bit32,
            _ => Self::Page,
        }
    }

    #[inline]
    #[must_use]
    pub const fn into_bits(self) -> u8 {
        self as u8
    }

    #[must_use]
    pub const fn geometry(self) -> SlotGeometry {
        match self {
            Self::Bit8 => SlotGeometry::from_shifts(0, 0, 1),
            Self::Bit16 => SlotGeometry::from_shifts(0, 1, 2),
            Self::Bit32 => SlotGeometry::from_shifts(1, 1, 4),
            Self::Page => SlotGeometry::from_shifts(SLOT_WIDTH_BITS, SLOT_HEIGHT_BITS, 1),
        }
    }

    /// `true` for the three 2D pixel formats.
    #[inline]
    #[must_use]
    pub const fn is_2d(self) -> bool {
        !matches!(self, Self::Page)
    }
}

impl TryFrom<u8> for PixelFormat {
    type Error = CodecError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if value > 3 {
            return Err(CodecError::BadFormat(value));
        }
        Ok(Self::from_bits(value))
    }
}
