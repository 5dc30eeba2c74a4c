use bitfield_struct::bitfield;
use core::fmt;
use tiler_info::geometry::PAT_ENGINES;

/// Interrupt events of one refill engine; eight bits per engine in every
/// PAT interrupt register.
#[bitfield(u8)]
#[derive(PartialEq, Eq)]
pub struct PatIrqEvents {
    /// Bit 0: descriptor done.
    pub dst: bool,
    /// Bit 1: last descriptor done.
    pub lst: bool,
    /// Bit 2: invalid descriptor.
    pub err_inv_dsc: bool,
    /// Bit 3: invalid table data.
    pub err_inv_data: bool,
    /// Bit 4: area register updated while running.
    pub err_upd_area: bool,
    /// Bit 5: control register updated while running.
    pub err_upd_ctrl: bool,
    /// Bit 6: data register updated while running.
    pub err_upd_data: bool,
    /// Bit 7: lookup table miss.
    pub err_lut_miss: bool,
}

impl PatIrqEvents {
    /// Both completion bits, no error bits.
    pub const REFILL_DONE: Self = Self::new().with_dst(true).with_lst(true);

    /// All events except the advisory LUT miss.
    pub const ENABLED: Self = Self::from_bits(0x7E);

    pub const ALL: Self = Self::from_bits(0xFF);

    const ERROR_MASK: u8 = 0xFC;

    #[inline]
    #[must_use]
    pub const fn has_error(self) -> bool {
        self.into_bits() & Self::ERROR_MASK != 0
    }

    /// Refill finished cleanly: the low nibble reads exactly `dst | lst`.
    #[inline]
    #[must_use]
    pub const fn is_refill_done(self) -> bool {
        self.into_bits() & 0xF == Self::REFILL_DONE.into_bits()
    }
}

macro_rules! irq_register {
    ($(#[$meta:meta])* $name:ident, $offset:expr; $($access:ident),+) => {
        $(#[$meta])*
        #[repr(transparent)]
        #[derive(Copy, Clone, Default, PartialEq, Eq)]
        pub struct $name(u32);

        impl $name {
            #[inline]
            #[must_use]
            pub const fn new() -> Self {
                Self(0)
            }

            #[inline]
            #[must_use]
            pub const fn from_bits(raw: u32) -> Self {
                Self(raw)
            }

            #[inline]
            #[must_use]
            pub const fn into_bits(self) -> u32 {
                self.0
            }

            /// Events of `engine`.
            #[inline]
            #[must_use]
            #[allow(clippy::cast_possible_truncation)]
            pub const fn engine(self, engine: u8) -> PatIrqEvents {
                PatIrqEvents::from_bits((self.0 >> (8 * engine as u32)) as u8)
            }

            /// Replace the events of `engine`.
            #[inline]
            #[must_use]
            pub const fn with_engine(self, engine: u8, events: PatIrqEvents) -> Self {
                let shift = 8 * engine as u32;
                Self((self.0 & !(0xFF << shift)) | ((events.into_bits() as u32) << shift))
            }

            /// The same events set for every engine.
            #[must_use]
            pub const fn uniform(events: PatIrqEvents) -> Self {
                let mut reg = Self::new();
                let mut engine = 0;
                while engine < PAT_ENGINES {
                    reg = reg.with_engine(engine, events);
                    engine += 1;
                }
                reg
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!(stringify!($name), "(0x{:08X})"), self.0)
            }
        }

        register!($name, offset = $offset; $($access),+);
    };
}

irq_register!(
    /// `PAT_IRQSTATUS_RAW`: unmasked event status.
    PatIrqStatusRaw, crate::offsets::PAT_IRQSTATUS_RAW; LoadRegister, StoreRegister
);
irq_register!(
    /// `PAT_IRQSTATUS`: masked event status; write 1 to clear.
    PatIrqStatus, crate::offsets::PAT_IRQSTATUS; LoadRegister, StoreRegister
);
irq_register!(
    /// `PAT_IRQENABLE_SET`: write 1 to enable an event.
    PatIrqEnableSet, crate::offsets::PAT_IRQENABLE_SET; LoadRegister, StoreRegister
);
irq_register!(
    /// `PAT_IRQENABLE_CLR`: write 1 to disable an event.
    PatIrqEnableClr, crate::offsets::PAT_IRQENABLE_CLR; LoadRegister, StoreRegister
);
