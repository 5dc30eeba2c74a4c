use crate::{PatArea, PatCtrl};

/// One link of an automatic-mode refill chain, as the engine reads it from
/// memory.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct PatDescriptor {
    /// Bus address of the next descriptor, 0 ends the chain.
    pub next_pa: u32,
    pub area: PatArea,
    pub ctrl: PatCtrl,
    /// Bus address of the page table for `area`.
    pub data_pa: u32,
}

impl PatDescriptor {
    /// Size of one descriptor in 32-bit words.
    pub const WORDS: usize = 4;

    #[must_use]
    pub const fn new(area: PatArea, ctrl: PatCtrl, data_pa: u32) -> Self {
        Self {
            next_pa: 0,
            area,
            ctrl,
            data_pa,
        }
    }

    #[must_use]
    pub const fn with_next(mut self, next_pa: u32) -> Self {
        self.next_pa = next_pa;
        self
    }

    /// The words in memory order.
    #[must_use]
    pub const fn to_words(self) -> [u32; Self::WORDS] {
        [
            self.next_pa,
            self.area.into_bits(),
            self.ctrl.into_bits(),
            self.data_pa,
        ]
    }
}

const _: () = assert!(core::mem::size_of::<PatDescriptor>() == PatDescriptor::WORDS * 4);
