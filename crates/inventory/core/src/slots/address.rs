use core::fmt;

/// `(container, slot)` address of a single storage slot.
///
/// `container` is [`SlotAddress::PLAYER`] for the flat per-player array,
/// [`SlotAddress::VOID`] for void storage, and otherwise the flat index of the
/// bag-holding slot whose bag contents are addressed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SlotAddress {
    pub container: u8,
    pub slot: u8,
}

impl SlotAddress {
    pub const PLAYER: u8 = 255;
    pub const VOID: u8 = 254;

    pub const fn new(container: u8, slot: u8) -> Self {
        Self { container, slot }
    }

    pub const fn player(slot: u8) -> Self {
        Self::new(Self::PLAYER, slot)
    }

    pub const fn void(slot: u8) -> Self {
        Self::new(Self::VOID, slot)
    }

    /// Slot inside the bag held at flat slot `holder`.
    pub const fn in_bag(holder: u8, slot: u8) -> Self {
        Self::new(holder, slot)
    }

    #[inline]
    pub const fn is_player(&self) -> bool {
        self.container == Self::PLAYER
    }

    #[inline]
    pub const fn is_void(&self) -> bool {
        self.container == Self::VOID
    }

    /// Flat slot of the holding bag, for bag content addresses.
    #[inline]
    pub const fn holder(&self) -> Option<u8> {
        if self.is_player() || self.is_void() {
            None
        } else {
            Some(self.container)
        }
    }
}

impl fmt::Display for SlotAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.container {
            Self::PLAYER => write!(f, "({})", self.slot),
            Self::VOID => write!(f, "(void:{})", self.slot),
            holder => write!(f, "({}:{})", holder, self.slot),
        }
    }
}
