//! Flat slot layout and pool classification.
//!
//! Every character owns one flat array of slots. Pools are contiguous ranges
//! inside it; bag contents and void storage are addressed through a container
//! id instead (see [`SlotAddress`]).

use bitflags::bitflags;

use super::SlotAddress;
use crate::config::InventoryConfig;

/// Half-open range `[start, end)` of flat slot indices.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SlotRange {
    pub start: u8,
    pub end: u8,
}

impl SlotRange {
    pub const fn new(start: u8, len: u8) -> Self {
        Self {
            start,
            end: start + len,
        }
    }

    const fn after(previous: SlotRange, len: u8) -> Self {
        Self::new(previous.end, len)
    }

    #[inline]
    pub const fn contains(&self, slot: u8) -> bool {
        slot >= self.start && slot < self.end
    }

    #[inline]
    pub const fn len(&self) -> u8 {
        self.end - self.start
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Prefix of this range holding `live` slots (clamped to the range).
    pub fn live(&self, live: u8) -> SlotRange {
        SlotRange::new(self.start, live.min(self.len()))
    }

    pub fn iter(self) -> core::ops::Range<u8> {
        self.start..self.end
    }
}

pub const EQUIPMENT: SlotRange = SlotRange::new(0, InventoryConfig::EQUIPMENT_SLOTS);
pub const EQUIPPED_BAGS: SlotRange = SlotRange::after(EQUIPMENT, InventoryConfig::EQUIPPED_BAG_SLOTS);
pub const REAGENT_BAG: SlotRange = SlotRange::after(EQUIPPED_BAGS, InventoryConfig::REAGENT_BAG_SLOTS);
pub const BACKPACK: SlotRange = SlotRange::after(REAGENT_BAG, InventoryConfig::MAX_BACKPACK_SLOTS);
pub const BANK: SlotRange = SlotRange::after(BACKPACK, InventoryConfig::MAX_BANK_SLOTS);
pub const BANK_BAGS: SlotRange = SlotRange::after(BANK, InventoryConfig::MAX_BANK_BAG_SLOTS);
pub const BUYBACK: SlotRange = SlotRange::after(BANK_BAGS, InventoryConfig::BUYBACK_SLOTS);
pub const REAGENT_BANK: SlotRange = SlotRange::after(BUYBACK, InventoryConfig::REAGENT_BANK_SLOTS);
pub const CHILD_EQUIPMENT: SlotRange =
    SlotRange::after(REAGENT_BANK, InventoryConfig::CHILD_EQUIPMENT_SLOTS);

/// Length of the flat per-player slot array.
pub const PLAYER_SLOT_COUNT: u8 = CHILD_EQUIPMENT.end;

/// Named storage areas.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, strum::EnumIter, strum::IntoStaticStr,
    strum::Display,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Pool {
    Equipment,
    EquippedBags,
    ReagentBagSlot,
    Backpack,
    BagContents,
    ReagentBagContents,
    Bank,
    BankBagSlots,
    BankBagContents,
    Buyback,
    ReagentBank,
    ChildEquipment,
    VoidStorage,
}

bitflags! {
    /// Set of pools, used to scope counting and searches.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct PoolScope: u16 {
        const EQUIPMENT            = 1 << 0;
        const EQUIPPED_BAGS        = 1 << 1;
        const REAGENT_BAG_SLOT     = 1 << 2;
        const BACKPACK             = 1 << 3;
        const BAG_CONTENTS         = 1 << 4;
        const REAGENT_BAG_CONTENTS = 1 << 5;
        const BANK                 = 1 << 6;
        const BANK_BAG_SLOTS       = 1 << 7;
        const BANK_BAG_CONTENTS    = 1 << 8;
        const BUYBACK              = 1 << 9;
        const REAGENT_BANK         = 1 << 10;
        const CHILD_EQUIPMENT      = 1 << 11;
        const VOID_STORAGE         = 1 << 12;

        /// Everything the character carries on their person.
        const CARRIED = Self::EQUIPMENT.bits()
            | Self::EQUIPPED_BAGS.bits()
            | Self::REAGENT_BAG_SLOT.bits()
            | Self::BACKPACK.bits()
            | Self::BAG_CONTENTS.bits()
            | Self::REAGENT_BAG_CONTENTS.bits()
            | Self::CHILD_EQUIPMENT.bits();
        /// Bank pools including bank bags and the reagent bank.
        const BANKED = Self::BANK.bits()
            | Self::BANK_BAG_SLOTS.bits()
            | Self::BANK_BAG_CONTENTS.bits()
            | Self::REAGENT_BANK.bits();
        /// Pools counted against ownership limits (buyback and void excluded).
        const OWNED = Self::CARRIED.bits() | Self::BANKED.bits();
    }
}

impl Pool {
    pub const fn scope(self) -> PoolScope {
        match self {
            Pool::Equipment => PoolScope::EQUIPMENT,
            Pool::EquippedBags => PoolScope::EQUIPPED_BAGS,
            Pool::ReagentBagSlot => PoolScope::REAGENT_BAG_SLOT,
            Pool::Backpack => PoolScope::BACKPACK,
            Pool::BagContents => PoolScope::BAG_CONTENTS,
            Pool::ReagentBagContents => PoolScope::REAGENT_BAG_CONTENTS,
            Pool::Bank => PoolScope::BANK,
            Pool::BankBagSlots => PoolScope::BANK_BAG_SLOTS,
            Pool::BankBagContents => PoolScope::BANK_BAG_CONTENTS,
            Pool::Buyback => PoolScope::BUYBACK,
            Pool::ReagentBank => PoolScope::REAGENT_BANK,
            Pool::ChildEquipment => PoolScope::CHILD_EQUIPMENT,
            Pool::VoidStorage => PoolScope::VOID_STORAGE,
        }
    }

    /// Slots that hold a bag whose contents become addressable.
    pub const fn holds_bags(self) -> bool {
        matches!(
            self,
            Pool::EquippedBags | Pool::ReagentBagSlot | Pool::BankBagSlots
        )
    }

    /// Content slots of a bag.
    pub const fn is_bag_contents(self) -> bool {
        matches!(
            self,
            Pool::BagContents | Pool::ReagentBagContents | Pool::BankBagContents
        )
    }

    /// Pools whose occupants count as equipped.
    pub const fn is_equipped(self) -> bool {
        matches!(self, Pool::Equipment) || self.holds_bags()
    }

    pub fn is_owned(self) -> bool {
        PoolScope::OWNED.contains(self.scope())
    }

    /// Content pool of bags held in this pool.
    pub const fn contents_pool(self) -> Option<Pool> {
        match self {
            Pool::EquippedBags => Some(Pool::BagContents),
            Pool::ReagentBagSlot => Some(Pool::ReagentBagContents),
            Pool::BankBagSlots => Some(Pool::BankBagContents),
            _ => None,
        }
    }
}

/// Classifies a flat player slot by static range only.
pub fn classify_player_slot(slot: u8) -> Option<Pool> {
    const TABLE: [(SlotRange, Pool); 9] = [
        (EQUIPMENT, Pool::Equipment),
        (EQUIPPED_BAGS, Pool::EquippedBags),
        (REAGENT_BAG, Pool::ReagentBagSlot),
        (BACKPACK, Pool::Backpack),
        (BANK, Pool::Bank),
        (BANK_BAGS, Pool::BankBagSlots),
        (BUYBACK, Pool::Buyback),
        (REAGENT_BANK, Pool::ReagentBank),
        (CHILD_EQUIPMENT, Pool::ChildEquipment),
    ];
    TABLE
        .iter()
        .find(|(range, _)| range.contains(slot))
        .map(|(_, pool)| *pool)
}

/// Classifies an address by static ranges only (live sizes are not checked).
pub fn classify(address: SlotAddress) -> Option<Pool> {
    match address.container {
        SlotAddress::PLAYER => classify_player_slot(address.slot),
        SlotAddress::VOID => {
            (address.slot < InventoryConfig::VOID_STORAGE_SLOTS).then_some(Pool::VoidStorage)
        }
        holder => classify_player_slot(holder).and_then(Pool::contents_pool),
    }
}

/// Returns true for flat slots able to hold a bag with addressable contents.
#[inline]
pub fn is_bag_holder(slot: u8) -> bool {
    EQUIPPED_BAGS.contains(slot) || REAGENT_BAG.contains(slot) || BANK_BAGS.contains(slot)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ranges_are_contiguous() {
        assert_eq!(EQUIPMENT.start, 0);
        assert_eq!(EQUIPPED_BAGS.start, EQUIPMENT.end);
        assert_eq!(BACKPACK.start, REAGENT_BAG.end);
        assert_eq!(CHILD_EQUIPMENT.end, PLAYER_SLOT_COUNT);
        assert!(PLAYER_SLOT_COUNT < SlotAddress::VOID);
    }

    #[test]
    fn classifies_flat_and_content_addresses() {
        assert_eq!(classify(SlotAddress::player(0)), Some(Pool::Equipment));
        assert_eq!(classify(SlotAddress::player(BACKPACK.start)), Some(Pool::Backpack));
        assert_eq!(classify(SlotAddress::player(BUYBACK.start)), Some(Pool::Buyback));
        assert_eq!(
            classify(SlotAddress::new(EQUIPPED_BAGS.start, 3)),
            Some(Pool::BagContents)
        );
        assert_eq!(
            classify(SlotAddress::new(REAGENT_BAG.start, 0)),
            Some(Pool::ReagentBagContents)
        );
        assert_eq!(
            classify(SlotAddress::new(BANK_BAGS.start + 2, 0)),
            Some(Pool::BankBagContents)
        );
        assert_eq!(classify(SlotAddress::void(10)), Some(Pool::VoidStorage));
        assert_eq!(classify(SlotAddress::void(InventoryConfig::VOID_STORAGE_SLOTS)), None);
        // a backpack slot is not a bag holder
        assert_eq!(classify(SlotAddress::new(BACKPACK.start, 0)), None);
        assert_eq!(classify(SlotAddress::player(PLAYER_SLOT_COUNT)), None);
    }

    #[test]
    fn owned_scope_excludes_buyback_and_void() {
        assert!(Pool::Bank.is_owned());
        assert!(Pool::ChildEquipment.is_owned());
        assert!(!Pool::Buyback.is_owned());
        assert!(!Pool::VoidStorage.is_owned());
    }
}
