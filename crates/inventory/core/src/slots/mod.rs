//! Slot addressing: classification and live-range validation.
//!
//! Static classification lives in [`layout`]; this module adds the checks that
//! depend on one character's live sizes (backpack and bank upgrades, unlocked
//! bank bag slots, the reagent bank unlock) and on which bags are held.
pub mod address;
pub mod equipment;
pub mod layout;
mod rules;

pub use address::SlotAddress;
pub use equipment::EquipmentSlot;
pub use layout::{PLAYER_SLOT_COUNT, Pool, PoolScope, SlotRange, classify};
pub use rules::accepts;

use crate::error::InventoryError;
use crate::state::{InventoryLimits, PlayerInventory};

/// Live part of a flat pool range for the given limits.
pub fn live_range(pool: Pool, limits: &InventoryLimits) -> Option<SlotRange> {
    let range = match pool {
        Pool::Equipment => layout::EQUIPMENT,
        Pool::EquippedBags => layout::EQUIPPED_BAGS,
        Pool::ReagentBagSlot => layout::REAGENT_BAG,
        Pool::Backpack => layout::BACKPACK.live(limits.backpack_slots),
        Pool::Bank => layout::BANK.live(limits.bank_slots),
        Pool::BankBagSlots => layout::BANK_BAGS.live(limits.bank_bag_slots),
        Pool::Buyback => layout::BUYBACK,
        Pool::ReagentBank if limits.reagent_bank_unlocked => layout::REAGENT_BANK,
        Pool::ReagentBank => layout::REAGENT_BANK.live(0),
        Pool::ChildEquipment => layout::CHILD_EQUIPMENT,
        Pool::BagContents | Pool::ReagentBagContents | Pool::BankBagContents => return None,
        Pool::VoidStorage => return None,
    };
    Some(range)
}

/// Classifies `address` and checks it is inside the live range.
///
/// # Errors
///
/// `InvalidSlot` for addresses outside the layout, beyond the live size, or
/// inside a bag slot that holds no bag; `PoolLocked` for the locked reagent bank.
pub fn validate(inventory: &PlayerInventory, address: SlotAddress) -> Result<Pool, InventoryError> {
    let pool = classify(address).ok_or(InventoryError::InvalidSlot(address))?;
    let limits = &inventory.limits;
    let live = match pool {
        Pool::ReagentBank if !limits.reagent_bank_unlocked => {
            return Err(InventoryError::PoolLocked(Pool::ReagentBank));
        }
        Pool::VoidStorage => true,
        Pool::BagContents | Pool::ReagentBagContents | Pool::BankBagContents => {
            let holder = address.container;
            let holder_live = classify(SlotAddress::player(holder))
                .and_then(|holder_pool| live_range(holder_pool, limits))
                .is_some_and(|range| range.contains(holder));
            holder_live
                && inventory
                    .container_in(holder)
                    .is_some_and(|container| address.slot < container.capacity())
        }
        flat => live_range(flat, limits).is_some_and(|range| range.contains(address.slot)),
    };
    if live {
        Ok(pool)
    } else {
        Err(InventoryError::InvalidSlot(address))
    }
}

pub fn is_live(inventory: &PlayerInventory, address: SlotAddress) -> bool {
    validate(inventory, address).is_ok()
}

/// Live addresses of a pool in ascending order.
pub fn live_addresses(inventory: &PlayerInventory, pool: Pool) -> Vec<SlotAddress> {
    match pool {
        Pool::VoidStorage => (0..crate::config::InventoryConfig::VOID_STORAGE_SLOTS)
            .map(SlotAddress::void)
            .collect(),
        Pool::BagContents | Pool::ReagentBagContents | Pool::BankBagContents => {
            let holders = match pool {
                Pool::BagContents => layout::EQUIPPED_BAGS,
                Pool::ReagentBagContents => layout::REAGENT_BAG,
                _ => layout::BANK_BAGS.live(inventory.limits.bank_bag_slots),
            };
            holders
                .iter()
                .filter_map(|holder| {
                    inventory
                        .container_in(holder)
                        .map(|container| (holder, container.capacity()))
                })
                .flat_map(|(holder, capacity)| {
                    (0..capacity).map(move |slot| SlotAddress::in_bag(holder, slot))
                })
                .collect()
        }
        flat => live_range(flat, &inventory.limits)
            .map(|range| range.iter().map(SlotAddress::player).collect())
            .unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::InventoryConfig;
    use crate::state::PlayerId;

    #[test]
    fn live_ranges_follow_upgrades() {
        let mut inventory = PlayerInventory::new(PlayerId(7), &InventoryConfig::default());
        let last_default = SlotAddress::player(layout::BACKPACK.start + 15);
        let first_upgrade = SlotAddress::player(layout::BACKPACK.start + 16);
        assert_eq!(validate(&inventory, last_default), Ok(Pool::Backpack));
        assert!(!is_live(&inventory, first_upgrade));

        inventory.limits.backpack_slots = 20;
        assert!(is_live(&inventory, first_upgrade));

        let reagent = SlotAddress::player(layout::REAGENT_BANK.start);
        assert_eq!(
            validate(&inventory, reagent),
            Err(InventoryError::PoolLocked(Pool::ReagentBank))
        );
        inventory.limits.reagent_bank_unlocked = true;
        assert_eq!(validate(&inventory, reagent), Ok(Pool::ReagentBank));
    }

    #[test]
    fn bag_contents_need_a_held_bag() {
        let inventory = PlayerInventory::new(PlayerId(7), &InventoryConfig::default());
        let inside = SlotAddress::in_bag(layout::EQUIPPED_BAGS.start, 0);
        assert_eq!(validate(&inventory, inside), Err(InventoryError::InvalidSlot(inside)));
        assert_eq!(live_addresses(&inventory, Pool::BagContents), Vec::new());
        assert_eq!(live_addresses(&inventory, Pool::Backpack).len(), 16);
        assert!(live_addresses(&inventory, Pool::BankBagSlots).is_empty());
    }
}
