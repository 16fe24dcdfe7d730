//! Per-address placement rules shared by the planner and the coordinator.

use super::{Pool, SlotAddress};
use crate::env::{EquipType, ItemTemplate};
use crate::equip::table;
use crate::error::{InventoryError, StructuralViolation};
use crate::state::{PlayerContext, PlayerInventory, StackId, StackLocation};

/// Checks whether `template` may be placed at `address`.
///
/// `moving` names the existing stack being relocated, if any; it is needed for
/// the bag self-containment and non-empty bag rules. Occupancy is not checked.
pub fn accepts(
    inventory: &PlayerInventory,
    context: &PlayerContext,
    address: SlotAddress,
    template: &ItemTemplate,
    moving: Option<StackId>,
) -> Result<Pool, InventoryError> {
    let pool = super::validate(inventory, address)?;

    if template.is_container() {
        check_bag(inventory, pool, address, template, moving)?;
    }

    if template.is_child_equipment() {
        if !matches!(pool, Pool::Equipment | Pool::ChildEquipment) {
            return Err(StructuralViolation::ChildOutsideChildSlots {
                template: template.id,
            }
            .into());
        }
    } else if pool == Pool::ChildEquipment {
        return Err(StructuralViolation::NotAChild {
            template: template.id,
        }
        .into());
    }

    let not_equippable = InventoryError::NotEquippable {
        template: template.id,
    };
    let wrong_container = InventoryError::WrongContainerType {
        template: template.id,
        address,
    };
    match pool {
        Pool::Equipment => {
            if !table::fits(template.equip_type, context, address.slot) {
                return Err(not_equippable);
            }
        }
        Pool::EquippedBags | Pool::BankBagSlots => {
            if !template.is_container()
                || !matches!(template.equip_type, EquipType::Bag | EquipType::Quiver)
            {
                return Err(not_equippable);
            }
        }
        Pool::ReagentBagSlot => {
            if !template.is_container() || template.equip_type != EquipType::ReagentBag {
                return Err(not_equippable);
            }
        }
        Pool::ReagentBank => {
            if !template.is_crafting_reagent() {
                return Err(wrong_container);
            }
        }
        Pool::BagContents | Pool::ReagentBagContents | Pool::BankBagContents => {
            if pool == Pool::ReagentBagContents && !template.is_crafting_reagent() {
                return Err(wrong_container);
            }
            let family = inventory
                .container_in(address.container)
                .map(|container| container.family)
                .unwrap_or_default();
            if !family.is_empty() && !template.storage_family().intersects(family) {
                return Err(wrong_container);
            }
        }
        Pool::Backpack
        | Pool::Bank
        | Pool::Buyback
        | Pool::ChildEquipment
        | Pool::VoidStorage => {}
    }

    Ok(pool)
}

fn check_bag(
    inventory: &PlayerInventory,
    pool: Pool,
    address: SlotAddress,
    template: &ItemTemplate,
    moving: Option<StackId>,
) -> Result<(), InventoryError> {
    if let Some(holder) = address.holder() {
        let bag = moving.filter(|id| {
            inventory.stack(*id).map(|stack| stack.location) == Some(StackLocation::Player(holder))
        });
        return Err(match bag {
            Some(bag) => StructuralViolation::BagInsideItself { bag },
            None => StructuralViolation::NestedBag {
                template: template.id,
            },
        }
        .into());
    }

    if let Some(bag) = moving {
        let loaded = inventory
            .container(bag)
            .is_some_and(|container| !container.is_empty());
        if loaded && !pool.holds_bags() {
            return Err(StructuralViolation::NonEmptyBag { bag }.into());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::{BagFamily, TemplateFlags};
    use crate::slots::{EquipmentSlot, layout};
    use crate::testing::*;

    #[test]
    fn bag_cannot_enter_its_own_contents() {
        let mut inventory = inventory();
        let holder = layout::EQUIPPED_BAGS.start;
        let bag = inventory
            .seed_stack(&bag_template(), 1, SlotAddress::player(holder))
            .unwrap();
        inventory
            .seed_stack(&herb(), 3, SlotAddress::in_bag(holder, 0))
            .unwrap();

        let target = SlotAddress::in_bag(holder, 1);
        assert_eq!(
            accepts(&inventory, &context(), target, &bag_template(), Some(bag)),
            Err(StructuralViolation::BagInsideItself { bag }.into())
        );
        let backpack = SlotAddress::player(layout::BACKPACK.start);
        assert_eq!(
            accepts(&inventory, &context(), backpack, &bag_template(), Some(bag)),
            Err(StructuralViolation::NonEmptyBag { bag }.into())
        );
        let other_holder = SlotAddress::player(layout::EQUIPPED_BAGS.start + 1);
        assert_eq!(
            accepts(&inventory, &context(), other_holder, &bag_template(), Some(bag)),
            Ok(Pool::EquippedBags)
        );
    }

    #[test]
    fn families_and_reagent_pools_filter_templates() {
        let mut inventory = inventory();
        inventory.limits.reagent_bank_unlocked = true;
        let holder = layout::EQUIPPED_BAGS.start;
        let herb_bag = ItemTemplate::container(TEMPLATE_HERB_BAG, EquipType::Bag, 8, BagFamily::HERBS);
        inventory
            .seed_stack(&herb_bag, 1, SlotAddress::player(holder))
            .unwrap();

        let inside = SlotAddress::in_bag(holder, 0);
        assert_eq!(
            accepts(&inventory, &context(), inside, &herb(), None),
            Ok(Pool::BagContents)
        );
        assert!(matches!(
            accepts(&inventory, &context(), inside, &potion(), None),
            Err(InventoryError::WrongContainerType { .. })
        ));

        let reagent_slot = SlotAddress::player(layout::REAGENT_BANK.start);
        assert!(accepts(&inventory, &context(), reagent_slot, &potion(), None).is_err());
        let reagent = potion().with_flags(TemplateFlags::CRAFTING_REAGENT);
        assert_eq!(
            accepts(&inventory, &context(), reagent_slot, &reagent, None),
            Ok(Pool::ReagentBank)
        );
    }

    #[test]
    fn child_items_stay_in_child_or_equipment_slots() {
        let inventory = inventory();
        let child = ItemTemplate::new(TEMPLATE_CHILD, 1).with_flags(TemplateFlags::CHILD_EQUIPMENT);
        let child_slot = SlotAddress::player(layout::CHILD_EQUIPMENT.start);
        let backpack = SlotAddress::player(layout::BACKPACK.start);

        assert_eq!(
            accepts(&inventory, &context(), child_slot, &child, None),
            Ok(Pool::ChildEquipment)
        );
        assert!(matches!(
            accepts(&inventory, &context(), backpack, &child, None),
            Err(InventoryError::Structural(
                StructuralViolation::ChildOutsideChildSlots { .. }
            ))
        ));
        assert!(matches!(
            accepts(&inventory, &context(), child_slot, &potion(), None),
            Err(InventoryError::Structural(StructuralViolation::NotAChild { .. }))
        ));

        let helm = SlotAddress::player(EquipmentSlot::Head.slot());
        assert!(matches!(
            accepts(&inventory, &context(), helm, &potion(), None),
            Err(InventoryError::NotEquippable { .. })
        ));
    }
}
