//! Spatial placement search.
//!
//! The planner turns a deposit request into an ordered list of
//! [`PositionCount`] directives. It is a pure function of the inventory,
//! the player context and the batch reservations: it never mutates state.
//!
//! Phases run in strict order, first-fit, scanning low to high:
//!
//! 1. the explicit slot, if given (merge first, then empty placement);
//! 2. the explicit container, only when no slot was given;
//! 3. the general search for whatever remains: every merge target across
//!    flat pools, family-matching containers and generic containers, then
//!    every empty slot in the same order.
mod plan;
mod reservations;

pub use plan::{PlacementRequest, Plan, PositionCount};
pub use reservations::{Claim, Reservations};

use crate::capacity::merge_room;
use crate::env::ItemTemplate;
use crate::error::InventoryError;
use crate::slots::{self, Pool, PoolScope, SlotAddress, layout};
use crate::state::{PlayerContext, PlayerInventory};

/// Flat pools searched in phase 3, in priority order.
const FLAT_ORDER: [Pool; 5] = [
    Pool::Backpack,
    Pool::Bank,
    Pool::ReagentBank,
    Pool::ChildEquipment,
    Pool::VoidStorage,
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Pass {
    Merge,
    Empty,
}

/// Accumulates directives for one request.
struct Draft {
    remaining: u32,
    entries: Vec<PositionCount>,
}

impl Draft {
    fn is_done(&self) -> bool {
        self.remaining == 0
    }

    fn uses(&self, address: SlotAddress) -> bool {
        self.entries.iter().any(|entry| entry.address == address)
    }
}

pub struct PlacementPlanner<'a> {
    inventory: &'a PlayerInventory,
    context: &'a PlayerContext,
    reservations: &'a Reservations,
}

impl<'a> PlacementPlanner<'a> {
    pub fn new(
        inventory: &'a PlayerInventory,
        context: &'a PlayerContext,
        reservations: &'a Reservations,
    ) -> Self {
        Self {
            inventory,
            context,
            reservations,
        }
    }

    /// Plans a deposit, reporting any unplaced remainder as `shortfall`.
    ///
    /// # Errors
    ///
    /// Only rule violations of an explicit slot or container are errors;
    /// running out of space is not.
    pub fn plan(
        &self,
        template: &ItemTemplate,
        request: &PlacementRequest,
    ) -> Result<Plan, InventoryError> {
        if request.quantity == 0 {
            return Err(InventoryError::InvalidQuantity(0));
        }
        let mut draft = Draft {
            remaining: request.quantity,
            entries: Vec::new(),
        };

        if let Some(slot) = request.slot {
            slots::accepts(self.inventory, self.context, slot, template, request.exclude)?;
            for pass in [Pass::Merge, Pass::Empty] {
                self.offer(&mut draft, slot, template, request, pass);
            }
            tracing::trace!(%slot, remaining = draft.remaining, "explicit slot phase");
        } else if let Some(holder) = request.container {
            let addresses = self.container_addresses(holder, template, request)?;
            self.sweep(&mut draft, &addresses, template, request);
            tracing::trace!(holder, remaining = draft.remaining, "explicit container phase");
        }

        if !draft.is_done() {
            let order = self.search_order(template, request);
            self.sweep(&mut draft, &order, template, request);
            tracing::trace!(
                candidates = order.len(),
                remaining = draft.remaining,
                "general search phase"
            );
        }

        Ok(Plan {
            template: Some(template.id),
            requested: request.quantity,
            entries: draft.entries,
            shortfall: draft.remaining,
        })
    }

    /// Plans a deposit that must be placed in full.
    ///
    /// # Errors
    ///
    /// `SpatialCapacityExceeded` carrying the number of units that did not fit.
    pub fn plan_strict(
        &self,
        template: &ItemTemplate,
        request: &PlacementRequest,
    ) -> Result<Plan, InventoryError> {
        let plan = self.plan(template, request)?;
        if plan.is_complete() {
            Ok(plan)
        } else {
            Err(InventoryError::SpatialCapacityExceeded {
                shortfall: plan.shortfall,
            })
        }
    }

    /// Addresses scanned by the general search, in priority order.
    pub fn search_order(
        &self,
        template: &ItemTemplate,
        request: &PlacementRequest,
    ) -> Vec<SlotAddress> {
        let mut order: Vec<SlotAddress> = FLAT_ORDER
            .iter()
            .filter(|pool| request.scope.contains(pool.scope()))
            .flat_map(|pool| slots::live_addresses(self.inventory, *pool))
            .collect();

        if template.is_container() || template.is_child_equipment() {
            return order;
        }

        let holders = [
            (PoolScope::BAG_CONTENTS, layout::EQUIPPED_BAGS),
            (PoolScope::REAGENT_BAG_CONTENTS, layout::REAGENT_BAG),
            (
                PoolScope::BANK_BAG_CONTENTS,
                layout::BANK_BAGS.live(self.inventory.limits.bank_bag_slots),
            ),
        ];
        let family = template.storage_family();
        let mut specialized = Vec::new();
        let mut generic = Vec::new();
        for (scope, range) in holders {
            if !request.scope.contains(scope) {
                continue;
            }
            for holder in range.iter() {
                let Some(container) = self.inventory.container_in(holder) else {
                    continue;
                };
                if Some(container.bag) == request.exclude {
                    continue;
                }
                let addresses =
                    (0..container.capacity()).map(|slot| SlotAddress::in_bag(holder, slot));
                let reagent_bag = scope == PoolScope::REAGENT_BAG_CONTENTS;
                if container.family.is_empty() && !reagent_bag {
                    generic.extend(addresses);
                } else if reagent_bag || container.family.intersects(family) {
                    specialized.extend(addresses);
                }
            }
        }
        order.extend(specialized);
        order.extend(generic);
        order
    }

    fn container_addresses(
        &self,
        holder: u8,
        template: &ItemTemplate,
        request: &PlacementRequest,
    ) -> Result<Vec<SlotAddress>, InventoryError> {
        let first = SlotAddress::in_bag(holder, 0);
        let container = self
            .inventory
            .container_in(holder)
            .ok_or(InventoryError::InvalidSlot(first))?;
        slots::accepts(self.inventory, self.context, first, template, request.exclude)?;
        Ok((0..container.capacity())
            .map(|slot| SlotAddress::in_bag(holder, slot))
            .collect())
    }

    /// Runs the merge pass over every address, then the empty pass.
    fn sweep(
        &self,
        draft: &mut Draft,
        addresses: &[SlotAddress],
        template: &ItemTemplate,
        request: &PlacementRequest,
    ) {
        for pass in [Pass::Merge, Pass::Empty] {
            for address in addresses {
                if draft.is_done() {
                    return;
                }
                self.offer(draft, *address, template, request, pass);
            }
        }
    }

    fn offer(
        &self,
        draft: &mut Draft,
        address: SlotAddress,
        template: &ItemTemplate,
        request: &PlacementRequest,
        pass: Pass,
    ) {
        if draft.is_done() || draft.uses(address) || self.reservations.is_blocked(address) {
            return;
        }
        let occupant = self.inventory.stack_at(address);
        let (room, merge_into) = match (pass, occupant) {
            (Pass::Merge, Some(stack)) if Some(stack.id) != request.exclude => {
                let room = merge_room(stack, template, request.bound)
                    .saturating_sub(self.reservations.merged(address));
                (room, Some(stack.id))
            }
            (Pass::Empty, None) => (template.max_stack, None),
            _ => return,
        };
        if room == 0 {
            return;
        }
        let accepted =
            slots::accepts(self.inventory, self.context, address, template, request.exclude);
        if accepted.is_err() {
            return;
        }
        let quantity = draft.remaining.min(room);
        draft.remaining -= quantity;
        draft.entries.push(PositionCount {
            address,
            quantity,
            merge_into,
        });
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;
    use crate::env::{BagFamily, EquipType, TemplateFlags};
    use crate::state::TemplateId;
    use crate::testing::*;

    fn backpack(index: u8) -> SlotAddress {
        SlotAddress::player(layout::BACKPACK.start + index)
    }

    #[test]
    fn fills_empty_backpack_one_slot_per_stack() {
        let inventory = inventory();
        let reservations = Reservations::new();
        let planner = PlacementPlanner::new(&inventory, &CONTEXT, &reservations);
        let request = PlacementRequest::new(TEMPLATE_POTION, 80, PoolScope::CARRIED);

        let plan = planner.plan_strict(&potion(), &request).unwrap();

        assert_eq!(plan.entries.len(), 4);
        assert!(plan.entries.iter().all(|entry| entry.quantity == 20 && !entry.is_merge()));
        let distinct: BTreeSet<_> = plan.entries.iter().map(|entry| entry.address).collect();
        assert_eq!(distinct.len(), 4);
        assert_eq!(plan.entries[0].address, backpack(0));
        assert_eq!(plan.placed(), 80);
    }

    #[test]
    fn merges_before_filling_empty_slots() {
        let mut inventory = inventory();
        inventory.seed_stack(&potion(), 5, backpack(3)).unwrap();
        inventory.seed_stack(&potion(), 20, backpack(4)).unwrap();
        let reservations = Reservations::new();
        let planner = PlacementPlanner::new(&inventory, &CONTEXT, &reservations);

        let plan = planner
            .plan(&potion(), &PlacementRequest::new(TEMPLATE_POTION, 30, PoolScope::CARRIED))
            .unwrap();

        assert_eq!(plan.entries[0].address, backpack(3));
        assert_eq!(plan.entries[0].quantity, 15);
        assert!(plan.entries[0].is_merge());
        assert_eq!(plan.entries[1].address, backpack(0));
        assert_eq!(plan.entries[1].quantity, 15);
        assert_eq!(plan.placed() + plan.shortfall, 30);
    }

    #[test]
    fn reports_exact_shortfall_and_is_deterministic() {
        let mut inventory = inventory();
        for index in 0..15 {
            inventory.seed_stack(&sword(), 1, backpack(index)).unwrap();
        }
        let reservations = Reservations::new();
        let planner = PlacementPlanner::new(&inventory, &CONTEXT, &reservations);
        let request = PlacementRequest::new(TEMPLATE_POTION, 50, PoolScope::CARRIED);

        let first = planner.plan(&potion(), &request).unwrap();
        let second = planner.plan(&potion(), &request).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.placed(), 20);
        assert_eq!(first.shortfall, 30);
        assert_eq!(
            planner.plan_strict(&potion(), &request),
            Err(InventoryError::SpatialCapacityExceeded { shortfall: 30 })
        );
    }

    #[test]
    fn explicit_slot_then_residual_search() {
        let mut inventory = inventory();
        inventory.seed_stack(&potion(), 18, backpack(6)).unwrap();
        let reservations = Reservations::new();
        let planner = PlacementPlanner::new(&inventory, &CONTEXT, &reservations);
        let request =
            PlacementRequest::new(TEMPLATE_POTION, 10, PoolScope::CARRIED).at_slot(backpack(6));

        let plan = planner.plan(&potion(), &request).unwrap();
        assert_eq!(plan.entries.len(), 2);
        assert_eq!(plan.entries[0].address, backpack(6));
        assert_eq!(plan.entries[0].quantity, 2);
        assert_eq!(plan.entries[1].address, backpack(0));
        assert_eq!(plan.entries[1].quantity, 8);
    }

    #[test]
    fn family_containers_before_generic_ones() {
        let mut inventory = inventory();
        let generic_holder = layout::EQUIPPED_BAGS.start;
        let herb_holder = layout::EQUIPPED_BAGS.start + 1;
        inventory
            .seed_stack(&bag_template(), 1, SlotAddress::player(generic_holder))
            .unwrap();
        inventory
            .seed_stack(&herb_bag(), 1, SlotAddress::player(herb_holder))
            .unwrap();
        for index in 0..16 {
            inventory.seed_stack(&sword(), 1, backpack(index)).unwrap();
        }
        let reservations = Reservations::new();
        let planner = PlacementPlanner::new(&inventory, &CONTEXT, &reservations);

        let herbs = planner
            .plan(&herb(), &PlacementRequest::new(TEMPLATE_HERB, 20, PoolScope::CARRIED))
            .unwrap();
        assert_eq!(herbs.entries[0].address, SlotAddress::in_bag(herb_holder, 0));

        let potions = planner
            .plan(&potion(), &PlacementRequest::new(TEMPLATE_POTION, 20, PoolScope::CARRIED))
            .unwrap();
        assert_eq!(potions.entries[0].address, SlotAddress::in_bag(generic_holder, 0));
        assert!(!potions.entries.iter().any(|e| e.address.container == herb_holder));
    }

    #[test]
    fn batch_reservations_prevent_double_booking() {
        let inventory = inventory();
        let mut reservations = Reservations::new();
        let request = PlacementRequest::new(TEMPLATE_POTION, 20, PoolScope::CARRIED);

        let first = PlacementPlanner::new(&inventory, &CONTEXT, &reservations)
            .plan(&potion(), &request)
            .unwrap();
        reservations.reserve(&first);
        let second = PlacementPlanner::new(&inventory, &CONTEXT, &reservations)
            .plan(&potion(), &request)
            .unwrap();

        assert_eq!(first.entries[0].address, backpack(0));
        assert_eq!(second.entries[0].address, backpack(1));
    }

    #[test]
    fn reagents_fill_consecutive_reagent_bank_slots() {
        let mut inventory = inventory();
        inventory.limits.reagent_bank_unlocked = true;
        let dust = ItemTemplate::new(TemplateId(77), 1).with_flags(TemplateFlags::CRAFTING_REAGENT);
        let reservations = Reservations::new();
        let planner = PlacementPlanner::new(&inventory, &CONTEXT, &reservations);

        let plan = planner
            .plan_strict(&dust, &PlacementRequest::new(dust.id, 5, PoolScope::REAGENT_BANK))
            .unwrap();

        let slots: Vec<u8> = plan.entries.iter().map(|entry| entry.address.slot).collect();
        let start = layout::REAGENT_BANK.start;
        assert_eq!(slots, vec![start, start + 1, start + 2, start + 3, start + 4]);
        assert_eq!(plan.placed(), 5);
    }

    #[test]
    fn moving_bag_skips_its_own_contents() {
        let mut inventory = inventory();
        let holder = layout::EQUIPPED_BAGS.start;
        let bag = inventory
            .seed_stack(&bag_template(), 1, SlotAddress::player(holder))
            .unwrap();
        let reservations = Reservations::new();
        let planner = PlacementPlanner::new(&inventory, &CONTEXT, &reservations);
        let request =
            PlacementRequest::new(TEMPLATE_POTION, 1, PoolScope::BAG_CONTENTS).excluding(bag);

        assert_eq!(planner.search_order(&potion(), &request), Vec::new());
        let quiver =
            ItemTemplate::container(TemplateId(78), EquipType::Quiver, 4, BagFamily::ARROWS);
        assert!(planner.search_order(&quiver, &request).is_empty());
    }
}
