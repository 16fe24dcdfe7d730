//! Destroy, buyback, reagent deposit and pool resizing.

use super::MutationPlan;
use super::transition::RequestTransition;
use super::validate::Validation;
use crate::apply::Mutation;
use crate::capacity;
use crate::error::{InventoryError, StructuralViolation};
use crate::planner::Reservations;
use crate::request::{CARRIED_STORAGE, DestroyRequest, ResizeRequest};
use crate::slots::{self, Pool, PoolScope, SlotAddress, layout};
use crate::state::{ItemStack, StackId};

/// Pools a deposit-all sweeps for reagents.
const REAGENT_SOURCES: PoolScope = PoolScope::BACKPACK
    .union(PoolScope::BAG_CONTENTS)
    .union(PoolScope::REAGENT_BAG_CONTENTS);

impl RequestTransition for DestroyRequest {
    fn validate(&self, validation: &Validation<'_>) -> Result<MutationPlan, InventoryError> {
        let stack = validation.stack(self.stack)?;
        validation.guard(stack)?;
        let from = validation.address(stack.id)?;
        validation.check_blockers(&[from])?;
        let quantity = self.quantity.unwrap_or(stack.quantity);
        if quantity == 0 || quantity > stack.quantity {
            return Err(InventoryError::InvalidQuantity(quantity));
        }
        if validation.is_loaded(stack.id) {
            return Err(StructuralViolation::DestroyNonEmptyBag { bag: stack.id }.into());
        }
        let mutation = if quantity == stack.quantity {
            Mutation::Remove { stack: stack.id }
        } else {
            Mutation::Shrink {
                stack: stack.id,
                by: quantity,
            }
        };
        Ok(MutationPlan::new(vec![mutation]))
    }
}

/// Moves an owned, unequipped stack into the buyback ring.
///
/// The ring fills its first empty slot, else overwrites the oldest sale; the
/// overwritten stack is removed. A dependent child is removed with its parent.
pub(super) fn sell(id: StackId, validation: &Validation<'_>) -> Result<MutationPlan, InventoryError> {
    let stack = validation.stack(id)?;
    validation.guard(stack)?;
    let from = validation.address(id)?;
    let pool = validation.pool(from)?;
    if !pool.is_owned() || pool.is_equipped() || pool == Pool::ChildEquipment {
        return Err(InventoryError::InvalidSlot(from));
    }
    if validation.is_loaded(id) {
        return Err(StructuralViolation::NonEmptyBag { bag: id }.into());
    }

    let slot = validation.inventory.next_buyback_slot();
    let mut mutations = Vec::with_capacity(4);
    if let Some(child) = stack.child {
        validation.guard(validation.stack(child)?)?;
        mutations.push(Mutation::Remove { stack: child });
    }
    if let Some(previous) = validation.inventory.slot(slot) {
        tracing::debug!(%previous, slot, "buyback ring overwrites oldest sale");
        mutations.push(Mutation::Remove { stack: previous });
    }
    mutations.extend(Mutation::relocate(id, SlotAddress::player(slot)));
    Ok(MutationPlan::new(mutations))
}

/// Returns a buyback stack to carried storage, re-running ownership limits.
pub(super) fn buy_back(slot: u8, validation: &Validation<'_>) -> Result<MutationPlan, InventoryError> {
    let address = SlotAddress::player(slot);
    if slots::classify(address) != Some(Pool::Buyback) {
        return Err(InventoryError::InvalidSlot(address));
    }
    let id = validation
        .inventory
        .slot(slot)
        .ok_or(InventoryError::SlotEmpty(address))?;
    let stack = validation.stack(id)?;
    let template = validation.template_of(stack)?;
    capacity::can_acquire_more(
        validation.inventory,
        validation.env,
        validation.context,
        &template,
        stack.quantity,
        Some(id),
    )?;
    let relocation = validation.relocate(stack, CARRIED_STORAGE, &mut Reservations::new(), true)?;
    Ok(MutationPlan::new(relocation.mutations))
}

/// Moves every crafting reagent out of carried storage into the reagent bank.
///
/// Merges come first, then stacks this sweep already moved into empty slots
/// are topped up; stacks that do not fit stay where they are.
pub(super) fn deposit_reagents(validation: &Validation<'_>) -> Result<MutationPlan, InventoryError> {
    if !validation.inventory.limits.reagent_bank_unlocked {
        return Err(InventoryError::PoolLocked(Pool::ReagentBank));
    }
    let mut reservations = Reservations::new();
    let mut landed: Vec<ItemStack> = Vec::new();
    let mut mutations = Vec::new();
    let mut moved = 0usize;
    for (address, stack) in validation.inventory.stacks_in(REAGENT_SOURCES) {
        if stack.locked {
            tracing::trace!(%address, stack = %stack.id, "locked reagent left in place");
            continue;
        }
        let template = validation.template_of(stack)?;
        if !template.is_crafting_reagent() {
            continue;
        }
        validation.guard(stack)?;

        let before = mutations.len();
        let mut rest = stack.clone();
        for target in &mut landed {
            let room = capacity::merge_room(target, &template, rest.bound).min(rest.quantity);
            if room == 0 {
                continue;
            }
            mutations.extend([
                Mutation::Shrink {
                    stack: rest.id,
                    by: room,
                },
                Mutation::Grow {
                    stack: target.id,
                    by: room,
                },
            ]);
            target.quantity += room;
            rest.quantity -= room;
            if rest.quantity == 0 {
                break;
            }
        }
        if rest.quantity > 0 {
            let relocation =
                validation.relocate(&rest, PoolScope::REAGENT_BANK, &mut reservations, false)?;
            if let Some(entry) = relocation.plan.empties().next() {
                let mut target = rest.clone();
                target.quantity = entry.quantity;
                landed.push(target);
            }
            mutations.extend(relocation.mutations);
        }
        moved += usize::from(mutations.len() > before);
    }
    tracing::debug!(stacks = moved, "reagent deposit planned");
    Ok(MutationPlan::new(mutations))
}

impl RequestTransition for ResizeRequest {
    fn validate(&self, validation: &Validation<'_>) -> Result<MutationPlan, InventoryError> {
        let full = match self.pool {
            Pool::Backpack => layout::BACKPACK,
            Pool::Bank => layout::BANK,
            Pool::BankBagSlots => layout::BANK_BAGS,
            Pool::ReagentBank => layout::REAGENT_BANK,
            other => return Err(InventoryError::PoolLocked(other)),
        };
        let live = if self.pool == Pool::ReagentBank {
            if self.live > 0 { full.len() } else { 0 }
        } else {
            self.live.min(full.len())
        };
        let current = slots::live_range(self.pool, &validation.inventory.limits)
            .ok_or_else(|| InventoryError::internal("resizable pool without live range"))?;
        let kept = full.live(live);
        for slot in current.iter().filter(|slot| !kept.contains(*slot)) {
            if let Some(stack) = validation.inventory.slot(slot) {
                return Err(StructuralViolation::ShrinkStrandsItem {
                    pool: self.pool,
                    stack,
                }
                .into());
            }
        }
        Ok(MutationPlan::new(vec![Mutation::Resize {
            pool: self.pool,
            live,
        }]))
    }
}
