//! Shared validation helpers for every request leg.
//!
//! Nothing here mutates state: helpers inspect the inventory and return
//! mutations to be applied later, or the reason the leg is rejected.

use crate::apply::Mutation;
use crate::capacity;
use crate::env::{BindPolicy, InventoryEnv, ItemTemplate};
use crate::equip;
use crate::error::{Blocker, InventoryError};
use crate::planner::{PlacementPlanner, PlacementRequest, Plan, Reservations};
use crate::request::CARRIED_STORAGE;
use crate::slots::{self, EquipmentSlot, Pool, PoolScope, SlotAddress};
use crate::state::{ItemStack, PlayerContext, PlayerInventory, PlayerStatus, StackId, TemplateId};

/// Read-only view handed to every request transition.
pub struct Validation<'a> {
    pub inventory: &'a PlayerInventory,
    pub context: &'a PlayerContext,
    pub env: &'a InventoryEnv<'a>,
}

/// Mutations relocating one stack through the planner.
#[derive(Debug)]
pub struct Relocation {
    pub mutations: Vec<Mutation>,
    pub plan: Plan,
}

impl<'a> Validation<'a> {
    pub fn new(
        inventory: &'a PlayerInventory,
        context: &'a PlayerContext,
        env: &'a InventoryEnv<'a>,
    ) -> Self {
        Self {
            inventory,
            context,
            env,
        }
    }

    pub fn stack(&self, id: StackId) -> Result<&'a ItemStack, InventoryError> {
        self.inventory
            .stack(id)
            .ok_or(InventoryError::ItemNotFound(id))
    }

    pub fn template(&self, id: TemplateId) -> Result<ItemTemplate, InventoryError> {
        Ok(self.env.template(id)?)
    }

    pub fn template_of(&self, stack: &ItemStack) -> Result<ItemTemplate, InventoryError> {
        self.template(stack.template)
    }

    pub fn address(&self, id: StackId) -> Result<SlotAddress, InventoryError> {
        self.inventory
            .address_of(id)
            .ok_or_else(|| InventoryError::internal("stack is not addressable"))
    }

    pub fn pool(&self, address: SlotAddress) -> Result<Pool, InventoryError> {
        slots::classify(address).ok_or(InventoryError::InvalidSlot(address))
    }

    pub fn planner<'r>(&self, reservations: &'r Reservations) -> PlacementPlanner<'r>
    where
        'a: 'r,
    {
        PlacementPlanner::new(self.inventory, self.context, reservations)
    }

    /// Ownership and item-lock checks for a stack about to change.
    pub fn guard(&self, stack: &ItemStack) -> Result<(), InventoryError> {
        if stack.owner != self.inventory.owner {
            return Err(InventoryError::OwnershipOrBindingViolation { stack: stack.id });
        }
        if stack.locked {
            return Err(InventoryError::TransientBlocker(Blocker::ItemLocked(stack.id)));
        }
        Ok(())
    }

    /// Status blockers for changes touching equipped addresses.
    ///
    /// Dead and arena-locked characters cannot change equipment at all; in
    /// combat only weapon slots may change.
    pub fn check_blockers(&self, addresses: &[SlotAddress]) -> Result<(), InventoryError> {
        let status = self.context.status;
        for address in addresses {
            let Some(pool) = slots::classify(*address) else {
                continue;
            };
            if !pool.is_equipped() {
                continue;
            }
            if status.contains(PlayerStatus::DEAD) {
                return Err(InventoryError::TransientBlocker(Blocker::Dead));
            }
            if status.contains(PlayerStatus::ARENA_LOCKED) {
                return Err(InventoryError::TransientBlocker(Blocker::ArenaLocked));
            }
            let weapon = pool == Pool::Equipment
                && EquipmentSlot::from_slot(address.slot).is_some_and(EquipmentSlot::is_weapon);
            if status.contains(PlayerStatus::IN_COMBAT) && !weapon {
                return Err(InventoryError::TransientBlocker(Blocker::InCombat));
            }
        }
        Ok(())
    }

    /// Validates one stack moving from `from` into `to`.
    ///
    /// Any current occupant of `to` is taken to leave it in the same change.
    ///
    /// Returns the destination pool.
    pub fn check_leg(
        &self,
        stack: &ItemStack,
        template: &ItemTemplate,
        from: SlotAddress,
        to: SlotAddress,
    ) -> Result<Pool, InventoryError> {
        self.guard(stack)?;
        self.check_blockers(&[from, to])?;
        let from_pool = self.pool(from)?;
        let to_pool = slots::accepts(self.inventory, self.context, to, template, Some(stack.id))?;
        if to_pool == Pool::Buyback {
            return Err(InventoryError::InvalidSlot(to));
        }
        self.check_acquisition(stack, template, from_pool, to_pool, stack.quantity)?;
        if to_pool == Pool::Equipment && from_pool != Pool::Equipment {
            let mut leaving = vec![stack.id];
            leaving.extend(self.inventory.stack_id_at(to));
            capacity::can_equip_more(
                self.inventory,
                self.env,
                self.context,
                template,
                stack.quantity,
                &leaving,
            )?;
        }
        Ok(to_pool)
    }

    /// Re-runs ownership limits for units entering owned pools from buyback or void.
    pub fn check_acquisition(
        &self,
        stack: &ItemStack,
        template: &ItemTemplate,
        from_pool: Pool,
        to_pool: Pool,
        quantity: u32,
    ) -> Result<(), InventoryError> {
        if from_pool.is_owned() || !to_pool.is_owned() {
            return Ok(());
        }
        capacity::can_acquire_more(
            self.inventory,
            self.env,
            self.context,
            template,
            quantity,
            Some(stack.id),
        )
    }

    /// Bind-on-equip follow-up for a stack landing in an equipped pool.
    pub fn landing(&self, stack: &ItemStack, template: &ItemTemplate, pool: Pool) -> Option<Mutation> {
        (pool.is_equipped() && template.binding == BindPolicy::OnEquip && !stack.bound)
            .then_some(Mutation::Bind { stack: stack.id })
    }

    /// Moves a whole stack into `scope`: merges first, the rest into one empty slot.
    ///
    /// With `strict`, any unplaced remainder rejects the relocation.
    pub fn relocate(
        &self,
        stack: &ItemStack,
        scope: PoolScope,
        reservations: &mut Reservations,
        strict: bool,
    ) -> Result<Relocation, InventoryError> {
        self.guard(stack)?;
        let template = self.template_of(stack)?;
        let request = PlacementRequest::new(template.id, stack.quantity, scope)
            .excluding(stack.id)
            .bound(stack.bound);
        let plan = self.planner(reservations).plan(&template, &request)?;
        if strict && !plan.is_complete() {
            return Err(InventoryError::SpatialCapacityExceeded {
                shortfall: plan.shortfall,
            });
        }

        let mut mutations = Vec::new();
        let merged: u32 = plan.merges().map(|entry| entry.quantity).sum();
        if merged > 0 {
            mutations.push(Mutation::Shrink {
                stack: stack.id,
                by: merged,
            });
        }
        for entry in plan.merges() {
            if let Some(target) = entry.merge_into {
                mutations.push(Mutation::Grow {
                    stack: target,
                    by: entry.quantity,
                });
            }
        }
        if let Some(entry) = plan.empties().next() {
            mutations.extend(Mutation::relocate(stack.id, entry.address));
            let pool = self.pool(entry.address)?;
            mutations.extend(self.landing(stack, &template, pool));
        }
        reservations.reserve(&plan);
        Ok(Relocation { mutations, plan })
    }

    /// Detach/attach pair moving a parent's child out of the way and back.
    ///
    /// The child is re-homed to its current child slot, or to the first free
    /// child slot when it sits elsewhere.
    pub fn child_cascade(
        &self,
        parent: &ItemStack,
        reservations: &mut Reservations,
    ) -> Result<Option<(Mutation, Mutation)>, InventoryError> {
        let Some(child_id) = parent.child else {
            return Ok(None);
        };
        let child = self.stack(child_id)?;
        self.guard(child)?;
        let current = self.address(child_id)?;
        let target = if self.pool(current)? == Pool::ChildEquipment {
            current
        } else {
            let template = self.template_of(child)?;
            let request = PlacementRequest::new(template.id, 1, PoolScope::CHILD_EQUIPMENT)
                .excluding(child_id);
            let plan = self.planner(reservations).plan_strict(&template, &request)?;
            plan.empties()
                .next()
                .map(|entry| entry.address)
                .ok_or(InventoryError::SpatialCapacityExceeded { shortfall: 1 })?
        };
        reservations.block(target);
        Ok(Some((
            Mutation::Detach { stack: child_id },
            Mutation::Attach {
                stack: child_id,
                to: target,
            },
        )))
    }

    /// Re-homes whatever a two-handed weapon landing at `to` displaces.
    ///
    /// A both-hands weapon entering the main hand evicts the off-hand; an item
    /// entering the off-hand evicts a both-hands main-hand weapon. `partner`
    /// is the other side of a swap and is never evicted.
    pub fn clear_hands(
        &self,
        incoming: &ItemStack,
        template: &ItemTemplate,
        to: SlotAddress,
        partner: Option<StackId>,
        reservations: &mut Reservations,
    ) -> Result<Vec<Mutation>, InventoryError> {
        if !to.is_player() {
            return Ok(Vec::new());
        }
        let main = EquipmentSlot::MainHand.slot();
        let off = EquipmentSlot::OffHand.slot();
        let evicted = if to.slot == main
            && equip::claims_both_hands(template.equip_type, self.context)
        {
            self.inventory.slot(off)
        } else if to.slot == off {
            match self.inventory.slot(main) {
                Some(held) => {
                    let held_template = self.template_of(self.stack(held)?)?;
                    equip::claims_both_hands(held_template.equip_type, self.context)
                        .then_some(held)
                }
                None => None,
            }
        } else {
            None
        };
        let Some(evicted) = evicted.filter(|id| *id != incoming.id && Some(*id) != partner) else {
            return Ok(Vec::new());
        };
        let evicted = self.stack(evicted)?;
        let relocation = self.relocate(evicted, CARRIED_STORAGE, reservations, true)?;
        tracing::debug!(
            evicted = %evicted.id,
            to = ?relocation.plan.entries.first().map(|entry| entry.address),
            "re-homing displaced hand item"
        );
        Ok(relocation.mutations)
    }
}
