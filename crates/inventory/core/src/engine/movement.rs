//! Moves, swaps, splits and auto-store.

use std::collections::BTreeSet;

use super::MutationPlan;
use super::transition::RequestTransition;
use super::validate::Validation;
use crate::apply::Mutation;
use crate::capacity;
use crate::env::ItemTemplate;
use crate::equip;
use crate::error::{InventoryError, StructuralViolation};
use crate::planner::Reservations;
use crate::request::{AutoStoreRequest, MoveRequest, SplitRequest, SwapRequest};
use crate::slots::{self, EquipmentSlot, Pool, PoolScope, SlotAddress};
use crate::state::{ItemStack, StackId};

/// How a move treats an occupied destination.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) enum Occupied {
    /// Merge into a compatible stack, otherwise swap.
    MergeOrSwap,
    Swap,
}

/// Wraps `body` with the child detach/attach pairs of moving parents.
pub(super) fn with_children(cascades: Vec<(Mutation, Mutation)>, body: Vec<Mutation>) -> Vec<Mutation> {
    let (detaches, attaches): (Vec<_>, Vec<_>) = cascades.into_iter().unzip();
    detaches.into_iter().chain(body).chain(attaches).collect()
}

impl Validation<'_> {
    /// Plans moving a whole stack to `to`.
    pub(super) fn plan_move(
        &self,
        id: StackId,
        to: SlotAddress,
        occupied: Occupied,
        reservations: &mut Reservations,
    ) -> Result<Vec<Mutation>, InventoryError> {
        let stack = self.stack(id)?;
        let template = self.template_of(stack)?;
        let from = self.address(id)?;
        if from == to {
            return Ok(Vec::new());
        }
        if slots::validate(self.inventory, to)? == Pool::Buyback {
            return Err(InventoryError::InvalidSlot(to));
        }

        let Some(other) = self.inventory.stack_at(to) else {
            return self.plan_transfer(stack, &template, from, to, reservations);
        };
        let other_template = self.template_of(other)?;
        if occupied == Occupied::MergeOrSwap {
            let room = capacity::merge_room(other, &template, stack.bound);
            if room > 0 {
                return self.plan_merge(stack, &template, other, from, to, room);
            }
        }
        if template.is_container() && other_template.is_container() {
            return self.plan_bag_exchange(
                (stack, &template, from),
                (other, &other_template, to),
                reservations,
            );
        }
        self.plan_swap(
            (stack, &template, from),
            (other, &other_template, to),
            reservations,
        )
    }

    pub(super) fn is_loaded(&self, bag: StackId) -> bool {
        self.inventory
            .container(bag)
            .is_some_and(|container| !container.is_empty())
    }

    fn plan_transfer(
        &self,
        stack: &ItemStack,
        template: &ItemTemplate,
        from: SlotAddress,
        to: SlotAddress,
        reservations: &mut Reservations,
    ) -> Result<Vec<Mutation>, InventoryError> {
        let pool = self.check_leg(stack, template, from, to)?;
        reservations.block(to);
        let cascades = self.child_cascade(stack, reservations)?.into_iter().collect();
        let mut body = self.clear_hands(stack, template, to, None, reservations)?;
        body.extend(Mutation::relocate(stack.id, to));
        body.extend(self.landing(stack, template, pool));
        Ok(with_children(cascades, body))
    }

    fn plan_merge(
        &self,
        stack: &ItemStack,
        template: &ItemTemplate,
        target: &ItemStack,
        from: SlotAddress,
        to: SlotAddress,
        room: u32,
    ) -> Result<Vec<Mutation>, InventoryError> {
        self.guard(stack)?;
        self.guard(target)?;
        self.check_blockers(&[from, to])?;
        let quantity = stack.quantity.min(room);
        self.check_acquisition(stack, template, self.pool(from)?, self.pool(to)?, quantity)?;
        Ok(vec![
            Mutation::Shrink {
                stack: stack.id,
                by: quantity,
            },
            Mutation::Grow {
                stack: target.id,
                by: quantity,
            },
        ])
    }

    /// Exchanges two stacks; both legs are validated before anything is emitted.
    fn plan_swap(
        &self,
        (first, first_template, from): (&ItemStack, &ItemTemplate, SlotAddress),
        (second, second_template, to): (&ItemStack, &ItemTemplate, SlotAddress),
        reservations: &mut Reservations,
    ) -> Result<Vec<Mutation>, InventoryError> {
        let forward = self.check_leg(first, first_template, from, to)?;
        let reverse = self.check_leg(second, second_template, to, from)?;
        self.check_hand_exchange(first_template, second_template, from, to)?;
        reservations.block(from);
        reservations.block(to);

        let mut cascades = Vec::new();
        cascades.extend(self.child_cascade(first, reservations)?);
        cascades.extend(self.child_cascade(second, reservations)?);
        let mut body = self.clear_hands(first, first_template, to, Some(second.id), reservations)?;
        body.extend(self.clear_hands(second, second_template, from, Some(first.id), reservations)?);
        body.extend([
            Mutation::Detach { stack: first.id },
            Mutation::Detach { stack: second.id },
            Mutation::Attach {
                stack: first.id,
                to,
            },
            Mutation::Attach {
                stack: second.id,
                to: from,
            },
        ]);
        body.extend(self.landing(first, first_template, forward));
        body.extend(self.landing(second, second_template, reverse));
        Ok(with_children(cascades, body))
    }

    /// A main-hand/off-hand swap must not leave a both-hands weapon beside an off-hand.
    fn check_hand_exchange(
        &self,
        first: &ItemTemplate,
        second: &ItemTemplate,
        from: SlotAddress,
        to: SlotAddress,
    ) -> Result<(), InventoryError> {
        let main = EquipmentSlot::MainHand.slot();
        let off = EquipmentSlot::OffHand.slot();
        let is_hand = |address: SlotAddress| {
            address.is_player() && (address.slot == main || address.slot == off)
        };
        if !is_hand(from) || !is_hand(to) {
            return Ok(());
        }
        let lands_in_main = if to.slot == main { first } else { second };
        if equip::claims_both_hands(lands_in_main.equip_type, self.context) {
            return Err(InventoryError::NotEquippable {
                template: lands_in_main.id,
            });
        }
        Ok(())
    }

    fn plan_bag_exchange(
        &self,
        first: (&ItemStack, &ItemTemplate, SlotAddress),
        second: (&ItemStack, &ItemTemplate, SlotAddress),
        reservations: &mut Reservations,
    ) -> Result<Vec<Mutation>, InventoryError> {
        let both_held = self.pool(first.2)?.holds_bags() && self.pool(second.2)?.holds_bags();
        match (self.is_loaded(first.0.id), self.is_loaded(second.0.id)) {
            _ if both_held => self.plan_swap(first, second, reservations),
            (false, false) => self.plan_swap(first, second, reservations),
            (true, true) => Err(StructuralViolation::BagSwapNeedsEmptySide {
                first: first.0.id,
                second: second.0.id,
            }
            .into()),
            (true, false) => self.plan_content_transfer(first, second),
            (false, true) => self.plan_content_transfer(second, first),
        }
    }

    /// The empty bag takes the loaded bag's holder slot and its contents.
    ///
    /// Content slot indices are kept where they fit; the rest are packed into
    /// the lowest free indices.
    fn plan_content_transfer(
        &self,
        (full, full_template, held_at): (&ItemStack, &ItemTemplate, SlotAddress),
        (empty, empty_template, empty_at): (&ItemStack, &ItemTemplate, SlotAddress),
    ) -> Result<Vec<Mutation>, InventoryError> {
        self.guard(full)?;
        self.guard(empty)?;
        self.check_blockers(&[held_at, empty_at])?;
        let holder_pool =
            slots::accepts(self.inventory, self.context, held_at, empty_template, Some(empty.id))?;
        if !holder_pool.holds_bags() {
            return Err(StructuralViolation::BagSwapNeedsEmptySide {
                first: full.id,
                second: empty.id,
            }
            .into());
        }
        let empty_pool = slots::accepts(self.inventory, self.context, empty_at, full_template, None)?;
        self.check_acquisition(empty, empty_template, self.pool(empty_at)?, holder_pool, 1)?;
        self.check_acquisition(full, full_template, holder_pool, empty_pool, 1)?;

        let contents: Vec<(u8, StackId)> = self
            .inventory
            .container(full.id)
            .ok_or_else(|| InventoryError::internal("loaded bag without container"))?
            .contents()
            .collect();
        let capacity = empty_template.container_slots;
        if contents.len() > usize::from(capacity) {
            return Err(InventoryError::SpatialCapacityExceeded {
                shortfall: (contents.len() - usize::from(capacity)) as u32,
            });
        }

        let kept: BTreeSet<u8> = contents
            .iter()
            .map(|(slot, _)| *slot)
            .filter(|slot| *slot < capacity)
            .collect();
        let mut free = (0..capacity).filter(|slot| !kept.contains(slot));
        let mut placement = Vec::with_capacity(contents.len());
        for (slot, id) in &contents {
            let target = if *slot < capacity {
                *slot
            } else {
                free.next()
                    .ok_or_else(|| InventoryError::internal("content packing overflow"))?
            };
            placement.push((*id, SlotAddress::in_bag(held_at.slot, target)));
        }

        let family = empty_template.bag_family;
        let reagents_only = holder_pool.contents_pool() == Some(Pool::ReagentBagContents);
        for (id, address) in &placement {
            let item = self.stack(*id)?;
            self.guard(item)?;
            let template = self.template_of(item)?;
            let fits = (family.is_empty() || template.storage_family().intersects(family))
                && (!reagents_only || template.is_crafting_reagent());
            if !fits {
                return Err(InventoryError::WrongContainerType {
                    template: template.id,
                    address: *address,
                });
            }
        }

        let mut mutations: Vec<Mutation> = placement
            .iter()
            .map(|(id, _)| Mutation::Detach { stack: *id })
            .collect();
        mutations.extend([
            Mutation::Detach { stack: full.id },
            Mutation::Detach { stack: empty.id },
            Mutation::Attach {
                stack: empty.id,
                to: held_at,
            },
            Mutation::Attach {
                stack: full.id,
                to: empty_at,
            },
        ]);
        mutations.extend(
            placement
                .iter()
                .map(|(id, address)| Mutation::Attach {
                    stack: *id,
                    to: *address,
                }),
        );
        mutations.extend(self.landing(empty, empty_template, holder_pool));
        tracing::debug!(
            from = %full.id,
            to = %empty.id,
            moved = placement.len(),
            "bag contents transferred"
        );
        Ok(mutations)
    }
}

impl RequestTransition for MoveRequest {
    fn validate(&self, validation: &Validation<'_>) -> Result<MutationPlan, InventoryError> {
        let mutations = validation.plan_move(
            self.stack,
            self.to,
            Occupied::MergeOrSwap,
            &mut Reservations::new(),
        )?;
        Ok(MutationPlan::new(mutations))
    }
}

impl RequestTransition for SwapRequest {
    fn validate(&self, validation: &Validation<'_>) -> Result<MutationPlan, InventoryError> {
        slots::validate(validation.inventory, self.first)?;
        slots::validate(validation.inventory, self.second)?;
        let first = validation.inventory.stack_id_at(self.first);
        let second = validation.inventory.stack_id_at(self.second);
        let (stack, to) = match (first, second) {
            (None, None) => return Err(InventoryError::SlotEmpty(self.first)),
            (Some(stack), _) => (stack, self.second),
            (None, Some(stack)) => (stack, self.first),
        };
        let mutations =
            validation.plan_move(stack, to, Occupied::Swap, &mut Reservations::new())?;
        Ok(MutationPlan::new(mutations))
    }
}

impl RequestTransition for SplitRequest {
    fn validate(&self, validation: &Validation<'_>) -> Result<MutationPlan, InventoryError> {
        let stack = validation.stack(self.stack)?;
        if self.quantity == 0 || self.quantity > stack.quantity {
            return Err(InventoryError::InvalidQuantity(self.quantity));
        }
        if self.quantity == stack.quantity {
            return Err(StructuralViolation::SplitWholeStack { stack: stack.id }.into());
        }
        let template = validation.template_of(stack)?;
        let from = validation.address(stack.id)?;
        validation.guard(stack)?;
        validation.check_blockers(&[from, self.to])?;
        let from_pool = validation.pool(from)?;
        let to_pool = slots::validate(validation.inventory, self.to)?;
        if to_pool == Pool::Buyback || self.to == from {
            return Err(InventoryError::InvalidSlot(self.to));
        }

        let mutations = match validation.inventory.stack_at(self.to) {
            None => {
                slots::accepts(
                    validation.inventory,
                    validation.context,
                    self.to,
                    &template,
                    None,
                )?;
                validation.check_acquisition(stack, &template, from_pool, to_pool, self.quantity)?;
                if to_pool == Pool::Equipment && from_pool != Pool::Equipment {
                    capacity::can_equip_more(
                        validation.inventory,
                        validation.env,
                        validation.context,
                        &template,
                        self.quantity,
                        &[],
                    )?;
                }
                vec![Mutation::SplitOff {
                    from: stack.id,
                    quantity: self.quantity,
                    to: self.to,
                }]
            }
            Some(target) => {
                validation.guard(target)?;
                let room = capacity::merge_room(target, &template, stack.bound);
                if room < self.quantity {
                    return Err(InventoryError::SpatialCapacityExceeded {
                        shortfall: self.quantity - room,
                    });
                }
                validation.check_acquisition(stack, &template, from_pool, to_pool, self.quantity)?;
                vec![
                    Mutation::Shrink {
                        stack: stack.id,
                        by: self.quantity,
                    },
                    Mutation::Grow {
                        stack: target.id,
                        by: self.quantity,
                    },
                ]
            }
        };
        Ok(MutationPlan::new(mutations))
    }
}

impl RequestTransition for AutoStoreRequest {
    fn validate(&self, validation: &Validation<'_>) -> Result<MutationPlan, InventoryError> {
        let stack = validation.stack(self.stack)?;
        let template = validation.template_of(stack)?;
        let from = validation.address(stack.id)?;
        validation.guard(stack)?;
        validation.check_blockers(&[from])?;
        if template.is_container() && validation.is_loaded(stack.id) {
            return Err(StructuralViolation::NonEmptyBag { bag: stack.id }.into());
        }
        if !validation.pool(from)?.is_owned() && self.scope.intersects(PoolScope::OWNED) {
            capacity::can_acquire_more(
                validation.inventory,
                validation.env,
                validation.context,
                &template,
                stack.quantity,
                Some(stack.id),
            )?;
        }

        let mut reservations = Reservations::new();
        let cascades = validation
            .child_cascade(stack, &mut reservations)?
            .into_iter()
            .collect();
        let relocation = validation.relocate(stack, self.scope, &mut reservations, true)?;
        Ok(MutationPlan::new(with_children(cascades, relocation.mutations)))
    }
}
