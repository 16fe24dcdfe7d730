use std::collections::{BTreeMap, VecDeque};

use super::{InventoryEvent, Mutation};
use crate::config::InventoryConfig;
use crate::error::InventoryError;
use crate::slots::SlotAddress;
use crate::state::{Container, ItemStack, PlayerInventory, StackId};

/// Applies validated mutations to an inventory.
///
/// The applier performs no rule checks. It fails only when the mutations
/// contradict the state they were planned against, which indicates a bug.
/// Cascades (drained stacks, children of removed parents) are queued on a
/// bounded worklist rather than applied recursively.
#[derive(Clone, Copy, Debug)]
pub struct MutationApplier {
    max_steps: u16,
}

impl MutationApplier {
    pub fn new(max_steps: u16) -> Self {
        Self {
            max_steps: max_steps.max(1),
        }
    }

    pub fn from_config(config: &InventoryConfig) -> Self {
        Self::new(config.max_apply_steps)
    }

    pub fn apply(
        &self,
        inventory: &mut PlayerInventory,
        mutations: Vec<Mutation>,
    ) -> Result<Vec<InventoryEvent>, InventoryError> {
        let budget = mutations.len() + usize::from(self.max_steps);
        let mut run = Run {
            inventory,
            queue: mutations.into(),
            detached: BTreeMap::new(),
            events: Vec::new(),
        };
        let mut steps = 0usize;
        while let Some(mutation) = run.queue.pop_front() {
            steps += 1;
            if steps > budget {
                return Err(InventoryError::internal("mutation worklist exceeded step bound"));
            }
            run.step(mutation)?;
        }
        if !run.detached.is_empty() {
            return Err(InventoryError::internal("stack detached without being re-attached"));
        }
        Ok(run.events)
    }
}

impl Default for MutationApplier {
    fn default() -> Self {
        Self::new(InventoryConfig::DEFAULT_MAX_APPLY_STEPS)
    }
}

struct Run<'a> {
    inventory: &'a mut PlayerInventory,
    queue: VecDeque<Mutation>,
    /// Stacks lifted out of their slot, with the address they left.
    detached: BTreeMap<StackId, SlotAddress>,
    events: Vec<InventoryEvent>,
}

impl Run<'_> {
    fn step(&mut self, mutation: Mutation) -> Result<(), InventoryError> {
        match mutation {
            Mutation::Create {
                template,
                quantity,
                bound,
                to,
            } => {
                let id = self.inventory.allocate_id();
                let location = self
                    .inventory
                    .location_for(to)
                    .ok_or(InventoryError::InvalidSlot(to))?;
                let owner = self.inventory.owner;
                let mut stack = ItemStack::new(id, template.id, quantity, owner, location);
                stack.bound = bound;
                self.inventory
                    .insert_stack(stack, Container::for_template(id, &template));
                self.inventory.occupy(to, id)?;
                self.events.push(InventoryEvent::Created {
                    stack: id,
                    template: template.id,
                    quantity,
                    at: to,
                });
            }
            Mutation::SplitOff { from, quantity, to } => {
                let source = self.stack(from)?.clone();
                if quantity == 0 || quantity >= source.quantity {
                    return Err(InventoryError::internal("split would drain the source stack"));
                }
                let id = self.inventory.allocate_id();
                let location = self
                    .inventory
                    .location_for(to)
                    .ok_or(InventoryError::InvalidSlot(to))?;
                self.set_quantity(from, source.quantity - quantity)?;
                self.inventory
                    .insert_stack(ItemStack::split_from(&source, id, quantity, location), None);
                self.inventory.occupy(to, id)?;
                self.events.push(InventoryEvent::Created {
                    stack: id,
                    template: source.template,
                    quantity,
                    at: to,
                });
            }
            Mutation::Grow { stack, by } => {
                let current = self.stack(stack)?.quantity;
                self.set_quantity(stack, current.saturating_add(by))?;
            }
            Mutation::Shrink { stack, by } => {
                let current = self.stack(stack)?.quantity;
                let left = current
                    .checked_sub(by)
                    .ok_or_else(|| InventoryError::internal("shrink below zero"))?;
                self.set_quantity(stack, left)?;
                if left == 0 {
                    self.queue.push_front(Mutation::Remove { stack });
                }
            }
            Mutation::Detach { stack } => {
                let from = self.inventory.vacate(stack)?;
                self.detached.insert(stack, from);
            }
            Mutation::Attach { stack, to } => {
                self.inventory.occupy(to, stack)?;
                let from = self.detached.remove(&stack);
                self.events.push(InventoryEvent::Moved { stack, from, to });
            }
            Mutation::Bind { stack } => {
                let record = self
                    .inventory
                    .stack_mut(stack)
                    .ok_or(InventoryError::ItemNotFound(stack))?;
                if !record.bound {
                    record.bound = true;
                    self.events.push(InventoryEvent::Bound { stack });
                }
            }
            Mutation::Remove { stack } => self.remove(stack)?,
            Mutation::Resize { pool, live } => {
                self.inventory.set_live(pool, live)?;
                self.events.push(InventoryEvent::Resized { pool, live });
            }
        }
        Ok(())
    }

    fn stack(&self, id: StackId) -> Result<&ItemStack, InventoryError> {
        self.inventory
            .stack(id)
            .ok_or(InventoryError::ItemNotFound(id))
    }

    fn set_quantity(&mut self, id: StackId, quantity: u32) -> Result<(), InventoryError> {
        let record = self
            .inventory
            .stack_mut(id)
            .ok_or(InventoryError::ItemNotFound(id))?;
        let from = record.quantity;
        record.quantity = quantity;
        self.events.push(InventoryEvent::QuantityChanged {
            stack: id,
            from,
            to: quantity,
        });
        Ok(())
    }

    /// Removes a stack. Already-removed stacks are skipped so cascades may
    /// name the same child twice.
    fn remove(&mut self, id: StackId) -> Result<(), InventoryError> {
        let Some(record) = self.inventory.stack(id).cloned() else {
            return Ok(());
        };

        let contents: Vec<StackId> = self
            .inventory
            .container(id)
            .map(|container| container.contents().map(|(_, item)| item).collect())
            .unwrap_or_default();
        for item in contents {
            self.detach_and_drop(item)?;
        }

        if let Some(child) = record.child {
            self.queue.push_front(Mutation::Remove { stack: child });
        }
        if let Some(parent) = record.parent {
            if let Some(parent) = self.inventory.stack_mut(parent) {
                parent.child = None;
            }
        }
        self.detach_and_drop(id)
    }

    fn detach_and_drop(&mut self, id: StackId) -> Result<(), InventoryError> {
        let from = match self.detached.remove(&id) {
            Some(address) => Some(address),
            None => Some(self.inventory.vacate(id)?),
        };
        let record = self
            .inventory
            .remove_stack(id)
            .ok_or(InventoryError::ItemNotFound(id))?;
        self.events.push(InventoryEvent::Removed {
            stack: id,
            template: record.template,
            from,
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slots::layout;
    use crate::testing::*;

    fn backpack(index: u8) -> SlotAddress {
        SlotAddress::player(layout::BACKPACK.start + index)
    }

    #[test]
    fn draining_a_stack_removes_it() {
        let mut inventory = inventory();
        let donor = inventory.seed_stack(&potion(), 5, backpack(0)).unwrap();
        let target = inventory.seed_stack(&potion(), 10, backpack(1)).unwrap();

        let events = MutationApplier::default()
            .apply(
                &mut inventory,
                vec![
                    Mutation::Shrink { stack: donor, by: 5 },
                    Mutation::Grow { stack: target, by: 5 },
                ],
            )
            .unwrap();

        assert!(inventory.stack(donor).is_none());
        assert_eq!(inventory.stack_id_at(backpack(0)), None);
        assert_eq!(inventory.stack(target).map(|s| s.quantity), Some(15));
        assert!(matches!(events[1], InventoryEvent::Removed { stack, .. } if stack == donor));
        assert!(matches!(
            events[2],
            InventoryEvent::QuantityChanged { from: 10, to: 15, .. }
        ));
    }

    #[test]
    fn removing_a_parent_removes_its_child() {
        let mut inventory = inventory();
        let parent = inventory
            .seed_stack(&sword(), 1, SlotAddress::player(layout::BACKPACK.start))
            .unwrap();
        let child = inventory
            .seed_stack(&child_item(), 1, SlotAddress::player(layout::CHILD_EQUIPMENT.start))
            .unwrap();
        inventory.link_child(parent, child).unwrap();

        MutationApplier::default()
            .apply(&mut inventory, vec![Mutation::Remove { stack: parent }])
            .unwrap();

        assert_eq!(inventory.stack_count(), 0);
        assert_eq!(inventory.slot(layout::CHILD_EQUIPMENT.start), None);
    }

    #[test]
    fn relocation_reports_origin_and_split_copies_binding() {
        let mut inventory = inventory();
        let stack = inventory.seed_stack(&potion(), 12, backpack(0)).unwrap();
        inventory.stack_mut(stack).unwrap().bound = true;

        let mut mutations = Mutation::relocate(stack, backpack(5)).to_vec();
        mutations.push(Mutation::SplitOff {
            from: stack,
            quantity: 4,
            to: backpack(6),
        });
        let events = MutationApplier::default()
            .apply(&mut inventory, mutations)
            .unwrap();

        assert_eq!(
            events[0],
            InventoryEvent::Moved {
                stack,
                from: Some(backpack(0)),
                to: backpack(5),
            }
        );
        let split = inventory.stack_at(backpack(6)).unwrap();
        assert_eq!(split.quantity, 4);
        assert!(split.bound);
        assert_eq!(inventory.stack(stack).map(|s| s.quantity), Some(8));
    }

    #[test]
    fn worklist_is_bounded() {
        let mut inventory = inventory();
        let mutations: Vec<Mutation> = (0..3)
            .map(|index| {
                let stack = inventory.seed_stack(&potion(), 4, backpack(index)).unwrap();
                Mutation::Shrink { stack, by: 4 }
            })
            .collect();

        // Three planned shrinks each queue a removal; only one follow-up fits.
        let result = MutationApplier::new(1).apply(&mut inventory, mutations);
        assert!(matches!(result, Err(InventoryError::Internal(_))));
    }
}
