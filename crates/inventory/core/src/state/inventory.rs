//! Per-character inventory aggregate.
//!
//! [`PlayerInventory`] is an arena: stacks and containers are stored by id and
//! slots hold ids, never references. Read access is public; mutation is
//! reserved to the applier (`pub(crate)` helpers) plus a few host-side
//! seeding operations used when loading a character.

use std::collections::BTreeMap;

use super::{Container, ItemStack, PlayerId, StackId, StackLocation, TemplateId};
use crate::config::InventoryConfig;
use crate::env::ItemTemplate;
use crate::error::InventoryError;
use crate::slots::{self, Pool, PoolScope, SlotAddress, layout};

/// Live sizes of the variable pools.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InventoryLimits {
    pub backpack_slots: u8,
    pub bank_slots: u8,
    pub bank_bag_slots: u8,
    pub reagent_bank_unlocked: bool,
}

impl InventoryLimits {
    pub fn from_config(config: &InventoryConfig) -> Self {
        let config = config.clone().clamped();
        Self {
            backpack_slots: config.backpack_slots,
            bank_slots: config.bank_slots,
            bank_bag_slots: config.bank_bag_slots,
            reagent_bank_unlocked: config.reagent_bank_unlocked,
        }
    }
}

impl Default for InventoryLimits {
    fn default() -> Self {
        Self::from_config(&InventoryConfig::default())
    }
}

/// All pools, stacks and containers owned by one character.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlayerInventory {
    pub owner: PlayerId,
    pub limits: InventoryLimits,
    slots: Vec<Option<StackId>>,
    void_storage: Vec<Option<StackId>>,
    stacks: BTreeMap<StackId, ItemStack>,
    containers: BTreeMap<StackId, Container>,
    /// Sale order per buyback slot; the lowest stamp is overwritten first.
    buyback_stamps: Vec<u64>,
    buyback_sequence: u64,
    /// Sequential stack id allocator. Ids are never reused.
    next_stack_id: u64,
    /// Incremented once per committed request.
    nonce: u64,
}

impl PlayerInventory {
    pub fn new(owner: PlayerId, config: &InventoryConfig) -> Self {
        Self {
            owner,
            limits: InventoryLimits::from_config(config),
            slots: vec![None; layout::PLAYER_SLOT_COUNT as usize],
            void_storage: vec![None; InventoryConfig::VOID_STORAGE_SLOTS as usize],
            stacks: BTreeMap::new(),
            containers: BTreeMap::new(),
            buyback_stamps: vec![0; InventoryConfig::BUYBACK_SLOTS as usize],
            buyback_sequence: 0,
            next_stack_id: 1,
            nonce: 0,
        }
    }

    #[inline]
    pub fn nonce(&self) -> u64 {
        self.nonce
    }

    pub fn stack(&self, id: StackId) -> Option<&ItemStack> {
        self.stacks.get(&id)
    }

    pub fn stacks(&self) -> impl Iterator<Item = &ItemStack> {
        self.stacks.values()
    }

    pub fn stack_count(&self) -> usize {
        self.stacks.len()
    }

    /// Container record owned by a bag stack, wherever the bag sits.
    pub fn container(&self, bag: StackId) -> Option<&Container> {
        self.containers.get(&bag)
    }

    /// Container of the bag held in flat slot `holder`.
    pub fn container_in(&self, holder: u8) -> Option<&Container> {
        if !layout::is_bag_holder(holder) {
            return None;
        }
        self.slots
            .get(holder as usize)
            .copied()
            .flatten()
            .and_then(|bag| self.containers.get(&bag))
    }

    pub fn stack_id_at(&self, address: SlotAddress) -> Option<StackId> {
        match address.container {
            SlotAddress::PLAYER => self.slots.get(address.slot as usize).copied().flatten(),
            SlotAddress::VOID => self
                .void_storage
                .get(address.slot as usize)
                .copied()
                .flatten(),
            holder => self.container_in(holder)?.get(address.slot),
        }
    }

    pub fn stack_at(&self, address: SlotAddress) -> Option<&ItemStack> {
        self.stack_id_at(address).and_then(|id| self.stacks.get(&id))
    }

    /// Current address of a stack, or `None` when its bag is not held in a bag slot.
    pub fn address_of(&self, id: StackId) -> Option<SlotAddress> {
        let stack = self.stacks.get(&id)?;
        self.address_for(stack.location)
    }

    pub(crate) fn address_for(&self, location: StackLocation) -> Option<SlotAddress> {
        match location {
            StackLocation::Player(slot) => Some(SlotAddress::player(slot)),
            StackLocation::Void(slot) => Some(SlotAddress::void(slot)),
            StackLocation::Bag { bag, slot } => match self.stacks.get(&bag)?.location {
                StackLocation::Player(holder) if layout::is_bag_holder(holder) => {
                    Some(SlotAddress::in_bag(holder, slot))
                }
                _ => None,
            },
        }
    }

    /// Location a stack records when it lands at `address`.
    pub(crate) fn location_for(&self, address: SlotAddress) -> Option<StackLocation> {
        match address.container {
            SlotAddress::PLAYER => Some(StackLocation::Player(address.slot)),
            SlotAddress::VOID => Some(StackLocation::Void(address.slot)),
            holder => Some(StackLocation::Bag {
                bag: self.slots.get(holder as usize).copied().flatten()?,
                slot: address.slot,
            }),
        }
    }

    /// Pool a stack currently sits in.
    pub fn pool_of(&self, id: StackId) -> Option<Pool> {
        self.address_of(id).and_then(layout::classify)
    }

    /// Stacks in the given scope, in ascending address order.
    pub fn stacks_in(&self, scope: PoolScope) -> Vec<(SlotAddress, &ItemStack)> {
        let mut found: Vec<(SlotAddress, &ItemStack)> = self
            .stacks
            .values()
            .filter_map(|stack| {
                let address = self.address_for(stack.location)?;
                let pool = layout::classify(address)?;
                scope.contains(pool.scope()).then_some((address, stack))
            })
            .collect();
        found.sort_by_key(|(address, _)| *address);
        found
    }

    /// Occupant of a flat slot.
    pub fn slot(&self, slot: u8) -> Option<StackId> {
        self.slots.get(slot as usize).copied().flatten()
    }

    /// Sale stamp of a buyback slot (0 = never used).
    pub fn buyback_stamp(&self, slot: u8) -> u64 {
        slot.checked_sub(layout::BUYBACK.start)
            .and_then(|index| self.buyback_stamps.get(index as usize))
            .copied()
            .unwrap_or(0)
    }

    /// Next buyback slot to fill: the first empty one, else the oldest sale.
    pub fn next_buyback_slot(&self) -> u8 {
        layout::BUYBACK
            .iter()
            .find(|slot| self.slot(*slot).is_none())
            .or_else(|| {
                layout::BUYBACK
                    .iter()
                    .min_by_key(|slot| (self.buyback_stamp(*slot), *slot))
            })
            .unwrap_or(layout::BUYBACK.start)
    }

    /// Places a freshly constructed stack at an empty live address.
    ///
    /// This is the host-side entry for stacks built by an item factory (e.g.
    /// when loading a character); it checks addressing and occupancy but none
    /// of the placement rules.
    pub fn seed_stack(
        &mut self,
        template: &ItemTemplate,
        quantity: u32,
        address: SlotAddress,
    ) -> Result<StackId, InventoryError> {
        if quantity == 0 || quantity > template.max_stack {
            return Err(InventoryError::InvalidQuantity(quantity));
        }
        slots::validate(self, address)?;
        if self.stack_id_at(address).is_some() {
            return Err(InventoryError::InvalidSlot(address));
        }
        let location = self
            .location_for(address)
            .ok_or(InventoryError::InvalidSlot(address))?;
        let id = self.allocate_id();
        self.insert_stack(
            ItemStack::new(id, template.id, quantity, self.owner, location),
            Container::for_template(id, template),
        );
        self.occupy(address, id)?;
        Ok(id)
    }

    /// Links a dependent child to its parent.
    pub fn link_child(&mut self, parent: StackId, child: StackId) -> Result<(), InventoryError> {
        if !self.stacks.contains_key(&child) {
            return Err(InventoryError::ItemNotFound(child));
        }
        let parent_stack = self
            .stacks
            .get_mut(&parent)
            .ok_or(InventoryError::ItemNotFound(parent))?;
        parent_stack.child = Some(child);
        if let Some(child_stack) = self.stacks.get_mut(&child) {
            child_stack.parent = Some(parent);
        }
        Ok(())
    }

    /// Marks a stack as locked (mid-loot or trade) or releases it.
    pub fn set_locked(&mut self, id: StackId, locked: bool) -> Result<(), InventoryError> {
        self.stacks
            .get_mut(&id)
            .map(|stack| stack.locked = locked)
            .ok_or(InventoryError::ItemNotFound(id))
    }

    /// Embeds a socketed sub-item into a stack.
    pub fn socket(&mut self, id: StackId, gem: TemplateId) -> Result<(), InventoryError> {
        let stack = self
            .stacks
            .get_mut(&id)
            .ok_or(InventoryError::ItemNotFound(id))?;
        stack
            .sockets
            .try_push(gem)
            .map_err(|_| InventoryError::InvalidQuantity(InventoryConfig::MAX_SOCKETS as u32 + 1))
    }

    // ===== applier-only mutation =====

    pub(crate) fn allocate_id(&mut self) -> StackId {
        let id = StackId(self.next_stack_id);
        self.next_stack_id += 1;
        id
    }

    pub(crate) fn bump_nonce(&mut self) {
        self.nonce = self.nonce.wrapping_add(1);
    }

    pub(crate) fn stack_mut(&mut self, id: StackId) -> Option<&mut ItemStack> {
        self.stacks.get_mut(&id)
    }

    /// Inserts a stack record together with its container record, if any.
    pub(crate) fn insert_stack(&mut self, stack: ItemStack, container: Option<Container>) {
        if let Some(container) = container {
            self.containers.insert(stack.id, container);
        }
        self.stacks.insert(stack.id, stack);
    }

    /// Removes a stack record and its container record, if any.
    pub(crate) fn remove_stack(&mut self, id: StackId) -> Option<ItemStack> {
        self.containers.remove(&id);
        self.stacks.remove(&id)
    }

    /// Clears the slot holding `id`. Returns the address it was freed from.
    pub(crate) fn vacate(&mut self, id: StackId) -> Result<SlotAddress, InventoryError> {
        let location = self
            .stacks
            .get(&id)
            .map(|stack| stack.location)
            .ok_or(InventoryError::ItemNotFound(id))?;
        let address = self
            .address_for(location)
            .ok_or_else(|| InventoryError::internal("vacated stack is not addressable"))?;
        let cell = self.cell_mut(location)?;
        if *cell != Some(id) {
            return Err(InventoryError::internal("slot does not hold the vacated stack"));
        }
        *cell = None;
        Ok(address)
    }

    /// Puts `id` into an empty slot and records the new location on the stack.
    pub(crate) fn occupy(&mut self, address: SlotAddress, id: StackId) -> Result<(), InventoryError> {
        let location = self
            .location_for(address)
            .ok_or(InventoryError::InvalidSlot(address))?;
        let cell = self.cell_mut(location)?;
        if cell.is_some() {
            return Err(InventoryError::internal("occupied slot targeted by attach"));
        }
        *cell = Some(id);
        let stack = self
            .stacks
            .get_mut(&id)
            .ok_or(InventoryError::ItemNotFound(id))?;
        stack.location = location;
        if layout::BUYBACK.contains(address.slot) && address.is_player() {
            self.stamp_buyback(address.slot);
        }
        Ok(())
    }

    /// Sets the live size of a resizable pool.
    pub(crate) fn set_live(&mut self, pool: Pool, live: u8) -> Result<(), InventoryError> {
        let limits = &mut self.limits;
        match pool {
            Pool::Backpack => limits.backpack_slots = live.min(layout::BACKPACK.len()),
            Pool::Bank => limits.bank_slots = live.min(layout::BANK.len()),
            Pool::BankBagSlots => limits.bank_bag_slots = live.min(layout::BANK_BAGS.len()),
            Pool::ReagentBank => limits.reagent_bank_unlocked = live > 0,
            other => return Err(InventoryError::PoolLocked(other)),
        }
        Ok(())
    }

    fn cell_mut(&mut self, location: StackLocation) -> Result<&mut Option<StackId>, InventoryError> {
        let cell = match location {
            StackLocation::Player(slot) => self.slots.get_mut(slot as usize),
            StackLocation::Void(slot) => self.void_storage.get_mut(slot as usize),
            StackLocation::Bag { bag, slot } => self
                .containers
                .get_mut(&bag)
                .and_then(|container| container.slot_mut(slot)),
        };
        cell.ok_or_else(|| InventoryError::internal("location outside storage"))
    }

    fn stamp_buyback(&mut self, slot: u8) {
        self.buyback_sequence += 1;
        if let Some(stamp) = self
            .buyback_stamps
            .get_mut((slot - layout::BUYBACK.start) as usize)
        {
            *stamp = self.buyback_sequence;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::{BagFamily, EquipType};

    fn bag_template() -> ItemTemplate {
        ItemTemplate::container(TemplateId(900), EquipType::Bag, 4, BagFamily::empty())
    }

    #[test]
    fn seeded_bag_contents_are_addressable_through_holder() {
        let mut inventory = PlayerInventory::new(PlayerId(1), &InventoryConfig::default());
        let holder = layout::EQUIPPED_BAGS.start;
        let bag = inventory
            .seed_stack(&bag_template(), 1, SlotAddress::player(holder))
            .unwrap();
        let coin = ItemTemplate::new(TemplateId(1), 50);
        let inside = inventory
            .seed_stack(&coin, 7, SlotAddress::in_bag(holder, 2))
            .unwrap();

        assert_eq!(inventory.container_in(holder).map(|c| c.bag), Some(bag));
        assert_eq!(inventory.address_of(inside), Some(SlotAddress::in_bag(holder, 2)));
        assert_eq!(inventory.pool_of(inside), Some(Pool::BagContents));
        assert_eq!(
            inventory.stack(inside).map(|s| s.location),
            Some(StackLocation::Bag { bag, slot: 2 })
        );
    }

    #[test]
    fn seeding_rejects_dead_and_occupied_slots() {
        let mut inventory = PlayerInventory::new(PlayerId(1), &InventoryConfig::default());
        let coin = ItemTemplate::new(TemplateId(1), 50);
        let beyond_live = SlotAddress::player(layout::BACKPACK.start + 16);
        assert_eq!(
            inventory.seed_stack(&coin, 1, beyond_live),
            Err(InventoryError::InvalidSlot(beyond_live))
        );

        let first = SlotAddress::player(layout::BACKPACK.start);
        inventory.seed_stack(&coin, 1, first).unwrap();
        assert!(inventory.seed_stack(&coin, 1, first).is_err());
        assert_eq!(
            inventory.seed_stack(&coin, 51, SlotAddress::player(layout::BACKPACK.start + 1)),
            Err(InventoryError::InvalidQuantity(51))
        );
    }

    #[test]
    fn buyback_prefers_empty_then_oldest() {
        let mut inventory = PlayerInventory::new(PlayerId(1), &InventoryConfig::default());
        assert_eq!(inventory.next_buyback_slot(), layout::BUYBACK.start);

        let junk = ItemTemplate::new(TemplateId(5), 1);
        for slot in layout::BUYBACK.iter() {
            let id = inventory.allocate_id();
            let stack = ItemStack::new(id, junk.id, 1, inventory.owner, StackLocation::Player(slot));
            inventory.insert_stack(stack, None);
            inventory.occupy(SlotAddress::player(slot), id).unwrap();
        }
        assert_eq!(inventory.next_buyback_slot(), layout::BUYBACK.start);

        let first = inventory.slot(layout::BUYBACK.start).unwrap();
        inventory.vacate(first).unwrap();
        inventory.occupy(SlotAddress::player(layout::BUYBACK.start), first).unwrap();
        assert_eq!(inventory.next_buyback_slot(), layout::BUYBACK.start + 1);
    }
}
