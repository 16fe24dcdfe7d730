use super::table;
use crate::env::{InventoryEnv, ItemTemplate};
use crate::error::InventoryError;
use crate::slots::EquipmentSlot;
use crate::state::{PlayerContext, PlayerInventory, StackId};

/// Picks the equipment slot an item should land in.
pub struct EquipSlotResolver<'a> {
    inventory: &'a PlayerInventory,
    context: &'a PlayerContext,
    env: &'a InventoryEnv<'a>,
}

impl<'a> EquipSlotResolver<'a> {
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

    /// Resolves the target slot for equipping `stack` of `template`.
    ///
    /// Order: the requested slot when it is a candidate and free (or swapping
    /// is allowed); the first free candidate; then, when swapping is allowed,
    /// the occupied candidate with the lowest effective item level, ties going
    /// to the lowest candidate index.
    ///
    /// # Errors
    ///
    /// `NotEquippable` when the equip type has no candidates or every
    /// candidate is taken and swapping is not allowed.
    pub fn resolve(
        &self,
        stack: StackId,
        template: &ItemTemplate,
        requested: Option<u8>,
        allow_swap: bool,
    ) -> Result<u8, InventoryError> {
        let candidates = table::candidates(template.equip_type, self.context);
        let not_equippable = InventoryError::NotEquippable {
            template: template.id,
        };
        if candidates.is_empty() {
            return Err(not_equippable);
        }

        let mut states = Vec::with_capacity(candidates.len());
        for slot in candidates.iter().copied() {
            states.push((slot, self.occupancy(slot, stack)?));
        }

        if let Some(slot) = requested {
            if let Some((_, state)) = states.iter().find(|(candidate, _)| *candidate == slot) {
                if state.is_free() || allow_swap {
                    return Ok(slot);
                }
            }
        }

        if let Some((slot, _)) = states.iter().find(|(_, state)| state.is_free()) {
            return Ok(*slot);
        }

        if allow_swap {
            return states
                .iter()
                .enumerate()
                .min_by_key(|(index, (_, state))| (state.level(), *index))
                .map(|(_, (slot, _))| *slot)
                .ok_or(not_equippable);
        }

        Err(not_equippable)
    }

    fn occupancy(&self, slot: u8, equipping: StackId) -> Result<SlotState, InventoryError> {
        if let Some(occupant) = self.inventory.slot(slot).filter(|id| *id != equipping) {
            return Ok(SlotState::Occupied {
                level: self.effective_level(occupant)?,
            });
        }
        if slot == EquipmentSlot::OffHand.slot() {
            if let Some(main) = self.two_hander_in_main_hand(equipping)? {
                return Ok(SlotState::Blocked {
                    level: self.effective_level(main)?,
                });
            }
        }
        Ok(SlotState::Free)
    }

    /// Main-hand weapon that claims both hands, if any.
    pub fn two_hander_in_main_hand(
        &self,
        ignoring: StackId,
    ) -> Result<Option<StackId>, InventoryError> {
        let Some(main) = self
            .inventory
            .slot(EquipmentSlot::MainHand.slot())
            .filter(|id| *id != ignoring)
        else {
            return Ok(None);
        };
        let template = self.template_of(main)?;
        Ok(table::claims_both_hands(template.equip_type, self.context).then_some(main))
    }

    /// Upgraded item level, falling back to the template level.
    pub fn effective_level(&self, stack: StackId) -> Result<u16, InventoryError> {
        let record = self
            .inventory
            .stack(stack)
            .ok_or(InventoryError::ItemNotFound(stack))?;
        match record.item_level {
            Some(level) => Ok(level),
            None => Ok(self.env.template(record.template)?.item_level),
        }
    }

    fn template_of(&self, stack: StackId) -> Result<ItemTemplate, InventoryError> {
        let record = self
            .inventory
            .stack(stack)
            .ok_or(InventoryError::ItemNotFound(stack))?;
        Ok(self.env.template(record.template)?)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum SlotState {
    Free,
    Occupied { level: u16 },
    /// Empty off-hand held by a two-handed main-hand weapon.
    Blocked { level: u16 },
}

impl SlotState {
    fn is_free(&self) -> bool {
        matches!(self, SlotState::Free)
    }

    fn level(&self) -> u16 {
        match self {
            SlotState::Free => 0,
            SlotState::Occupied { level } | SlotState::Blocked { level } => *level,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slots::{SlotAddress, layout};
    use crate::state::Capabilities;
    use crate::testing::*;

    #[test]
    fn prefers_requested_then_first_free() {
        let content = content();
        let env = env(&content);
        let mut inventory = inventory();
        let band = inventory
            .seed_stack(&ring(), 1, SlotAddress::player(layout::BACKPACK.start))
            .unwrap();
        let resolver = EquipSlotResolver::new(&inventory, &CONTEXT, &env);

        let finger2 = EquipmentSlot::Finger2.slot();
        assert_eq!(resolver.resolve(band, &ring(), Some(finger2), false), Ok(finger2));
        assert_eq!(
            resolver.resolve(band, &ring(), None, false),
            Ok(EquipmentSlot::Finger1.slot())
        );
        // a requested slot outside the candidates falls through
        assert_eq!(
            resolver.resolve(band, &ring(), Some(EquipmentSlot::Head.slot()), false),
            Ok(EquipmentSlot::Finger1.slot())
        );
    }

    #[test]
    fn displaces_lowest_item_level_when_full() {
        let content = content();
        let env = env(&content);
        let mut inventory = inventory();
        let first = SlotAddress::player(EquipmentSlot::Trinket1.slot());
        let second = SlotAddress::player(EquipmentSlot::Trinket2.slot());
        inventory.seed_stack(&trinket_a(), 1, first).unwrap();
        let weaker = inventory.seed_stack(&trinket_b(), 1, second).unwrap();
        let incoming = inventory
            .seed_stack(&trinket_b(), 1, SlotAddress::player(layout::BACKPACK.start))
            .unwrap();
        assert!(trinket_b().item_level < trinket_a().item_level);

        let resolver = EquipSlotResolver::new(&inventory, &CONTEXT, &env);
        assert_eq!(
            resolver.resolve(incoming, &trinket_b(), None, false),
            Err(InventoryError::NotEquippable {
                template: TEMPLATE_TRINKET_B
            })
        );
        assert_eq!(resolver.resolve(incoming, &trinket_b(), None, true), Ok(second.slot));
        assert_eq!(resolver.effective_level(weaker), Ok(trinket_b().item_level));
    }

    #[test]
    fn two_hander_blocks_off_hand_for_dual_wielders() {
        let content = content();
        let env = env(&content);
        let mut inventory = inventory();
        inventory
            .seed_stack(&greatsword(), 1, SlotAddress::player(EquipmentSlot::MainHand.slot()))
            .unwrap();
        let dagger = inventory
            .seed_stack(&sword(), 1, SlotAddress::player(layout::BACKPACK.start))
            .unwrap();
        let dual = PlayerContext::new(70).with_capabilities(Capabilities::DUAL_WIELD);
        let resolver = EquipSlotResolver::new(&inventory, &dual, &env);

        assert!(resolver.resolve(dagger, &sword(), None, false).is_err());
        // both candidates displaceable; the greatsword level decides both, lowest index wins
        assert_eq!(
            resolver.resolve(dagger, &sword(), None, true),
            Ok(EquipmentSlot::MainHand.slot())
        );
    }
}
