//! Bag content storage.

use super::StackId;
use crate::env::{BagFamily, ItemTemplate};

/// Content slots of a bag item.
///
/// Every bag stack owns exactly one container record for as long as it
/// exists, regardless of where the bag itself sits. Contents are only
/// addressable while the bag occupies a bag-holding slot.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Container {
    pub bag: StackId,
    pub family: BagFamily,
    slots: Vec<Option<StackId>>,
}

impl Container {
    pub fn new(bag: StackId, family: BagFamily, capacity: u8) -> Self {
        Self {
            bag,
            family,
            slots: vec![None; capacity as usize],
        }
    }

    /// Container record for a new stack of `template`, if it is a bag.
    pub fn for_template(bag: StackId, template: &ItemTemplate) -> Option<Self> {
        template
            .is_container()
            .then(|| Self::new(bag, template.bag_family, template.container_slots))
    }

    pub fn capacity(&self) -> u8 {
        self.slots.len() as u8
    }

    pub fn get(&self, slot: u8) -> Option<StackId> {
        self.slots.get(slot as usize).copied().flatten()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    pub fn occupied(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    /// Occupied slots in ascending slot order.
    pub fn contents(&self) -> impl Iterator<Item = (u8, StackId)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(slot, id)| id.map(|id| (slot as u8, id)))
    }

    pub(crate) fn slot_mut(&mut self, slot: u8) -> Option<&mut Option<StackId>> {
        self.slots.get_mut(slot as usize)
    }
}
