//! Stack records.
//!
//! An [`ItemStack`] is one possession instance: a template reference, a
//! quantity, and where it currently sits. Stacks never hold raw references to
//! each other; parents, children and containers are linked by [`StackId`].

use arrayvec::ArrayVec;

use super::{PlayerId, StackId, TemplateId};
use crate::config::InventoryConfig;
use crate::slots::layout;

/// Where a stack currently sits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StackLocation {
    /// Directly in the player's flat slot array.
    Player(u8),
    /// In void storage.
    Void(u8),
    /// Inside the content slots of a bag.
    Bag { bag: StackId, slot: u8 },
}

impl StackLocation {
    /// Returns the containing bag, or `None` when the stack sits in a flat pool.
    pub fn container(&self) -> Option<StackId> {
        match self {
            StackLocation::Bag { bag, .. } => Some(*bag),
            StackLocation::Player(_) | StackLocation::Void(_) => None,
        }
    }

    pub fn slot(&self) -> u8 {
        match self {
            StackLocation::Player(slot) | StackLocation::Void(slot) => *slot,
            StackLocation::Bag { slot, .. } => *slot,
        }
    }
}

/// A concrete possession instance.
///
/// Invariant: `1 <= quantity <= max_stack` of its template. Records reaching a
/// quantity of zero are removed by the applier.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemStack {
    pub id: StackId,
    pub template: TemplateId,
    pub quantity: u32,
    pub owner: PlayerId,
    pub bound: bool,
    pub broken: bool,
    /// Set while the stack is being looted or traded; every change is refused.
    pub locked: bool,
    /// Upgraded item level; falls back to the template level when unset.
    pub item_level: Option<u16>,
    pub location: StackLocation,
    /// Parent this stack depends on (child equipment only).
    pub parent: Option<StackId>,
    /// Dependent child co-managed with this stack.
    pub child: Option<StackId>,
    /// Socket-embedded sub-items.
    pub sockets: ArrayVec<TemplateId, { InventoryConfig::MAX_SOCKETS }>,
}

impl ItemStack {
    pub fn new(
        id: StackId,
        template: TemplateId,
        quantity: u32,
        owner: PlayerId,
        location: StackLocation,
    ) -> Self {
        Self {
            id,
            template,
            quantity,
            owner,
            bound: false,
            broken: false,
            locked: false,
            item_level: None,
            location,
            parent: None,
            child: None,
            sockets: ArrayVec::new(),
        }
    }

    /// Copies the persistent attributes of `source` onto a fresh record.
    ///
    /// Links (parent, child) and sockets stay with the original.
    pub fn split_from(source: &ItemStack, id: StackId, quantity: u32, location: StackLocation) -> Self {
        Self {
            bound: source.bound,
            broken: source.broken,
            item_level: source.item_level,
            ..Self::new(id, source.template, quantity, source.owner, location)
        }
    }

    /// Returns true while the stack occupies an equipment or bag-holding slot.
    pub fn is_equipped(&self) -> bool {
        match self.location {
            StackLocation::Player(slot) => {
                layout::EQUIPMENT.contains(slot) || layout::is_bag_holder(slot)
            }
            StackLocation::Void(_) | StackLocation::Bag { .. } => false,
        }
    }

    /// Number of embedded sub-items of the given template.
    pub fn socketed(&self, template: TemplateId) -> u32 {
        self.sockets.iter().filter(|gem| **gem == template).count() as u32
    }
}
