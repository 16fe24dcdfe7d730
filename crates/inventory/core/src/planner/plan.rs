use crate::slots::{PoolScope, SlotAddress};
use crate::state::{StackId, TemplateId};

/// One placement directive: deposit `quantity` units at `address`.
///
/// `merge_into` names the stack already sitting there; `None` means the slot
/// is empty and a new stack will be created (or relocated) into it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PositionCount {
    pub address: SlotAddress,
    pub quantity: u32,
    pub merge_into: Option<StackId>,
}

impl PositionCount {
    pub fn is_merge(&self) -> bool {
        self.merge_into.is_some()
    }
}

/// Ordered placement directives for one deposit request.
///
/// Invariant: no address appears twice, and
/// `placed() + shortfall == requested`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Plan {
    pub template: Option<TemplateId>,
    pub requested: u32,
    pub entries: Vec<PositionCount>,
    pub shortfall: u32,
}

impl Plan {
    pub fn placed(&self) -> u32 {
        self.entries.iter().map(|entry| entry.quantity).sum()
    }

    pub fn is_complete(&self) -> bool {
        self.shortfall == 0
    }

    pub fn contains(&self, address: SlotAddress) -> bool {
        self.entries.iter().any(|entry| entry.address == address)
    }

    pub fn merges(&self) -> impl Iterator<Item = &PositionCount> {
        self.entries.iter().filter(|entry| entry.is_merge())
    }

    pub fn empties(&self) -> impl Iterator<Item = &PositionCount> {
        self.entries.iter().filter(|entry| !entry.is_merge())
    }
}

/// Deposit request handed to the planner.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlacementRequest {
    pub template: TemplateId,
    pub quantity: u32,
    pub scope: PoolScope,
    /// Flat slot of the bag whose contents should be tried first.
    pub container: Option<u8>,
    pub slot: Option<SlotAddress>,
    /// Stack being relocated; never used as a merge target.
    pub exclude: Option<StackId>,
    /// Binding state of the units being placed; merges require a match.
    pub bound: bool,
}

impl PlacementRequest {
    pub fn new(template: TemplateId, quantity: u32, scope: PoolScope) -> Self {
        Self {
            template,
            quantity,
            scope,
            container: None,
            slot: None,
            exclude: None,
            bound: false,
        }
    }

    pub fn in_container(mut self, holder: u8) -> Self {
        self.container = Some(holder);
        self
    }

    pub fn at_slot(mut self, slot: SlotAddress) -> Self {
        self.slot = Some(slot);
        self
    }

    pub fn excluding(mut self, stack: StackId) -> Self {
        self.exclude = Some(stack);
        self
    }

    pub fn bound(mut self, bound: bool) -> Self {
        self.bound = bound;
        self
    }
}
