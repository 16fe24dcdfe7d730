//! Inventory requests accepted by [`crate::InventoryEngine::execute`].
//!
//! Every operation the engine performs is expressed as an
//! [`InventoryRequest`] so hosts can log, queue and serialize them.

use crate::slots::{Pool, PoolScope, SlotAddress};
use crate::state::{StackId, TemplateId};

/// Default scope for new items: backpack and equipped bag contents.
pub const CARRIED_STORAGE: PoolScope = PoolScope::BACKPACK
    .union(PoolScope::BAG_CONTENTS)
    .union(PoolScope::REAGENT_BAG_CONTENTS);

/// Bank storage searched by deposits.
pub const BANK_STORAGE: PoolScope = PoolScope::BANK
    .union(PoolScope::BANK_BAG_CONTENTS)
    .union(PoolScope::REAGENT_BANK);

/// Deposit `quantity` new units of a template.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StoreRequest {
    pub template: TemplateId,
    pub quantity: u32,
    pub scope: PoolScope,
    /// Flat slot of a bag whose contents are tried first.
    pub container: Option<u8>,
    /// Exact target. Equipped, bag-holder and buyback slots are refused.
    pub slot: Option<SlotAddress>,
    /// Accept a reduced quantity instead of failing on limits or space.
    pub partial: bool,
}

impl StoreRequest {
    pub fn new(template: TemplateId, quantity: u32) -> Self {
        Self {
            template,
            quantity,
            scope: CARRIED_STORAGE,
            container: None,
            slot: None,
            partial: false,
        }
    }

    pub fn with_scope(mut self, scope: PoolScope) -> Self {
        self.scope = scope;
        self
    }

    pub fn in_container(mut self, holder: u8) -> Self {
        self.container = Some(holder);
        self
    }

    pub fn at_slot(mut self, slot: SlotAddress) -> Self {
        self.slot = Some(slot);
        self
    }

    pub fn partial(mut self) -> Self {
        self.partial = true;
        self
    }
}

/// Equip a stack, resolving the target slot from its equip type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EquipRequest {
    pub stack: StackId,
    pub slot: Option<u8>,
    pub allow_swap: bool,
}

/// Move a stack to an address: plain move, merge, or swap with the occupant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MoveRequest {
    pub stack: StackId,
    pub to: SlotAddress,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SplitRequest {
    pub stack: StackId,
    pub quantity: u32,
    pub to: SlotAddress,
}

/// Exchange the occupants of two addresses without merging.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SwapRequest {
    pub first: SlotAddress,
    pub second: SlotAddress,
}

/// Destroy part of a stack, or all of it when `quantity` is `None`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DestroyRequest {
    pub stack: StackId,
    pub quantity: Option<u32>,
}

/// Move a stack into another scope through the planner (bank, void storage, bags).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AutoStoreRequest {
    pub stack: StackId,
    pub scope: PoolScope,
}

/// Change the live size of a resizable pool.
///
/// Valid pools: backpack, bank, bank bag slots, and the reagent bank
/// (any non-zero size unlocks it).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResizeRequest {
    pub pool: Pool,
    pub live: u8,
}

#[derive(Clone, Debug, PartialEq, Eq, strum::IntoStaticStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum InventoryRequest {
    Store(StoreRequest),
    StoreBatch(Vec<StoreRequest>),
    Equip(EquipRequest),
    Move(MoveRequest),
    Split(SplitRequest),
    Swap(SwapRequest),
    Destroy(DestroyRequest),
    /// Move a stack into the buyback ring.
    Sell { stack: StackId },
    /// Return the stack in a buyback slot to carried storage.
    BuyBack { slot: u8 },
    /// Move every crafting reagent from backpack and bags into the reagent bank.
    DepositReagents,
    AutoStore(AutoStoreRequest),
    Resize(ResizeRequest),
}

impl InventoryRequest {
    pub fn as_str(&self) -> &'static str {
        self.into()
    }
}
