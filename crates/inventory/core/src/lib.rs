//! Deterministic inventory placement and equip-slot resolution.
//!
//! `inventory-core` decides where a character's possessions may legally be
//! stored, merged, equipped or exchanged across equipment, backpack, bags,
//! bank, reagent bank, buyback, void storage and child equipment slots. It
//! performs no I/O. All state mutation flows through
//! [`engine::InventoryEngine`], which validates a request into a list of
//! mutations and commits them atomically.
pub mod apply;
pub mod capacity;
pub mod config;
pub mod engine;
pub mod env;
pub mod equip;
pub mod error;
pub mod planner;
pub mod request;
pub mod slots;
pub mod state;

#[cfg(test)]
pub(crate) mod testing;

pub use apply::{InventoryEvent, Mutation, MutationApplier};
pub use config::InventoryConfig;
pub use engine::{
    CommitReport, InventoryEngine, MutationPlan, StoreOutcome, TransactionError,
    TransactionPhase, TransactionState,
};
pub use env::{
    BagFamily, BindPolicy, CategoriesSnapshot, ContentSnapshot, Env, EquipType, InventoryEnv,
    ItemOracle, ItemTemplate, LimitCategory, LimitCategoryOracle, LimitCondition, LimitMode,
    NotificationSink, OracleError, PersistenceSink, TemplateFlags, TemplatesSnapshot,
};
pub use equip::EquipSlotResolver;
pub use error::{Blocker, ErrorSeverity, InventoryError, InventoryFault, StructuralViolation};
pub use planner::{PlacementPlanner, PlacementRequest, Plan, PositionCount, Reservations};
pub use request::{
    AutoStoreRequest, BANK_STORAGE, CARRIED_STORAGE, DestroyRequest, EquipRequest,
    InventoryRequest, MoveRequest, ResizeRequest, SplitRequest, StoreRequest, SwapRequest,
};
pub use slots::{EquipmentSlot, Pool, PoolScope, SlotAddress};
pub use state::{
    Capabilities, Container, InventoryLimits, ItemStack, LimitCategoryId, PlayerContext,
    PlayerId, PlayerInventory, PlayerStatus, StackId, StackLocation, TemplateId,
};
