//! Authoritative inventory state representation.
//!
//! This module owns the stack, container and per-character aggregate types.
//! Runtime layers clone or query this state but mutate it exclusively through
//! the engine.
pub mod context;
pub mod inventory;
pub mod types;

pub use context::{Capabilities, PlayerContext, PlayerStatus};
pub use inventory::{InventoryLimits, PlayerInventory};
pub use types::{
    Container, ItemStack, LimitCategoryId, PlayerId, StackId, StackLocation, TemplateId,
};
