//! Mutation application.
//!
//! The applier is the only component that changes a [`crate::PlayerInventory`]
//! after construction. It consumes the mutation list produced by validation
//! and returns the committed events.
mod applier;
mod event;
mod mutation;

pub use applier::MutationApplier;
pub use event::InventoryEvent;
pub use mutation::Mutation;
