//! Host-side wiring for the inventory engine.
//!
//! The engine in `inventory-core` is synchronous and performs no I/O. This
//! crate supplies what a server embeds around it:
//! - [`service`] keeps one [`PlayerInventory`](inventory_core::PlayerInventory)
//!   per character and routes requests through the engine
//! - [`bus`] fans committed events out to subscribers over a broadcast channel
//! - [`persistence`] writes events and snapshots behind the engine on a worker task
//! - [`runtime`] loads content and starts the workers from a [`RuntimeConfig`]
//! - [`logging`] installs the tracing subscriber
pub mod bus;
pub mod config;
pub mod error;
pub mod logging;
pub mod persistence;
pub mod runtime;
pub mod service;

pub use bus::{EventBus, InventoryNotice};
pub use config::RuntimeConfig;
pub use error::{Result, RuntimeError};
pub use persistence::{EventRecord, PersistenceHandle, PersistenceWorker, SnapshotStore};
pub use runtime::InventoryRuntime;
pub use service::InventoryService;
