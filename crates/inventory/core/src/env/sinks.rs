//! Receivers of committed mutation events.
//!
//! Both sinks are invoked only after a request has fully committed. The
//! engine never waits on them and never rolls back when they fail.

use crate::apply::InventoryEvent;
use crate::state::PlayerId;

/// Downstream sync (network, UI).
pub trait NotificationSink: Send + Sync {
    fn notify(&self, owner: PlayerId, events: &[InventoryEvent]);
}

/// Write-behind durable storage.
pub trait PersistenceSink: Send + Sync {
    fn persist(&self, owner: PlayerId, events: &[InventoryEvent]);
}
