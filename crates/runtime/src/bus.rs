//! Broadcast bus for committed inventory events.

use inventory_core::{InventoryEvent, NotificationSink, PlayerId};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Events committed by one request, addressed to the owning character.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryNotice {
    pub owner: PlayerId,
    pub events: Vec<InventoryEvent>,
}

/// Fans committed events out to every subscriber.
///
/// Delivery is best-effort: a notice published with no subscribers is
/// dropped, and slow subscribers observe `RecvError::Lagged`.
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<InventoryNotice>,
}

impl EventBus {
    pub const DEFAULT_CAPACITY: usize = 256;

    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    pub fn publish(&self, notice: InventoryNotice) {
        let owner = notice.owner;
        if self.sender.send(notice).is_err() {
            tracing::trace!(%owner, "no subscribers for inventory notice");
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<InventoryNotice> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl NotificationSink for EventBus {
    fn notify(&self, owner: PlayerId, events: &[InventoryEvent]) {
        self.publish(InventoryNotice {
            owner,
            events: events.to_vec(),
        });
    }
}
