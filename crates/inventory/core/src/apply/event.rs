use crate::slots::{Pool, SlotAddress};
use crate::state::{StackId, TemplateId};

/// Committed change, emitted by the applier in application order.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InventoryEvent {
    Created {
        stack: StackId,
        template: TemplateId,
        quantity: u32,
        at: SlotAddress,
    },
    QuantityChanged {
        stack: StackId,
        from: u32,
        to: u32,
    },
    Moved {
        stack: StackId,
        from: Option<SlotAddress>,
        to: SlotAddress,
    },
    Bound {
        stack: StackId,
    },
    Removed {
        stack: StackId,
        template: TemplateId,
        from: Option<SlotAddress>,
    },
    Resized {
        pool: Pool,
        live: u8,
    },
}

impl InventoryEvent {
    /// Stack the event is about, if any.
    pub fn stack(&self) -> Option<StackId> {
        match self {
            InventoryEvent::Created { stack, .. }
            | InventoryEvent::QuantityChanged { stack, .. }
            | InventoryEvent::Moved { stack, .. }
            | InventoryEvent::Bound { stack }
            | InventoryEvent::Removed { stack, .. } => Some(*stack),
            InventoryEvent::Resized { .. } => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            InventoryEvent::Created { .. } => "created",
            InventoryEvent::QuantityChanged { .. } => "quantity_changed",
            InventoryEvent::Moved { .. } => "moved",
            InventoryEvent::Bound { .. } => "bound",
            InventoryEvent::Removed { .. } => "removed",
            InventoryEvent::Resized { .. } => "resized",
        }
    }
}
