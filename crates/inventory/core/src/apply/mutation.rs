use crate::env::ItemTemplate;
use crate::slots::{Pool, SlotAddress};
use crate::state::StackId;

/// A single validated state change.
///
/// Mutations are produced during validation and consumed in order by the
/// [`super::MutationApplier`]; they carry everything needed to apply them
/// without consulting oracles.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Mutation {
    /// New stack at an empty address.
    Create {
        template: ItemTemplate,
        quantity: u32,
        bound: bool,
        to: SlotAddress,
    },
    /// Moves `quantity` units of `from` into a new stack at an empty address.
    SplitOff {
        from: StackId,
        quantity: u32,
        to: SlotAddress,
    },
    Grow {
        stack: StackId,
        by: u32,
    },
    /// Reduces a stack; reaching zero removes it.
    Shrink {
        stack: StackId,
        by: u32,
    },
    /// Lifts a stack out of its slot; it must be attached or removed later.
    Detach {
        stack: StackId,
    },
    Attach {
        stack: StackId,
        to: SlotAddress,
    },
    Bind {
        stack: StackId,
    },
    /// Deletes a stack, its child and its bag contents.
    Remove {
        stack: StackId,
    },
    /// Changes the live size of a resizable pool.
    Resize {
        pool: Pool,
        live: u8,
    },
}

impl Mutation {
    /// Detach then attach.
    pub fn relocate(stack: StackId, to: SlotAddress) -> [Mutation; 2] {
        [Mutation::Detach { stack }, Mutation::Attach { stack, to }]
    }
}
