//! Common error infrastructure for inventory-core.
//!
//! Every rejection the engine can produce is a variant of [`InventoryError`].
//! Errors carry the exact shortfall where one applies so callers can decide
//! between partial acceptance and a full abort.

use crate::env::OracleError;
use crate::slots::{Pool, SlotAddress};
use crate::state::{LimitCategoryId, StackId, TemplateId};

/// Severity level of an error, used for categorization and recovery strategies.
///
/// - **Recoverable**: the same request may succeed once occupancy or status changes
/// - **Validation**: invalid input that should be rejected without retry
/// - **Internal**: unexpected state inconsistencies that require investigation
/// - **Fatal**: missing collaborators; nothing can be decided
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    Recoverable,
    Validation,
    Internal,
    Fatal,
}

impl ErrorSeverity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    /// Returns true if this error indicates an internal bug.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Common trait for all inventory-core errors.
///
/// - Use `#[derive(thiserror::Error)]` for Display/Error impl
/// - Classify severity based on recoverability, not impact
pub trait InventoryFault: core::fmt::Display + core::fmt::Debug {
    fn severity(&self) -> ErrorSeverity;

    /// Stable identifier for this error variant, for metrics and tests.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}

/// Conditions that block a change until they clear.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::IntoStaticStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Blocker {
    Dead,
    InCombat,
    ArenaLocked,
    /// The stack is mid-loot or mid-trade.
    ItemLocked(StackId),
}

/// Structural rules a placement would break.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StructuralViolation {
    #[error("bag {bag} cannot be placed inside itself")]
    BagInsideItself { bag: StackId },

    #[error("non-empty bag {bag} may only sit in a bag slot")]
    NonEmptyBag { bag: StackId },

    #[error("bag template {template} cannot be nested inside another bag")]
    NestedBag { template: TemplateId },

    #[error("child template {template} may only sit in equipment or child slots")]
    ChildOutsideChildSlots { template: TemplateId },

    #[error("template {template} is not a child item and cannot use child slots")]
    NotAChild { template: TemplateId },

    #[error("bag {bag} must be emptied before it is destroyed")]
    DestroyNonEmptyBag { bag: StackId },

    #[error("item swap between {first} and {second} needs exactly one empty bag")]
    BagSwapNeedsEmptySide { first: StackId, second: StackId },

    #[error("stack {stack} has nothing to split off")]
    SplitWholeStack { stack: StackId },

    #[error("shrinking {pool} would strand stack {stack}")]
    ShrinkStrandsItem { pool: Pool, stack: StackId },
}

/// Errors produced while planning or applying an inventory request.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InventoryError {
    /// Not enough free slots or stack room; `shortfall` units could not be placed.
    #[error("not enough space: {shortfall} unit(s) could not be placed")]
    SpatialCapacityExceeded { shortfall: u32 },

    #[error("limit category {category} exceeded by {shortfall}")]
    CategoryLimitExceeded {
        category: LimitCategoryId,
        shortfall: u32,
    },

    #[error("template {template} owned-count limit exceeded by {shortfall}")]
    AbsoluteLimitExceeded { template: TemplateId, shortfall: u32 },

    #[error("template {template} cannot be equipped there")]
    NotEquippable { template: TemplateId },

    #[error("template {template} does not fit the container at {address}")]
    WrongContainerType {
        template: TemplateId,
        address: SlotAddress,
    },

    #[error("structural violation: {0}")]
    Structural(#[from] StructuralViolation),

    #[error("stack {stack} is bound to another owner")]
    OwnershipOrBindingViolation { stack: StackId },

    #[error("blocked: {0}")]
    TransientBlocker(Blocker),

    #[error("slot {0} is outside the live range")]
    InvalidSlot(SlotAddress),

    #[error("{0} is locked")]
    PoolLocked(Pool),

    #[error("invalid quantity {0}")]
    InvalidQuantity(u32),

    #[error("slot {0} is empty")]
    SlotEmpty(SlotAddress),

    #[error("stack {0} not found")]
    ItemNotFound(StackId),

    #[error(transparent)]
    Oracle(#[from] OracleError),

    /// Applier and planner disagree about occupancy; never expected.
    #[error("internal inconsistency: {0}")]
    Internal(String),
}

impl InventoryError {
    pub(crate) fn internal(message: &str) -> Self {
        InventoryError::Internal(message.to_owned())
    }

    /// Units reported as unplaceable, when the error carries a shortfall.
    pub fn shortfall(&self) -> Option<u32> {
        match self {
            InventoryError::SpatialCapacityExceeded { shortfall }
            | InventoryError::CategoryLimitExceeded { shortfall, .. }
            | InventoryError::AbsoluteLimitExceeded { shortfall, .. } => Some(*shortfall),
            _ => None,
        }
    }
}

impl InventoryFault for InventoryError {
    fn severity(&self) -> ErrorSeverity {
        use InventoryError::*;
        match self {
            SpatialCapacityExceeded { .. }
            | CategoryLimitExceeded { .. }
            | AbsoluteLimitExceeded { .. }
            | TransientBlocker(_) => ErrorSeverity::Recoverable,
            NotEquippable { .. }
            | WrongContainerType { .. }
            | Structural(_)
            | OwnershipOrBindingViolation { .. }
            | InvalidSlot(_)
            | PoolLocked(_)
            | InvalidQuantity(_)
            | SlotEmpty(_)
            | ItemNotFound(_) => ErrorSeverity::Validation,
            Oracle(inner) => inner.severity(),
            Internal(_) => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        use InventoryError::*;
        match self {
            SpatialCapacityExceeded { .. } => "INV_SPATIAL_CAPACITY_EXCEEDED",
            CategoryLimitExceeded { .. } => "INV_CATEGORY_LIMIT_EXCEEDED",
            AbsoluteLimitExceeded { .. } => "INV_ABSOLUTE_LIMIT_EXCEEDED",
            NotEquippable { .. } => "INV_NOT_EQUIPPABLE",
            WrongContainerType { .. } => "INV_WRONG_CONTAINER_TYPE",
            Structural(_) => "INV_STRUCTURAL_VIOLATION",
            OwnershipOrBindingViolation { .. } => "INV_OWNERSHIP_OR_BINDING",
            TransientBlocker(_) => "INV_TRANSIENT_BLOCKER",
            InvalidSlot(_) => "INV_INVALID_SLOT",
            PoolLocked(_) => "INV_POOL_LOCKED",
            InvalidQuantity(_) => "INV_INVALID_QUANTITY",
            SlotEmpty(_) => "INV_SLOT_EMPTY",
            ItemNotFound(_) => "INV_ITEM_NOT_FOUND",
            Oracle(inner) => inner.error_code(),
            Internal(_) => "INV_INTERNAL",
        }
    }
}
