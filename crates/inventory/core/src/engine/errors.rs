//! Error types for the transaction pipeline.

use crate::error::{ErrorSeverity, InventoryError, InventoryFault};

/// Identifies which stage of a transaction produced an error.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TransactionPhase {
    Validating,
    Applying,
}

impl TransactionPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionPhase::Validating => "validating",
            TransactionPhase::Applying => "applying",
        }
    }
}

/// Lifecycle of the most recent transaction run by an engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TransactionState {
    #[default]
    Idle,
    Validating,
    Accepted,
    Rejected,
    Applying,
    Committed,
}

impl TransactionState {
    /// The transaction finished, one way or the other.
    pub fn is_terminal(&self) -> bool {
        matches!(self, TransactionState::Rejected | TransactionState::Committed)
    }
}

/// A rejected transaction: the inventory is unchanged.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[error("{request} failed while {stage} (nonce {nonce}): {error}", stage = .phase.as_str())]
pub struct TransactionError {
    pub phase: TransactionPhase,
    pub request: &'static str,
    /// Inventory nonce the request was validated against.
    pub nonce: u64,
    #[source]
    pub error: InventoryError,
}

impl TransactionError {
    pub fn new(
        phase: TransactionPhase,
        request: &'static str,
        nonce: u64,
        error: InventoryError,
    ) -> Self {
        Self {
            phase,
            request,
            nonce,
            error,
        }
    }
}

impl InventoryFault for TransactionError {
    fn severity(&self) -> ErrorSeverity {
        match self.phase {
            // A plan that fails to apply means validation missed something.
            TransactionPhase::Applying => ErrorSeverity::Internal,
            TransactionPhase::Validating => self.error.severity(),
        }
    }

    fn error_code(&self) -> &'static str {
        self.error.error_code()
    }
}
