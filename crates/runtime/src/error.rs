//! Unified error type surfaced by the runtime API.
//!
//! Wraps engine rejections, content loading and persistence failures so hosts
//! can bubble them up with consistent context.
use inventory_core::{ErrorSeverity, InventoryError, InventoryFault, PlayerId, TransactionError};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error(transparent)]
    Transaction(#[from] TransactionError),

    #[error(transparent)]
    Inventory(#[from] InventoryError),

    #[error("no inventory loaded for {0}")]
    UnknownPlayer(PlayerId),

    #[error("failed to load content")]
    Content(#[source] anyhow::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("persistence worker channel closed")]
    PersistenceClosed,

    #[error("persistence worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),
}

impl From<bincode::Error> for RuntimeError {
    fn from(error: bincode::Error) -> Self {
        RuntimeError::Serialization(error.to_string())
    }
}

impl InventoryFault for RuntimeError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            RuntimeError::Transaction(error) => error.severity(),
            RuntimeError::Inventory(error) => error.severity(),
            RuntimeError::UnknownPlayer(_) => ErrorSeverity::Validation,
            RuntimeError::Content(_) => ErrorSeverity::Fatal,
            RuntimeError::Io(_)
            | RuntimeError::Serialization(_)
            | RuntimeError::Json(_)
            | RuntimeError::PersistenceClosed
            | RuntimeError::WorkerJoin(_) => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            RuntimeError::Transaction(error) => error.error_code(),
            RuntimeError::Inventory(error) => error.error_code(),
            RuntimeError::UnknownPlayer(_) => "RUNTIME_UNKNOWN_PLAYER",
            RuntimeError::Content(_) => "RUNTIME_CONTENT",
            RuntimeError::Io(_) => "RUNTIME_IO",
            RuntimeError::Serialization(_) => "RUNTIME_SERIALIZATION",
            RuntimeError::Json(_) => "RUNTIME_JSON",
            RuntimeError::PersistenceClosed => "RUNTIME_PERSISTENCE_CLOSED",
            RuntimeError::WorkerJoin(_) => "RUNTIME_WORKER_JOIN",
        }
    }
}
