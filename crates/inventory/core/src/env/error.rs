//! Oracle access errors.
//!
//! Errors related to oracle availability and data access.

use crate::error::{ErrorSeverity, InventoryFault};
use crate::state::{LimitCategoryId, TemplateId};

/// Errors that occur when accessing Oracle data.
///
/// Missing oracles are fatal since no placement can be decided without
/// templates; unknown ids are validation errors on the caller's input.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OracleError {
    /// ItemOracle is not available in the environment.
    #[error("ItemOracle not available")]
    ItemsNotAvailable,

    /// LimitCategoryOracle is not available in the environment.
    #[error("LimitCategoryOracle not available")]
    CategoriesNotAvailable,

    /// Template was not found by id.
    #[error("item template {0} not found")]
    TemplateNotFound(TemplateId),

    /// Limit category was not found by id.
    #[error("limit category {0} not found")]
    CategoryNotFound(LimitCategoryId),
}

impl InventoryFault for OracleError {
    fn severity(&self) -> ErrorSeverity {
        use OracleError::*;
        match self {
            ItemsNotAvailable | CategoriesNotAvailable => ErrorSeverity::Fatal,
            TemplateNotFound(_) | CategoryNotFound(_) => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        use OracleError::*;
        match self {
            ItemsNotAvailable => "ORACLE_ITEMS_NOT_AVAILABLE",
            CategoriesNotAvailable => "ORACLE_CATEGORIES_NOT_AVAILABLE",
            TemplateNotFound(_) => "ORACLE_TEMPLATE_NOT_FOUND",
            CategoryNotFound(_) => "ORACLE_CATEGORY_NOT_FOUND",
        }
    }
}
