//! Data-driven content definitions and loaders.
//!
//! This crate reads the static data the inventory engine consults:
//! - Item template catalogs (RON)
//! - Limit category catalogs (RON)
//! - Engine configuration (TOML)
//!
//! Content is consumed through oracle snapshots and never appears in
//! inventory state. All loaders deserialize inventory-core types directly.

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{CategoryLoader, ConfigLoader, ContentFactory, TemplateLoader};
