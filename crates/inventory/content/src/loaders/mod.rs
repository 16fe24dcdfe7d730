//! Content loaders for reading inventory data from files.
//!
//! Each loader turns one RON/TOML file into the snapshot or config type the
//! engine consumes. [`ContentFactory`] bundles them over a data directory.

pub mod categories;
pub mod config;
pub mod factory;
pub mod templates;

pub use categories::CategoryLoader;
pub use config::ConfigLoader;
pub use factory::ContentFactory;
pub use templates::TemplateLoader;

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
