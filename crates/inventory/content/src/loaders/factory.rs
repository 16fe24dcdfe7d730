//! Content factory for building oracle snapshots from data files.

use std::path::{Path, PathBuf};

use anyhow::Context;
use inventory_core::{CategoriesSnapshot, ContentSnapshot, InventoryConfig, TemplatesSnapshot};

use crate::loaders::{CategoryLoader, ConfigLoader, LoadResult, TemplateLoader};

/// Content factory that loads all inventory content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml
/// ├── templates.ron
/// └── categories.ron
/// ```
///
/// `config.toml` and `categories.ron` are optional; their absence yields the
/// default configuration and an empty category table.
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    pub const CONFIG_FILE: &'static str = "config.toml";
    pub const TEMPLATES_FILE: &'static str = "templates.ron";
    pub const CATEGORIES_FILE: &'static str = "categories.ron";

    /// Creates a new content factory pointing to a data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load engine configuration from `config.toml`.
    pub fn load_config(&self) -> LoadResult<InventoryConfig> {
        let path = self.data_dir.join(Self::CONFIG_FILE);
        if !path.exists() {
            return Ok(InventoryConfig::default());
        }
        ConfigLoader::load(&path)
    }

    /// Load item templates from `templates.ron`.
    pub fn load_templates(&self) -> LoadResult<TemplatesSnapshot> {
        let path = self.data_dir.join(Self::TEMPLATES_FILE);
        TemplateLoader::load(&path)
    }

    /// Load limit categories from `categories.ron`.
    pub fn load_categories(&self) -> LoadResult<CategoriesSnapshot> {
        let path = self.data_dir.join(Self::CATEGORIES_FILE);
        if !path.exists() {
            return Ok(CategoriesSnapshot::empty());
        }
        CategoryLoader::load(&path)
    }

    /// Load everything and check that templates only reference known categories.
    pub fn load_snapshot(&self) -> LoadResult<ContentSnapshot> {
        let config = self.load_config().context("loading inventory config")?;
        let templates = self.load_templates().context("loading item templates")?;
        let categories = self
            .load_categories()
            .context("loading limit categories")?;

        for template in templates.templates.values() {
            if let Some(category) = template.limit_category {
                if !categories.categories.contains_key(&category) {
                    anyhow::bail!(
                        "Template {} references unknown limit category {}",
                        template.id.0,
                        category.0
                    );
                }
            }
        }

        tracing::info!(
            dir = %self.data_dir.display(),
            templates = templates.len(),
            categories = categories.len(),
            "content snapshot loaded"
        );
        Ok(ContentSnapshot::new(templates, categories, config))
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use inventory_core::TemplateId;

    fn write(dir: &Path, name: &str, content: &str) {
        std::fs::write(dir.join(name), content).unwrap();
    }

    #[test]
    fn factory_paths() {
        let factory = ContentFactory::new("/tmp/data");
        assert_eq!(factory.data_dir(), Path::new("/tmp/data"));
    }

    #[test]
    fn loads_complete_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "config.toml", "backpack_slots = 24\nreagent_bank_unlocked = true\n");
        write(
            dir.path(),
            "templates.ron",
            "(templates: [(id: (1), max_stack: 20, limit_category: Some((5)))])",
        );
        write(dir.path(), "categories.ron", "(categories: [(id: (5), base_quantity: 2)])");

        let snapshot = ContentFactory::new(dir.path()).load_snapshot().unwrap();
        assert_eq!(snapshot.config.backpack_slots, 24);
        assert!(snapshot.config.reagent_bank_unlocked);
        assert!(snapshot.templates.templates.contains_key(&TemplateId(1)));
        assert_eq!(snapshot.categories.len(), 1);
    }

    #[test]
    fn optional_files_fall_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "templates.ron", "(templates: [(id: (1), max_stack: 20)])");

        let snapshot = ContentFactory::new(dir.path()).load_snapshot().unwrap();
        assert_eq!(snapshot.config, InventoryConfig::default());
        assert!(snapshot.categories.is_empty());
    }

    #[test]
    fn missing_templates_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(ContentFactory::new(dir.path()).load_snapshot().is_err());
    }

    #[test]
    fn unknown_category_reference_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "templates.ron",
            "(templates: [(id: (1), max_stack: 20, limit_category: Some((9)))])",
        );

        let error = ContentFactory::new(dir.path()).load_snapshot().unwrap_err();
        assert!(error.to_string().contains("unknown limit category"));
    }
}
