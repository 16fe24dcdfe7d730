//! Engine configuration loader.

use std::path::Path;

use inventory_core::InventoryConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for engine configuration from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config data from a TOML file.
    ///
    /// Missing keys fall back to [`InventoryConfig::default`]; sizes beyond
    /// the slot layout are clamped.
    pub fn load(path: &Path) -> LoadResult<InventoryConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<InventoryConfig> {
        let config: InventoryConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?;

        let clamped = config.clone().clamped();
        if clamped != config {
            tracing::warn!(?config, ?clamped, "inventory config clamped to slot layout");
        }
        Ok(clamped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_keys_use_defaults() {
        let config = ConfigLoader::parse("backpack_slots = 20\n").unwrap();
        assert_eq!(config.backpack_slots, 20);
        assert_eq!(config.bank_slots, InventoryConfig::DEFAULT_BANK_SLOTS);
        assert!(!config.reagent_bank_unlocked);
    }

    #[test]
    fn oversized_values_are_clamped() {
        let config = ConfigLoader::parse("bank_slots = 90\nmax_apply_steps = 0\n").unwrap();
        assert_eq!(config.bank_slots, InventoryConfig::MAX_BANK_SLOTS);
        assert_eq!(config.max_apply_steps, 1);
    }

    #[test]
    fn malformed_toml_is_an_error() {
        assert!(ConfigLoader::parse("backpack_slots = \"many\"").is_err());
    }
}
