//! Limit category catalog loader.

use std::path::Path;

use inventory_core::{CategoriesSnapshot, LimitCategory};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// Category catalog structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryCatalog {
    pub categories: Vec<LimitCategory>,
}

/// Loader for limit categories from RON files.
pub struct CategoryLoader;

impl CategoryLoader {
    pub fn load(path: &Path) -> LoadResult<CategoriesSnapshot> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<CategoriesSnapshot> {
        let catalog: CategoryCatalog = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse category catalog RON: {}", e))?;

        let count = catalog.categories.len();
        let snapshot = CategoriesSnapshot::new(catalog.categories);
        if snapshot.len() != count {
            anyhow::bail!("Category catalog contains duplicate ids");
        }

        tracing::debug!(count, "loaded limit categories");
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use inventory_core::{LimitCategoryId, LimitCategoryOracle, LimitMode, PlayerContext};

    #[test]
    fn parses_modes_and_bonuses() {
        let snapshot = CategoryLoader::parse(
            r#"(
                categories: [
                    (id: (5), base_quantity: 2),
                    (
                        id: (6),
                        base_quantity: 1,
                        mode: Equip,
                        bonuses: [(condition: MinLevel(60), extra: 1)],
                    ),
                ],
            )"#,
        )
        .unwrap();

        let have = snapshot.category(LimitCategoryId(5)).unwrap();
        assert_eq!(have.mode, LimitMode::Have);

        let equip = snapshot.category(LimitCategoryId(6)).unwrap();
        assert_eq!(equip.mode, LimitMode::Equip);
        assert_eq!(equip.effective_cap(&PlayerContext::new(60)), 2);
        assert_eq!(equip.effective_cap(&PlayerContext::new(10)), 1);
    }

    #[test]
    fn rejects_duplicate_ids() {
        let result = CategoryLoader::parse(
            "(categories: [(id: (5), base_quantity: 2), (id: (5), base_quantity: 3)])",
        );
        assert!(result.is_err());
    }
}
