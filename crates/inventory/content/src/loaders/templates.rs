//! Item template catalog loader.

use std::collections::BTreeSet;
use std::path::Path;

use inventory_core::{ItemTemplate, TemplatesSnapshot};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// Template catalog structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateCatalog {
    pub templates: Vec<ItemTemplate>,
}

/// Loader for item templates from RON files.
pub struct TemplateLoader;

impl TemplateLoader {
    /// Load a template catalog from a RON file.
    ///
    /// Duplicate ids are rejected rather than silently overwritten.
    pub fn load(path: &Path) -> LoadResult<TemplatesSnapshot> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<TemplatesSnapshot> {
        let catalog: TemplateCatalog = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse template catalog RON: {}", e))?;

        let mut seen = BTreeSet::new();
        for template in &catalog.templates {
            if !seen.insert(template.id) {
                anyhow::bail!("Duplicate template id {}", template.id.0);
            }
            if template.max_stack == 0 {
                anyhow::bail!("Template {} declares max_stack 0", template.id.0);
            }
        }

        tracing::debug!(count = catalog.templates.len(), "loaded item templates");
        Ok(TemplatesSnapshot::new(catalog.templates))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use inventory_core::{BagFamily, EquipType, ItemOracle, TemplateId};

    #[test]
    fn parses_sparse_templates() {
        let snapshot = TemplateLoader::parse(
            r#"(
                templates: [
                    (id: (1), max_stack: 20),
                    (id: (11), max_stack: 1, equip_type: Bag, container_slots: 8, bag_family: "HERBS"),
                ],
            )"#,
        )
        .unwrap();

        assert_eq!(snapshot.len(), 2);
        let bag = snapshot.template(TemplateId(11)).unwrap();
        assert_eq!(bag.equip_type, EquipType::Bag);
        assert_eq!(bag.bag_family, BagFamily::HERBS);
        assert!(bag.is_container());
        assert_eq!(snapshot.template(TemplateId(1)).unwrap().max_count, 0);
    }

    #[test]
    fn rejects_duplicate_ids() {
        let result = TemplateLoader::parse(
            "(templates: [(id: (1), max_stack: 20), (id: (1), max_stack: 5)])",
        );
        assert!(result.is_err());
    }

    #[test]
    fn rejects_zero_stack_size() {
        let result = TemplateLoader::parse("(templates: [(id: (3), max_stack: 0)])");
        assert!(result.is_err());
    }
}
