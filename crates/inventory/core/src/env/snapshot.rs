//! Owned, serializable oracle data.
//!
//! Snapshots are what content loaders produce and what the runtime hands to
//! the engine. Each snapshot implements its oracle trait directly.

use std::collections::BTreeMap;

use super::{ItemOracle, ItemTemplate, LimitCategory, LimitCategoryOracle};
use crate::config::InventoryConfig;
use crate::state::{LimitCategoryId, TemplateId};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Complete snapshot of all oracle data plus engine configuration.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ContentSnapshot {
    pub templates: TemplatesSnapshot,
    pub categories: CategoriesSnapshot,
    pub config: InventoryConfig,
}

impl ContentSnapshot {
    pub fn new(
        templates: TemplatesSnapshot,
        categories: CategoriesSnapshot,
        config: InventoryConfig,
    ) -> Self {
        Self {
            templates,
            categories,
            config,
        }
    }
}

/// Template table keyed by id.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TemplatesSnapshot {
    pub templates: BTreeMap<TemplateId, ItemTemplate>,
}

impl TemplatesSnapshot {
    pub fn new(templates: impl IntoIterator<Item = ItemTemplate>) -> Self {
        Self {
            templates: templates.into_iter().map(|t| (t.id, t)).collect(),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Inserts or replaces a template.
    pub fn insert(&mut self, template: ItemTemplate) {
        self.templates.insert(template.id, template);
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Captures every template exposed by an oracle.
    pub fn from_oracle(oracle: &dyn ItemOracle) -> Self {
        Self::new(oracle.all_templates())
    }
}

impl ItemOracle for TemplatesSnapshot {
    fn template(&self, id: TemplateId) -> Option<ItemTemplate> {
        self.templates.get(&id).copied()
    }

    fn all_templates(&self) -> Vec<ItemTemplate> {
        self.templates.values().copied().collect()
    }
}

/// Limit category table keyed by id.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CategoriesSnapshot {
    pub categories: BTreeMap<LimitCategoryId, LimitCategory>,
}

impl CategoriesSnapshot {
    pub fn new(categories: impl IntoIterator<Item = LimitCategory>) -> Self {
        Self {
            categories: categories.into_iter().map(|c| (c.id, c)).collect(),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, category: LimitCategory) {
        self.categories.insert(category.id, category);
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    pub fn from_oracle(oracle: &dyn LimitCategoryOracle) -> Self {
        Self::new(oracle.all_categories())
    }
}

impl LimitCategoryOracle for CategoriesSnapshot {
    fn category(&self, id: LimitCategoryId) -> Option<LimitCategory> {
        self.categories.get(&id).cloned()
    }

    fn all_categories(&self) -> Vec<LimitCategory> {
        self.categories.values().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::LimitMode;

    #[test]
    fn snapshots_answer_oracle_queries() {
        let mut templates = TemplatesSnapshot::new([ItemTemplate::new(TemplateId(1), 20)]);
        templates.insert(ItemTemplate::new(TemplateId(2), 1));
        assert_eq!(templates.len(), 2);
        assert_eq!(templates.template(TemplateId(1)).map(|t| t.max_stack), Some(20));
        assert!(templates.template(TemplateId(3)).is_none());

        let categories =
            CategoriesSnapshot::new([LimitCategory::new(LimitCategoryId(4), 2, LimitMode::Equip)]);
        assert_eq!(
            categories.category(LimitCategoryId(4)).map(|c| c.mode),
            Some(LimitMode::Equip)
        );

        let copied = TemplatesSnapshot::from_oracle(&templates);
        assert_eq!(copied, templates);
    }
}
