use crate::state::{Capabilities, LimitCategoryId, PlayerContext};

pub trait LimitCategoryOracle: Send + Sync {
    fn category(&self, id: LimitCategoryId) -> Option<LimitCategory>;

    /// Returns every category known to this oracle.
    fn all_categories(&self) -> Vec<LimitCategory>;
}

/// Which count a category caps.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LimitMode {
    /// Units owned anywhere in the owned pools.
    #[default]
    Have,
    /// Units currently equipped.
    Equip,
}

/// Player condition gating a bonus.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LimitCondition {
    Always,
    MinLevel(u8),
    HasCapability(Capabilities),
}

impl LimitCondition {
    pub fn holds(&self, context: &PlayerContext) -> bool {
        match self {
            LimitCondition::Always => true,
            LimitCondition::MinLevel(level) => context.level >= *level,
            LimitCondition::HasCapability(flags) => context.capabilities.contains(*flags),
        }
    }
}

/// Conditional raise of a category cap.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LimitBonus {
    pub condition: LimitCondition,
    pub extra: u32,
}

/// Cap shared by every template tagged with the category.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LimitCategory {
    pub id: LimitCategoryId,
    pub base_quantity: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub mode: LimitMode,
    #[cfg_attr(feature = "serde", serde(default))]
    pub bonuses: Vec<LimitBonus>,
}

impl LimitCategory {
    pub fn new(id: LimitCategoryId, base_quantity: u32, mode: LimitMode) -> Self {
        Self {
            id,
            base_quantity,
            mode,
            bonuses: Vec::new(),
        }
    }

    pub fn with_bonus(mut self, condition: LimitCondition, extra: u32) -> Self {
        self.bonuses.push(LimitBonus { condition, extra });
        self
    }

    /// Base cap plus every bonus whose condition holds for the player.
    pub fn effective_cap(&self, context: &PlayerContext) -> u32 {
        self.bonuses
            .iter()
            .filter(|bonus| bonus.condition.holds(context))
            .fold(self.base_quantity, |cap, bonus| cap.saturating_add(bonus.extra))
    }
}
