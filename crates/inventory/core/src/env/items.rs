use bitflags::bitflags;

use crate::state::{LimitCategoryId, TemplateId};

pub trait ItemOracle: Send + Sync {
    fn template(&self, id: TemplateId) -> Option<ItemTemplate>;

    /// Returns every template known to this oracle.
    fn all_templates(&self) -> Vec<ItemTemplate>;
}

bitflags! {
    /// Specialized container families.
    ///
    /// On a container template the mask lists what the bag accepts (empty =
    /// generic bag). On any other template it lists the specialized bags the
    /// item fits in.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    #[cfg_attr(feature = "serde", serde(transparent))]
    pub struct BagFamily: u32 {
        const ARROWS         = 1 << 0;
        const BULLETS        = 1 << 1;
        const SOUL_SHARDS    = 1 << 2;
        const LEATHERWORKING = 1 << 3;
        const INSCRIPTION    = 1 << 4;
        const HERBS          = 1 << 5;
        const ENCHANTING     = 1 << 6;
        const ENGINEERING    = 1 << 7;
        const KEYS           = 1 << 8;
        const GEMS           = 1 << 9;
        const MINING         = 1 << 10;
        const FISHING        = 1 << 11;
        const COOKING        = 1 << 12;
        const REAGENTS       = 1 << 13;
    }
}

bitflags! {
    /// Placement-relevant template flags.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    #[cfg_attr(feature = "serde", serde(transparent))]
    pub struct TemplateFlags: u16 {
        /// Accepted by the reagent bank and reagent bags.
        const CRAFTING_REAGENT = 1 << 0;
        /// Dependent sub-item; lives only in equipment or child slots.
        const CHILD_EQUIPMENT  = 1 << 1;
    }
}

/// Classification driving which equipment slot(s) an item may occupy.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Default, strum::EnumIter, strum::IntoStaticStr,
    strum::Display,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EquipType {
    #[default]
    NonEquip,
    Head,
    Neck,
    Shoulders,
    Body,
    Chest,
    Robe,
    Waist,
    Legs,
    Feet,
    Wrists,
    Hands,
    Finger,
    Trinket,
    Cloak,
    /// One-handed weapon, main hand or (with dual wield) off hand.
    Weapon,
    Shield,
    Ranged,
    TwoHandWeapon,
    Tabard,
    WeaponMainHand,
    WeaponOffHand,
    Holdable,
    Bag,
    Quiver,
    ReagentBag,
    ProfessionTool,
    ProfessionGear,
}

impl EquipType {
    /// Container items: bags, quivers and reagent bags.
    pub const fn is_container(self) -> bool {
        matches!(self, EquipType::Bag | EquipType::Quiver | EquipType::ReagentBag)
    }
}

/// When a stack becomes bound to its owner.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BindPolicy {
    #[default]
    None,
    OnPickup,
    OnEquip,
    OnUse,
    ToAccount,
}

/// Read-only template record exposing only what placement needs.
///
/// # Stacking
///
/// `max_stack` of 1 marks a non-stackable template. `max_count` caps how many
/// units a character may own in total (0 = unlimited).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemTemplate {
    pub id: TemplateId,
    pub max_stack: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub max_count: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub limit_category: Option<LimitCategoryId>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub bag_family: BagFamily,
    #[cfg_attr(feature = "serde", serde(default))]
    pub equip_type: EquipType,
    #[cfg_attr(feature = "serde", serde(default))]
    pub binding: BindPolicy,
    #[cfg_attr(feature = "serde", serde(default))]
    pub flags: TemplateFlags,
    /// Content slots, for container templates.
    #[cfg_attr(feature = "serde", serde(default))]
    pub container_slots: u8,
    #[cfg_attr(feature = "serde", serde(default))]
    pub item_level: u16,
}

impl ItemTemplate {
    pub fn new(id: TemplateId, max_stack: u32) -> Self {
        Self {
            id,
            max_stack: max_stack.max(1),
            max_count: 0,
            limit_category: None,
            bag_family: BagFamily::empty(),
            equip_type: EquipType::NonEquip,
            binding: BindPolicy::None,
            flags: TemplateFlags::empty(),
            container_slots: 0,
            item_level: 0,
        }
    }

    /// Creates a container template with the given capacity and family.
    pub fn container(id: TemplateId, equip_type: EquipType, slots: u8, family: BagFamily) -> Self {
        Self {
            equip_type,
            container_slots: slots,
            bag_family: family,
            ..Self::new(id, 1)
        }
    }

    pub fn with_equip_type(mut self, equip_type: EquipType) -> Self {
        self.equip_type = equip_type;
        self
    }

    pub fn with_max_count(mut self, max_count: u32) -> Self {
        self.max_count = max_count;
        self
    }

    pub fn with_limit_category(mut self, category: LimitCategoryId) -> Self {
        self.limit_category = Some(category);
        self
    }

    pub fn with_bag_family(mut self, family: BagFamily) -> Self {
        self.bag_family = family;
        self
    }

    pub fn with_binding(mut self, binding: BindPolicy) -> Self {
        self.binding = binding;
        self
    }

    pub fn with_flags(mut self, flags: TemplateFlags) -> Self {
        self.flags |= flags;
        self
    }

    pub fn with_item_level(mut self, item_level: u16) -> Self {
        self.item_level = item_level;
        self
    }

    #[inline]
    pub fn is_stackable(&self) -> bool {
        self.max_stack > 1
    }

    #[inline]
    pub fn is_container(&self) -> bool {
        self.equip_type.is_container() && self.container_slots > 0
    }

    #[inline]
    pub fn is_crafting_reagent(&self) -> bool {
        self.flags.contains(TemplateFlags::CRAFTING_REAGENT)
    }

    #[inline]
    pub fn is_child_equipment(&self) -> bool {
        self.flags.contains(TemplateFlags::CHILD_EQUIPMENT)
    }

    /// Families of specialized bags this item fits in.
    pub fn storage_family(&self) -> BagFamily {
        if self.is_crafting_reagent() {
            self.bag_family | BagFamily::REAGENTS
        } else {
            self.bag_family
        }
    }
}
