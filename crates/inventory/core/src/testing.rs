//! Shared fixtures for unit tests.

use crate::config::InventoryConfig;
use crate::env::{
    BagFamily, BindPolicy, CategoriesSnapshot, ContentSnapshot, EquipType, InventoryEnv,
    ItemTemplate, LimitCategory, LimitMode, TemplateFlags, TemplatesSnapshot,
};
use crate::state::{LimitCategoryId, PlayerContext, PlayerId, PlayerInventory, TemplateId};

pub const OWNER: PlayerId = PlayerId(7);

pub const TEMPLATE_POTION: TemplateId = TemplateId(1);
pub const TEMPLATE_HERB: TemplateId = TemplateId(2);
pub const TEMPLATE_BAG: TemplateId = TemplateId(10);
pub const TEMPLATE_HERB_BAG: TemplateId = TemplateId(11);
pub const TEMPLATE_SWORD: TemplateId = TemplateId(20);
pub const TEMPLATE_GREATSWORD: TemplateId = TemplateId(21);
pub const TEMPLATE_RING: TemplateId = TemplateId(22);
pub const TEMPLATE_TRINKET_A: TemplateId = TemplateId(23);
pub const TEMPLATE_TRINKET_B: TemplateId = TemplateId(24);
pub const TEMPLATE_HELM: TemplateId = TemplateId(25);
pub const TEMPLATE_CHILD: TemplateId = TemplateId(30);
pub const TEMPLATE_GEM: TemplateId = TemplateId(31);
pub const TEMPLATE_LIMITED: TemplateId = TemplateId(40);

pub const LIMIT_CATEGORY: LimitCategoryId = LimitCategoryId(5);

pub const CONTEXT: PlayerContext = PlayerContext {
    level: 60,
    capabilities: crate::state::Capabilities::empty(),
    status: crate::state::PlayerStatus::empty(),
};

pub fn context() -> PlayerContext {
    CONTEXT
}

pub fn inventory() -> PlayerInventory {
    PlayerInventory::new(OWNER, &InventoryConfig::default())
}

pub fn potion() -> ItemTemplate {
    ItemTemplate::new(TEMPLATE_POTION, 20)
}

pub fn herb() -> ItemTemplate {
    ItemTemplate::new(TEMPLATE_HERB, 20).with_bag_family(BagFamily::HERBS)
}

pub fn bag_template() -> ItemTemplate {
    ItemTemplate::container(TEMPLATE_BAG, EquipType::Bag, 4, BagFamily::empty())
}

pub fn herb_bag() -> ItemTemplate {
    ItemTemplate::container(TEMPLATE_HERB_BAG, EquipType::Bag, 8, BagFamily::HERBS)
}

pub fn sword() -> ItemTemplate {
    ItemTemplate::new(TEMPLATE_SWORD, 1)
        .with_equip_type(EquipType::Weapon)
        .with_item_level(100)
}

pub fn greatsword() -> ItemTemplate {
    ItemTemplate::new(TEMPLATE_GREATSWORD, 1)
        .with_equip_type(EquipType::TwoHandWeapon)
        .with_item_level(120)
}

pub fn ring() -> ItemTemplate {
    ItemTemplate::new(TEMPLATE_RING, 1)
        .with_equip_type(EquipType::Finger)
        .with_item_level(90)
}

pub fn trinket_a() -> ItemTemplate {
    ItemTemplate::new(TEMPLATE_TRINKET_A, 1)
        .with_equip_type(EquipType::Trinket)
        .with_item_level(110)
}

pub fn trinket_b() -> ItemTemplate {
    ItemTemplate::new(TEMPLATE_TRINKET_B, 1)
        .with_equip_type(EquipType::Trinket)
        .with_item_level(80)
}

pub fn helm() -> ItemTemplate {
    ItemTemplate::new(TEMPLATE_HELM, 1)
        .with_equip_type(EquipType::Head)
        .with_binding(BindPolicy::OnEquip)
        .with_item_level(95)
}

pub fn child_item() -> ItemTemplate {
    ItemTemplate::new(TEMPLATE_CHILD, 1).with_flags(TemplateFlags::CHILD_EQUIPMENT)
}

pub fn gem() -> ItemTemplate {
    ItemTemplate::new(TEMPLATE_GEM, 20).with_bag_family(BagFamily::GEMS)
}

/// Stackable template capped by a `Have` category of two.
pub fn limited() -> ItemTemplate {
    ItemTemplate::new(TEMPLATE_LIMITED, 5).with_limit_category(LIMIT_CATEGORY)
}

pub fn limit_category() -> LimitCategory {
    LimitCategory::new(LIMIT_CATEGORY, 2, LimitMode::Have)
}

pub fn content() -> ContentSnapshot {
    ContentSnapshot::new(
        TemplatesSnapshot::new([
            potion(),
            herb(),
            bag_template(),
            herb_bag(),
            sword(),
            greatsword(),
            ring(),
            trinket_a(),
            trinket_b(),
            helm(),
            child_item(),
            gem(),
            limited(),
        ]),
        CategoriesSnapshot::new([limit_category()]),
        InventoryConfig::default(),
    )
}

pub fn env(content: &ContentSnapshot) -> InventoryEnv<'_> {
    InventoryEnv::from_snapshot(content)
}
