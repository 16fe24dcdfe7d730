/// Equipment slots, numbered as their flat slot index.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    strum::EnumIter,
    strum::IntoStaticStr,
    strum::FromRepr,
    strum::Display,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum EquipmentSlot {
    Head = 0,
    Neck,
    Shoulders,
    Body,
    Chest,
    Waist,
    Legs,
    Feet,
    Wrists,
    Hands,
    Finger1,
    Finger2,
    Trinket1,
    Trinket2,
    Back,
    MainHand,
    OffHand,
    Ranged,
    Tabard,
    ProfessionTool1,
    ProfessionTool2,
    ProfessionGear1,
    ProfessionGear2,
}

impl EquipmentSlot {
    #[inline]
    pub const fn slot(self) -> u8 {
        self as u8
    }

    pub fn from_slot(slot: u8) -> Option<Self> {
        Self::from_repr(slot)
    }

    /// Weapon slots stay swappable in combat.
    pub const fn is_weapon(self) -> bool {
        matches!(
            self,
            EquipmentSlot::MainHand | EquipmentSlot::OffHand | EquipmentSlot::Ranged
        )
    }
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;
    use crate::slots::layout;

    #[test]
    fn enumerates_whole_equipment_range() {
        let slots: Vec<u8> = EquipmentSlot::iter().map(EquipmentSlot::slot).collect();
        let expected: Vec<u8> = layout::EQUIPMENT.iter().collect();
        assert_eq!(slots, expected);
        assert_eq!(EquipmentSlot::from_slot(16), Some(EquipmentSlot::OffHand));
        assert_eq!(EquipmentSlot::from_slot(layout::EQUIPMENT.end), None);
    }
}
