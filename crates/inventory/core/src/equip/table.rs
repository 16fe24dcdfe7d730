//! Declarative equip-type → candidate slot table.

use arrayvec::ArrayVec;

use crate::env::EquipType;
use crate::slots::{EquipmentSlot, layout};
use crate::state::{Capabilities, PlayerContext};

/// Maximum number of candidate slots for one equip type.
pub const MAX_CANDIDATES: usize = 4;

pub type CandidateSlots = ArrayVec<u8, MAX_CANDIDATES>;

/// Base slots for an equip type plus an optional capability-gated extra slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SlotRule {
    pub base: &'static [EquipmentSlot],
    pub gated: Option<(Capabilities, EquipmentSlot)>,
}

const fn only(base: &'static [EquipmentSlot]) -> SlotRule {
    SlotRule { base, gated: None }
}

use EquipmentSlot as S;

/// Slot rule for gear types. Container types are resolved to bag-holding
/// slots separately and return `None` here, as does `NonEquip`.
pub const fn rule(equip_type: EquipType) -> Option<SlotRule> {
    let rule = match equip_type {
        EquipType::Head => only(&[S::Head]),
        EquipType::Neck => only(&[S::Neck]),
        EquipType::Shoulders => only(&[S::Shoulders]),
        EquipType::Body => only(&[S::Body]),
        EquipType::Chest | EquipType::Robe => only(&[S::Chest]),
        EquipType::Waist => only(&[S::Waist]),
        EquipType::Legs => only(&[S::Legs]),
        EquipType::Feet => only(&[S::Feet]),
        EquipType::Wrists => only(&[S::Wrists]),
        EquipType::Hands => only(&[S::Hands]),
        EquipType::Finger => only(&[S::Finger1, S::Finger2]),
        EquipType::Trinket => only(&[S::Trinket1, S::Trinket2]),
        EquipType::Cloak => only(&[S::Back]),
        EquipType::Weapon => SlotRule {
            base: &[S::MainHand],
            gated: Some((Capabilities::DUAL_WIELD, S::OffHand)),
        },
        EquipType::TwoHandWeapon => SlotRule {
            base: &[S::MainHand],
            gated: Some((Capabilities::TITAN_GRIP, S::OffHand)),
        },
        EquipType::WeaponOffHand => SlotRule {
            base: &[],
            gated: Some((Capabilities::DUAL_WIELD, S::OffHand)),
        },
        EquipType::Shield | EquipType::Holdable => only(&[S::OffHand]),
        EquipType::Ranged => only(&[S::Ranged]),
        EquipType::Tabard => only(&[S::Tabard]),
        EquipType::WeaponMainHand => only(&[S::MainHand]),
        EquipType::ProfessionTool => only(&[S::ProfessionTool1, S::ProfessionTool2]),
        EquipType::ProfessionGear => only(&[S::ProfessionGear1, S::ProfessionGear2]),
        EquipType::NonEquip | EquipType::Bag | EquipType::Quiver | EquipType::ReagentBag => {
            return None;
        }
    };
    Some(rule)
}

/// Candidate flat slots for an equip type, in resolution order.
pub fn candidates(equip_type: EquipType, context: &PlayerContext) -> CandidateSlots {
    let mut slots = CandidateSlots::new();
    match equip_type {
        EquipType::Bag | EquipType::Quiver => slots.extend(layout::EQUIPPED_BAGS.iter()),
        EquipType::ReagentBag => slots.extend(layout::REAGENT_BAG.iter()),
        other => {
            if let Some(rule) = rule(other) {
                slots.extend(rule.base.iter().map(|slot| slot.slot()));
                if let Some((needed, extra)) = rule.gated {
                    if context.capabilities.contains(needed) {
                        slots.push(extra.slot());
                    }
                }
            }
        }
    }
    slots
}

/// Returns true when `slot` is one of the candidates for `equip_type`.
pub fn fits(equip_type: EquipType, context: &PlayerContext, slot: u8) -> bool {
    candidates(equip_type, context).contains(&slot)
}

/// Templates that occupy both hands unless the wielder has titan grip.
pub fn claims_both_hands(equip_type: EquipType, context: &PlayerContext) -> bool {
    equip_type == EquipType::TwoHandWeapon && !context.has_titan_grip()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capabilities_open_off_hand() {
        let plain = PlayerContext::new(70);
        let dual = PlayerContext::new(70).with_capabilities(Capabilities::DUAL_WIELD);
        let titan = PlayerContext::new(70).with_capabilities(Capabilities::TITAN_GRIP);
        let main = S::MainHand.slot();
        let off = S::OffHand.slot();

        assert_eq!(candidates(EquipType::Weapon, &plain).as_slice(), &[main]);
        assert_eq!(candidates(EquipType::Weapon, &dual).as_slice(), &[main, off]);
        assert_eq!(candidates(EquipType::TwoHandWeapon, &dual).as_slice(), &[main]);
        assert_eq!(candidates(EquipType::TwoHandWeapon, &titan).as_slice(), &[main, off]);
        assert!(claims_both_hands(EquipType::TwoHandWeapon, &plain));
        assert!(!claims_both_hands(EquipType::TwoHandWeapon, &titan));
    }

    #[test]
    fn off_hand_weapons_need_dual_wield() {
        let plain = PlayerContext::new(70);
        let dual = PlayerContext::new(70).with_capabilities(Capabilities::DUAL_WIELD);
        let off = S::OffHand.slot();

        assert!(candidates(EquipType::WeaponOffHand, &plain).is_empty());
        assert!(!fits(EquipType::WeaponOffHand, &plain, off));
        assert_eq!(candidates(EquipType::WeaponOffHand, &dual).as_slice(), &[off]);
        assert_eq!(candidates(EquipType::Shield, &plain).as_slice(), &[off]);
        assert_eq!(candidates(EquipType::Holdable, &plain).as_slice(), &[off]);
    }

    #[test]
    fn pairs_and_bags() {
        let context = PlayerContext::new(1);
        assert_eq!(
            candidates(EquipType::Trinket, &context).as_slice(),
            &[S::Trinket1.slot(), S::Trinket2.slot()]
        );
        assert_eq!(candidates(EquipType::Bag, &context).len(), 4);
        assert_eq!(
            candidates(EquipType::ReagentBag, &context).as_slice(),
            &[layout::REAGENT_BAG.start]
        );
        assert!(candidates(EquipType::NonEquip, &context).is_empty());
        assert!(fits(EquipType::Robe, &context, S::Chest.slot()));
        assert!(!fits(EquipType::Shield, &context, S::MainHand.slot()));
    }
}
