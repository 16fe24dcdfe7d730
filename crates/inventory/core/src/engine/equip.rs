use super::MutationPlan;
use super::movement::Occupied;
use super::transition::RequestTransition;
use super::validate::Validation;
use crate::env::EquipType;
use crate::equip::EquipSlotResolver;
use crate::error::InventoryError;
use crate::planner::Reservations;
use crate::request::EquipRequest;
use crate::slots::SlotAddress;

impl RequestTransition for EquipRequest {
    fn validate(&self, validation: &Validation<'_>) -> Result<MutationPlan, InventoryError> {
        let stack = validation.stack(self.stack)?;
        let template = validation.template_of(stack)?;
        if template.equip_type == EquipType::NonEquip {
            return Err(InventoryError::NotEquippable {
                template: template.id,
            });
        }
        let resolver =
            EquipSlotResolver::new(validation.inventory, validation.context, validation.env);
        let slot = resolver.resolve(stack.id, &template, self.slot, self.allow_swap)?;
        tracing::debug!(stack = %stack.id, slot, "equip slot resolved");

        let mutations = validation.plan_move(
            stack.id,
            SlotAddress::player(slot),
            Occupied::MergeOrSwap,
            &mut Reservations::new(),
        )?;
        Ok(MutationPlan::new(mutations))
    }
}
