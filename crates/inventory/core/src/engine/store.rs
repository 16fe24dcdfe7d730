//! Deposits of new units, single and batched.

use super::transition::RequestTransition;
use super::validate::Validation;
use super::{MutationPlan, StoreOutcome};
use crate::apply::Mutation;
use crate::capacity::{self, PendingCounts};
use crate::env::BindPolicy;
use crate::error::InventoryError;
use crate::planner::{PlacementRequest, Reservations};
use crate::request::StoreRequest;
use crate::slots::{self, Pool};

impl RequestTransition for StoreRequest {
    fn validate(&self, validation: &Validation<'_>) -> Result<MutationPlan, InventoryError> {
        validate_batch(std::slice::from_ref(self), validation)
    }
}

/// Plans every request against one reservation table and one pending count.
pub(super) fn validate_batch(
    batch: &[StoreRequest],
    validation: &Validation<'_>,
) -> Result<MutationPlan, InventoryError> {
    let mut reservations = Reservations::new();
    let mut pending = PendingCounts::new();
    let mut plan = MutationPlan::default();
    for request in batch {
        let (mutations, outcome) = plan_store(request, validation, &mut reservations, &mut pending)?;
        plan.mutations.extend(mutations);
        plan.stored.push(outcome);
    }
    Ok(plan)
}

fn plan_store(
    request: &StoreRequest,
    validation: &Validation<'_>,
    reservations: &mut Reservations,
    pending: &mut PendingCounts,
) -> Result<(Vec<Mutation>, StoreOutcome), InventoryError> {
    if request.quantity == 0 {
        return Err(InventoryError::InvalidQuantity(0));
    }
    if let Some(slot) = request.slot {
        let pool = slots::validate(validation.inventory, slot)?;
        if pool == Pool::Buyback || pool.is_equipped() {
            return Err(InventoryError::InvalidSlot(slot));
        }
    }
    let template = validation.template(request.template)?;

    // Limits first: a strict request over a cap never reaches the planner.
    let violation = capacity::acquire_violation(
        validation.inventory,
        validation.env,
        validation.context,
        &template,
        request.quantity,
        None,
        pending,
    )?;
    let (allowed, limit_shortfall) = match violation {
        None => (request.quantity, 0),
        Some(error) if !request.partial => return Err(error),
        Some(error) => {
            let shortfall = error
                .shortfall()
                .unwrap_or(request.quantity)
                .min(request.quantity);
            if shortfall == request.quantity {
                return Err(error);
            }
            (request.quantity - shortfall, shortfall)
        }
    };

    let bound = template.binding == BindPolicy::OnPickup;
    let mut placement = PlacementRequest::new(template.id, allowed, request.scope).bound(bound);
    if let Some(slot) = request.slot {
        placement = placement.at_slot(slot);
    }
    if let Some(holder) = request.container {
        placement = placement.in_container(holder);
    }
    let plan = validation.planner(reservations).plan(&template, &placement)?;
    if plan.placed() == 0 || (!request.partial && !plan.is_complete()) {
        return Err(InventoryError::SpatialCapacityExceeded {
            shortfall: plan.shortfall,
        });
    }

    let mut mutations = Vec::with_capacity(plan.entries.len());
    for entry in &plan.entries {
        match entry.merge_into {
            Some(stack) => mutations.push(Mutation::Grow {
                stack,
                by: entry.quantity,
            }),
            None => mutations.push(Mutation::Create {
                template,
                quantity: entry.quantity,
                bound,
                to: entry.address,
            }),
        }
    }

    let outcome = StoreOutcome {
        template: template.id,
        requested: request.quantity,
        placed: plan.placed(),
        limit_shortfall,
        spatial_shortfall: plan.shortfall,
    };
    tracing::debug!(
        template = %template.id,
        requested = outcome.requested,
        placed = outcome.placed,
        limit_shortfall,
        spatial_shortfall = outcome.spatial_shortfall,
        "store planned"
    );
    reservations.reserve(&plan);
    pending.record(&template, plan.placed());
    Ok((mutations, outcome))
}
