//! Request dispatch.

use super::MutationPlan;
use super::validate::Validation;
use super::{maintenance, store};
use crate::error::InventoryError;
use crate::request::InventoryRequest;

/// A request that can be validated into a mutation plan.
///
/// Validation never mutates: it either returns every mutation the request
/// needs, or the first reason it cannot be performed.
pub trait RequestTransition {
    fn validate(&self, validation: &Validation<'_>) -> Result<MutationPlan, InventoryError>;
}

/// Routes a request to its transition.
pub(super) fn validate_request(
    request: &InventoryRequest,
    validation: &Validation<'_>,
) -> Result<MutationPlan, InventoryError> {
    let plan = match request {
        InventoryRequest::Store(transition) => transition.validate(validation),
        InventoryRequest::StoreBatch(batch) => store::validate_batch(batch, validation),
        InventoryRequest::Equip(transition) => transition.validate(validation),
        InventoryRequest::Move(transition) => transition.validate(validation),
        InventoryRequest::Split(transition) => transition.validate(validation),
        InventoryRequest::Swap(transition) => transition.validate(validation),
        InventoryRequest::Destroy(transition) => transition.validate(validation),
        InventoryRequest::Sell { stack } => maintenance::sell(*stack, validation),
        InventoryRequest::BuyBack { slot } => maintenance::buy_back(*slot, validation),
        InventoryRequest::DepositReagents => maintenance::deposit_reagents(validation),
        InventoryRequest::AutoStore(transition) => transition.validate(validation),
        InventoryRequest::Resize(transition) => transition.validate(validation),
    }?;
    tracing::trace!(
        request = request.as_str(),
        mutations = plan.mutations.len(),
        "request validated"
    );
    Ok(plan)
}
