//! Transactional coordinator for inventory requests.
//!
//! The [`InventoryEngine`] is the only writer of a [`PlayerInventory`]. Every
//! request runs `Validating -> Accepted | Rejected -> Applying -> Committed`:
//! validation reads the inventory and produces a [`MutationPlan`]; the plan is
//! applied to a staged copy which replaces the live inventory only when every
//! mutation succeeds. A rejected request leaves the inventory untouched.

mod equip;
mod errors;
mod maintenance;
mod movement;
mod store;
mod transition;
mod validate;

pub use errors::{TransactionError, TransactionPhase, TransactionState};
pub use validate::Validation;

use crate::apply::{InventoryEvent, Mutation, MutationApplier};
use crate::config::InventoryConfig;
use crate::env::InventoryEnv;
use crate::request::InventoryRequest;
use crate::state::{PlayerContext, PlayerInventory, TemplateId};

/// Placed and unplaced units of one store request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StoreOutcome {
    pub template: TemplateId,
    pub requested: u32,
    pub placed: u32,
    /// Units refused by the absolute or category cap.
    pub limit_shortfall: u32,
    /// Units allowed by the caps but left without room.
    pub spatial_shortfall: u32,
}

impl StoreOutcome {
    pub fn unplaced(&self) -> u32 {
        self.limit_shortfall + self.spatial_shortfall
    }

    pub fn is_complete(&self) -> bool {
        self.unplaced() == 0
    }
}

/// Validated, not yet applied, result of a request.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MutationPlan {
    pub mutations: Vec<Mutation>,
    pub stored: Vec<StoreOutcome>,
}

impl MutationPlan {
    pub fn new(mutations: Vec<Mutation>) -> Self {
        Self {
            mutations,
            stored: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.mutations.is_empty()
    }
}

/// Result of a committed request.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CommitReport {
    /// Inventory nonce after the commit.
    pub nonce: u64,
    pub events: Vec<InventoryEvent>,
    /// One entry per store request, in request order.
    pub stored: Vec<StoreOutcome>,
}

/// Coordinator that validates and commits requests against one inventory.
pub struct InventoryEngine<'a> {
    inventory: &'a mut PlayerInventory,
    applier: MutationApplier,
    state: TransactionState,
}

impl<'a> InventoryEngine<'a> {
    pub fn new(inventory: &'a mut PlayerInventory) -> Self {
        Self {
            inventory,
            applier: MutationApplier::default(),
            state: TransactionState::Idle,
        }
    }

    pub fn with_config(inventory: &'a mut PlayerInventory, config: &InventoryConfig) -> Self {
        Self {
            inventory,
            applier: MutationApplier::from_config(config),
            state: TransactionState::Idle,
        }
    }

    /// State reached by the most recent request.
    pub fn state(&self) -> TransactionState {
        self.state
    }

    pub fn inventory(&self) -> &PlayerInventory {
        self.inventory
    }

    /// Validates a request without applying it.
    pub fn plan(
        &self,
        env: &InventoryEnv<'_>,
        context: &PlayerContext,
        request: &InventoryRequest,
    ) -> Result<MutationPlan, TransactionError> {
        let validation = Validation::new(self.inventory, context, env);
        transition::validate_request(request, &validation).map_err(|error| {
            TransactionError::new(
                TransactionPhase::Validating,
                request.as_str(),
                self.inventory.nonce(),
                error,
            )
        })
    }

    /// Validates and commits a request.
    ///
    /// On success the inventory nonce is incremented and the events are
    /// published to the environment's sinks. On failure nothing changes.
    pub fn execute(
        &mut self,
        env: &InventoryEnv<'_>,
        context: &PlayerContext,
        request: &InventoryRequest,
    ) -> Result<CommitReport, TransactionError> {
        let nonce = self.inventory.nonce();
        let kind = request.as_str();
        self.state = TransactionState::Validating;

        let plan = match self.plan(env, context, request) {
            Ok(plan) => plan,
            Err(error) => {
                self.state = TransactionState::Rejected;
                tracing::warn!(
                    owner = %self.inventory.owner,
                    request = kind,
                    nonce,
                    code = crate::error::InventoryFault::error_code(&error),
                    "request rejected: {}",
                    error.error
                );
                return Err(error);
            }
        };
        self.state = TransactionState::Accepted;
        tracing::debug!(
            owner = %self.inventory.owner,
            request = kind,
            mutations = plan.mutations.len(),
            "plan accepted"
        );

        self.state = TransactionState::Applying;
        let mut staged = self.inventory.clone();
        let events = match self.applier.apply(&mut staged, plan.mutations) {
            Ok(events) => events,
            Err(error) => {
                self.state = TransactionState::Rejected;
                tracing::warn!(
                    owner = %self.inventory.owner,
                    request = kind,
                    nonce,
                    "plan failed to apply: {error}"
                );
                return Err(TransactionError::new(
                    TransactionPhase::Applying,
                    kind,
                    nonce,
                    error,
                ));
            }
        };
        staged.bump_nonce();
        *self.inventory = staged;
        self.state = TransactionState::Committed;

        let owner = self.inventory.owner;
        tracing::debug!(
            %owner,
            request = kind,
            nonce = self.inventory.nonce(),
            events = events.len(),
            "transaction committed"
        );
        env.publish(owner, &events);

        Ok(CommitReport {
            nonce: self.inventory.nonce(),
            events,
            stored: plan.stored,
        })
    }
}
