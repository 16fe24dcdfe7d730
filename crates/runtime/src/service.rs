//! Per-character inventory service.
//!
//! Owns one [`PlayerInventory`] per loaded character and routes every request
//! through an [`InventoryEngine`] wired to the shared content snapshot, the
//! notification bus and (optionally) the persistence worker.

use std::collections::HashMap;
use std::sync::Arc;

use inventory_core::{
    CommitReport, ContentSnapshot, Env, InventoryEngine, InventoryEnv, InventoryError,
    InventoryRequest, ItemOracle, LimitCategoryOracle, MutationPlan, NotificationSink,
    OracleError, PersistenceSink, PlayerContext, PlayerId, PlayerInventory, SlotAddress, StackId,
    TemplateId,
};
use tracing::{debug, info};

use crate::bus::EventBus;
use crate::error::{Result, RuntimeError};
use crate::persistence::{PersistenceHandle, SnapshotStore};

pub struct InventoryService {
    content: Arc<ContentSnapshot>,
    inventories: HashMap<PlayerId, PlayerInventory>,
    bus: EventBus,
    persistence: Option<PersistenceHandle>,
    snapshots: Option<SnapshotStore>,
}

impl InventoryService {
    pub fn new(content: Arc<ContentSnapshot>, bus: EventBus) -> Self {
        Self {
            content,
            inventories: HashMap::new(),
            bus,
            persistence: None,
            snapshots: None,
        }
    }

    /// Forwards committed events and snapshots to the persistence worker and
    /// restores characters from `snapshots` when they are opened.
    pub fn with_persistence(mut self, handle: PersistenceHandle, snapshots: SnapshotStore) -> Self {
        self.persistence = Some(handle);
        self.snapshots = Some(snapshots);
        self
    }

    pub fn content(&self) -> &ContentSnapshot {
        &self.content
    }

    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    /// Loads a character: from its snapshot when one exists, otherwise a fresh
    /// inventory sized by the content configuration.
    pub fn open(&mut self, owner: PlayerId) -> Result<&PlayerInventory> {
        if !self.inventories.contains_key(&owner) {
            let restored = match &self.snapshots {
                Some(store) => store.load(owner)?,
                None => None,
            };
            let inventory = match restored {
                Some(inventory) => {
                    info!(%owner, nonce = inventory.nonce(), "inventory restored from snapshot");
                    inventory
                }
                None => {
                    debug!(%owner, "fresh inventory created");
                    PlayerInventory::new(owner, &self.content.config)
                }
            };
            self.inventories.insert(owner, inventory);
        }
        self.inventory(owner)
    }

    /// Registers an inventory built elsewhere, replacing any loaded one.
    pub fn insert(&mut self, inventory: PlayerInventory) -> Option<PlayerInventory> {
        self.inventories.insert(inventory.owner, inventory)
    }

    pub fn inventory(&self, owner: PlayerId) -> Result<&PlayerInventory> {
        self.inventories
            .get(&owner)
            .ok_or(RuntimeError::UnknownPlayer(owner))
    }

    pub fn loaded(&self) -> impl Iterator<Item = PlayerId> + '_ {
        self.inventories.keys().copied()
    }

    /// Places a factory-built stack directly, bypassing placement rules.
    pub fn seed(
        &mut self,
        owner: PlayerId,
        template: TemplateId,
        quantity: u32,
        address: SlotAddress,
    ) -> Result<StackId> {
        let template = self
            .content
            .templates
            .template(template)
            .ok_or(InventoryError::Oracle(OracleError::TemplateNotFound(template)))?;
        let inventory = self
            .inventories
            .get_mut(&owner)
            .ok_or(RuntimeError::UnknownPlayer(owner))?;
        Ok(inventory.seed_stack(&template, quantity, address)?)
    }

    /// Validates a request without committing it.
    pub fn plan(
        &self,
        owner: PlayerId,
        context: &PlayerContext,
        request: &InventoryRequest,
    ) -> Result<MutationPlan> {
        let inventory = self
            .inventories
            .get(&owner)
            .ok_or(RuntimeError::UnknownPlayer(owner))?;
        let mut scratch = inventory.clone();
        let engine = InventoryEngine::with_config(&mut scratch, &self.content.config);
        Ok(engine.plan(&self.env(), context, request)?)
    }

    /// Executes a request; on commit the events reach the bus and the
    /// persistence worker, followed by a snapshot of the new state.
    pub fn execute(
        &mut self,
        owner: PlayerId,
        context: &PlayerContext,
        request: &InventoryRequest,
    ) -> Result<CommitReport> {
        let inventory = self
            .inventories
            .get_mut(&owner)
            .ok_or(RuntimeError::UnknownPlayer(owner))?;

        let env: InventoryEnv<'_> = Env::new(
            Some(&self.content.templates as &dyn ItemOracle),
            Some(&self.content.categories as &dyn LimitCategoryOracle),
            Some(&self.bus as &dyn NotificationSink),
            self.persistence
                .as_ref()
                .map(|handle| handle as &dyn PersistenceSink),
        );
        let mut engine = InventoryEngine::with_config(inventory, &self.content.config);
        let report = engine.execute(&env, context, request)?;

        if let Some(handle) = &self.persistence {
            handle.save_snapshot(engine.inventory());
        }
        Ok(report)
    }

    /// Drops a character from memory, queueing a final snapshot.
    pub fn close(&mut self, owner: PlayerId) -> Option<PlayerInventory> {
        let inventory = self.inventories.remove(&owner)?;
        if let Some(handle) = &self.persistence {
            handle.save_snapshot(&inventory);
        }
        Some(inventory)
    }

    fn env(&self) -> InventoryEnv<'_> {
        Env::with_oracles(
            &self.content.templates as &dyn ItemOracle,
            &self.content.categories as &dyn LimitCategoryOracle,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use inventory_core::{
        InventoryConfig, ItemTemplate, StoreRequest, TemplatesSnapshot, TransactionPhase,
    };

    fn service() -> InventoryService {
        let templates = TemplatesSnapshot::new([ItemTemplate::new(TemplateId(1), 20)]);
        let content = ContentSnapshot::new(
            templates,
            Default::default(),
            InventoryConfig::default(),
        );
        InventoryService::new(Arc::new(content), EventBus::with_capacity(8))
    }

    #[test]
    fn requests_for_unknown_players_fail() {
        let mut service = service();
        let request = InventoryRequest::Store(StoreRequest::new(TemplateId(1), 5));
        let result = service.execute(PlayerId(1), &PlayerContext::new(10), &request);
        assert!(matches!(result, Err(RuntimeError::UnknownPlayer(PlayerId(1)))));
    }

    #[test]
    fn planning_leaves_the_inventory_untouched() {
        let mut service = service();
        service.open(PlayerId(1)).unwrap();
        let request = InventoryRequest::Store(StoreRequest::new(TemplateId(1), 5));

        let plan = service
            .plan(PlayerId(1), &PlayerContext::new(10), &request)
            .unwrap();
        assert!(!plan.is_empty());
        assert_eq!(service.inventory(PlayerId(1)).unwrap().stack_count(), 0);
    }

    #[test]
    fn rejections_carry_the_validation_phase() {
        let mut service = service();
        service.open(PlayerId(1)).unwrap();
        let request = InventoryRequest::Store(StoreRequest::new(TemplateId(99), 1));

        let error = service
            .execute(PlayerId(1), &PlayerContext::new(10), &request)
            .unwrap_err();
        match error {
            RuntimeError::Transaction(error) => {
                assert_eq!(error.phase, TransactionPhase::Validating)
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn seeding_checks_the_template() {
        let mut service = service();
        service.open(PlayerId(1)).unwrap();
        let missing = service.seed(PlayerId(1), TemplateId(5), 1, SlotAddress::player(28));
        assert!(matches!(missing, Err(RuntimeError::Inventory(_))));

        let id = service
            .seed(PlayerId(1), TemplateId(1), 3, SlotAddress::player(28))
            .unwrap();
        assert_eq!(
            service.inventory(PlayerId(1)).unwrap().stack(id).map(|s| s.quantity),
            Some(3)
        );
    }
}
