//! Runtime orchestrator.
//!
//! Loads content, starts the persistence worker and hands out the
//! [`InventoryService`] that hosts drive.

use std::sync::Arc;

use inventory_content::ContentFactory;
use inventory_core::ContentSnapshot;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::info;

use crate::bus::{EventBus, InventoryNotice};
use crate::config::RuntimeConfig;
use crate::error::{Result, RuntimeError};
use crate::persistence::{PersistenceHandle, PersistenceWorker, SnapshotStore};
use crate::service::InventoryService;

pub struct InventoryRuntime {
    service: InventoryService,
    persistence: Option<(PersistenceHandle, JoinHandle<()>)>,
}

impl InventoryRuntime {
    /// Loads content from `config.data_dir` and starts the runtime.
    pub async fn start(config: RuntimeConfig) -> Result<Self> {
        let content = ContentFactory::new(&config.data_dir)
            .load_snapshot()
            .map_err(RuntimeError::Content)?;
        Self::with_content(&config, content).await
    }

    /// Starts the runtime over an already loaded content snapshot.
    pub async fn with_content(config: &RuntimeConfig, content: ContentSnapshot) -> Result<Self> {
        let bus = EventBus::with_capacity(config.event_capacity);
        let mut service = InventoryService::new(Arc::new(content), bus);

        let persistence = if config.enable_persistence {
            let (handle, join) =
                PersistenceWorker::spawn(&config.save_dir, config.event_capacity)?;
            let snapshots =
                SnapshotStore::new(config.save_dir.join(PersistenceWorker::SNAPSHOT_DIR))?;
            service = service.with_persistence(handle.clone(), snapshots);
            Some((handle, join))
        } else {
            None
        };

        info!(
            data_dir = %config.data_dir.display(),
            persistence = config.enable_persistence,
            "inventory runtime started"
        );
        Ok(Self {
            service,
            persistence,
        })
    }

    pub fn service(&self) -> &InventoryService {
        &self.service
    }

    pub fn service_mut(&mut self) -> &mut InventoryService {
        &mut self.service
    }

    pub fn subscribe(&self) -> broadcast::Receiver<InventoryNotice> {
        self.service.bus().subscribe()
    }

    /// Waits until the persistence worker has written everything queued so far.
    pub async fn flush(&self) -> Result<()> {
        match &self.persistence {
            Some((handle, _)) => handle.flush().await,
            None => Ok(()),
        }
    }

    /// Snapshots every loaded character and stops the persistence worker.
    pub async fn shutdown(mut self) -> Result<()> {
        let owners: Vec<_> = self.service.loaded().collect();
        for owner in owners {
            self.service.close(owner);
        }

        if let Some((handle, join)) = self.persistence.take() {
            handle.shutdown().await?;
            join.await.map_err(RuntimeError::WorkerJoin)?;
        }
        info!("inventory runtime stopped");
        Ok(())
    }
}
