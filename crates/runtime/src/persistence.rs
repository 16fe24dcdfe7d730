//! Write-behind persistence for committed inventory changes.
//!
//! The engine hands committed events to [`PersistenceHandle`] through the
//! synchronous [`PersistenceSink`] trait; the handle forwards them over a
//! bounded channel to a [`PersistenceWorker`] task that owns the files. The
//! engine never waits on disk and never rolls back when a write fails.
//!
//! # File Structure
//!
//! ```text
//! {save_dir}/
//!   ├── events.jsonl
//!   └── inventories/
//!       ├── inventory_{player}.bin
//!       └── ...
//! ```

use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use inventory_core::{InventoryEvent, PersistenceSink, PlayerId, PlayerInventory};
use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::error::{Result, RuntimeError};

/// One line of the event log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Position in the log, starting at 0 for a fresh file.
    pub sequence: u64,
    pub owner: PlayerId,
    pub event: InventoryEvent,
}

/// Append-only JSON-lines event log.
pub struct EventLog {
    path: PathBuf,
    writer: BufWriter<File>,
    next_sequence: u64,
}

impl EventLog {
    pub const FILE_NAME: &'static str = "events.jsonl";

    /// Opens the log in `dir` for appending, creating it if needed.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;
        let path = dir.join(Self::FILE_NAME);

        let next_sequence = if path.exists() {
            BufReader::new(File::open(&path)?).lines().count() as u64
        } else {
            0
        };
        let file = OpenOptions::new().create(true).append(true).open(&path)?;

        debug!("Opened event log {} at sequence {}", path.display(), next_sequence);
        Ok(Self {
            path,
            writer: BufWriter::new(file),
            next_sequence,
        })
    }

    pub fn append(&mut self, owner: PlayerId, event: InventoryEvent) -> Result<u64> {
        let record = EventRecord {
            sequence: self.next_sequence,
            owner,
            event,
        };
        serde_json::to_writer(&mut self.writer, &record)?;
        self.writer.write_all(b"\n")?;
        self.next_sequence += 1;
        Ok(record.sequence)
    }

    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads every record of a log file in order.
    pub fn read_all(path: impl AsRef<Path>) -> Result<Vec<EventRecord>> {
        let reader = BufReader::new(File::open(path.as_ref())?);
        let mut records = Vec::new();
        for line in reader.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            records.push(serde_json::from_str(&line)?);
        }
        Ok(records)
    }
}

/// Per-character bincode snapshots.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    dir: PathBuf,
}

impl SnapshotStore {
    pub fn new(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn path(&self, owner: PlayerId) -> PathBuf {
        self.dir.join(format!("inventory_{}.bin", owner.0))
    }

    /// Writes a snapshot through a temporary file and an atomic rename.
    pub fn save(&self, inventory: &PlayerInventory) -> Result<()> {
        let path = self.path(inventory.owner);
        let temp_path = path.with_extension("bin.tmp");

        let bytes = bincode::serialize(inventory)?;
        fs::write(&temp_path, bytes)?;
        fs::rename(&temp_path, &path)?;

        debug!(
            "Saved inventory of {} at nonce {} to {}",
            inventory.owner,
            inventory.nonce(),
            path.display()
        );
        Ok(())
    }

    pub fn load(&self, owner: PlayerId) -> Result<Option<PlayerInventory>> {
        let path = self.path(owner);
        if !path.exists() {
            return Ok(None);
        }

        let bytes = fs::read(&path)?;
        let inventory: PlayerInventory = bincode::deserialize(&bytes)?;
        if inventory.owner != owner {
            return Err(RuntimeError::Serialization(format!(
                "snapshot {} belongs to {}",
                path.display(),
                inventory.owner
            )));
        }
        Ok(Some(inventory))
    }

    pub fn exists(&self, owner: PlayerId) -> bool {
        self.path(owner).exists()
    }
}

enum Command {
    Events {
        owner: PlayerId,
        events: Vec<InventoryEvent>,
    },
    Snapshot(Box<PlayerInventory>),
    Flush {
        reply: oneshot::Sender<Result<()>>,
    },
    Shutdown,
}

/// Cloneable sender side of the persistence worker.
#[derive(Clone)]
pub struct PersistenceHandle {
    tx: mpsc::Sender<Command>,
}

impl PersistenceHandle {
    /// Queues a snapshot of a committed inventory.
    pub fn save_snapshot(&self, inventory: &PlayerInventory) {
        let owner = inventory.owner;
        if let Err(error) = self
            .tx
            .try_send(Command::Snapshot(Box::new(inventory.clone())))
        {
            warn!(%owner, "dropped inventory snapshot: {error}");
        }
    }

    /// Waits until every queued command has been written and flushed.
    pub async fn flush(&self) -> Result<()> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(Command::Flush { reply })
            .await
            .map_err(|_| RuntimeError::PersistenceClosed)?;
        rx.await.map_err(|_| RuntimeError::PersistenceClosed)?
    }

    pub async fn shutdown(&self) -> Result<()> {
        self.tx
            .send(Command::Shutdown)
            .await
            .map_err(|_| RuntimeError::PersistenceClosed)
    }
}

impl PersistenceSink for PersistenceHandle {
    fn persist(&self, owner: PlayerId, events: &[InventoryEvent]) {
        let command = Command::Events {
            owner,
            events: events.to_vec(),
        };
        if let Err(error) = self.tx.try_send(command) {
            warn!(%owner, count = events.len(), "dropped inventory events: {error}");
        }
    }
}

/// Background task that owns the event log and snapshot store.
pub struct PersistenceWorker {
    events: EventLog,
    snapshots: SnapshotStore,
    rx: mpsc::Receiver<Command>,
}

impl PersistenceWorker {
    pub const SNAPSHOT_DIR: &'static str = "inventories";

    /// Opens the files under `save_dir` and spawns the worker task.
    pub fn spawn(
        save_dir: impl AsRef<Path>,
        capacity: usize,
    ) -> Result<(PersistenceHandle, JoinHandle<()>)> {
        let save_dir = save_dir.as_ref();
        let events = EventLog::open(save_dir)?;
        let snapshots = SnapshotStore::new(save_dir.join(Self::SNAPSHOT_DIR))?;
        let (tx, rx) = mpsc::channel(capacity.max(1));

        let worker = Self {
            events,
            snapshots,
            rx,
        };
        let join = tokio::spawn(worker.run());
        Ok((PersistenceHandle { tx }, join))
    }

    /// Main worker loop
    async fn run(mut self) {
        info!("PersistenceWorker started: {}", self.events.path().display());

        while let Some(command) = self.rx.recv().await {
            match command {
                Command::Events { owner, events } => {
                    for event in events {
                        if let Err(error) = self.events.append(owner, event) {
                            warn!(%owner, "failed to append inventory event: {error}");
                        }
                    }
                }
                Command::Snapshot(inventory) => {
                    if let Err(error) = self.snapshots.save(&inventory) {
                        warn!(owner = %inventory.owner, "failed to save snapshot: {error}");
                    }
                }
                Command::Flush { reply } => {
                    let _ = reply.send(self.events.flush());
                }
                Command::Shutdown => {
                    info!("Shutdown command received");
                    break;
                }
            }
        }

        if let Err(error) = self.events.flush() {
            warn!("failed to flush event log on shutdown: {error}");
        }
        info!("PersistenceWorker stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use inventory_core::{InventoryConfig, StackId, TemplateId};

    #[test]
    fn event_log_resumes_sequence_after_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let owner = PlayerId(4);

        let mut log = EventLog::open(dir.path()).unwrap();
        log.append(owner, InventoryEvent::Bound { stack: StackId(1) }).unwrap();
        log.append(owner, InventoryEvent::Bound { stack: StackId(2) }).unwrap();
        log.flush().unwrap();
        drop(log);

        let mut log = EventLog::open(dir.path()).unwrap();
        let sequence = log
            .append(
                owner,
                InventoryEvent::Removed {
                    stack: StackId(1),
                    template: TemplateId(9),
                    from: None,
                },
            )
            .unwrap();
        log.flush().unwrap();
        assert_eq!(sequence, 2);

        let records = EventLog::read_all(log.path()).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[1].event, InventoryEvent::Bound { stack: StackId(2) });
    }

    #[test]
    fn snapshots_round_trip_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::new(dir.path()).unwrap();
        let inventory = PlayerInventory::new(PlayerId(8), &InventoryConfig::default());

        assert!(store.load(PlayerId(8)).unwrap().is_none());
        store.save(&inventory).unwrap();
        assert!(store.exists(PlayerId(8)));
        assert_eq!(store.load(PlayerId(8)).unwrap(), Some(inventory));
    }
}
