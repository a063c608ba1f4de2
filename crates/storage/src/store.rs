// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The persistence sink.
//!
//! [`Store`] keeps a [`MaterializedState`] in memory. On disk it is backed
//! by a WAL of batches plus periodic zstd snapshots; a batch is applied to
//! memory only after its WAL line is flushed.

use crate::batch::Batch;
use crate::snapshot::{load_snapshot, save_snapshot, Snapshot, SnapshotError};
use crate::state::{AgentHistory, MaterializedState};
use crate::wal::{Wal, WalError};
use fl_core::{
    AgentSnapshot, AgentSymbol, ConstructionSample, Epoch, JumpgateRecord, JumpgateStatus,
    WaypointSymbol,
};
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

const WAL_FILE: &str = "batches.wal";
const SNAPSHOT_FILE: &str = "snapshot.zst";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("WAL error: {0}")]
    Wal(#[from] WalError),
    #[error("snapshot error: {0}")]
    Snapshot(#[from] SnapshotError),
}

/// Where collected data goes.
///
/// `commit` is all-or-nothing: either every op in the batch becomes visible
/// to the queries or none does.
pub trait Sink: Send + Sync + 'static {
    /// Commit a batch and return its sequence number.
    fn commit(&self, batch: Batch) -> Result<u64, StorageError>;

    fn latest_per_agent(&self, epoch: &Epoch) -> Vec<AgentSnapshot>;

    fn jumpgates_by_status(&self, epoch: &Epoch, status: JumpgateStatus) -> Vec<JumpgateRecord>;

    fn jumpgates(&self, epoch: &Epoch) -> Vec<JumpgateRecord>;

    fn agent_history(&self, epoch: &Epoch) -> BTreeMap<AgentSymbol, AgentHistory>;

    fn construction_samples(&self, epoch: &Epoch, waypoint: &WaypointSymbol)
        -> Vec<ConstructionSample>;
}

struct Inner {
    state: MaterializedState,
    wal: Option<Wal>,
    seq: u64,
}

pub struct Store {
    dir: Option<PathBuf>,
    inner: Mutex<Inner>,
}

impl Store {
    /// Open the store under `dir`, recovering from snapshot plus WAL.
    pub fn open(dir: &Path) -> Result<Self, StorageError> {
        let snapshot_path = dir.join(SNAPSHOT_FILE);
        let (mut state, snapshot_seq) = match load_snapshot(&snapshot_path)? {
            Some(snapshot) => (snapshot.state, snapshot.seq),
            None => (MaterializedState::default(), 0),
        };

        let wal = Wal::open(&dir.join(WAL_FILE), snapshot_seq)?;
        let replay = wal.entries_after(snapshot_seq)?;
        for entry in &replay {
            state.apply_batch(&entry.batch);
        }
        info!(
            dir = %dir.display(),
            snapshot_seq,
            replayed = replay.len(),
            "store recovered"
        );

        let seq = wal.write_seq();
        Ok(Self { dir: Some(dir.to_path_buf()), inner: Mutex::new(Inner { state, wal: Some(wal), seq }) })
    }

    /// A store with no backing files.
    pub fn in_memory() -> Self {
        Self {
            dir: None,
            inner: Mutex::new(Inner { state: MaterializedState::default(), wal: None, seq: 0 }),
        }
    }

    /// Sequence number of the last committed batch.
    pub fn seq(&self) -> u64 {
        self.inner.lock().seq
    }

    /// Clone of the full materialized state.
    pub fn state(&self) -> MaterializedState {
        self.inner.lock().state.clone()
    }

    /// Write a snapshot and truncate the WAL it covers.
    ///
    /// A no-op for in-memory stores.
    pub fn checkpoint(&self) -> Result<(), StorageError> {
        let Some(dir) = &self.dir else {
            return Ok(());
        };
        let mut inner = self.inner.lock();
        let snapshot = Snapshot::new(inner.seq, inner.state.clone());
        let size = save_snapshot(&dir.join(SNAPSHOT_FILE), &snapshot)?;
        if let Some(wal) = inner.wal.as_mut() {
            wal.truncate()?;
        }
        info!(seq = snapshot.seq, size, "checkpoint written");
        Ok(())
    }
}

impl Sink for Store {
    fn commit(&self, batch: Batch) -> Result<u64, StorageError> {
        let mut inner = self.inner.lock();
        let seq = match inner.wal.as_mut() {
            Some(wal) => wal.append_flushed(&batch)?,
            None => inner.seq + 1,
        };
        inner.state.apply_batch(&batch);
        inner.seq = seq;
        debug!(seq, ops = batch.len(), "batch committed");
        Ok(seq)
    }

    fn latest_per_agent(&self, epoch: &Epoch) -> Vec<AgentSnapshot> {
        self.inner.lock().state.latest_per_agent(epoch)
    }

    fn jumpgates_by_status(&self, epoch: &Epoch, status: JumpgateStatus) -> Vec<JumpgateRecord> {
        self.inner.lock().state.jumpgates_by_status(epoch, status)
    }

    fn jumpgates(&self, epoch: &Epoch) -> Vec<JumpgateRecord> {
        self.inner.lock().state.jumpgates(epoch)
    }

    fn agent_history(&self, epoch: &Epoch) -> BTreeMap<AgentSymbol, AgentHistory> {
        self.inner.lock().state.agent_history(epoch)
    }

    fn construction_samples(
        &self,
        epoch: &Epoch,
        waypoint: &WaypointSymbol,
    ) -> Vec<ConstructionSample> {
        self.inner.lock().state.construction_samples(epoch, waypoint)
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
