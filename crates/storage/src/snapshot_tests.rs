// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::batch::Batch;
use fl_core::{AgentSnapshot, Epoch};
use tempfile::tempdir;

fn populated_state() -> MaterializedState {
    let mut batch = Batch::new();
    batch.upsert_agent_snapshot(AgentSnapshot::builder().credits(999).build());
    let mut state = MaterializedState::default();
    state.apply_batch(&batch);
    state
}

#[test]
fn missing_snapshot_is_none() {
    let dir = tempdir().unwrap();
    assert!(load_snapshot(&dir.path().join("snapshot.zst")).unwrap().is_none());
}

#[test]
fn saved_snapshot_loads_back() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("snapshot.zst");
    let state = populated_state();

    let size = save_snapshot(&path, &Snapshot::new(7, state.clone())).unwrap();
    assert!(size > 0);

    let loaded = load_snapshot(&path).unwrap().unwrap();
    assert_eq!(loaded.seq, 7);
    assert_eq!(loaded.version, CURRENT_SNAPSHOT_VERSION);
    assert_eq!(loaded.state, state);
    assert_eq!(loaded.state.latest_per_agent(&Epoch::new("2025-06-01"))[0].credits, 999);
}

#[test]
fn saving_rotates_previous_snapshot() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("snapshot.zst");
    for seq in 1..=5 {
        save_snapshot(&path, &Snapshot::new(seq, MaterializedState::default())).unwrap();
    }

    assert!(path.with_extension("bak").exists());
    assert!(path.with_extension("bak.2").exists());
    assert!(path.with_extension("bak.3").exists());
    assert!(!path.with_extension("bak.4").exists());
    assert_eq!(load_snapshot(&path).unwrap().unwrap().seq, 5);
}

#[test]
fn newer_version_is_rejected() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("snapshot.zst");
    let mut snapshot = Snapshot::new(1, MaterializedState::default());
    snapshot.version = CURRENT_SNAPSHOT_VERSION + 1;
    save_snapshot(&path, &snapshot).unwrap();

    assert!(matches!(load_snapshot(&path), Err(SnapshotError::TooNew(2, 1))));
}
