// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

//! fl-storage: WAL-backed persistence for collected SpaceTraders data

mod batch;
mod snapshot;
mod state;
mod store;
mod wal;

pub use batch::{Batch, StoreOp};
pub use snapshot::{load_snapshot, save_snapshot, Snapshot, SnapshotError, CURRENT_SNAPSHOT_VERSION};
pub use state::{AgentHistory, EpochState, MaterializedState};
pub use store::{Sink, StorageError, Store};
pub use wal::{Wal, WalEntry, WalError};
