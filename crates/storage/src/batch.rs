// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Write batches: everything one pass wants to persist, committed together.

use fl_core::{AgentSnapshot, ConstructionSample, EpochStats, JumpgateRecord, LeaderboardEntry};
use serde::{Deserialize, Serialize};

/// A single write. Batches of these are the unit of the WAL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StoreOp {
    AgentSnapshot(AgentSnapshot),
    Jumpgate(JumpgateRecord),
    ConstructionSample(ConstructionSample),
    Stats(EpochStats),
    Leaderboard(LeaderboardEntry),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Batch {
    ops: Vec<StoreOp>,
}

impl Batch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn upsert_agent_snapshot(&mut self, snapshot: AgentSnapshot) -> &mut Self {
        self.ops.push(StoreOp::AgentSnapshot(snapshot));
        self
    }

    pub fn upsert_jumpgate(&mut self, record: JumpgateRecord) -> &mut Self {
        self.ops.push(StoreOp::Jumpgate(record));
        self
    }

    pub fn append_construction_sample(&mut self, sample: ConstructionSample) -> &mut Self {
        self.ops.push(StoreOp::ConstructionSample(sample));
        self
    }

    pub fn upsert_stats(&mut self, stats: EpochStats) -> &mut Self {
        self.ops.push(StoreOp::Stats(stats));
        self
    }

    pub fn record_leaderboard(&mut self, entry: LeaderboardEntry) -> &mut Self {
        self.ops.push(StoreOp::Leaderboard(entry));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn ops(&self) -> &[StoreOp] {
        &self.ops
    }
}

impl Extend<StoreOp> for Batch {
    fn extend<T: IntoIterator<Item = StoreOp>>(&mut self, iter: T) {
        self.ops.extend(iter);
    }
}
