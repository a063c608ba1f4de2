// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Materialized state built by applying batches in WAL order.

use crate::batch::{Batch, StoreOp};
use fl_core::{
    AgentSample, AgentSnapshot, AgentSymbol, ConstructionSample, Epoch, EpochStats,
    JumpgateRecord, JumpgateStatus, LeaderboardEntry, LeaderboardKind, SystemSymbol,
    WaypointSymbol,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::warn;

/// Static fields of an agent plus its credit/fleet history, oldest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentHistory {
    pub faction: String,
    pub headquarters: String,
    pub samples: Vec<AgentSample>,
}

/// Everything recorded for one epoch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpochState {
    #[serde(default)]
    pub agents: BTreeMap<AgentSymbol, AgentHistory>,
    #[serde(default)]
    pub jumpgates: BTreeMap<SystemSymbol, JumpgateRecord>,
    #[serde(default)]
    pub construction: Vec<ConstructionSample>,
    #[serde(default)]
    pub stats: Option<EpochStats>,
    /// Keyed by (timestamp, kind, symbol)
    #[serde(default, with = "leaderboard_serde")]
    pub leaderboard: BTreeMap<(u64, LeaderboardKind, AgentSymbol), i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaterializedState {
    #[serde(default)]
    pub epochs: BTreeMap<Epoch, EpochState>,
}

impl MaterializedState {
    pub fn apply_batch(&mut self, batch: &Batch) {
        for op in batch.ops() {
            self.apply_op(op);
        }
    }

    pub fn apply_op(&mut self, op: &StoreOp) {
        match op {
            StoreOp::AgentSnapshot(snapshot) => self.apply_agent(snapshot),
            StoreOp::Jumpgate(record) => self.apply_jumpgate(record),
            StoreOp::ConstructionSample(sample) => {
                self.epochs.entry(sample.epoch.clone()).or_default().construction.push(sample.clone());
            }
            StoreOp::Stats(stats) => {
                self.epochs.entry(stats.epoch.clone()).or_default().stats = Some(stats.clone());
            }
            StoreOp::Leaderboard(entry) => {
                self.epochs
                    .entry(entry.epoch.clone())
                    .or_default()
                    .leaderboard
                    .insert((entry.timestamp, entry.kind, entry.symbol.clone()), entry.value);
            }
        }
    }

    /// Upsert on (epoch, symbol, timestamp), keeping samples sorted.
    fn apply_agent(&mut self, snapshot: &AgentSnapshot) {
        let epoch = self.epochs.entry(snapshot.epoch.clone()).or_default();
        let history = epoch.agents.entry(snapshot.symbol.clone()).or_insert_with(|| AgentHistory {
            faction: snapshot.faction.clone(),
            headquarters: snapshot.headquarters.clone(),
            samples: Vec::new(),
        });
        history.faction.clone_from(&snapshot.faction);
        history.headquarters.clone_from(&snapshot.headquarters);

        let sample = AgentSample::from(snapshot);
        match history.samples.binary_search_by_key(&sample.timestamp, |s| s.timestamp) {
            Ok(i) => history.samples[i] = sample,
            Err(i) => history.samples.insert(i, sample),
        }
    }

    /// One record per (epoch, system). A lower status never replaces a higher one.
    fn apply_jumpgate(&mut self, record: &JumpgateRecord) {
        let epoch = self.epochs.entry(record.epoch.clone()).or_default();
        match epoch.jumpgates.get_mut(&record.system) {
            Some(existing) if record.status < existing.status => {
                warn!(
                    system = %record.system,
                    from = %existing.status,
                    to = %record.status,
                    "ignoring jumpgate status regression"
                );
            }
            Some(existing) => *existing = record.clone(),
            None => {
                epoch.jumpgates.insert(record.system.clone(), record.clone());
            }
        }
    }

    pub fn epoch(&self, epoch: &Epoch) -> Option<&EpochState> {
        self.epochs.get(epoch)
    }

    /// The most recent snapshot of every agent in the epoch.
    pub fn latest_per_agent(&self, epoch: &Epoch) -> Vec<AgentSnapshot> {
        let Some(state) = self.epochs.get(epoch) else {
            return Vec::new();
        };
        state
            .agents
            .iter()
            .filter_map(|(symbol, history)| {
                let last = history.samples.last()?;
                Some(AgentSnapshot {
                    epoch: epoch.clone(),
                    symbol: symbol.clone(),
                    credits: last.credits,
                    ship_count: last.ship_count,
                    faction: history.faction.clone(),
                    headquarters: history.headquarters.clone(),
                    timestamp: last.timestamp,
                })
            })
            .collect()
    }

    pub fn jumpgates(&self, epoch: &Epoch) -> Vec<JumpgateRecord> {
        self.epochs
            .get(epoch)
            .map(|s| s.jumpgates.values().cloned().collect())
            .unwrap_or_default()
    }

    pub fn jumpgates_by_status(&self, epoch: &Epoch, status: JumpgateStatus) -> Vec<JumpgateRecord> {
        self.epochs
            .get(epoch)
            .map(|s| s.jumpgates.values().filter(|r| r.status == status).cloned().collect())
            .unwrap_or_default()
    }

    pub fn agent_history(&self, epoch: &Epoch) -> BTreeMap<AgentSymbol, AgentHistory> {
        self.epochs.get(epoch).map(|s| s.agents.clone()).unwrap_or_default()
    }

    pub fn construction_samples(
        &self,
        epoch: &Epoch,
        waypoint: &WaypointSymbol,
    ) -> Vec<ConstructionSample> {
        self.epochs
            .get(epoch)
            .map(|s| s.construction.iter().filter(|c| &c.waypoint == waypoint).cloned().collect())
            .unwrap_or_default()
    }

    pub fn stats(&self, epoch: &Epoch) -> Option<EpochStats> {
        self.epochs.get(epoch).and_then(|s| s.stats.clone())
    }

    pub fn leaderboard(&self, epoch: &Epoch) -> Vec<LeaderboardEntry> {
        let Some(state) = self.epochs.get(epoch) else {
            return Vec::new();
        };
        state
            .leaderboard
            .iter()
            .map(|((timestamp, kind, symbol), value)| LeaderboardEntry {
                epoch: epoch.clone(),
                timestamp: *timestamp,
                symbol: symbol.clone(),
                kind: *kind,
                value: *value,
            })
            .collect()
    }
}

/// JSON objects need string keys, so the leaderboard map is stored as a list.
mod leaderboard_serde {
    use fl_core::{AgentSymbol, LeaderboardKind};
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::collections::BTreeMap;

    type Key = (u64, LeaderboardKind, AgentSymbol);

    #[derive(Serialize, Deserialize)]
    struct Row {
        timestamp: u64,
        kind: LeaderboardKind,
        symbol: AgentSymbol,
        value: i64,
    }

    pub fn serialize<S: Serializer>(map: &BTreeMap<Key, i64>, s: S) -> Result<S::Ok, S::Error> {
        let rows: Vec<Row> = map
            .iter()
            .map(|((timestamp, kind, symbol), value)| Row {
                timestamp: *timestamp,
                kind: *kind,
                symbol: symbol.clone(),
                value: *value,
            })
            .collect();
        rows.serialize(s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<BTreeMap<Key, i64>, D::Error> {
        let rows = Vec::<Row>::deserialize(d)?;
        Ok(rows.into_iter().map(|r| ((r.timestamp, r.kind, r.symbol), r.value)).collect())
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
