// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Agent snapshots and the activity classification.

use crate::symbol::{AgentSymbol, Epoch, SystemSymbol};
use serde::{Deserialize, Serialize};

/// Starting balance of every new account.
///
/// An agent whose balance is anything else has played at least once.
pub const ACTIVE_BASELINE_CREDITS: i64 = 175_000;

/// Returns true when `credits` differs from the starting balance.
pub fn is_active_credits(credits: i64) -> bool {
    credits != ACTIVE_BASELINE_CREDITS
}

/// One observation of an agent, taken during an ingestion pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentSnapshot {
    pub epoch: Epoch,
    pub symbol: AgentSymbol,
    /// May be negative when the agent is overdrawn
    pub credits: i64,
    pub ship_count: u32,
    pub faction: String,
    /// Headquarters waypoint, e.g. `X1-ZZ9-A1`
    pub headquarters: String,
    /// Unix seconds, rounded down to the minute of the pass
    pub timestamp: u64,
}

impl AgentSnapshot {
    pub fn is_active(&self) -> bool {
        is_active_credits(self.credits)
    }

    pub fn home_system(&self) -> Option<SystemSymbol> {
        SystemSymbol::from_headquarters(&self.headquarters)
    }
}

crate::builder! {
    pub struct AgentSnapshotBuilder => AgentSnapshot {
        into {
            epoch: Epoch = "2025-06-01",
            symbol: AgentSymbol = "AAA",
            faction: String = "COSMIC",
            headquarters: String = "X1-ZZ9-A1",
        }
        set {
            credits: i64 = ACTIVE_BASELINE_CREDITS,
            ship_count: u32 = 2,
            timestamp: u64 = 1_704_067_200,
        }
    }
}

/// Credits and fleet size at one point in time, without the static fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentSample {
    pub timestamp: u64,
    pub credits: i64,
    pub ship_count: u32,
}

impl From<&AgentSnapshot> for AgentSample {
    fn from(snapshot: &AgentSnapshot) -> Self {
        Self {
            timestamp: snapshot.timestamp,
            credits: snapshot.credits,
            ship_count: snapshot.ship_count,
        }
    }
}

#[cfg(test)]
#[path = "agent_tests.rs"]
mod tests;
