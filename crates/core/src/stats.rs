// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Server-wide statistics and leaderboards recorded once per ingestion pass.

use crate::symbol::{AgentSymbol, Epoch};
use serde::{Deserialize, Serialize};

/// Latest server status for an epoch. Upserted on every pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpochStats {
    pub epoch: Epoch,
    pub status: String,
    pub version: String,
    /// Timestamp of the next reset as reported by the server
    pub next_reset: String,
    /// Timestamp of the last market update
    pub market_update: String,
    pub agents: u64,
    #[serde(default)]
    pub accounts: Option<u64>,
    pub ships: u64,
    pub systems: u64,
    pub waypoints: u64,
}

/// Which leaderboard a row belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeaderboardKind {
    Credits,
    Charts,
}

crate::simple_display! {
    LeaderboardKind {
        Credits => "credits",
        Charts => "charts",
    }
}

/// One leaderboard position at one point in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub epoch: Epoch,
    pub timestamp: u64,
    pub symbol: AgentSymbol,
    pub kind: LeaderboardKind,
    /// Credits or submitted chart count, depending on `kind`
    pub value: i64,
}
