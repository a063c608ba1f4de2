// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Wire shapes of the endpoints the collector reads.

use fl_core::Material;
use serde::Deserialize;

/// `GET /`
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerStatus {
    pub status: String,
    pub version: String,
    pub reset_date: String,
    #[serde(default)]
    pub server_resets: ServerResets,
    #[serde(default)]
    pub health: Health,
    pub stats: Stats,
    #[serde(default)]
    pub leaderboards: Leaderboards,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerResets {
    #[serde(default)]
    pub next: String,
    #[serde(default)]
    pub frequency: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Health {
    #[serde(default)]
    pub last_market_update: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Stats {
    #[serde(default)]
    pub accounts: Option<u64>,
    pub agents: u64,
    pub ships: u64,
    pub systems: u64,
    pub waypoints: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Leaderboards {
    #[serde(default)]
    pub most_credits: Vec<CreditsEntry>,
    #[serde(default)]
    pub most_submitted_charts: Vec<ChartsEntry>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditsEntry {
    pub agent_symbol: String,
    pub credits: i64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartsEntry {
    pub agent_symbol: String,
    pub chart_count: i64,
}

/// `GET /agents?limit=&page=`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AgentsPage {
    pub data: Vec<PublicAgent>,
    pub meta: PageMeta,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicAgent {
    pub symbol: String,
    pub headquarters: String,
    pub credits: i64,
    pub starting_faction: String,
    pub ship_count: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct PageMeta {
    pub total: u32,
    pub page: u32,
    pub limit: u32,
}

/// `GET /systems/{system}`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SystemResponse {
    pub data: SystemDetail,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SystemDetail {
    #[serde(default)]
    pub waypoints: Vec<SystemWaypoint>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SystemWaypoint {
    pub symbol: String,
    #[serde(rename = "type")]
    pub kind: String,
}

/// `GET /systems/{system}/waypoints/{waypoint}/construction`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ConstructionResponse {
    pub data: Construction,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Construction {
    pub symbol: String,
    #[serde(default)]
    pub materials: Vec<Material>,
    pub is_complete: bool,
}
