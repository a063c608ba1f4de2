// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Typed client for the game server's public endpoints.

mod types;

pub use types::{
    AgentsPage, ChartsEntry, Construction, CreditsEntry, Health, Leaderboards, PageMeta,
    PublicAgent, ServerResets, ServerStatus, Stats, SystemDetail, SystemWaypoint,
};

use crate::fetch::{FetchError, Fetcher};
use crate::http::HttpClient;
use fl_core::{SystemSymbol, WaypointSymbol};
use tokio_util::sync::CancellationToken;
use types::{ConstructionResponse, SystemResponse};

pub const DEFAULT_BASE_URL: &str = "https://api.spacetraders.io/v2";

/// Waypoint type that marks a system's jumpgate.
pub const JUMP_GATE_TYPE: &str = "JUMP_GATE";

#[derive(Clone)]
pub struct ApiClient<H: HttpClient> {
    fetcher: Fetcher<H>,
    base_url: String,
}

impl<H: HttpClient> ApiClient<H> {
    pub fn new(fetcher: Fetcher<H>, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { fetcher, base_url }
    }

    pub fn fetcher(&self) -> &Fetcher<H> {
        &self.fetcher
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn status_url(&self) -> String {
        format!("{}/", self.base_url)
    }

    pub fn agents_url(&self, limit: u32, page: u32) -> String {
        format!("{}/agents?limit={}&page={}", self.base_url, limit, page)
    }

    pub fn system_url(&self, system: &SystemSymbol) -> String {
        format!("{}/systems/{}", self.base_url, system)
    }

    pub fn construction_url(&self, system: &SystemSymbol, waypoint: &WaypointSymbol) -> String {
        format!("{}/systems/{}/waypoints/{}/construction", self.base_url, system, waypoint)
    }

    pub async fn server_status(&self, cancel: &CancellationToken) -> Result<ServerStatus, FetchError> {
        self.fetcher.get_json(&self.status_url(), cancel).await
    }

    /// One page of the public agent listing. Pages start at 1.
    pub async fn agents_page(
        &self,
        limit: u32,
        page: u32,
        cancel: &CancellationToken,
    ) -> Result<AgentsPage, FetchError> {
        self.fetcher.get_json(&self.agents_url(limit, page), cancel).await
    }

    pub async fn system(
        &self,
        system: &SystemSymbol,
        cancel: &CancellationToken,
    ) -> Result<SystemDetail, FetchError> {
        let resp: SystemResponse = self.fetcher.get_json(&self.system_url(system), cancel).await?;
        Ok(resp.data)
    }

    pub async fn construction(
        &self,
        system: &SystemSymbol,
        waypoint: &WaypointSymbol,
        cancel: &CancellationToken,
    ) -> Result<Construction, FetchError> {
        let url = self.construction_url(system, waypoint);
        let resp: ConstructionResponse = self.fetcher.get_json(&url, cancel).await?;
        Ok(resp.data)
    }
}

impl SystemDetail {
    /// The first waypoint of type `JUMP_GATE`, if the system has one.
    pub fn jump_gate(&self) -> Option<WaypointSymbol> {
        self.waypoints
            .iter()
            .find(|w| w.kind == JUMP_GATE_TYPE)
            .map(|w| WaypointSymbol::new(w.symbol.clone()))
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
