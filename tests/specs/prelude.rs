// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared fixtures for the specs.

#![allow(dead_code, unused_imports)]

pub use fl_adapters::{ApiClient, FakeHttpClient, Fetcher, Gate, GateConfig, GateError, RetryPolicy};
pub use fl_core::{
    AgentSymbol, Clock, Epoch, FakeClock, JumpgateStatus, SystemSymbol, WaypointSymbol,
    ACTIVE_BASELINE_CREDITS,
};
pub use fl_engine::{Collector, EpochTracker};
pub use fl_storage::{Sink, Store};
pub use serde_json::{json, Value};
pub use std::sync::Arc;
pub use std::time::Duration;
pub use tokio::time::Instant;
pub use tokio_util::sync::CancellationToken;

pub const BASE: &str = "http://spec.test/v2";
pub const RESET: &str = "2025-06-01";

pub type SpecCollector = Collector<FakeHttpClient, Store, FakeClock>;

/// A collector over a scripted HTTP client and an in-memory store.
pub struct World {
    pub http: FakeHttpClient,
    pub store: Arc<Store>,
    pub clock: FakeClock,
    pub cancel: CancellationToken,
    pub collector: SpecCollector,
}

impl World {
    /// Needs a tokio runtime for the gate's dispatch task.
    pub fn new() -> Self {
        Self::with_store(Arc::new(Store::in_memory()))
    }

    pub fn with_store(store: Arc<Store>) -> Self {
        let cancel = CancellationToken::new();
        let http = FakeHttpClient::new();
        let gate = Gate::spawn(GateConfig::new(50, 50), cancel.clone());
        let api = ApiClient::new(Fetcher::new(http.clone(), gate, RetryPolicy::default()), BASE);
        let clock = FakeClock::new();
        let collector = Collector::new(
            api,
            Arc::clone(&store),
            Arc::new(EpochTracker::default()),
            clock.clone(),
        );
        Self { http, store, clock, cancel, collector }
    }

    pub fn epoch(&self) -> Epoch {
        Epoch::new(RESET)
    }

    pub fn gate_status(&self, system: &str) -> Option<JumpgateStatus> {
        self.store
            .jumpgates(&self.epoch())
            .into_iter()
            .find(|r| r.system == system)
            .map(|r| r.status)
    }
}

impl Drop for World {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

pub fn status_url() -> String {
    format!("{BASE}/")
}

pub fn agents_url(page: u32) -> String {
    format!("{BASE}/agents?limit=20&page={page}")
}

pub fn system_url(system: &str) -> String {
    format!("{BASE}/systems/{system}")
}

pub fn construction_url(system: &str, waypoint: &str) -> String {
    format!("{BASE}/systems/{system}/waypoints/{waypoint}/construction")
}

pub fn status_json() -> Value {
    json!({
        "status": "online",
        "version": "v2.3.0",
        "resetDate": RESET,
        "serverResets": { "next": "2025-06-15T00:00:00.000Z", "frequency": "fortnightly" },
        "health": { "lastMarketUpdate": "2025-06-02T12:00:00.000Z" },
        "stats": { "agents": 1, "ships": 2, "systems": 10, "waypoints": 100 },
        "leaderboards": { "mostCredits": [], "mostSubmittedCharts": [] }
    })
}

pub fn agent(symbol: &str, credits: i64, headquarters: &str) -> Value {
    json!({
        "symbol": symbol,
        "headquarters": headquarters,
        "credits": credits,
        "startingFaction": "COSMIC",
        "shipCount": 2
    })
}

pub fn page(agents: Vec<Value>, page: u32, total: u32) -> Value {
    json!({ "data": agents, "meta": { "total": total, "page": page, "limit": 20 } })
}

pub fn system(symbol: &str, waypoints: &[(&str, &str)]) -> Value {
    let waypoints: Vec<Value> =
        waypoints.iter().map(|(symbol, kind)| json!({ "symbol": symbol, "type": kind })).collect();
    json!({ "data": { "symbol": symbol, "waypoints": waypoints } })
}

pub fn construction(waypoint: &str, fab_mats: u32, circuitry: u32, complete: bool) -> Value {
    json!({
        "data": {
            "symbol": waypoint,
            "materials": [
                { "tradeSymbol": "FAB_MATS", "required": 1600, "fulfilled": fab_mats },
                { "tradeSymbol": "ADVANCED_CIRCUITRY", "required": 400, "fulfilled": circuitry }
            ],
            "isComplete": complete
        }
    })
}
