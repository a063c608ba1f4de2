// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared fixtures for engine tests.

use crate::collector::Collector;
use crate::epoch::EpochTracker;
use fl_adapters::{ApiClient, FakeHttpClient, Fetcher, Gate, GateConfig, RetryPolicy};
use fl_core::{FakeClock, ACTIVE_BASELINE_CREDITS};
use fl_storage::Store;
use serde_json::{json, Value};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

pub(crate) const BASE: &str = "http://api.test/v2";
pub(crate) const RESET: &str = "2025-06-01";

pub(crate) type TestCollector = Collector<FakeHttpClient, Store, FakeClock>;

pub(crate) struct Harness {
    pub http: FakeHttpClient,
    pub store: Arc<Store>,
    pub clock: FakeClock,
    pub epochs: Arc<EpochTracker>,
    pub cancel: CancellationToken,
    pub collector: TestCollector,
}

/// Build a collector over a scripted HTTP client. Needs a tokio runtime for
/// the gate's dispatch task.
pub(crate) fn harness() -> Harness {
    harness_with(EpochTracker::default())
}

pub(crate) fn harness_with(epochs: EpochTracker) -> Harness {
    let cancel = CancellationToken::new();
    let http = FakeHttpClient::new();
    let gate = Gate::spawn(GateConfig::new(100, 100), cancel.clone());
    let api = ApiClient::new(Fetcher::new(http.clone(), gate, RetryPolicy::default()), BASE);
    let store = Arc::new(Store::in_memory());
    let clock = FakeClock::new();
    let epochs = Arc::new(epochs);
    let collector = Collector::new(api, Arc::clone(&store), Arc::clone(&epochs), clock.clone());
    Harness { http, store, clock, epochs, cancel, collector }
}

pub(crate) fn status_url() -> String {
    format!("{BASE}/")
}

pub(crate) fn agents_url(page: u32) -> String {
    format!("{BASE}/agents?limit=20&page={page}")
}

pub(crate) fn system_url(system: &str) -> String {
    format!("{BASE}/systems/{system}")
}

pub(crate) fn construction_url(system: &str, waypoint: &str) -> String {
    format!("{BASE}/systems/{system}/waypoints/{waypoint}/construction")
}

pub(crate) fn status_json(reset: &str) -> Value {
    json!({
        "status": "SpaceTraders is currently online",
        "version": "v2.3.0",
        "resetDate": reset,
        "serverResets": { "next": "2025-06-15T00:00:00.000Z", "frequency": "fortnightly" },
        "health": { "lastMarketUpdate": "2025-06-02T12:00:00.000Z" },
        "stats": { "accounts": 10, "agents": 3, "ships": 6, "systems": 100, "waypoints": 1000 },
        "leaderboards": {
            "mostCredits": [ { "agentSymbol": "AAA", "credits": 175500 } ],
            "mostSubmittedCharts": [ { "agentSymbol": "BBB", "chartCount": 12 } ]
        }
    })
}

pub(crate) fn agent_json(symbol: &str, credits: i64, headquarters: &str) -> Value {
    json!({
        "symbol": symbol,
        "headquarters": headquarters,
        "credits": credits,
        "startingFaction": "COSMIC",
        "shipCount": 2
    })
}

pub(crate) fn baseline_agent(symbol: &str, headquarters: &str) -> Value {
    agent_json(symbol, ACTIVE_BASELINE_CREDITS, headquarters)
}

pub(crate) fn page_json(agents: Vec<Value>, page: u32, total: u32) -> Value {
    json!({ "data": agents, "meta": { "total": total, "page": page, "limit": 20 } })
}

pub(crate) fn system_json(waypoints: &[(&str, &str)]) -> Value {
    let waypoints: Vec<Value> =
        waypoints.iter().map(|(symbol, kind)| json!({ "symbol": symbol, "type": kind })).collect();
    json!({ "data": { "symbol": "X1-ZZ9", "waypoints": waypoints } })
}

pub(crate) fn construction_json(waypoint: &str, fab_mats: u32, circuitry: u32, complete: bool) -> Value {
    json!({
        "data": {
            "symbol": waypoint,
            "materials": [
                { "tradeSymbol": "FAB_MATS", "required": 1600, "fulfilled": fab_mats },
                { "tradeSymbol": "ADVANCED_CIRCUITRY", "required": 400, "fulfilled": circuitry },
                { "tradeSymbol": "QUANTUM_STABILIZERS", "required": 1, "fulfilled": 1 }
            ],
            "isComplete": complete
        }
    })
}
