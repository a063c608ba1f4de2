// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared fixtures for lifecycle tests.

use std::path::Path;

use fl_adapters::FakeHttpClient;
use fl_core::FakeClock;
use serde_json::{json, Value};

use super::{assemble, Config, Daemon};

pub(super) const BASE: &str = "http://api.test/v2";

pub(super) fn test_config(state_dir: &Path) -> Config {
    let mut config = Config { state_dir: state_dir.to_path_buf(), base_url: BASE.to_string(), ..Config::default() };
    config.gate.second_limit = 50;
    config.gate.bucket_size = 50;
    config
}

/// Assemble a daemon over a scripted client. Needs a tokio runtime.
pub(super) fn test_daemon(config: Config) -> (Daemon<FakeHttpClient, FakeClock>, FakeHttpClient) {
    let http = FakeHttpClient::new();
    let daemon = assemble(config, http.clone(), FakeClock::new()).unwrap();
    (daemon, http)
}

pub(super) fn status_url() -> String {
    format!("{BASE}/")
}

pub(super) fn agents_url() -> String {
    format!("{BASE}/agents?limit=20&page=1")
}

pub(super) fn status_json(reset: &str) -> Value {
    json!({
        "status": "online",
        "version": "v2.3.0",
        "resetDate": reset,
        "serverResets": { "next": "2025-06-15T00:00:00.000Z", "frequency": "fortnightly" },
        "health": { "lastMarketUpdate": "2025-06-02T12:00:00.000Z" },
        "stats": { "agents": 1, "ships": 2, "systems": 10, "waypoints": 100 },
        "leaderboards": { "mostCredits": [], "mostSubmittedCharts": [] }
    })
}

/// One page holding a single agent at the starting credit balance.
pub(super) fn one_agent_page(symbol: &str) -> Value {
    json!({
        "data": [{
            "symbol": symbol,
            "headquarters": "X1-ZZ9-A1",
            "credits": fl_core::ACTIVE_BASELINE_CREDITS,
            "startingFaction": "COSMIC",
            "shipCount": 2
        }],
        "meta": { "total": 1, "page": 1, "limit": 20 }
    })
}

pub(super) fn empty_page() -> Value {
    json!({ "data": [], "meta": { "total": 0, "page": 1, "limit": 20 } })
}
