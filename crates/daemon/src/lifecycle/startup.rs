// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon startup and initialization logic.

use std::sync::Arc;

use fl_adapters::{ApiClient, Fetcher, Gate, HttpClient, ReqwestClient};
use fl_core::{Clock, SystemClock};
use fl_engine::{AgentCache, AgentFilter, Collector, EpochTracker};
use fl_storage::Store;
use tokio_util::sync::CancellationToken;
use tracing::info;

use super::{Config, Daemon, LifecycleError};

/// Start the daemon against the real API.
pub fn startup(config: Config) -> Result<Daemon<ReqwestClient, SystemClock>, LifecycleError> {
    let http = ReqwestClient::new(config.request_timeout())?;
    assemble(config, http, SystemClock)
}

/// Wire the store, gate, collector and cache together.
///
/// Must be called inside a tokio runtime: the gate's dispatch task is
/// spawned here and stops when the daemon's root token is cancelled.
pub fn assemble<H: HttpClient, C: Clock>(
    config: Config,
    http: H,
    clock: C,
) -> Result<Daemon<H, C>, LifecycleError> {
    // 1. Exclusion patterns first, so a bad pattern fails before touching disk
    let filter = AgentFilter::new(&config.exclude)?;

    // 2. Recover the store
    std::fs::create_dir_all(&config.state_dir)?;
    let store = Arc::new(Store::open(&config.state_dir)?);

    // 3. Admission gate tied to the root token
    let cancel = CancellationToken::new();
    let gate = Gate::spawn(config.gate_config(), cancel.clone());
    let fetcher = Fetcher::new(http, gate, config.retry_policy());
    let api = ApiClient::new(fetcher, config.base_url.clone());

    // 4. The cache follows the epoch tracker
    let cache = Arc::new(AgentCache::new(Arc::clone(&store), clock.clone()));
    let observer = Arc::clone(&cache);
    let epochs = Arc::new(EpochTracker::builder().on_change(move |epoch| observer.switch_epoch(epoch)).build());

    let collector = Collector::new(api, Arc::clone(&store), epochs, clock)
        .with_filter(filter)
        .with_page_size(config.page_size);

    info!(
        seq = store.seq(),
        excluded_patterns = config.exclude.len(),
        gate = ?config.gate_config(),
        "daemon assembled"
    );

    Ok(Daemon { config, store, collector: Arc::new(collector), cache, cancel })
}

#[cfg(test)]
#[path = "startup_tests.rs"]
mod tests;
