// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The collector owns everything a pass needs: the API client, the sink,
//! the epoch tracker, the exclusion filter and the clock.
//!
//! Pass implementations live in [`crate::ingest`] and [`crate::jumpgates`].

use crate::epoch::EpochTracker;
use crate::error::EngineError;
use crate::filter::AgentFilter;
use crate::ingest::AgentPass;
use crate::jumpgates::SweepReport;
use fl_adapters::{ApiClient, HttpClient};
use fl_core::{Clock, Epoch};
use fl_storage::Sink;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Agents requested per listing page.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

pub struct Collector<H: HttpClient, S: Sink, C: Clock> {
    pub(crate) api: ApiClient<H>,
    pub(crate) sink: Arc<S>,
    pub(crate) epochs: Arc<EpochTracker>,
    pub(crate) filter: AgentFilter,
    pub(crate) clock: C,
    pub(crate) page_size: u32,
}

/// Outcome of one full ingestion cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleReport {
    pub epoch: Epoch,
    pub agents: AgentPass,
    pub jumpgates: SweepReport,
    /// HTTP attempts issued while the cycle ran
    pub api_calls: u64,
}

impl<H: HttpClient, S: Sink, C: Clock> Collector<H, S, C> {
    pub fn new(api: ApiClient<H>, sink: Arc<S>, epochs: Arc<EpochTracker>, clock: C) -> Self {
        Self {
            api,
            sink,
            epochs,
            filter: AgentFilter::default(),
            clock,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    pub fn with_filter(mut self, filter: AgentFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn api(&self) -> &ApiClient<H> {
        &self.api
    }

    pub fn sink(&self) -> &Arc<S> {
        &self.sink
    }

    pub fn epochs(&self) -> &Arc<EpochTracker> {
        &self.epochs
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Status, then every agent page, then the jumpgates those agents imply.
    ///
    /// A status or listing failure ends the cycle before anything about
    /// agents is written.
    pub async fn ingest_cycle(&self, cancel: &CancellationToken) -> Result<CycleReport, EngineError> {
        let started = self.clock.now();
        let calls_before = self.api.fetcher().calls();
        let timestamp = self.clock.minute_floor_secs();
        info!(timestamp, "starting data ingestion");

        let epoch = self.update_status(timestamp, cancel).await?;
        let agents = self.ingest_agents(&epoch, timestamp, cancel).await?;
        let jumpgates = self.update_jumpgates_from_agents(cancel).await?;

        let api_calls = self.api.fetcher().calls().saturating_sub(calls_before);
        info!(
            epoch = %epoch,
            api_calls,
            agents = agents.written,
            elapsed = ?self.clock.now().saturating_duration_since(started),
            "data ingestion completed"
        );
        Ok(CycleReport { epoch, agents, jumpgates, api_calls })
    }
}

#[cfg(test)]
#[path = "collector_tests.rs"]
mod tests;
