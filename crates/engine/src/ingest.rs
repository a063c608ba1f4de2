// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Server status and agent listing ingestion.

use crate::collector::Collector;
use crate::error::EngineError;
use fl_adapters::api::{PublicAgent, ServerStatus};
use fl_adapters::HttpClient;
use fl_core::{AgentSnapshot, AgentSymbol, Clock, Epoch, EpochStats, LeaderboardEntry, LeaderboardKind};
use fl_storage::{Batch, Sink};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Counts from one pass over the agent listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AgentPass {
    pub pages: u32,
    pub fetched: usize,
    pub excluded: usize,
    pub written: usize,
}

impl<H: HttpClient, S: Sink, C: Clock> Collector<H, S, C> {
    /// Fetch the server status, persist stats and leaderboards, and feed the
    /// reported epoch to the tracker.
    pub async fn update_status(
        &self,
        timestamp: u64,
        cancel: &CancellationToken,
    ) -> Result<Epoch, EngineError> {
        debug!("updating server status");
        let status = self.api.server_status(cancel).await?;
        let epoch = Epoch::new(status.reset_date.clone());
        self.epochs.observe(&epoch);

        let batch = status_batch(&epoch, timestamp, &status);
        self.sink.commit(batch)?;
        Ok(epoch)
    }

    /// Walk every listing page, then write one snapshot per retained agent.
    ///
    /// Pages are fetched one after another. Nothing is written unless every
    /// page arrived.
    pub async fn ingest_agents(
        &self,
        epoch: &Epoch,
        timestamp: u64,
        cancel: &CancellationToken,
    ) -> Result<AgentPass, EngineError> {
        debug!("updating agents");
        let mut pass = AgentPass::default();
        let mut agents: Vec<PublicAgent> = Vec::new();

        let mut page = 1;
        loop {
            let listing = self.api.agents_page(self.page_size, page, cancel).await?;
            pass.pages = page;
            agents.extend(listing.data);
            if u64::from(page) * u64::from(self.page_size) >= u64::from(listing.meta.total) {
                break;
            }
            page += 1;
        }
        pass.fetched = agents.len();

        let mut batch = Batch::new();
        for agent in agents {
            if let Some(pattern) = self.filter.matching(&agent.symbol) {
                info!(symbol = %agent.symbol, pattern, "skipping agent due to filter");
                pass.excluded += 1;
                continue;
            }
            batch.upsert_agent_snapshot(snapshot(epoch, timestamp, agent));
        }
        pass.written = batch.len();

        if batch.is_empty() {
            info!(pages = pass.pages, "no agents to record");
            return Ok(pass);
        }
        self.sink.commit(batch)?;
        Ok(pass)
    }
}

fn snapshot(epoch: &Epoch, timestamp: u64, agent: PublicAgent) -> AgentSnapshot {
    AgentSnapshot {
        epoch: epoch.clone(),
        symbol: AgentSymbol::new(agent.symbol),
        credits: agent.credits,
        ship_count: agent.ship_count,
        faction: agent.starting_faction,
        headquarters: agent.headquarters,
        timestamp,
    }
}

fn status_batch(epoch: &Epoch, timestamp: u64, status: &ServerStatus) -> Batch {
    let mut batch = Batch::new();
    batch.upsert_stats(EpochStats {
        epoch: epoch.clone(),
        status: status.status.clone(),
        version: status.version.clone(),
        next_reset: status.server_resets.next.clone(),
        market_update: status.health.last_market_update.clone(),
        agents: status.stats.agents,
        accounts: status.stats.accounts,
        ships: status.stats.ships,
        systems: status.stats.systems,
        waypoints: status.stats.waypoints,
    });

    let entry = |symbol: &str, kind: LeaderboardKind, value: i64| LeaderboardEntry {
        epoch: epoch.clone(),
        timestamp,
        symbol: AgentSymbol::new(symbol),
        kind,
        value,
    };
    for row in &status.leaderboards.most_credits {
        batch.record_leaderboard(entry(&row.agent_symbol, LeaderboardKind::Credits, row.credits));
    }
    for row in &status.leaderboards.most_submitted_charts {
        batch.record_leaderboard(entry(&row.agent_symbol, LeaderboardKind::Charts, row.chart_count));
    }
    batch
}

#[cfg(test)]
#[path = "ingest_tests.rs"]
mod tests;
