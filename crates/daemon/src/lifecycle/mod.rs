// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon lifecycle management: configuration, startup, shutdown.

mod config;
mod startup;

pub use config::{Config, ConfigError, GateSettings, Intervals, RetrySettings, CONFIG_FILE};
pub use startup::{assemble, startup};

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use fl_adapters::{HttpClient, TransportError};
use fl_core::Clock;
use fl_engine::{scheduler, AgentCache, Collector, EngineError};
use fl_storage::{StorageError, Store};
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

/// Errors that stop the daemon from starting or shutting down cleanly
#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("could not determine state directory")]
    NoStateDir,
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Engine(#[from] EngineError),
    #[error("http client error: {0}")]
    Transport(#[from] TransportError),
    #[error("failed to initialize logging: {0}")]
    Logging(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("background task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// A started daemon: everything the scheduler and checkpoint loop share.
pub struct Daemon<H: HttpClient, C: Clock> {
    pub config: Config,
    pub store: Arc<Store>,
    pub collector: Arc<Collector<H, Store, C>>,
    /// Read side for agent history. The daemon only keeps it on the current
    /// epoch; an embedding query layer reads from it.
    pub cache: Arc<AgentCache<Store, C>>,
    /// Root token; cancelling it stops the gate, the scheduler and the checkpoint loop
    pub cancel: CancellationToken,
}

impl<H: HttpClient, C: Clock> Daemon<H, C> {
    /// Run until `shutdown` resolves, then stop everything and write a final checkpoint.
    pub async fn run_until(self, shutdown: impl Future<Output = ()>) -> Result<(), LifecycleError> {
        let scheduler = tokio::spawn(scheduler::run(
            Arc::clone(&self.collector),
            self.config.cadence(),
            self.cancel.clone(),
        ));
        let checkpoints = tokio::spawn(checkpoint_loop(
            Arc::clone(&self.store),
            self.config.checkpoint_interval(),
            self.cancel.clone(),
        ));
        info!(
            base_url = %self.collector.api().base_url(),
            state_dir = %self.config.state_dir.display(),
            "daemon started"
        );

        tokio::select! {
            _ = shutdown => info!("shutdown requested"),
            _ = self.cancel.cancelled() => {}
        }
        self.cancel.cancel();

        scheduler.await?;
        checkpoints.await?;
        self.shutdown().await
    }

    /// Write the final checkpoint.
    pub async fn shutdown(&self) -> Result<(), LifecycleError> {
        let store = Arc::clone(&self.store);
        tokio::task::spawn_blocking(move || store.checkpoint()).await??;
        info!(seq = self.store.seq(), "daemon stopped");
        Ok(())
    }
}

async fn checkpoint_loop(store: Arc<Store>, period: Duration, cancel: CancellationToken) {
    let mut interval = tokio::time::interval(period);
    // First tick completes immediately
    interval.tick().await;
    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = interval.tick() => {}
        }
        let store = Arc::clone(&store);
        match tokio::task::spawn_blocking(move || store.checkpoint()).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => error!(error = %e, "checkpoint failed"),
            Err(e) => error!(error = %e, "checkpoint task failed"),
        }
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;

#[cfg(test)]
mod test_helpers;
