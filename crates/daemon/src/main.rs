// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! fluffyd: polls the SpaceTraders API and records agents and jumpgates.

use std::process::ExitCode;

use fl_daemon::{logging, startup, Config, LifecycleError};
use tokio::signal::unix::{signal, SignalKind};
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> ExitCode {
    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("fluffyd: {e}");
            return ExitCode::FAILURE;
        }
    };
    let _guard = match logging::init(&config.log_level, config.log_file.as_deref()) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("fluffyd: {e}");
            return ExitCode::FAILURE;
        }
    };

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "daemon failed");
            ExitCode::FAILURE
        }
    }
}

async fn run(config: Config) -> Result<(), LifecycleError> {
    for warning in &config.warnings {
        error!(%warning, "invalid configuration value");
    }
    if logging::parse_level(&config.log_level).is_none() {
        warn!(level = %config.log_level, "unknown log level, using info");
    }
    info!(version = env!("CARGO_PKG_VERSION"), "starting fluffyd");

    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;
    let daemon = startup(config)?;

    daemon
        .run_until(async move {
            tokio::select! {
                _ = sigterm.recv() => info!("received SIGTERM"),
                _ = sigint.recv() => info!("received SIGINT"),
            }
        })
        .await
}
