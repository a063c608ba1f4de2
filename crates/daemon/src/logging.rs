// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tracing subscriber setup for `fluffyd`.

use std::fs::OpenOptions;
use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::lifecycle::LifecycleError;

/// Levels accepted from configuration
const LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Normalize a configured level, or `None` if it is not one we know.
pub fn parse_level(level: &str) -> Option<&'static str> {
    let level = level.trim().to_ascii_lowercase();
    let level = if level == "warning" { "warn".to_string() } else { level };
    LEVELS.iter().copied().find(|l| *l == level)
}

/// `RUST_LOG` wins over the configured level.
fn env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(parse_level(level).unwrap_or("info")))
}

/// Install the global subscriber. Logs go to stderr, or to `file` through a
/// non-blocking writer whose guard must be held until exit.
pub fn init(level: &str, file: Option<&Path>) -> Result<Option<WorkerGuard>, LifecycleError> {
    let filter = env_filter(level);
    match file {
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .try_init()
                .map_err(|e| LifecycleError::Logging(e.to_string()))?;
            Ok(None)
        }
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            let (writer, guard) = tracing_appender::non_blocking(file);
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(writer)
                .with_ansi(false)
                .try_init()
                .map_err(|e| LifecycleError::Logging(e.to_string()))?;
            Ok(Some(guard))
        }
    }
}

#[cfg(test)]
#[path = "logging_tests.rs"]
mod tests;
