// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the daemon crate.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

use crate::lifecycle::LifecycleError;

/// A variable that is set but cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid value for {name}: {value:?}")]
pub struct InvalidVar {
    pub name: &'static str,
    pub value: String,
}

fn var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|s| !s.trim().is_empty())
}

fn parsed<T: FromStr>(name: &'static str) -> Result<Option<T>, InvalidVar> {
    match var(name) {
        None => Ok(None),
        Some(value) => {
            value.trim().parse().map(Some).map_err(|_| InvalidVar { name, value })
        }
    }
}

fn secs(name: &'static str) -> Result<Option<Duration>, InvalidVar> {
    Ok(parsed::<u64>(name)?.map(Duration::from_secs))
}

/// Explicit state directory override
pub fn state_dir_override() -> Option<PathBuf> {
    var("FLUFFY_STATE_DIR").map(PathBuf::from)
}

/// Resolve state directory: FLUFFY_STATE_DIR > XDG_STATE_HOME/fluffy >
/// platform state dir > ~/.local/state/fluffy
pub fn state_dir() -> Result<PathBuf, LifecycleError> {
    if let Some(dir) = state_dir_override() {
        return Ok(dir);
    }
    if let Some(xdg) = var("XDG_STATE_HOME") {
        return Ok(PathBuf::from(xdg).join("fluffy"));
    }
    if let Some(dir) = dirs::state_dir() {
        return Ok(dir.join("fluffy"));
    }
    let home = var("HOME").ok_or(LifecycleError::NoStateDir)?;
    Ok(PathBuf::from(home).join(".local/state/fluffy"))
}

/// Explicit config file path
pub fn config_path() -> Option<PathBuf> {
    var("FLUFFY_CONFIG").map(PathBuf::from)
}

pub fn base_url() -> Option<String> {
    var("FLUFFY_BASE_URL").map(|s| s.trim_end_matches('/').to_string())
}

pub fn log_level() -> Option<String> {
    var("FLUFFY_LOG_LEVEL").map(|s| s.trim().to_ascii_lowercase())
}

pub fn log_file() -> Option<PathBuf> {
    var("FLUFFY_LOG_FILE").map(PathBuf::from)
}

/// Grants per short window
pub fn gate_second_limit() -> Result<Option<u32>, InvalidVar> {
    parsed("FLUFFY_GATE_SECOND_LIMIT")
}

/// Grants per long window
pub fn gate_bucket_size() -> Result<Option<u32>, InvalidVar> {
    parsed("FLUFFY_GATE_BUCKET_SIZE")
}

pub fn agent_interval() -> Result<Option<Duration>, InvalidVar> {
    secs("FLUFFY_AGENT_INTERVAL_SECS")
}

pub fn construction_interval() -> Result<Option<Duration>, InvalidVar> {
    secs("FLUFFY_CONSTRUCTION_INTERVAL_SECS")
}

pub fn discovery_interval() -> Result<Option<Duration>, InvalidVar> {
    secs("FLUFFY_DISCOVERY_INTERVAL_SECS")
}

pub fn checkpoint_interval() -> Result<Option<Duration>, InvalidVar> {
    secs("FLUFFY_CHECKPOINT_INTERVAL_SECS")
}

/// Comma-separated exclusion patterns. Blank entries are dropped.
pub fn exclude() -> Option<Vec<String>> {
    var("FLUFFY_EXCLUDE").map(|s| {
        s.split(',').map(str::trim).filter(|p| !p.is_empty()).map(String::from).collect()
    })
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
