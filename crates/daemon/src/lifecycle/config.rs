// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Layered daemon configuration.
//!
//! Defaults, then an optional TOML file, then `FLUFFY_*` environment
//! overrides. Bad environment values are collected as warnings so they can
//! be logged once logging is up.

use std::path::{Path, PathBuf};
use std::time::Duration;

use fl_adapters::{GateConfig, RetryPolicy, DEFAULT_BASE_URL};
use fl_engine::{Cadence, DEFAULT_PAGE_SIZE};
use serde::Deserialize;
use thiserror::Error;

use super::LifecycleError;
use crate::env;

/// Config file looked up in the state directory when `FLUFFY_CONFIG` is unset
pub const CONFIG_FILE: &str = "fluffy.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GateSettings {
    pub second_limit: u32,
    pub bucket_size: u32,
    pub short_window_ms: u64,
    pub long_window_secs: u64,
    pub dispatch_interval_ms: u64,
    pub backoff_step_ms: u64,
}

impl Default for GateSettings {
    fn default() -> Self {
        let gate = GateConfig::default();
        Self {
            second_limit: gate.short_limit,
            bucket_size: gate.long_limit,
            short_window_ms: gate.short_window.as_millis() as u64,
            long_window_secs: gate.long_window.as_secs(),
            dispatch_interval_ms: gate.dispatch_interval.as_millis() as u64,
            backoff_step_ms: gate.backoff_step.as_millis() as u64,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Intervals {
    pub agent_secs: u64,
    pub construction_secs: u64,
    pub discovery_secs: u64,
    pub checkpoint_secs: u64,
}

impl Default for Intervals {
    fn default() -> Self {
        let cadence = Cadence::default();
        Self {
            agent_secs: cadence.ingest.as_secs(),
            construction_secs: cadence.construction.as_secs(),
            discovery_secs: cadence.discovery.as_secs(),
            checkpoint_secs: 3600,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RetrySettings {
    pub max_transient: u32,
    pub max_rate_limited: u32,
    pub delay_ms: u64,
    pub request_timeout_secs: u64,
}

impl Default for RetrySettings {
    fn default() -> Self {
        let policy = RetryPolicy::default();
        Self {
            max_transient: policy.max_transient,
            max_rate_limited: policy.max_rate_limited,
            delay_ms: policy.retry_delay.as_millis() as u64,
            request_timeout_secs: 10,
        }
    }
}

/// Daemon configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Holds the WAL, snapshots and the default config file
    pub state_dir: PathBuf,
    pub base_url: String,
    pub log_level: String,
    pub log_file: Option<PathBuf>,
    pub page_size: u32,
    /// Agent symbol patterns that are never recorded
    pub exclude: Vec<String>,
    pub gate: GateSettings,
    pub intervals: Intervals,
    pub retry: RetrySettings,
    /// Problems found while layering, logged after startup
    #[serde(skip)]
    pub warnings: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            state_dir: PathBuf::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            log_level: "info".to_string(),
            log_file: None,
            page_size: DEFAULT_PAGE_SIZE,
            exclude: Vec::new(),
            gate: GateSettings::default(),
            intervals: Intervals::default(),
            retry: RetrySettings::default(),
            warnings: Vec::new(),
        }
    }
}

impl Config {
    /// Resolve the configuration from the file system and environment.
    pub fn load() -> Result<Self, LifecycleError> {
        let state_dir = env::state_dir()?;
        let explicit = env::config_path();
        let path = explicit.clone().unwrap_or_else(|| state_dir.join(CONFIG_FILE));

        let mut config = match Self::read(&path) {
            Ok(config) => config,
            // Only an explicitly named file has to exist
            Err(ConfigError::Read { source, .. })
                if explicit.is_none() && source.kind() == std::io::ErrorKind::NotFound =>
            {
                Self::default()
            }
            Err(e) => return Err(e.into()),
        };
        if config.state_dir.as_os_str().is_empty() {
            config.state_dir = state_dir;
        }
        config.apply_env();
        Ok(config)
    }

    pub fn read(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)
            .map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })?;
        Self::from_toml(&text).map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source })
    }

    pub fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Overlay `FLUFFY_*` variables. Invalid values keep the previous layer.
    pub fn apply_env(&mut self) {
        if let Some(dir) = env::state_dir_override() {
            self.state_dir = dir;
        }
        if let Some(url) = env::base_url() {
            self.base_url = url;
        }
        if let Some(level) = env::log_level() {
            self.log_level = level;
        }
        if let Some(file) = env::log_file() {
            self.log_file = Some(file);
        }
        if let Some(patterns) = env::exclude() {
            self.exclude = patterns;
        }

        let defaults = GateSettings::default();
        self.gate.second_limit = self.overlay(env::gate_second_limit(), self.gate.second_limit);
        // An unusable bucket size falls back to the built-in default, not the file
        self.gate.bucket_size = match env::gate_bucket_size() {
            Ok(value) => value.unwrap_or(self.gate.bucket_size),
            Err(e) => {
                self.warnings.push(format!("{e}, using {}", defaults.bucket_size));
                defaults.bucket_size
            }
        };

        self.intervals.agent_secs = self.overlay_secs(env::agent_interval(), self.intervals.agent_secs);
        self.intervals.construction_secs =
            self.overlay_secs(env::construction_interval(), self.intervals.construction_secs);
        self.intervals.discovery_secs =
            self.overlay_secs(env::discovery_interval(), self.intervals.discovery_secs);
        self.intervals.checkpoint_secs =
            self.overlay_secs(env::checkpoint_interval(), self.intervals.checkpoint_secs);
    }

    fn overlay<T: std::fmt::Display>(&mut self, value: Result<Option<T>, env::InvalidVar>, current: T) -> T {
        match value {
            Ok(Some(v)) => v,
            Ok(None) => current,
            Err(e) => {
                self.warnings.push(format!("{e}, keeping {current}"));
                current
            }
        }
    }

    fn overlay_secs(&mut self, value: Result<Option<Duration>, env::InvalidVar>, current: u64) -> u64 {
        let value = value.map(|d| d.map(|d| d.as_secs()));
        self.overlay(value, current)
    }

    /// `second_limit = 0` gives a pure per-minute limiter. Windows and
    /// timings are at least one unit; both budgets at zero would admit
    /// nothing, so the long pool keeps at least one grant then.
    pub fn gate_config(&self) -> GateConfig {
        let short_limit = self.gate.second_limit;
        let long_limit =
            if short_limit == 0 { self.gate.bucket_size.max(1) } else { self.gate.bucket_size };
        GateConfig {
            short_limit,
            long_limit,
            short_window: Duration::from_millis(self.gate.short_window_ms.max(1)),
            long_window: Duration::from_secs(self.gate.long_window_secs.max(1)),
            dispatch_interval: Duration::from_millis(self.gate.dispatch_interval_ms.max(1)),
            backoff_step: Duration::from_millis(self.gate.backoff_step_ms.max(1)),
        }
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_transient: self.retry.max_transient.max(1),
            max_rate_limited: self.retry.max_rate_limited.max(1),
            retry_delay: Duration::from_millis(self.retry.delay_ms),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.retry.request_timeout_secs.max(1))
    }

    pub fn cadence(&self) -> Cadence {
        Cadence {
            ingest: Duration::from_secs(self.intervals.agent_secs.max(1)),
            construction: Duration::from_secs(self.intervals.construction_secs.max(1)),
            discovery: Duration::from_secs(self.intervals.discovery_secs.max(1)),
        }
    }

    pub fn checkpoint_interval(&self) -> Duration {
        Duration::from_secs(self.intervals.checkpoint_secs.max(1))
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
