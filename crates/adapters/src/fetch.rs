// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Gate-admitted GET with a bounded retry policy.
//!
//! Every attempt waits on the gate first. Transport failures and non-200
//! statuses share one retry budget; 429 responses have their own, and each
//! one locks the gate before sleeping. Body decoding is never retried.

use crate::gate::{Gate, GateError};
use crate::http::{HttpClient, HttpResponse};
use serde::de::DeserializeOwned;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Attempts allowed to fail with a transport error or non-200 status
    pub max_transient: u32,
    /// 429 responses tolerated before giving up
    pub max_rate_limited: u32,
    /// Fixed pause between attempts
    pub retry_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self { max_transient: 3, max_rate_limited: 5, retry_delay: Duration::from_secs(1) }
    }
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {url} failed after {attempts} attempts: {message}")]
    Transport { url: String, attempts: u32, message: String },
    #[error("too many 429 responses from {url} ({attempts})")]
    RateLimited { url: String, attempts: u32 },
    #[error("non-200 status code: {status} from {url}")]
    Status { url: String, status: u16 },
    #[error("failed to decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("cancelled")]
    Cancelled,
    #[error("gate closed")]
    GateClosed,
}

impl FetchError {
    /// True when the caller gave up, as opposed to the server or network failing.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, FetchError::Cancelled | FetchError::GateClosed)
    }
}

impl From<GateError> for FetchError {
    fn from(e: GateError) -> Self {
        match e {
            GateError::Cancelled => FetchError::Cancelled,
            GateError::Closed => FetchError::GateClosed,
        }
    }
}

/// Fetch layer shared by every call site.
#[derive(Clone)]
pub struct Fetcher<H: HttpClient> {
    http: H,
    gate: Gate,
    policy: RetryPolicy,
    calls: Arc<AtomicU64>,
}

impl<H: HttpClient> Fetcher<H> {
    pub fn new(http: H, gate: Gate, policy: RetryPolicy) -> Self {
        Self { http, gate, policy, calls: Arc::new(AtomicU64::new(0)) }
    }

    pub fn gate(&self) -> &Gate {
        &self.gate
    }

    /// Total HTTP attempts issued, including retries.
    pub fn calls(&self) -> u64 {
        self.calls.load(Ordering::Relaxed)
    }

    /// GET `url`, retrying per the policy until a 200 arrives.
    pub async fn get(&self, url: &str, cancel: &CancellationToken) -> Result<HttpResponse, FetchError> {
        let mut transient: u32 = 0;
        let mut rate_limited: u32 = 0;

        loop {
            self.gate.latch(cancel).await?;
            if cancel.is_cancelled() {
                return Err(FetchError::Cancelled);
            }
            self.calls.fetch_add(1, Ordering::Relaxed);

            match self.http.get(url).await {
                Ok(resp) if resp.status == 200 => return Ok(resp),
                Ok(resp) if resp.status == 429 => {
                    rate_limited += 1;
                    if rate_limited >= self.policy.max_rate_limited {
                        return Err(FetchError::RateLimited {
                            url: url.to_string(),
                            attempts: rate_limited,
                        });
                    }
                    warn!(url, attempt = rate_limited, "rate limited, locking gate");
                    self.gate.lock();
                }
                Ok(resp) => {
                    transient += 1;
                    if transient >= self.policy.max_transient {
                        return Err(FetchError::Status { url: url.to_string(), status: resp.status });
                    }
                    debug!(url, status = resp.status, attempt = transient, "retrying non-200 status");
                }
                Err(e) => {
                    transient += 1;
                    if transient >= self.policy.max_transient {
                        return Err(FetchError::Transport {
                            url: url.to_string(),
                            attempts: transient,
                            message: e.0,
                        });
                    }
                    debug!(url, error = %e, attempt = transient, "retrying transport error");
                }
            }

            tokio::select! {
                _ = cancel.cancelled() => return Err(FetchError::Cancelled),
                _ = tokio::time::sleep(self.policy.retry_delay) => {}
            }
        }
    }

    /// GET `url` and decode the body as JSON.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        cancel: &CancellationToken,
    ) -> Result<T, FetchError> {
        let resp = self.get(url, cancel).await?;
        serde_json::from_slice(&resp.body)
            .map_err(|source| FetchError::Decode { url: url.to_string(), source })
    }
}

#[cfg(test)]
#[path = "fetch_tests.rs"]
mod tests;
