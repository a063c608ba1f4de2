// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! HTTP transport used by the fetch layer.

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Body and status of a completed HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self { status, body: body.into() }
    }
}

/// The request never produced a status line (connect failure, timeout, reset).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("transport error: {0}")]
pub struct TransportError(pub String);

/// Issues a single GET with no retry.
#[async_trait]
pub trait HttpClient: Clone + Send + Sync + 'static {
    async fn get(&self, url: &str) -> Result<HttpResponse, TransportError>;
}

/// reqwest-backed client with a per-request timeout.
#[derive(Clone, Debug)]
pub struct ReqwestClient {
    client: reqwest::Client,
}

impl ReqwestClient {
    pub fn new(timeout: Duration) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("fluffy/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| TransportError(format!("failed to build client: {}", e)))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl HttpClient for ReqwestClient {
    async fn get(&self, url: &str) -> Result<HttpResponse, TransportError> {
        let resp = self.client.get(url).send().await.map_err(|e| TransportError(e.to_string()))?;
        let status = resp.status().as_u16();
        let body = resp.bytes().await.map_err(|e| TransportError(e.to_string()))?;
        Ok(HttpResponse { status, body: body.to_vec() })
    }
}

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(coverage_nightly, coverage(off))]
mod fake {
    use super::{HttpClient, HttpResponse, TransportError};
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::collections::{HashMap, VecDeque};
    use std::sync::Arc;

    #[derive(Default)]
    struct FakeHttpState {
        /// Responses consumed in order, per URL
        scripted: HashMap<String, VecDeque<Result<HttpResponse, TransportError>>>,
        /// Returned once a URL's script is exhausted
        fallback: HashMap<String, Result<HttpResponse, TransportError>>,
        calls: Vec<String>,
    }

    /// Scripted HTTP client for tests.
    ///
    /// Unscripted URLs answer 404.
    #[derive(Clone, Default)]
    pub struct FakeHttpClient {
        inner: Arc<Mutex<FakeHttpState>>,
    }

    impl FakeHttpClient {
        pub fn new() -> Self {
            Self::default()
        }

        /// Queue one response for `url`.
        pub fn push(&self, url: &str, response: Result<HttpResponse, TransportError>) {
            self.inner.lock().scripted.entry(url.to_string()).or_default().push_back(response);
        }

        /// Queue a JSON 200 response for `url`.
        pub fn push_json(&self, url: &str, body: &serde_json::Value) {
            self.push(url, Ok(HttpResponse::new(200, body.to_string())));
        }

        pub fn push_status(&self, url: &str, status: u16) {
            self.push(url, Ok(HttpResponse::new(status, Vec::new())));
        }

        /// Answer every request to `url` with this JSON body once the script runs out.
        pub fn always_json(&self, url: &str, body: &serde_json::Value) {
            self.inner
                .lock()
                .fallback
                .insert(url.to_string(), Ok(HttpResponse::new(200, body.to_string())));
        }

        /// All requested URLs in order.
        pub fn calls(&self) -> Vec<String> {
            self.inner.lock().calls.clone()
        }

        pub fn calls_to(&self, url: &str) -> usize {
            self.inner.lock().calls.iter().filter(|c| c.as_str() == url).count()
        }
    }

    #[async_trait]
    impl HttpClient for FakeHttpClient {
        async fn get(&self, url: &str) -> Result<HttpResponse, TransportError> {
            let mut inner = self.inner.lock();
            inner.calls.push(url.to_string());
            if let Some(next) = inner.scripted.get_mut(url).and_then(VecDeque::pop_front) {
                return next;
            }
            match inner.fallback.get(url) {
                Some(resp) => resp.clone(),
                None => Ok(HttpResponse::new(404, r#"{"error":{"message":"not found"}}"#)),
            }
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeHttpClient;
