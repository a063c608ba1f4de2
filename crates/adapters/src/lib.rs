// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! fl-adapters: admission gate, HTTP transport, and API client

pub mod api;
pub mod fetch;
pub mod gate;
pub mod http;

pub use api::{ApiClient, DEFAULT_BASE_URL, JUMP_GATE_TYPE};
pub use fetch::{FetchError, Fetcher, RetryPolicy};
pub use gate::{Gate, GateConfig, GateError, Ticket};
#[cfg(any(test, feature = "test-support"))]
pub use http::FakeHttpClient;
pub use http::{HttpClient, HttpResponse, ReqwestClient, TransportError};
