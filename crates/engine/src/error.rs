// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use fl_adapters::FetchError;
use fl_storage::StorageError;
use thiserror::Error;

/// Errors that end a collection pass.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("invalid exclusion pattern {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

impl EngineError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, EngineError::Fetch(e) if e.is_cancelled())
    }
}
