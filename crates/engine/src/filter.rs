// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use crate::error::EngineError;
use regex::Regex;

/// Exclusion patterns applied to agent symbols during ingestion.
#[derive(Debug, Clone, Default)]
pub struct AgentFilter {
    patterns: Vec<Regex>,
}

impl AgentFilter {
    /// Compile `patterns`. Blank entries are ignored.
    pub fn new<I, S>(patterns: I) -> Result<Self, EngineError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut compiled = Vec::new();
        for pattern in patterns {
            let pattern = pattern.as_ref().trim();
            if pattern.is_empty() {
                continue;
            }
            let regex = Regex::new(pattern).map_err(|source| EngineError::InvalidPattern {
                pattern: pattern.to_string(),
                source,
            })?;
            compiled.push(regex);
        }
        Ok(Self { patterns: compiled })
    }

    /// The first pattern that matches `symbol`, if any.
    pub fn matching(&self, symbol: &str) -> Option<&str> {
        self.patterns.iter().find(|p| p.is_match(symbol)).map(Regex::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }
}

#[cfg(test)]
#[path = "filter_tests.rs"]
mod tests;
