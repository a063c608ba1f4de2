// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Epoch-scoped agent history cache.
//!
//! Loaded from the sink on first read. Each read checks how long it has been
//! since the previous one; past the eviction window the data is dropped and
//! reloaded, so there is no background timer to manage.
//!
//! The collector never reads from it. It is the query surface for whatever
//! serves agent history to users, and is kept on the current epoch by
//! observing the epoch tracker.

use fl_core::{is_active_credits, AgentSymbol, Clock, Epoch};
use fl_storage::{AgentHistory, Sink};
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Idle time after which cached history is discarded.
pub const DEFAULT_EVICTION: Duration = Duration::from_secs(120);

struct Loaded {
    history: BTreeMap<AgentSymbol, AgentHistory>,
    last_access: Instant,
}

#[derive(Default)]
struct Slot {
    epoch: Option<Epoch>,
    loaded: Option<Loaded>,
}

pub struct AgentCache<S: Sink, C: Clock> {
    sink: Arc<S>,
    clock: C,
    eviction_after: Duration,
    slot: Mutex<Slot>,
}

impl<S: Sink, C: Clock> AgentCache<S, C> {
    pub fn new(sink: Arc<S>, clock: C) -> Self {
        Self { sink, clock, eviction_after: DEFAULT_EVICTION, slot: Mutex::new(Slot::default()) }
    }

    pub fn with_eviction(mut self, eviction_after: Duration) -> Self {
        self.eviction_after = eviction_after;
        self
    }

    /// Scope the cache to `epoch`, dropping anything loaded for another one.
    ///
    /// Registered as an epoch observer.
    pub fn switch_epoch(&self, epoch: &Epoch) {
        let mut slot = self.slot.lock();
        if slot.epoch.as_ref() != Some(epoch) {
            slot.epoch = Some(epoch.clone());
            slot.loaded = None;
            debug!(epoch = %epoch, "agent cache rescoped");
        }
    }

    /// Drop the loaded history. The next read reloads it.
    pub fn invalidate(&self) {
        self.slot.lock().loaded = None;
    }

    /// True when nothing is loaded or the loaded data has sat idle too long.
    pub fn is_evicted(&self) -> bool {
        let slot = self.slot.lock();
        match &slot.loaded {
            Some(loaded) => self.expired(loaded),
            None => true,
        }
    }

    /// Histories for `symbols`, in the order given. Unknown symbols are skipped.
    pub fn records(&self, symbols: &[AgentSymbol]) -> Vec<(AgentSymbol, AgentHistory)> {
        self.read(|history| {
            symbols
                .iter()
                .filter_map(|s| history.get(s).map(|h| (s.clone(), h.clone())))
                .collect()
        })
        .unwrap_or_default()
    }

    /// Every known agent mapped to whether its latest balance marks it active.
    pub fn activity(&self) -> BTreeMap<AgentSymbol, bool> {
        self.read(|history| {
            history
                .iter()
                .filter_map(|(symbol, h)| {
                    let last = h.samples.last()?;
                    Some((symbol.clone(), is_active_credits(last.credits)))
                })
                .collect()
        })
        .unwrap_or_default()
    }

    fn expired(&self, loaded: &Loaded) -> bool {
        self.clock.now().saturating_duration_since(loaded.last_access) >= self.eviction_after
    }

    /// Run `f` over fresh history. `None` until an epoch is known.
    fn read<R>(&self, f: impl FnOnce(&BTreeMap<AgentSymbol, AgentHistory>) -> R) -> Option<R> {
        let mut slot = self.slot.lock();
        let epoch = slot.epoch.clone()?;

        if slot.loaded.as_ref().is_some_and(|l| self.expired(l)) {
            info!(idle_after = ?self.eviction_after, "agent cache evicted");
            slot.loaded = None;
        }

        let now = self.clock.now();
        let loaded = slot.loaded.get_or_insert_with(|| {
            let history = self.sink.agent_history(&epoch);
            debug!(epoch = %epoch, agents = history.len(), "agent cache loaded");
            Loaded { history, last_access: now }
        });
        loaded.last_access = now;
        Some(f(&loaded.history))
    }
}

#[cfg(test)]
#[path = "cache_tests.rs"]
mod tests;
