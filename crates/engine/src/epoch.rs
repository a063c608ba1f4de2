// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tracks the server's current reset epoch.
//!
//! Observers are registered up front and called synchronously, once per
//! change, by whichever pass first sees the new value.

use fl_core::Epoch;
use parking_lot::RwLock;
use tracing::info;

type Observer = Box<dyn Fn(&Epoch) + Send + Sync>;

pub struct EpochTracker {
    current: RwLock<Option<Epoch>>,
    observers: Vec<Observer>,
}

#[derive(Default)]
pub struct EpochTrackerBuilder {
    observers: Vec<Observer>,
}

impl EpochTrackerBuilder {
    /// Call `f` with the new epoch every time it changes.
    pub fn on_change(mut self, f: impl Fn(&Epoch) + Send + Sync + 'static) -> Self {
        self.observers.push(Box::new(f));
        self
    }

    pub fn build(self) -> EpochTracker {
        EpochTracker { current: RwLock::new(None), observers: self.observers }
    }
}

impl Default for EpochTracker {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl EpochTracker {
    pub fn builder() -> EpochTrackerBuilder {
        EpochTrackerBuilder::default()
    }

    /// The last observed epoch, or `None` before the first status call.
    pub fn current(&self) -> Option<Epoch> {
        self.current.read().clone()
    }

    /// Record `epoch` as current. Returns true, after notifying observers,
    /// when it differs from the previous value.
    pub fn observe(&self, epoch: &Epoch) -> bool {
        let previous = {
            let mut current = self.current.write();
            if current.as_ref() == Some(epoch) {
                return false;
            }
            current.replace(epoch.clone())
        };

        match &previous {
            Some(previous) => info!(from = %previous, to = %epoch, "epoch changed"),
            None => info!(epoch = %epoch, "epoch detected"),
        }
        for observer in &self.observers {
            observer(epoch);
        }
        true
    }
}

#[cfg(test)]
#[path = "epoch_tests.rs"]
mod tests;
