// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Dual-window admission gate.
//!
//! Every outbound request waits on [`Gate::latch`]. Waiters join a FIFO queue
//! that a single dispatch task services one ticket per tick. A ticket is
//! granted from the short-window budget first and from the long-window pool
//! once the short budget is spent. When both are spent the dispatch task backs
//! off until a window rolls over. [`Gate::lock`] saturates both counters after
//! the server reports a rate limit of its own.

use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::{Arc, Weak};
use std::time::Duration;
use thiserror::Error;
use tokio::sync::oneshot;
use tokio::time::{interval, interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Gate limits and timings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateConfig {
    /// Grants allowed per short window
    pub short_limit: u32,
    /// Grants allowed per long window once the short budget is spent
    pub long_limit: u32,
    pub short_window: Duration,
    pub long_window: Duration,
    /// How often the dispatch task looks at the head of the queue
    pub dispatch_interval: Duration,
    /// Unit of the dispatch task's backoff while both budgets are spent
    pub backoff_step: Duration,
}

impl GateConfig {
    pub fn new(short_limit: u32, long_limit: u32) -> Self {
        Self {
            short_limit,
            long_limit,
            short_window: Duration::from_millis(1020),
            long_window: Duration::from_secs(60),
            dispatch_interval: Duration::from_millis(20),
            backoff_step: Duration::from_millis(100),
        }
    }
}

impl Default for GateConfig {
    fn default() -> Self {
        Self::new(2, 20)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GateError {
    #[error("cancelled while waiting at the gate")]
    Cancelled,
    #[error("gate dispatch loop has stopped")]
    Closed,
}

/// Outcome of one dispatch tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Dispatch {
    Idle,
    Short,
    /// `restart_window` is set on the first long grant since the last reset
    Long { restart_window: bool },
    Blocked,
}

pub(crate) struct GateState {
    short_limit: u32,
    long_limit: u32,
    short_count: u32,
    long_count: u32,
    queue: VecDeque<oneshot::Sender<()>>,
    closed: bool,
}

impl GateState {
    pub(crate) fn new(config: &GateConfig) -> Self {
        Self {
            short_limit: config.short_limit,
            long_limit: config.long_limit,
            short_count: 0,
            long_count: 0,
            queue: VecDeque::new(),
            closed: false,
        }
    }

    /// Evaluate the head of the queue.
    ///
    /// Tickets whose waiter has already gone away are dropped first and do
    /// not consume budget.
    pub(crate) fn dispatch(&mut self) -> Dispatch {
        while self.queue.front().is_some_and(|t| t.is_closed()) {
            self.queue.pop_front();
        }
        if self.queue.is_empty() {
            return Dispatch::Idle;
        }

        let grant = if self.short_count < self.short_limit {
            self.short_count += 1;
            Dispatch::Short
        } else if self.long_count < self.long_limit {
            let restart_window = self.long_count == 0;
            self.long_count += 1;
            Dispatch::Long { restart_window }
        } else {
            return Dispatch::Blocked;
        };

        if let Some(ticket) = self.queue.pop_front() {
            // Send fails only if the waiter gave up in the meantime
            let _ = ticket.send(());
        }
        grant
    }

    pub(crate) fn reset_short(&mut self) {
        self.short_count = 0;
    }

    pub(crate) fn reset_long(&mut self) {
        self.long_count = 0;
    }

    pub(crate) fn saturate(&mut self) {
        self.short_count = u32::MAX;
        self.long_count = u32::MAX;
    }

    fn close(&mut self) {
        self.closed = true;
        self.queue.clear();
    }
}

/// Shared handle to one admission gate. Clones refer to the same queue.
#[derive(Clone)]
pub struct Gate {
    state: Arc<Mutex<GateState>>,
}

/// A queued place in line, obtained from [`Gate::enqueue`].
pub struct Ticket {
    rx: oneshot::Receiver<()>,
}

impl Ticket {
    /// Wait for the grant, or give up when `cancel` fires.
    ///
    /// A cancelled ticket stays queued; the dispatch task discards it when it
    /// reaches the head.
    pub async fn wait(self, cancel: &CancellationToken) -> Result<(), GateError> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!("gate wait cancelled");
                Err(GateError::Cancelled)
            }
            granted = self.rx => granted.map_err(|_| GateError::Closed),
        }
    }
}

impl Gate {
    /// Create a gate and spawn its dispatch task on the current runtime.
    ///
    /// The task stops when `cancel` fires or every handle is dropped; waiters
    /// still queued then get [`GateError::Closed`].
    pub fn spawn(config: GateConfig, cancel: CancellationToken) -> Self {
        let state = Arc::new(Mutex::new(GateState::new(&config)));
        tokio::spawn(dispatch_loop(Arc::downgrade(&state), config, cancel));
        Self { state }
    }

    /// Join the back of the queue without waiting.
    pub fn enqueue(&self) -> Ticket {
        let (tx, rx) = oneshot::channel();
        let mut state = self.state.lock();
        // A closed gate drops the sender right away so wait() reports Closed
        if !state.closed {
            state.queue.push_back(tx);
        }
        Ticket { rx }
    }

    /// Block until the gate grants permission to proceed.
    pub async fn latch(&self, cancel: &CancellationToken) -> Result<(), GateError> {
        self.enqueue().wait(cancel).await
    }

    /// Close the gate until the next window rollover.
    pub fn lock(&self) {
        self.state.lock().saturate();
        warn!("gate locked until the next window rollover");
    }

    /// Number of tickets currently queued, including abandoned ones.
    pub fn pending(&self) -> usize {
        self.state.lock().queue.len()
    }
}

/// Shortest timer period the dispatch task runs with; tokio intervals reject zero
const MIN_PERIOD: Duration = Duration::from_millis(1);

async fn dispatch_loop(state: Weak<Mutex<GateState>>, config: GateConfig, cancel: CancellationToken) {
    let short_window = config.short_window.max(MIN_PERIOD);
    let long_window = config.long_window.max(MIN_PERIOD);
    let start = Instant::now();
    let mut short = interval_at(start + short_window, short_window);
    short.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut long = interval_at(start + long_window, long_window);
    long.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut check = interval(config.dispatch_interval.max(MIN_PERIOD));
    check.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut backoff: u32 = 1;

    loop {
        let Some(shared) = state.upgrade() else {
            return;
        };
        // Window rollovers take priority over dispatch when both are ready
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                shared.lock().close();
                return;
            }
            _ = short.tick() => {
                shared.lock().reset_short();
                backoff = 1;
            }
            _ = long.tick() => {
                shared.lock().reset_long();
                backoff = 1;
            }
            _ = check.tick() => {
                let outcome = shared.lock().dispatch();
                match outcome {
                    Dispatch::Long { restart_window: true } => long.reset(),
                    Dispatch::Blocked => {
                        backoff = backoff.saturating_add(1);
                        let pause = config.backoff_step.saturating_mul(backoff);
                        tokio::select! {
                            _ = cancel.cancelled() => {}
                            _ = tokio::time::sleep(pause) => {}
                        }
                    }
                    Dispatch::Idle | Dispatch::Short | Dispatch::Long { .. } => {}
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "gate_tests.rs"]
mod tests;
