// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Periodic task scheduling.
//!
//! [`Scheduler`] is a plain timer table: it is handed the current instant
//! and answers which tasks are due. [`run`] drives it on the tokio clock and
//! spawns each due task.

use crate::collector::Collector;
use fl_adapters::HttpClient;
use fl_core::Clock;
use fl_storage::Sink;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Task {
    /// Status, agent pages, then jumpgates from agents
    Ingest,
    /// Sample gates under construction
    ConstructionSweep,
    /// Probe active gates for first progress
    DiscoverySweep,
}

fl_core::simple_display! {
    Task {
        Ingest => "ingest",
        ConstructionSweep => "construction_sweep",
        DiscoverySweep => "discovery_sweep",
    }
}

/// How often each task runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cadence {
    pub ingest: Duration,
    pub construction: Duration,
    pub discovery: Duration,
}

impl Default for Cadence {
    fn default() -> Self {
        Self {
            ingest: Duration::from_secs(5 * 60),
            construction: Duration::from_secs(30 * 60),
            discovery: Duration::from_secs(4 * 60 * 60),
        }
    }
}

impl Cadence {
    pub fn period(&self, task: Task) -> Duration {
        match task {
            Task::Ingest => self.ingest,
            Task::ConstructionSweep => self.construction,
            Task::DiscoverySweep => self.discovery,
        }
    }
}

struct Timer {
    task: Task,
    period: Duration,
    deadline: Instant,
}

/// Timer table for the periodic tasks. Every task is due immediately.
pub struct Scheduler {
    timers: Vec<Timer>,
}

impl Scheduler {
    pub fn new(cadence: &Cadence, now: Instant) -> Self {
        let timers = [Task::Ingest, Task::ConstructionSweep, Task::DiscoverySweep]
            .into_iter()
            .map(|task| Timer { task, period: cadence.period(task), deadline: now })
            .collect();
        Self { timers }
    }

    /// Tasks whose deadline has passed, in table order. Each is re-armed one
    /// period from `now`.
    pub fn due(&mut self, now: Instant) -> Vec<Task> {
        let mut due = Vec::new();
        for timer in &mut self.timers {
            if timer.deadline <= now {
                due.push(timer.task);
                timer.deadline = now + timer.period;
            }
        }
        due
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.timers.iter().map(|t| t.deadline).min()
    }

    pub fn has_timers(&self) -> bool {
        !self.timers.is_empty()
    }
}

/// Run the periodic tasks until `cancel` fires, then wait for in-flight runs.
///
/// A task still running from its previous tick is skipped rather than
/// started twice.
pub async fn run<H, S, C>(collector: Arc<Collector<H, S, C>>, cadence: Cadence, cancel: CancellationToken)
where
    H: HttpClient,
    S: Sink,
    C: Clock,
{
    let mut scheduler = Scheduler::new(&cadence, now());
    let mut in_flight: HashMap<Task, JoinHandle<()>> = HashMap::new();
    info!(?cadence, "scheduler started");

    loop {
        for task in scheduler.due(now()) {
            if in_flight.get(&task).is_some_and(|h| !h.is_finished()) {
                info!(%task, "previous run still in flight, skipping");
                continue;
            }
            let collector = Arc::clone(&collector);
            let cancel = cancel.clone();
            in_flight.insert(task, tokio::spawn(async move { run_task(&collector, task, &cancel).await }));
        }

        let Some(deadline) = scheduler.next_deadline() else {
            break;
        };
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = tokio::time::sleep_until(deadline.into()) => {}
        }
    }

    for (task, handle) in in_flight {
        if let Err(e) = handle.await {
            error!(%task, error = %e, "task panicked or was aborted");
        }
    }
    info!("scheduler stopped");
}

async fn run_task<H, S, C>(collector: &Collector<H, S, C>, task: Task, cancel: &CancellationToken)
where
    H: HttpClient,
    S: Sink,
    C: Clock,
{
    debug!(%task, "task starting");
    let result = match task {
        Task::Ingest => collector.ingest_cycle(cancel).await.map(|_| ()),
        Task::ConstructionSweep => collector.construction_sweep(cancel).await.map(|report| {
            info!(checked = report.checked, updated = report.updated, failed = report.failed, "construction sweep done");
        }),
        Task::DiscoverySweep => collector.discovery_sweep(cancel).await.map(|report| {
            info!(checked = report.checked, updated = report.updated, failed = report.failed, "discovery sweep done");
        }),
    };
    match result {
        Ok(()) => {}
        Err(e) if e.is_cancelled() => debug!(%task, "task cancelled"),
        Err(e) => error!(%task, error = %e, "task failed"),
    }
}

/// The tokio clock, which honours paused time in tests.
fn now() -> Instant {
    tokio::time::Instant::now().into_std()
}

#[cfg(test)]
#[path = "scheduler_tests.rs"]
mod tests;
