// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! fl-engine: collection passes, jumpgate tracking, and scheduling

pub mod cache;
mod collector;
pub mod epoch;
mod error;
pub mod filter;
mod ingest;
mod jumpgates;
pub mod scheduler;

#[cfg(test)]
mod test_helpers;

pub use cache::{AgentCache, DEFAULT_EVICTION};
pub use collector::{Collector, CycleReport, DEFAULT_PAGE_SIZE};
pub use epoch::{EpochTracker, EpochTrackerBuilder};
pub use error::EngineError;
pub use filter::AgentFilter;
pub use ingest::AgentPass;
pub use jumpgates::SweepReport;
pub use scheduler::{Cadence, Scheduler, Task};
