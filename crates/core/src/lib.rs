// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! fl-core: domain types for the fluffy collector

pub mod macros;

pub mod agent;
pub mod clock;
pub mod construction;
pub mod jumpgate;
pub mod stats;
pub mod symbol;

pub use agent::{is_active_credits, AgentSample, AgentSnapshot, ACTIVE_BASELINE_CREDITS};
#[cfg(any(test, feature = "test-support"))]
pub use agent::AgentSnapshotBuilder;
pub use clock::{Clock, FakeClock, SystemClock};
pub use construction::{ConstructionSample, Material, MaterialProgress, ADVANCED_CIRCUITRY, FAB_MATS};
#[cfg(any(test, feature = "test-support"))]
pub use jumpgate::JumpgateRecordBuilder;
pub use jumpgate::{JumpgateRecord, JumpgateStatus, TransitionError};
pub use stats::{EpochStats, LeaderboardEntry, LeaderboardKind};
pub use symbol::{AgentSymbol, Epoch, SystemSymbol, WaypointSymbol};
