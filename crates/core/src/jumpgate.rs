// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Jumpgate records and their status machine.
//!
//! A system's jumpgate moves through
//! `Dormant -> Active -> UnderConstruction -> Complete` and never backwards
//! within an epoch. `Dormant` is normally implicit (no record yet); it only
//! appears on records written by other tooling.

use crate::symbol::{Epoch, SystemSymbol, WaypointSymbol};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Tracking status of a system's jumpgate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JumpgateStatus {
    /// No agent headquartered in the system has played yet
    Dormant,
    /// At least one agent in the system is active; probed on the slow cadence
    Active,
    /// Materials have been delivered; probed on the fast cadence
    UnderConstruction,
    /// The server reports the gate as complete; no further probes
    Complete,
}

crate::simple_display! {
    JumpgateStatus {
        Dormant => "dormant",
        Active => "active",
        UnderConstruction => "under_construction",
        Complete => "complete",
    }
}

impl JumpgateStatus {
    /// Integer code used in exported tables.
    pub fn code(self) -> u8 {
        match self {
            Self::Dormant => 0,
            Self::Active => 1,
            Self::UnderConstruction => 2,
            Self::Complete => 3,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Dormant),
            1 => Some(Self::Active),
            2 => Some(Self::UnderConstruction),
            3 => Some(Self::Complete),
            _ => None,
        }
    }

    /// Whether moving from `self` to `next` keeps the ordering monotonic.
    pub fn can_advance_to(self, next: Self) -> bool {
        next >= self
    }

    pub fn is_terminal(self) -> bool {
        self == Self::Complete
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("jumpgate {system} cannot move from {from} to {to}")]
pub struct TransitionError {
    pub system: SystemSymbol,
    pub from: JumpgateStatus,
    pub to: JumpgateStatus,
}

/// One jumpgate per system per epoch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JumpgateRecord {
    pub epoch: Epoch,
    pub system: SystemSymbol,
    /// Headquarters of the agent whose activity created the record
    pub headquarters: String,
    /// The JUMP_GATE waypoint in the system
    pub waypoint: WaypointSymbol,
    pub status: JumpgateStatus,
    /// Unix seconds; set only on the transition to `Complete`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<u64>,
}

impl JumpgateRecord {
    /// Move to `next`, returning whether anything changed.
    ///
    /// `at` becomes the completion timestamp when `next` is `Complete`.
    pub fn advance(&mut self, next: JumpgateStatus, at: u64) -> Result<bool, TransitionError> {
        if !self.status.can_advance_to(next) {
            return Err(TransitionError { system: self.system.clone(), from: self.status, to: next });
        }
        if next == self.status {
            return Ok(false);
        }
        self.status = next;
        if next == JumpgateStatus::Complete {
            self.completed_at = Some(at);
        }
        Ok(true)
    }
}

crate::builder! {
    pub struct JumpgateRecordBuilder => JumpgateRecord {
        into {
            epoch: Epoch = "2025-06-01",
            system: SystemSymbol = "X1-ZZ9",
            headquarters: String = "X1-ZZ9-A1",
            waypoint: WaypointSymbol = "X1-ZZ9-I55",
        }
        set {
            status: JumpgateStatus = JumpgateStatus::Active,
            completed_at: Option<u64> = None,
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub fn arb_status() -> impl proptest::strategy::Strategy<Value = JumpgateStatus> {
    use proptest::prelude::*;
    prop_oneof![
        Just(JumpgateStatus::Dormant),
        Just(JumpgateStatus::Active),
        Just(JumpgateStatus::UnderConstruction),
        Just(JumpgateStatus::Complete),
    ]
}

#[cfg(test)]
#[path = "jumpgate_tests.rs"]
mod tests;
