// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Construction progress samples for jumpgates.

use crate::symbol::{Epoch, WaypointSymbol};
use serde::{Deserialize, Serialize};

/// Trade symbol of the first tracked material.
pub const FAB_MATS: &str = "FAB_MATS";
/// Trade symbol of the second tracked material.
pub const ADVANCED_CIRCUITRY: &str = "ADVANCED_CIRCUITRY";

/// One required material and how much of it has been delivered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Material {
    pub trade_symbol: String,
    pub required: u32,
    pub fulfilled: u32,
}

/// Fulfilled counts for the two tracked materials.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaterialProgress {
    pub fab_mats: u32,
    pub advanced_circuitry: u32,
}

impl MaterialProgress {
    /// Pick the tracked materials out of a construction site's material list.
    /// Untracked materials are ignored.
    pub fn from_materials(materials: &[Material]) -> Self {
        let mut progress = Self::default();
        for material in materials {
            match material.trade_symbol.as_str() {
                FAB_MATS => progress.fab_mats = material.fulfilled,
                ADVANCED_CIRCUITRY => progress.advanced_circuitry = material.fulfilled,
                _ => {}
            }
        }
        progress
    }

    /// True once anything has been delivered.
    pub fn has_progress(&self) -> bool {
        self.fab_mats > 0 || self.advanced_circuitry > 0
    }
}

/// Append-only observation of a jumpgate's construction site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstructionSample {
    pub epoch: Epoch,
    pub timestamp: u64,
    pub waypoint: WaypointSymbol,
    #[serde(flatten)]
    pub progress: MaterialProgress,
}

#[cfg(test)]
#[path = "construction_tests.rs"]
mod tests;
