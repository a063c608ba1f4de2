// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Jumpgate tracking.
//!
//! Three passes move a system's gate forward:
//!
//! - after each agent ingestion, systems with an active agent get an
//!   `Active` record (one system lookup each to find the gate waypoint)
//! - the discovery sweep probes `Active` gates and promotes any with
//!   delivered materials to `UnderConstruction`
//! - the construction sweep samples `UnderConstruction` gates and marks
//!   them `Complete` when the server says so
//!
//! Each pass commits one batch. A failed lookup skips that system until the
//! next pass; only cancellation ends a pass early.

use crate::collector::Collector;
use crate::error::EngineError;
use fl_adapters::api::Construction;
use fl_adapters::{FetchError, HttpClient};
use fl_core::{
    Clock, ConstructionSample, Epoch, JumpgateRecord, JumpgateStatus, MaterialProgress,
    SystemSymbol, WaypointSymbol,
};
use fl_storage::{Batch, Sink};
use std::collections::BTreeMap;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Counts from one jumpgate pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SweepReport {
    /// Systems looked at
    pub checked: usize,
    /// Records created or advanced
    pub updated: usize,
    /// Systems skipped after a failed lookup
    pub failed: usize,
}

/// Why a single system was skipped.
enum SystemError {
    Fetch(FetchError),
    NoJumpgate,
}

impl From<FetchError> for SystemError {
    fn from(e: FetchError) -> Self {
        SystemError::Fetch(e)
    }
}

impl<H: HttpClient, S: Sink, C: Clock> Collector<H, S, C> {
    /// Create or promote a record for every system that has an active agent.
    pub async fn update_jumpgates_from_agents(
        &self,
        cancel: &CancellationToken,
    ) -> Result<SweepReport, EngineError> {
        let Some(epoch) = self.epochs.current() else {
            debug!("no epoch yet, skipping jumpgate update");
            return Ok(SweepReport::default());
        };
        let timestamp = self.clock.minute_floor_secs();

        let mut active_systems: BTreeMap<SystemSymbol, String> = BTreeMap::new();
        for agent in self.sink.latest_per_agent(&epoch) {
            if !agent.is_active() {
                continue;
            }
            match agent.home_system() {
                Some(system) => {
                    active_systems.entry(system).or_insert(agent.headquarters);
                }
                None => debug!(symbol = %agent.symbol, hq = %agent.headquarters, "unparsable headquarters"),
            }
        }

        let known: BTreeMap<SystemSymbol, JumpgateRecord> =
            self.sink.jumpgates(&epoch).into_iter().map(|r| (r.system.clone(), r)).collect();

        let mut report = SweepReport::default();
        let mut batch = Batch::new();
        for (system, headquarters) in active_systems {
            let mut record = match known.get(&system) {
                Some(existing) if existing.status != JumpgateStatus::Dormant => continue,
                Some(existing) => existing.clone(),
                None => JumpgateRecord {
                    epoch: epoch.clone(),
                    system: system.clone(),
                    headquarters,
                    waypoint: WaypointSymbol::new(""),
                    status: JumpgateStatus::Dormant,
                    completed_at: None,
                },
            };
            report.checked += 1;

            if record.waypoint.is_empty() {
                match self.find_jumpgate(&system, cancel).await {
                    Ok(waypoint) => record.waypoint = waypoint,
                    Err(e) => {
                        skip_system(&system, e, &mut report)?;
                        continue;
                    }
                }
            }

            if advance(&mut record, JumpgateStatus::Active, timestamp) {
                info!(system = %system, waypoint = %record.waypoint, "jumpgate active");
                batch.upsert_jumpgate(record);
                report.updated += 1;
            }
        }

        self.commit_pass(batch, "jumpgates from agents")?;
        Ok(report)
    }

    /// Probe every `Active` gate once; any delivered material moves it to
    /// `UnderConstruction`.
    pub async fn discovery_sweep(&self, cancel: &CancellationToken) -> Result<SweepReport, EngineError> {
        self.sweep(JumpgateStatus::Active, cancel).await
    }

    /// Sample every `UnderConstruction` gate and complete those the server
    /// reports finished.
    pub async fn construction_sweep(
        &self,
        cancel: &CancellationToken,
    ) -> Result<SweepReport, EngineError> {
        self.sweep(JumpgateStatus::UnderConstruction, cancel).await
    }

    async fn sweep(
        &self,
        status: JumpgateStatus,
        cancel: &CancellationToken,
    ) -> Result<SweepReport, EngineError> {
        let Some(epoch) = self.epochs.current() else {
            debug!(%status, "no epoch yet, skipping sweep");
            return Ok(SweepReport::default());
        };
        let timestamp = self.clock.minute_floor_secs();

        let mut report = SweepReport::default();
        let mut batch = Batch::new();
        for mut record in self.sink.jumpgates_by_status(&epoch, status) {
            report.checked += 1;
            let construction = match self.api.construction(&record.system, &record.waypoint, cancel).await {
                Ok(c) => c,
                Err(e) => {
                    skip_system(&record.system, e.into(), &mut report)?;
                    continue;
                }
            };
            if apply_probe(&mut record, &construction, &epoch, timestamp, &mut batch) {
                report.updated += 1;
            }
        }

        self.commit_pass(batch, &format!("{status} sweep"))?;
        Ok(report)
    }

    async fn find_jumpgate(
        &self,
        system: &SystemSymbol,
        cancel: &CancellationToken,
    ) -> Result<WaypointSymbol, SystemError> {
        debug!(system = %system, "finding jumpgate for system");
        let detail = self.api.system(system, cancel).await?;
        detail.jump_gate().ok_or(SystemError::NoJumpgate)
    }

    fn commit_pass(&self, batch: Batch, pass: &str) -> Result<(), EngineError> {
        if batch.is_empty() {
            info!(pass, "nothing to update");
            return Ok(());
        }
        let ops = batch.len();
        self.sink.commit(batch)?;
        debug!(pass, ops, "jumpgate pass committed");
        Ok(())
    }
}

/// Record one construction probe. Returns true if the gate's status moved.
///
/// `UnderConstruction` gates get a sample on every probe. `Active` gates get
/// one only when the probe moves them forward.
fn apply_probe(
    record: &mut JumpgateRecord,
    construction: &Construction,
    epoch: &Epoch,
    timestamp: u64,
    batch: &mut Batch,
) -> bool {
    let progress = MaterialProgress::from_materials(&construction.materials);
    let next = if construction.is_complete {
        JumpgateStatus::Complete
    } else if progress.has_progress() {
        JumpgateStatus::UnderConstruction
    } else {
        record.status
    };

    let moved = advance(record, next, timestamp);
    if moved || record.status == JumpgateStatus::UnderConstruction {
        batch.append_construction_sample(ConstructionSample {
            epoch: epoch.clone(),
            timestamp,
            waypoint: record.waypoint.clone(),
            progress,
        });
    }
    if moved {
        info!(
            system = %record.system,
            status = %record.status,
            fab_mats = progress.fab_mats,
            advanced_circuitry = progress.advanced_circuitry,
            "jumpgate advanced"
        );
        batch.upsert_jumpgate(record.clone());
    }
    moved
}

fn advance(record: &mut JumpgateRecord, next: JumpgateStatus, at: u64) -> bool {
    match record.advance(next, at) {
        Ok(moved) => moved,
        Err(e) => {
            warn!(error = %e, "refusing jumpgate regression");
            false
        }
    }
}

/// Log and count a per-system failure. Cancellation is passed up instead.
fn skip_system(system: &SystemSymbol, err: SystemError, report: &mut SweepReport) -> Result<(), EngineError> {
    match err {
        SystemError::Fetch(e) if e.is_cancelled() => return Err(e.into()),
        SystemError::Fetch(e) => warn!(system = %system, error = %e, "jumpgate lookup failed, skipping system"),
        SystemError::NoJumpgate => warn!(system = %system, "no jumpgate found in system"),
    }
    report.failed += 1;
    Ok(())
}

#[cfg(test)]
#[path = "jumpgates_tests.rs"]
mod tests;
