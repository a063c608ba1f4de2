// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! A jumpgate followed from the first sighting of an active agent through
//! to completion.

use crate::prelude::*;
use fl_core::JumpgateRecord;
use fl_storage::Batch;

const HQ: &str = "X1-ZZ9-A1";
const GATE: &str = "X1-ZZ9-I55";

fn observe_agent(world: &World, credits: i64) {
    world.http.push_json(&status_url(), &status_json());
    world.http.push_json(&agents_url(1), &page(vec![agent("AAA", credits, HQ)], 1, 1));
}

#[tokio::test(start_paused = true)]
async fn jumpgate_advances_from_first_active_sighting_to_completion() {
    let world = World::new();
    let mut seen = Vec::new();

    // Baseline credits: the agent has not played yet
    observe_agent(&world, ACTIVE_BASELINE_CREDITS);
    world.collector.ingest_cycle(&world.cancel).await.unwrap();
    assert_eq!(world.gate_status("X1-ZZ9"), None);
    assert_eq!(world.http.calls_to(&system_url("X1-ZZ9")), 0);

    // First move away from baseline creates an Active record
    world.clock.advance(Duration::from_secs(300));
    observe_agent(&world, ACTIVE_BASELINE_CREDITS + 500);
    world.http.push_json(
        &system_url("X1-ZZ9"),
        &system("X1-ZZ9", &[(HQ, "PLANET"), (GATE, "JUMP_GATE")]),
    );
    world.collector.ingest_cycle(&world.cancel).await.unwrap();
    seen.extend(world.gate_status("X1-ZZ9"));
    assert_eq!(world.gate_status("X1-ZZ9"), Some(JumpgateStatus::Active));

    // Discovery sees material delivered
    world.http.push_json(&construction_url("X1-ZZ9", GATE), &construction(GATE, 12, 0, false));
    world.collector.discovery_sweep(&world.cancel).await.unwrap();
    seen.extend(world.gate_status("X1-ZZ9"));
    assert_eq!(world.gate_status("X1-ZZ9"), Some(JumpgateStatus::UnderConstruction));

    // Construction sweep sees completion
    world.clock.advance(Duration::from_secs(1800));
    world.http.push_json(&construction_url("X1-ZZ9", GATE), &construction(GATE, 1600, 400, true));
    world.collector.construction_sweep(&world.cancel).await.unwrap();
    let record = world.store.jumpgates(&world.epoch()).pop().unwrap();
    seen.push(record.status);
    assert_eq!(record.status, JumpgateStatus::Complete);
    assert!(record.completed_at.is_some_and(|at| at > 0));

    // Nothing probes a completed gate again
    world.collector.construction_sweep(&world.cancel).await.unwrap();
    world.collector.discovery_sweep(&world.cancel).await.unwrap();
    assert_eq!(world.http.calls_to(&construction_url("X1-ZZ9", GATE)), 2);

    assert_eq!(
        seen,
        vec![JumpgateStatus::Active, JumpgateStatus::UnderConstruction, JumpgateStatus::Complete]
    );
    let samples = world.store.construction_samples(&world.epoch(), &WaypointSymbol::new(GATE));
    assert_eq!(samples.len(), 2);
}

#[tokio::test(start_paused = true)]
async fn stored_status_never_regresses() {
    let world = World::new();
    let epoch = world.epoch();
    let mut batch = Batch::new();
    batch.upsert_jumpgate(
        JumpgateRecord::builder().system("X1-ZZ9").waypoint(GATE).status(JumpgateStatus::Complete).build(),
    );
    world.store.commit(batch).unwrap();

    for stale in [JumpgateStatus::UnderConstruction, JumpgateStatus::Active, JumpgateStatus::Dormant] {
        let mut batch = Batch::new();
        batch.upsert_jumpgate(JumpgateRecord::builder().system("X1-ZZ9").waypoint(GATE).status(stale).build());
        world.store.commit(batch).unwrap();
        assert_eq!(world.gate_status("X1-ZZ9"), Some(JumpgateStatus::Complete));
    }
    assert_eq!(world.store.jumpgates(&epoch).len(), 1);
}

#[tokio::test(start_paused = true)]
async fn a_returning_agent_does_not_reset_a_tracked_gate() {
    let world = World::new();
    observe_agent(&world, ACTIVE_BASELINE_CREDITS + 1);
    world.http.push_json(&system_url("X1-ZZ9"), &system("X1-ZZ9", &[(GATE, "JUMP_GATE")]));
    world.collector.ingest_cycle(&world.cancel).await.unwrap();
    world.http.push_json(&construction_url("X1-ZZ9", GATE), &construction(GATE, 0, 1, false));
    world.collector.discovery_sweep(&world.cancel).await.unwrap();

    world.clock.advance(Duration::from_secs(300));
    observe_agent(&world, ACTIVE_BASELINE_CREDITS + 9000);
    world.collector.ingest_cycle(&world.cancel).await.unwrap();

    assert_eq!(world.gate_status("X1-ZZ9"), Some(JumpgateStatus::UnderConstruction));
    assert_eq!(world.http.calls_to(&system_url("X1-ZZ9")), 1);
}
