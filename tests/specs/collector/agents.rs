// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Agent listing and activity classification specs.

use crate::prelude::*;
use fl_core::is_active_credits;
use proptest::prelude::*;

fn agents(range: std::ops::Range<u32>) -> Vec<Value> {
    range.map(|i| agent(&format!("AGENT-{i:02}"), ACTIVE_BASELINE_CREDITS, "X1-ZZ9-A1")).collect()
}

#[tokio::test(start_paused = true)]
async fn forty_five_agents_take_exactly_three_pages() {
    let world = World::new();
    world.http.push_json(&status_url(), &status_json());
    world.http.push_json(&agents_url(1), &page(agents(0..20), 1, 45));
    world.http.push_json(&agents_url(2), &page(agents(20..40), 2, 45));
    world.http.push_json(&agents_url(3), &page(agents(40..45), 3, 45));

    let report = world.collector.ingest_cycle(&world.cancel).await.unwrap();

    assert_eq!(report.agents.pages, 3);
    assert_eq!(report.agents.written, 45);
    assert_eq!(world.http.calls_to(&agents_url(4)), 0);
    assert_eq!(world.store.latest_per_agent(&world.epoch()).len(), 45);
}

#[tokio::test(start_paused = true)]
async fn a_failed_page_writes_no_agents() {
    let world = World::new();
    world.http.push_json(&status_url(), &status_json());
    world.http.push_json(&agents_url(1), &page(agents(0..20), 1, 45));
    // Page 2 is unscripted and keeps failing

    let result = world.collector.ingest_cycle(&world.cancel).await;

    assert!(result.is_err());
    assert_eq!(world.http.calls_to(&agents_url(2)), 3);
    assert_eq!(world.http.calls_to(&agents_url(3)), 0);
    assert!(world.store.latest_per_agent(&world.epoch()).is_empty());
}

#[tokio::test(start_paused = true)]
async fn rate_limited_pages_are_retried_after_lockout() {
    let world = World::new();
    world.http.push_json(&status_url(), &status_json());
    world.http.push_status(&agents_url(1), 429);
    world.http.push_status(&agents_url(1), 429);
    world.http.push_json(&agents_url(1), &page(agents(0..3), 1, 3));

    let report = world.collector.ingest_cycle(&world.cancel).await.unwrap();

    assert_eq!(report.agents.written, 3);
    assert_eq!(world.http.calls_to(&agents_url(1)), 3);
}

#[test]
fn baseline_credits_mean_inactive() {
    assert!(!is_active_credits(ACTIVE_BASELINE_CREDITS));
    assert!(is_active_credits(ACTIVE_BASELINE_CREDITS - 1));
    assert!(is_active_credits(ACTIVE_BASELINE_CREDITS + 1));
    assert!(is_active_credits(0));
}

proptest! {
    #[test]
    fn any_other_balance_is_active(credits in any::<i64>()) {
        prop_assume!(credits != ACTIVE_BASELINE_CREDITS);
        prop_assert!(is_active_credits(credits));
    }
}
