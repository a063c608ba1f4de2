// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Admission gate specs: window budgets, fairness, cancellation, lockout.

use crate::prelude::*;
use parking_lot::Mutex;
use tokio::task::JoinSet;

/// Issue `n` concurrent latches and return the grant instants in grant order.
async fn grant_times(gate: &Gate, cancel: &CancellationToken, n: usize, within: Duration) -> Vec<Instant> {
    let times = Arc::new(Mutex::new(Vec::new()));
    for _ in 0..n {
        let gate = gate.clone();
        let cancel = cancel.clone();
        let times = Arc::clone(&times);
        tokio::spawn(async move {
            if gate.latch(&cancel).await.is_ok() {
                times.lock().push(Instant::now());
            }
        });
    }
    tokio::time::sleep(within).await;
    let times = times.lock().clone();
    times
}

#[tokio::test(start_paused = true)]
async fn short_window_admits_at_most_its_limit_per_second() {
    let cancel = CancellationToken::new();
    let gate = Gate::spawn(GateConfig::new(2, 0), cancel.clone());

    let times = grant_times(&gate, &cancel, 9, Duration::from_secs(5)).await;

    assert!(times.len() >= 6, "granted {}", times.len());
    for window in times.windows(3) {
        let span = window[2].duration_since(window[0]);
        assert!(span >= Duration::from_secs(1), "three grants within {span:?}");
    }
    cancel.cancel();
}

#[tokio::test(start_paused = true)]
async fn long_window_admits_at_most_its_limit_per_minute() {
    let cancel = CancellationToken::new();
    let gate = Gate::spawn(GateConfig::new(0, 5), cancel.clone());

    let times = grant_times(&gate, &cancel, 12, Duration::from_secs(59)).await;

    assert_eq!(times.len(), 5);
    cancel.cancel();
}

#[tokio::test(start_paused = true)]
async fn grants_are_issued_in_enqueue_order() {
    let cancel = CancellationToken::new();
    let gate = Gate::spawn(GateConfig::new(2, 3), cancel.clone());
    let order = Arc::new(Mutex::new(Vec::new()));

    let tickets: Vec<_> = ["alpha", "bravo", "charlie", "delta", "echo", "foxtrot", "golf"]
        .into_iter()
        .map(|label| (label, gate.enqueue()))
        .collect();
    let mut set = JoinSet::new();
    for (label, ticket) in tickets.into_iter().rev() {
        let order = Arc::clone(&order);
        let cancel = cancel.clone();
        set.spawn(async move {
            ticket.wait(&cancel).await.unwrap();
            order.lock().push(label);
        });
    }
    while set.join_next().await.is_some() {}

    assert_eq!(
        *order.lock(),
        vec!["alpha", "bravo", "charlie", "delta", "echo", "foxtrot", "golf"]
    );
    cancel.cancel();
}

#[tokio::test(start_paused = true)]
async fn cancelled_waiter_returns_promptly_and_later_waiters_still_pass() {
    let root = CancellationToken::new();
    let gate = Gate::spawn(GateConfig::new(1, 0), root.clone());
    gate.latch(&root).await.unwrap();

    // Budget is spent; this waiter sits in the queue until it gives up
    let impatient = CancellationToken::new();
    let waiter = {
        let gate = gate.clone();
        let impatient = impatient.clone();
        tokio::spawn(async move { gate.latch(&impatient).await })
    };
    let patient = {
        let gate = gate.clone();
        let root = root.clone();
        tokio::spawn(async move { gate.latch(&root).await })
    };
    tokio::time::sleep(Duration::from_millis(100)).await;
    let cancelled_at = Instant::now();
    impatient.cancel();

    assert_eq!(waiter.await.unwrap(), Err(GateError::Cancelled));
    assert!(cancelled_at.elapsed() < Duration::from_millis(50));
    let granted = tokio::time::timeout(Duration::from_secs(3), patient).await.unwrap().unwrap();
    assert_eq!(granted, Ok(()));
    root.cancel();
}

#[tokio::test(start_paused = true)]
async fn lock_holds_every_caller_until_rollover() {
    let cancel = CancellationToken::new();
    let gate = Gate::spawn(GateConfig::new(5, 20), cancel.clone());
    gate.latch(&cancel).await.unwrap();
    let locked_at = Instant::now();

    gate.lock();
    gate.latch(&cancel).await.unwrap();

    assert!(locked_at.elapsed() >= Duration::from_millis(900), "passed after {:?}", locked_at.elapsed());
    cancel.cancel();
}
