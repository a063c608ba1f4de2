// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The store survives restarts, checkpoints and a torn final write.

use crate::prelude::*;
use std::io::Write;

async fn collect_once(store: Arc<Store>, symbols: &[&str]) {
    let world = World::with_store(store);
    let agents = symbols.iter().map(|s| agent(s, ACTIVE_BASELINE_CREDITS, "X1-ZZ9-A1")).collect();
    world.http.push_json(&status_url(), &status_json());
    world.http.push_json(&agents_url(1), &page(agents, 1, symbols.len() as u32));
    world.collector.ingest_cycle(&world.cancel).await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn reopened_store_has_every_committed_batch() {
    let dir = tempfile::tempdir().unwrap();
    collect_once(Arc::new(Store::open(dir.path()).unwrap()), &["AAA", "BBB"]).await;

    let store = Store::open(dir.path()).unwrap();

    let latest = store.latest_per_agent(&Epoch::new(RESET));
    assert_eq!(latest.len(), 2);
    assert!(store.state().stats(&Epoch::new(RESET)).is_some());
}

#[tokio::test(start_paused = true)]
async fn checkpoint_then_more_writes_recovers_both() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(Store::open(dir.path()).unwrap());
    collect_once(Arc::clone(&store), &["AAA"]).await;
    store.checkpoint().unwrap();
    collect_once(Arc::clone(&store), &["AAA", "CCC"]).await;
    let seq = store.seq();
    drop(store);

    let reopened = Store::open(dir.path()).unwrap();

    assert_eq!(reopened.seq(), seq);
    assert_eq!(reopened.latest_per_agent(&Epoch::new(RESET)).len(), 2);
}

#[tokio::test(start_paused = true)]
async fn torn_trailing_write_is_discarded() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(Store::open(dir.path()).unwrap());
    collect_once(Arc::clone(&store), &["AAA"]).await;
    let seq = store.seq();
    drop(store);

    let mut wal = std::fs::OpenOptions::new().append(true).open(dir.path().join("batches.wal")).unwrap();
    wal.write_all(br#"{"seq":99,"batch":{"ops":[{"#).unwrap();
    drop(wal);

    let reopened = Store::open(dir.path()).unwrap();
    assert_eq!(reopened.seq(), seq);
    assert_eq!(reopened.latest_per_agent(&Epoch::new(RESET)).len(), 1);
}
