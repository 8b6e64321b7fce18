// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use keyqueue::{Capabilities, KeyState, KeyedScheduler};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;

const KEYS: [&str; 3] = ["A", "B", "C"];
const PRODUCERS: usize = 4;
const TASKS_PER_PRODUCER: usize = 50;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_parallel_producers_keep_per_key_exclusion_and_order() {
    let scheduler = KeyedScheduler::new(Capabilities::new((), ()));
    let busy: Arc<HashMap<&'static str, AtomicBool>> =
        Arc::new(KEYS.iter().map(|key| (*key, AtomicBool::new(false))).collect());
    let order: Arc<Mutex<HashMap<(&'static str, usize), Vec<usize>>>> = Arc::default();
    let (done_tx, mut done_rx) = mpsc::unbounded_channel();

    let mut producers = Vec::new();
    for producer in 0..PRODUCERS {
        let scheduler = scheduler.clone();
        let busy = busy.clone();
        let order = order.clone();
        let done_tx = done_tx.clone();
        producers.push(tokio::spawn(async move {
            for index in 0..TASKS_PER_PRODUCER {
                let key = KEYS[(producer + index) % KEYS.len()];
                let (busy, order, done_tx) = (busy.clone(), order.clone(), done_tx.clone());
                scheduler.enqueue_fn(key, move |advance, _, _| {
                    let overlapped = busy[key].swap(true, Ordering::SeqCst);
                    order.lock().entry((key, producer)).or_default().push(index);
                    tokio::spawn(async move {
                        tokio::task::yield_now().await;
                        busy[key].store(false, Ordering::SeqCst);
                        advance.advance();
                        let _ = done_tx.send(overlapped);
                    });
                });
                tokio::task::yield_now().await;
            }
        }));
    }
    drop(done_tx);

    for producer in producers {
        producer.await.unwrap();
    }

    let mut completed = 0;
    while let Some(overlapped) = done_rx.recv().await {
        assert!(!overlapped, "two tasks ran at once under one key");
        completed += 1;
    }
    assert_eq!(completed, PRODUCERS * TASKS_PER_PRODUCER);

    for (_, indexes) in order.lock().iter() {
        assert!(indexes.windows(2).all(|pair| pair[0] < pair[1]));
    }
    for key in KEYS {
        assert_eq!(scheduler.state(key), Some(KeyState::Idle));
        assert_eq!(scheduler.queue_len(key), Some(0));
    }
}

#[test]
fn test_stalled_key_does_not_block_other_keys() {
    let scheduler = KeyedScheduler::new(Capabilities::new((), ()));
    let ran = Arc::new(AtomicBool::new(false));

    scheduler.enqueue_fn("STUCK", |advance, _, _| drop(advance));
    scheduler.enqueue_fn("STUCK", |advance, _, _| advance.advance());

    let flag = ran.clone();
    let receipt = scheduler.enqueue_fn("FREE", move |advance, _, _| {
        flag.store(true, Ordering::SeqCst);
        advance.advance();
    });

    assert!(receipt.started);
    assert!(ran.load(Ordering::SeqCst));
    assert_eq!(scheduler.queue_len("STUCK"), Some(2));
    assert_eq!(scheduler.state("STUCK"), Some(KeyState::Running));
}

#[test]
fn test_task_can_enqueue_on_another_key() {
    let scheduler = KeyedScheduler::new(Capabilities::new((), ()));
    let log = Arc::new(Mutex::new(Vec::new()));

    let inner = scheduler.clone();
    let outer_log = log.clone();
    scheduler.enqueue_fn("OUTER", move |advance, _, _| {
        let nested_log = outer_log.clone();
        inner.enqueue_fn("INNER", move |advance, _, _| {
            nested_log.lock().push("inner");
            advance.advance();
        });
        outer_log.lock().push("outer");
        advance.advance();
    });

    assert_eq!(*log.lock(), vec!["inner", "outer"]);
    assert_eq!(scheduler.key_count(), 2);
}
