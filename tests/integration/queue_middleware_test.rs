// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use keyqueue::{Action, Capabilities, Handled, QueueError, QueueMiddleware};
use parking_lot::Mutex;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;

type Dispatch = Arc<dyn Fn(Value) + Send + Sync>;
type GetState = Arc<dyn Fn() -> Value + Send + Sync>;
type TestAction = Action<Dispatch, GetState>;

fn capabilities() -> Capabilities<Dispatch, GetState> {
    let dispatch: Dispatch = Arc::new(|_| {});
    let get_state: GetState = Arc::new(|| json!({}));
    Capabilities::new(dispatch, get_state)
}

#[test]
fn test_plain_action_passes_through_once() {
    let middleware = QueueMiddleware::new(capabilities());
    let seen = Arc::new(Mutex::new(Vec::new()));

    let calls = seen.clone();
    let handler = middleware.handler(move |action: TestAction| {
        calls.lock().push(action.payload.clone());
        "redux"
    });

    let outcome = handler(Action::new(json!({ "type": "PLAIN" }))).unwrap();

    assert_eq!(outcome, Handled::Forwarded("redux"));
    assert_eq!(*seen.lock(), vec![json!({ "type": "PLAIN" })]);
    assert!(middleware.scheduler().keys().is_empty());
}

#[test]
fn test_task_receives_construction_capabilities() {
    let caps = capabilities();
    let (dispatch, get_state) = (caps.dispatch.clone(), caps.get_state.clone());
    let middleware = QueueMiddleware::new(caps);
    let handler = middleware.handler(|_: TestAction| ());
    let matched = Arc::new(Mutex::new(None));

    let slot = matched.clone();
    handler(Action::queued(
        "ARGUMENTS_TEST",
        move |advance, d: &Dispatch, g: &GetState| {
            *slot.lock() = Some(Arc::ptr_eq(d, &dispatch) && Arc::ptr_eq(g, &get_state));
            advance.advance();
        },
    ))
    .unwrap();

    assert_eq!(*matched.lock(), Some(true));
}

#[test]
fn test_first_task_runs_inside_enqueue_call() {
    let middleware = QueueMiddleware::new(capabilities());
    let handler = middleware.handler(|_: TestAction| ());
    let mutated = Arc::new(AtomicUsize::new(0));

    let counter = mutated.clone();
    let outcome = handler(Action::queued("SYNC_TEST", move |_advance, _, _| {
        counter.fetch_add(1, Ordering::SeqCst);
    }))
    .unwrap();

    assert_eq!(outcome, Handled::Queued);
    assert_eq!(mutated.load(Ordering::SeqCst), 1);
}

#[test]
fn test_type_mismatch_keeps_existing_queue_unchanged() {
    let middleware = QueueMiddleware::new(capabilities());
    let handler = middleware.handler(|_: TestAction| ());

    handler(Action::queued("K", |_advance, _, _| {})).unwrap();
    handler(Action::queued("K", |advance, _, _| advance.advance())).unwrap();
    assert_eq!(middleware.scheduler().queue_len("K"), Some(2));

    let err = handler(Action::from_value(json!({ "queue": "K", "callback": "not a task" })))
        .unwrap_err();

    assert_eq!(err, QueueError::TypeMismatch { key: "K".into() });
    assert_eq!(middleware.scheduler().queue_len("K"), Some(2));
    assert_eq!(middleware.scheduler().key_count(), 1);
}

#[test]
fn test_different_keys_start_independently() {
    let middleware = QueueMiddleware::new(capabilities());
    let handler = middleware.handler(|_: TestAction| ());
    let started = Arc::new(Mutex::new(Vec::new()));

    let log = started.clone();
    handler(Action::queued("A", move |_advance, _, _| log.lock().push("A"))).unwrap();
    let log = started.clone();
    handler(Action::queued("B", move |_advance, _, _| log.lock().push("B"))).unwrap();

    assert_eq!(*started.lock(), vec!["A", "B"]);
    assert!(middleware.scheduler().is_running("A"));
    assert!(middleware.scheduler().is_running("B"));
}

#[tokio::test(start_paused = true)]
async fn test_deferred_advance_orders_three_tasks() {
    let middleware = QueueMiddleware::new(capabilities());
    let handler = middleware.handler(|_: TestAction| ());
    let counter = Arc::new(AtomicUsize::new(0));
    let (done_tx, done_rx) = oneshot::channel();

    handler(Action::queued("T", |advance, _, _| {
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            advance.advance();
        });
    }))
    .unwrap();

    let increment = counter.clone();
    handler(Action::queued("T", move |advance, _, _| {
        increment.fetch_add(1, Ordering::SeqCst);
        advance.advance();
    }))
    .unwrap();

    let check = counter.clone();
    handler(Action::queued("T", move |advance, _, _| {
        let seen = check.load(Ordering::SeqCst);
        advance.advance();
        let _ = done_tx.send(seen);
    }))
    .unwrap();

    // 第一个任务仍在运行，后两个任务尚未开始
    assert_eq!(counter.load(Ordering::SeqCst), 0);
    assert_eq!(middleware.scheduler().queue_len("T"), Some(3));

    assert_eq!(done_rx.await.unwrap(), 1);
    assert_eq!(counter.load(Ordering::SeqCst), 1);
    assert_eq!(middleware.scheduler().queue_len("T"), Some(0));
    assert!(middleware.scheduler().contains_key("T"));
}

#[tokio::test(start_paused = true)]
async fn test_drained_key_cycles_back_to_running() {
    let middleware = QueueMiddleware::new(capabilities());
    let handler = middleware.handler(|_: TestAction| ());
    let runs = Arc::new(AtomicUsize::new(0));

    for _ in 0..2 {
        let (tx, rx) = oneshot::channel();
        let counter = runs.clone();
        handler(Action::queued("CYCLE", move |advance, _, _| {
            counter.fetch_add(1, Ordering::SeqCst);
            tokio::spawn(async move {
                tokio::time::sleep(Duration::from_millis(5)).await;
                advance.advance();
                let _ = tx.send(());
            });
        }))
        .unwrap();
        assert!(middleware.scheduler().is_running("CYCLE"));

        rx.await.unwrap();
        assert!(!middleware.scheduler().is_running("CYCLE"));
    }

    assert_eq!(runs.load(Ordering::SeqCst), 2);
    assert_eq!(middleware.scheduler().key_count(), 1);
}
