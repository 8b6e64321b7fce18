// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use anyhow::ensure;
use keyqueue::config::settings::Settings;
use keyqueue::infrastructure::metrics;
use keyqueue::utils::telemetry;
use keyqueue::{Action, Capabilities, Handled, QueueMiddleware};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;
use tracing::info;

type Dispatch = Arc<dyn Fn(Value) + Send + Sync>;
type GetState = Arc<dyn Fn() -> usize + Send + Sync>;

/// 主函数
///
/// 演示同一键下三个任务的执行顺序：第一个任务延后完成，
/// 第二个任务计数后同步完成，第三个任务校验计数。
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::new()?;
    telemetry::init_telemetry(&settings.telemetry)?;
    metrics::describe_metrics();
    info!("Starting keyqueue demo...");

    let counter = Arc::new(AtomicUsize::new(0));
    let state = counter.clone();
    let dispatch: Dispatch = Arc::new(move |action: Value| {
        info!(%action, "dispatch");
        if action["type"] == "INCREMENT" {
            counter.fetch_add(1, Ordering::SeqCst);
        }
    });
    let get_state: GetState = Arc::new(move || state.load(Ordering::SeqCst));

    let middleware =
        QueueMiddleware::from_settings(Capabilities::new(dispatch, get_state), &settings.queue);
    let handler = middleware.handler(|action: Action<Dispatch, GetState>| {
        info!(payload = %action.payload, "Forwarded to downstream");
        action.payload
    });

    let key = settings.demo.key.clone();
    let defer = Duration::from_millis(settings.demo.defer_ms);
    let (done_tx, done_rx) = oneshot::channel();

    handler(Action::queued(key.as_str(), move |advance, _, _| {
        info!("task 1: deferring advance");
        tokio::spawn(async move {
            tokio::time::sleep(defer).await;
            info!("task 1: advancing");
            advance.advance();
        });
    }))?;

    handler(Action::queued(key.as_str(), |advance, dispatch: &Dispatch, _| {
        dispatch(json!({ "type": "INCREMENT" }));
        info!("task 2: incremented");
        advance.advance();
    }))?;

    handler(Action::queued(key.as_str(), move |advance, _, get_state: &GetState| {
        let seen = get_state();
        info!(counter = seen, "task 3: checking counter");
        advance.advance();
        let _ = done_tx.send(seen);
    }))?;

    let scheduler = middleware.scheduler();
    info!(
        counter = (scheduler.capabilities().get_state)(),
        pending = ?scheduler.queue_len(&key),
        "All tasks enqueued"
    );

    let seen = done_rx.await?;
    ensure!(seen == 1, "task 3 saw counter {seen}, expected 1");

    if let Handled::Forwarded(payload) = handler(Action::new(json!({ "type": "PING" })))? {
        info!(%payload, "Pass-through returned downstream value");
    }

    info!(keys = scheduler.key_count(), "Demo finished");
    Ok(())
}
