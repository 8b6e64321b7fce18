// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use metrics::{counter, describe_counter, describe_gauge, gauge};

pub const ACTIONS_FORWARDED: &str = "keyqueue_actions_forwarded_total";
pub const TASKS_ENQUEUED: &str = "keyqueue_tasks_enqueued_total";
pub const TASKS_DISPATCHED: &str = "keyqueue_tasks_dispatched_total";
pub const TASKS_COMPLETED: &str = "keyqueue_tasks_completed_total";
pub const TYPE_MISMATCH: &str = "keyqueue_type_mismatch_total";
pub const REGISTRY_KEYS: &str = "keyqueue_registry_keys";

/// 注册指标描述
///
/// 只描述指标，不安装导出器；由宿主程序决定使用哪个记录器。
pub fn describe_metrics() {
    describe_counter!(ACTIONS_FORWARDED, "Actions passed straight to the downstream stage");
    describe_counter!(TASKS_ENQUEUED, "Tasks appended to a keyed queue");
    describe_counter!(TASKS_DISPATCHED, "Tasks handed their advance continuation");
    describe_counter!(TASKS_COMPLETED, "Tasks that called advance");
    describe_counter!(TYPE_MISMATCH, "Queued actions rejected for a non-invocable callback");
    describe_gauge!(REGISTRY_KEYS, "Keys held by the queue registry");
}

pub fn record_forwarded() {
    counter!(ACTIONS_FORWARDED).increment(1);
}

pub fn record_enqueued() {
    counter!(TASKS_ENQUEUED).increment(1);
}

pub fn record_dispatched() {
    counter!(TASKS_DISPATCHED).increment(1);
}

pub fn record_completed() {
    counter!(TASKS_COMPLETED).increment(1);
}

pub fn record_type_mismatch() {
    counter!(TYPE_MISMATCH).increment(1);
}

pub fn set_registry_keys(count: usize) {
    gauge!(REGISTRY_KEYS).set(count as f64);
}
