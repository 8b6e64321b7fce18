// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::fmt;
use std::sync::Arc;

use crate::domain::models::action::QueueKey;

/// 排队任务
///
/// 接收完成续延 `advance` 以及构造时提供的 `dispatch` 与 `get_state`。
/// 任务可以同步调用 `advance`，也可以在之后任意时刻调用。
pub type Task<D, G> = Box<dyn FnOnce(Advance, &D, &G) + Send + 'static>;

/// 任务完成通知
///
/// 由调度器实现，`Advance` 通过它把完成事件交还给所属队列。
pub trait Completion: Send + Sync {
    /// 标记 `key` 队列头部的任务已完成
    fn complete(self: Arc<Self>, key: &QueueKey, sequence: u64);
}

/// 完成续延
///
/// 每个被派发的任务恰好获得一个 `Advance`。`advance` 消耗自身，
/// 因此同一任务无法重复完成。丢弃而不调用会使该键永久停滞，
/// 调度器不会检测这种情况。
#[must_use = "the queue stays blocked until `advance` is called"]
pub struct Advance {
    key: QueueKey,
    sequence: u64,
    completion: Arc<dyn Completion>,
}

impl Advance {
    pub(crate) fn new(key: QueueKey, sequence: u64, completion: Arc<dyn Completion>) -> Self {
        Self {
            key,
            sequence,
            completion,
        }
    }

    /// 所属队列键
    pub fn key(&self) -> &QueueKey {
        &self.key
    }

    /// 任务入队时分配的序号
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// 通知调度器当前任务已完成
    ///
    /// 延后调用时，若队列中还有任务，下一个任务在本次调用的调用栈上立即派发。
    /// 在任务体内同步调用时只记录完成，下一个任务在任务体返回后由派发循环
    /// 派发，因此任务体中 `advance` 之后的代码先于下一个任务执行。
    pub fn advance(self) {
        let Advance {
            key,
            sequence,
            completion,
        } = self;
        completion.complete(&key, sequence);
    }
}

impl fmt::Debug for Advance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Advance")
            .field("key", &self.key)
            .field("sequence", &self.sequence)
            .finish_non_exhaustive()
    }
}
