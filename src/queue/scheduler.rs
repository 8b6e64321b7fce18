// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, trace};

use crate::config::settings::QueueSettings;
use crate::domain::models::action::QueueKey;
use crate::domain::models::capabilities::Capabilities;
use crate::domain::models::task::{Advance, Completion, Task};
use crate::infrastructure::metrics;
use crate::queue::key_queue::{AdvanceOutcome, KeyState, QueuedTask};
use crate::queue::registry::QueueRegistry;

/// 入队回执
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Enqueued {
    /// 队列键
    pub key: QueueKey,
    /// 任务序号，在同一调度器内单调递增
    pub sequence: u64,
    /// 是否走了同步快速路径（入队时队列为空，任务已立即派发）
    pub started: bool,
}

struct SchedulerCore<D, G> {
    registry: QueueRegistry<Task<D, G>>,
    capabilities: Capabilities<D, G>,
    next_sequence: AtomicU64,
}

impl<D, G> SchedulerCore<D, G>
where
    D: Send + Sync + 'static,
    G: Send + Sync + 'static,
{
    /// 派发循环
    ///
    /// 派发头部任务；任务同步调用 `advance` 时在本循环内继续派发下一个，
    /// 任务延后完成时退出，由之后的 `advance` 调用开启新的循环。
    fn run(self: &Arc<Self>, key: &QueueKey) {
        loop {
            let Some(QueuedTask { sequence, task }) = self.registry.start_head(key) else {
                return;
            };

            debug!(key = %key, sequence, "Dispatching queued task");
            metrics::record_dispatched();

            let completion: Arc<dyn Completion> = self.clone();
            let advance = Advance::new(key.clone(), sequence, completion);
            task(
                advance,
                &self.capabilities.dispatch,
                &self.capabilities.get_state,
            );

            if !self.registry.finish_dispatch(key) {
                return;
            }
            trace!(key = %key, sequence, "Task advanced synchronously, continuing");
        }
    }
}

impl<D, G> Completion for SchedulerCore<D, G>
where
    D: Send + Sync + 'static,
    G: Send + Sync + 'static,
{
    fn complete(self: Arc<Self>, key: &QueueKey, sequence: u64) {
        metrics::record_completed();
        match self.registry.complete(key, sequence) {
            AdvanceOutcome::Handoff => {
                trace!(key = %key, sequence, "Task completed during dispatch");
            }
            AdvanceOutcome::RunNext => {
                debug!(key = %key, sequence, "Task completed, starting next");
                self.run(key);
            }
            AdvanceOutcome::Idle => {
                debug!(key = %key, sequence, "Task completed, queue idle");
            }
        }
    }
}

/// 按键串行的任务调度器
///
/// 同一键下的任务严格按到达顺序逐个执行，不同键之间互不阻塞。
/// 调度器自身从不挂起：入队、派发与完成都是同步操作，
/// 异步等待只发生在任务体内部，即派发之后、调用 `advance` 之前。
///
/// 没有超时、取消或淘汰机制。从不调用 `advance` 的任务会让该键
/// 及其后排队的所有任务永久停滞；已清空的键也会一直保留在注册表中。
pub struct KeyedScheduler<D, G> {
    core: Arc<SchedulerCore<D, G>>,
}

impl<D, G> KeyedScheduler<D, G>
where
    D: Send + Sync + 'static,
    G: Send + Sync + 'static,
{
    /// 创建新的调度器
    ///
    /// # 参数
    ///
    /// * `capabilities` - 原样传给每个任务的 `dispatch` 与 `get_state`
    pub fn new(capabilities: Capabilities<D, G>) -> Self {
        Self::with_registry(capabilities, QueueRegistry::new())
    }

    /// 按预估键数量创建调度器
    pub fn with_capacity(capabilities: Capabilities<D, G>, capacity: usize) -> Self {
        Self::with_registry(capabilities, QueueRegistry::with_capacity(capacity))
    }

    /// 根据配置创建调度器
    pub fn from_settings(capabilities: Capabilities<D, G>, settings: &QueueSettings) -> Self {
        Self::with_capacity(capabilities, settings.registry_capacity)
    }

    fn with_registry(capabilities: Capabilities<D, G>, registry: QueueRegistry<Task<D, G>>) -> Self {
        Self {
            core: Arc::new(SchedulerCore {
                registry,
                capabilities,
                next_sequence: AtomicU64::new(1),
            }),
        }
    }

    /// 将任务追加到指定键的队列
    ///
    /// 若追加后队列长度为 1，任务在返回前同步派发；否则等待前面的任务完成。
    ///
    /// # 参数
    ///
    /// * `key` - 队列键
    /// * `task` - 要执行的任务
    ///
    /// # 返回值
    ///
    /// 返回入队回执
    pub fn enqueue(&self, key: QueueKey, task: Task<D, G>) -> Enqueued {
        let sequence = self.core.next_sequence.fetch_add(1, Ordering::Relaxed);
        let started = self.core.registry.append(&key, sequence, task);

        metrics::record_enqueued();
        metrics::set_registry_keys(self.core.registry.key_count());
        debug!(key = %key, sequence, started, "Task enqueued");

        if started {
            self.core.run(&key);
        }

        Enqueued {
            key,
            sequence,
            started,
        }
    }

    /// 以闭包形式入队
    pub fn enqueue_fn<F>(&self, key: impl Into<QueueKey>, task: F) -> Enqueued
    where
        F: FnOnce(Advance, &D, &G) + Send + 'static,
    {
        self.enqueue(key.into(), Box::new(task))
    }

    pub fn capabilities(&self) -> &Capabilities<D, G> {
        &self.core.capabilities
    }

    /// 队列长度（含正在运行的任务），未见过的键返回 `None`
    pub fn queue_len(&self, key: &str) -> Option<usize> {
        self.core.registry.len_of(key)
    }

    pub fn state(&self, key: &str) -> Option<KeyState> {
        self.core.registry.state_of(key)
    }

    pub fn is_running(&self, key: &str) -> bool {
        self.state(key) == Some(KeyState::Running)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.core.registry.contains_key(key)
    }

    pub fn keys(&self) -> Vec<QueueKey> {
        self.core.registry.keys()
    }

    pub fn key_count(&self) -> usize {
        self.core.registry.key_count()
    }
}

impl<D, G> Clone for KeyedScheduler<D, G> {
    fn clone(&self) -> Self {
        Self {
            core: Arc::clone(&self.core),
        }
    }
}

impl<D, G> std::fmt::Debug for KeyedScheduler<D, G> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyedScheduler")
            .field("keys", &self.core.registry.key_count())
            .finish_non_exhaustive()
    }
}
