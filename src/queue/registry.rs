// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use dashmap::DashMap;
use parking_lot::Mutex;
use std::sync::Arc;

use crate::domain::models::action::QueueKey;
use crate::queue::key_queue::{AdvanceOutcome, KeyQueue, KeyState, QueuedTask};

/// 队列注册表
///
/// 保存键到队列的映射。键一旦创建便不会移除，即使队列已清空。
/// 每个键的追加与弹出由各自的互斥锁保护，任务执行期间不持有任何锁。
#[derive(Debug)]
pub struct QueueRegistry<T> {
    queues: Arc<DashMap<QueueKey, Mutex<KeyQueue<T>>>>,
}

impl<T> QueueRegistry<T> {
    pub fn new() -> Self {
        Self {
            queues: Arc::new(DashMap::new()),
        }
    }

    /// 按预估键数量创建注册表
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            queues: Arc::new(DashMap::with_capacity(capacity)),
        }
    }

    /// 追加任务，必要时先创建空队列
    ///
    /// # 返回值
    ///
    /// 追加后队列长度恰好为 1 时返回 `true`
    pub fn append(&self, key: &QueueKey, sequence: u64, task: T) -> bool {
        if let Some(queue) = self.queues.get(key) {
            return queue.lock().push(sequence, task);
        }
        let queue = self.queues.entry(key.clone()).or_default();
        let first = queue.lock().push(sequence, task);
        first
    }

    /// 取出指定键的头部任务准备派发
    pub fn start_head(&self, key: &QueueKey) -> Option<QueuedTask<T>> {
        let queue = self.queues.get(key)?;
        let head = queue.lock().start_head();
        head
    }

    /// 结束一次派发，返回是否需要继续派发下一个任务
    pub fn finish_dispatch(&self, key: &QueueKey) -> bool {
        self.queues
            .get(key)
            .is_some_and(|queue| queue.lock().finish_dispatch())
    }

    /// 记录指定键的头部任务完成
    pub fn complete(&self, key: &QueueKey, sequence: u64) -> AdvanceOutcome {
        let Some(queue) = self.queues.get(key) else {
            return AdvanceOutcome::Idle;
        };
        let outcome = queue.lock().complete(sequence);
        outcome
    }

    /// 队列长度（含正在运行的任务），未见过的键返回 `None`
    pub fn len_of(&self, key: &str) -> Option<usize> {
        self.queues.get(key).map(|queue| queue.lock().len())
    }

    pub fn state_of(&self, key: &str) -> Option<KeyState> {
        self.queues.get(key).map(|queue| queue.lock().state())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.queues.contains_key(key)
    }

    /// 已创建的键，顺序不固定
    pub fn keys(&self) -> Vec<QueueKey> {
        self.queues.iter().map(|entry| entry.key().clone()).collect()
    }

    pub fn key_count(&self) -> usize {
        self.queues.len()
    }
}

impl<T> Default for QueueRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for QueueRegistry<T> {
    fn clone(&self) -> Self {
        Self {
            queues: Arc::clone(&self.queues),
        }
    }
}
