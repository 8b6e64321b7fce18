// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::Serialize;
use std::collections::VecDeque;

/// 单个键的执行状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyState {
    /// 队列为空，从未使用或已全部完成
    Idle,
    /// 头部任务已派发但尚未调用 `advance`
    Running,
}

/// 等待中的任务及其序号
#[derive(Debug)]
pub struct QueuedTask<T> {
    pub sequence: u64,
    pub task: T,
}

/// 完成事件的处理结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvanceOutcome {
    /// 任务在派发过程中同步完成，由派发循环继续处理
    Handoff,
    /// 队列中还有任务，调用方需要开始新的派发循环
    RunNext,
    /// 队列已清空，键回到空闲状态
    Idle,
}

/// 单个键的先进先出任务队列
///
/// 头部任务被派发后从 `pending` 中取出，由 `running` 记录其序号；
/// 队列长度为等待任务数加上正在运行的任务数。
#[derive(Debug)]
pub struct KeyQueue<T> {
    pending: VecDeque<QueuedTask<T>>,
    running: Option<u64>,
    dispatching: bool,
    completed_while_dispatching: bool,
}

impl<T> KeyQueue<T> {
    pub fn new() -> Self {
        Self {
            pending: VecDeque::new(),
            running: None,
            dispatching: false,
            completed_while_dispatching: false,
        }
    }

    pub fn len(&self) -> usize {
        self.pending.len() + usize::from(self.running.is_some())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_running(&self) -> bool {
        self.running.is_some()
    }

    pub fn state(&self) -> KeyState {
        if self.is_running() {
            KeyState::Running
        } else {
            KeyState::Idle
        }
    }

    /// 追加任务
    ///
    /// # 返回值
    ///
    /// 追加后队列长度恰好为 1 时返回 `true`，调用方应立即派发。
    pub fn push(&mut self, sequence: u64, task: T) -> bool {
        self.pending.push_back(QueuedTask { sequence, task });
        self.len() == 1
    }

    /// 取出头部任务准备派发
    ///
    /// 已有任务在运行时返回 `None`，保证同一键最多一个任务在运行。
    pub fn start_head(&mut self) -> Option<QueuedTask<T>> {
        if self.running.is_some() {
            return None;
        }
        let head = self.pending.pop_front()?;
        self.running = Some(head.sequence);
        self.dispatching = true;
        self.completed_while_dispatching = false;
        Some(head)
    }

    /// 记录头部任务完成
    pub fn complete(&mut self, sequence: u64) -> AdvanceOutcome {
        debug_assert_eq!(self.running, Some(sequence), "advance for a task that is not running");
        if self.dispatching {
            self.completed_while_dispatching = true;
            return AdvanceOutcome::Handoff;
        }
        self.running = None;
        if self.pending.is_empty() {
            AdvanceOutcome::Idle
        } else {
            AdvanceOutcome::RunNext
        }
    }

    /// 任务体返回后结束派发
    ///
    /// # 返回值
    ///
    /// 任务已在派发期间同步完成且队列非空时返回 `true`，派发循环继续执行下一个任务。
    pub fn finish_dispatch(&mut self) -> bool {
        self.dispatching = false;
        if !self.completed_while_dispatching {
            return false;
        }
        self.completed_while_dispatching = false;
        self.running = None;
        !self.pending.is_empty()
    }
}

impl<T> Default for KeyQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}
