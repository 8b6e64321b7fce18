// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::borrow::Borrow;
use std::fmt;

use crate::domain::models::task::{Advance, Task};

/// 动作中队列键字段的名称
pub const QUEUE_FIELD: &str = "queue";

/// 动作中任务字段的名称
pub const CALLBACK_FIELD: &str = "callback";

/// 队列键
///
/// 同一键下的任务互斥且按到达顺序执行，不同键之间互不影响。
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct QueueKey(String);

impl QueueKey {
    /// 创建新的队列键
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// 以字符串切片形式返回队列键
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// 空键等同于未设置键，动作将直接透传
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// 从 JSON 字段值得到队列键
    ///
    /// `null`、`false`、数值 `0` 与空字符串不构成键，返回 `None`；
    /// 其余值均为键：字符串取其内容，其他值取其 JSON 文本。
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Null | Value::Bool(false) => None,
            Value::Number(n) if n.as_f64() == Some(0.0) => None,
            Value::String(key) if key.is_empty() => None,
            Value::String(key) => Some(Self(key.clone())),
            other => Some(Self(other.to_string())),
        }
    }
}

impl fmt::Display for QueueKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for QueueKey {
    fn from(key: &str) -> Self {
        Self(key.to_string())
    }
}

impl From<String> for QueueKey {
    fn from(key: String) -> Self {
        Self(key)
    }
}

impl Borrow<str> for QueueKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// 动作的任务字段
///
/// 只有 `Task` 是可调用的；`Value` 表示任务字段上放置了一个不可调用的值。
pub enum Callback<D, G> {
    /// 可调用的任务
    Task(Task<D, G>),
    /// 不可调用的普通值
    Value(Value),
}

impl<D, G> Callback<D, G> {
    /// 任务字段是否可调用
    pub fn is_invocable(&self) -> bool {
        matches!(self, Callback::Task(_))
    }
}

impl<D, G> fmt::Debug for Callback<D, G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Callback::Task(_) => f.write_str("Callback::Task(..)"),
            Callback::Value(value) => f.debug_tuple("Callback::Value").field(value).finish(),
        }
    }
}

/// 流经管道的动作
///
/// `queue` 存在且非空时动作进入队列，否则原样交给下游。
/// 其余字段保存在 `payload` 中，本组件不关心其内容。
pub struct Action<D, G> {
    /// 队列键
    pub queue: Option<QueueKey>,
    /// 与队列键配对的任务字段
    pub callback: Option<Callback<D, G>>,
    /// 其他字段
    pub payload: Value,
}

impl<D, G> Action<D, G> {
    /// 创建一个不带队列键的普通动作
    ///
    /// # 参数
    ///
    /// * `payload` - 动作内容
    pub fn new(payload: Value) -> Self {
        Self {
            queue: None,
            callback: None,
            payload,
        }
    }

    /// 创建一个排队动作
    ///
    /// # 参数
    ///
    /// * `key` - 队列键
    /// * `task` - 任务，完成时必须调用一次 `advance`
    pub fn queued<F>(key: impl Into<QueueKey>, task: F) -> Self
    where
        F: FnOnce(Advance, &D, &G) + Send + 'static,
    {
        Self {
            queue: Some(key.into()),
            callback: Some(Callback::Task(Box::new(task))),
            payload: Value::Null,
        }
    }

    /// 从 JSON 值解析动作
    ///
    /// 非空的 `queue` 字段按 [`QueueKey::from_json`] 成为队列键，不构成键的值
    /// 原样留在 `payload` 中；`callback` 字段（若存在）成为不可调用的
    /// `Callback::Value`，其余字段保留在 `payload` 中。
    /// 可调用任务只能通过 [`Action::with_task`] 附加。
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(mut fields) => {
                let queue = match fields.remove(QUEUE_FIELD) {
                    Some(value) => {
                        let key = QueueKey::from_json(&value);
                        if key.is_none() {
                            fields.insert(QUEUE_FIELD.to_string(), value);
                        }
                        key
                    }
                    None => None,
                };
                let callback = fields.remove(CALLBACK_FIELD).map(Callback::Value);
                Self {
                    queue,
                    callback,
                    payload: Value::Object(fields),
                }
            }
            other => Self::new(other),
        }
    }

    /// 附加可调用任务，替换已有的任务字段
    pub fn with_task<F>(mut self, task: F) -> Self
    where
        F: FnOnce(Advance, &D, &G) + Send + 'static,
    {
        self.callback = Some(Callback::Task(Box::new(task)));
        self
    }

    /// 设置队列键
    pub fn with_queue(mut self, key: impl Into<QueueKey>) -> Self {
        self.queue = Some(key.into());
        self
    }

    /// 返回生效的队列键，空键视为未设置
    pub fn queue_key(&self) -> Option<&QueueKey> {
        self.queue.as_ref().filter(|key| !key.is_empty())
    }

    /// 是否会进入队列
    pub fn is_queued(&self) -> bool {
        self.queue_key().is_some()
    }
}

impl<D, G> Default for Action<D, G> {
    fn default() -> Self {
        Self::new(Value::Object(Map::new()))
    }
}

impl<D, G> fmt::Debug for Action<D, G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Action")
            .field("queue", &self.queue)
            .field("callback", &self.callback)
            .field("payload", &self.payload)
            .finish()
    }
}
