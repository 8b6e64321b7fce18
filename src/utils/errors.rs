// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use thiserror::Error;

use crate::domain::models::action::QueueKey;

/// 队列中间件错误类型
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueueError {
    /// 带有 `queue` 键的动作缺少可调用的 `callback`
    ///
    /// 在修改注册表之前同步返回，注册表保持原样。
    #[error("Queued actions must have a <callback> property (queue: {key})")]
    TypeMismatch {
        /// 被拒绝动作的队列键
        key: QueueKey,
    },
}

impl QueueError {
    /// 返回出错动作的队列键
    pub fn key(&self) -> &QueueKey {
        match self {
            QueueError::TypeMismatch { key } => key,
        }
    }
}
