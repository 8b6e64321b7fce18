// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

//! 按键串行的异步任务调度中间件
//!
//! 带 `queue` 键的动作按键排队，同一键同一时刻最多一个任务在运行，
//! 不同键互不影响；不带键的动作原样交给下游阶段。

/// 配置模块
///
/// 处理应用程序的配置设置和环境变量
pub mod config;

/// 领域模块
///
/// 包含动作、任务与能力集合等核心类型
pub mod domain;

/// 基础设施模块
///
/// 提供指标记录
pub mod infrastructure;

/// 表示层模块
///
/// 提供管道阶段与 tower 层
pub mod presentation;

/// 队列模块
///
/// 实现按键队列、注册表与调度器
pub mod queue;

/// 工具模块
///
/// 提供错误类型与日志初始化
pub mod utils;

pub use domain::models::action::{Action, Callback, QueueKey};
pub use domain::models::capabilities::Capabilities;
pub use domain::models::task::{Advance, Task};
pub use presentation::middleware::queue_layer::{QueueLayer, QueueService};
pub use presentation::middleware::queue_middleware::{Handled, QueueMiddleware};
pub use queue::key_queue::KeyState;
pub use queue::scheduler::{Enqueued, KeyedScheduler};
pub use utils::errors::QueueError;
