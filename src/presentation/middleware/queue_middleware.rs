// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use tracing::{trace, warn};

use crate::config::settings::QueueSettings;
use crate::domain::models::action::{Action, Callback};
use crate::domain::models::capabilities::Capabilities;
use crate::infrastructure::metrics;
use crate::queue::scheduler::KeyedScheduler;
use crate::utils::errors::QueueError;

/// 管道阶段的处理结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Handled<R> {
    /// 未带队列键的动作已交给下游，携带下游的返回值
    Forwarded(R),
    /// 动作已进入队列，不产生返回值
    Queued,
}

impl<R> Handled<R> {
    /// 取出下游返回值，排队动作返回 `None`
    pub fn into_forwarded(self) -> Option<R> {
        match self {
            Handled::Forwarded(value) => Some(value),
            Handled::Queued => None,
        }
    }

    pub fn is_queued(&self) -> bool {
        matches!(self, Handled::Queued)
    }
}

/// 队列中间件
///
/// 作为管道中的一个阶段拦截带 `queue` 键的动作并按键串行执行其任务，
/// 其余动作原样交给下游。
pub struct QueueMiddleware<D, G> {
    scheduler: KeyedScheduler<D, G>,
}

impl<D, G> QueueMiddleware<D, G>
where
    D: Send + Sync + 'static,
    G: Send + Sync + 'static,
{
    /// 创建新的队列中间件
    ///
    /// # 参数
    ///
    /// * `capabilities` - 传给每个任务的 `dispatch` 与 `get_state`
    pub fn new(capabilities: Capabilities<D, G>) -> Self {
        Self::with_scheduler(KeyedScheduler::new(capabilities))
    }

    /// 根据配置创建队列中间件
    pub fn from_settings(capabilities: Capabilities<D, G>, settings: &QueueSettings) -> Self {
        Self::with_scheduler(KeyedScheduler::from_settings(capabilities, settings))
    }

    pub fn with_scheduler(scheduler: KeyedScheduler<D, G>) -> Self {
        Self { scheduler }
    }

    pub fn scheduler(&self) -> &KeyedScheduler<D, G> {
        &self.scheduler
    }

    /// 处理单个动作
    ///
    /// # 参数
    ///
    /// * `action` - 输入动作
    /// * `next` - 下游阶段，仅对未带队列键的动作调用一次
    ///
    /// # 返回值
    ///
    /// * `Ok(Handled::Forwarded(r))` - 下游返回了 `r`
    /// * `Ok(Handled::Queued)` - 任务已入队
    /// * `Err(QueueError::TypeMismatch)` - 带队列键但任务字段不可调用，注册表未被修改
    pub fn handle<N, R>(&self, action: Action<D, G>, next: N) -> Result<Handled<R>, QueueError>
    where
        N: FnOnce(Action<D, G>) -> R,
    {
        let Some(key) = action.queue_key().cloned() else {
            trace!("Forwarding action without queue key");
            metrics::record_forwarded();
            return Ok(Handled::Forwarded(next(action)));
        };

        match action.callback {
            Some(Callback::Task(task)) => {
                self.scheduler.enqueue(key, task);
                Ok(Handled::Queued)
            }
            _ => {
                warn!(key = %key, "Rejecting queued action without invocable callback");
                metrics::record_type_mismatch();
                Err(QueueError::TypeMismatch { key })
            }
        }
    }

    /// 绑定下游阶段，返回逐个处理动作的处理函数
    ///
    /// 对应 `handler(next)(action)` 的管道约定。
    pub fn handler<N, R>(&self, next: N) -> impl Fn(Action<D, G>) -> Result<Handled<R>, QueueError>
    where
        N: Fn(Action<D, G>) -> R,
    {
        let middleware = self.clone();
        move |action| middleware.handle(action, &next)
    }
}

impl<D, G> Clone for QueueMiddleware<D, G> {
    fn clone(&self) -> Self {
        Self {
            scheduler: self.scheduler.clone(),
        }
    }
}

impl<D, G> std::fmt::Debug for QueueMiddleware<D, G> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueueMiddleware")
            .field("scheduler", &self.scheduler)
            .finish()
    }
}
