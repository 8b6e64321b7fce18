// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use futures::future::{self, BoxFuture, FutureExt};
use std::task::{Context, Poll};
use tower::{BoxError, Layer, Service};

use crate::domain::models::action::Action;
use crate::presentation::middleware::queue_middleware::{Handled, QueueMiddleware};

/// 以 tower `Layer` 形式提供的队列中间件
pub struct QueueLayer<D, G> {
    middleware: QueueMiddleware<D, G>,
}

impl<D, G> QueueLayer<D, G> {
    pub fn new(middleware: QueueMiddleware<D, G>) -> Self {
        Self { middleware }
    }
}

impl<D, G> Clone for QueueLayer<D, G> {
    fn clone(&self) -> Self {
        Self {
            middleware: self.middleware.clone(),
        }
    }
}

impl<S, D, G> Layer<S> for QueueLayer<D, G> {
    type Service = QueueService<S, D, G>;

    fn layer(&self, inner: S) -> Self::Service {
        QueueService {
            inner,
            middleware: self.middleware.clone(),
        }
    }
}

/// 包裹下游服务的队列服务
///
/// 未带队列键的动作交给内层服务；带队列键的动作入队后立即以
/// `Handled::Queued` 完成，不等待任务执行。
pub struct QueueService<S, D, G> {
    inner: S,
    middleware: QueueMiddleware<D, G>,
}

impl<S: Clone, D, G> Clone for QueueService<S, D, G> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            middleware: self.middleware.clone(),
        }
    }
}

impl<S, D, G> Service<Action<D, G>> for QueueService<S, D, G>
where
    S: Service<Action<D, G>>,
    S::Response: Send + 'static,
    S::Error: Into<BoxError>,
    S::Future: Send + 'static,
    D: Send + Sync + 'static,
    G: Send + Sync + 'static,
{
    type Response = Handled<S::Response>;
    type Error = BoxError;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    // 调用前无法得知动作是否带队列键，因此总是等待内层服务就绪；
    // 排队动作不会消耗这次就绪，它留给下一次转发调用使用。
    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx).map_err(Into::into)
    }

    fn call(&mut self, action: Action<D, G>) -> Self::Future {
        let inner = &mut self.inner;
        match self.middleware.handle(action, |action| inner.call(action)) {
            Ok(Handled::Forwarded(response)) => async move {
                response
                    .await
                    .map(Handled::Forwarded)
                    .map_err(Into::into)
            }
            .boxed(),
            Ok(Handled::Queued) => future::ready(Ok(Handled::Queued)).boxed(),
            Err(err) => future::ready(Err(err.into())).boxed(),
        }
    }
}
