// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 中间件模块
///
/// 提供拦截排队动作的管道阶段，以及对应的 tower 层
pub mod queue_layer;
pub mod queue_middleware;
