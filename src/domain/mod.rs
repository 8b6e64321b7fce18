// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域层模块
///
/// 定义动作、队列键、任务、完成续延与能力集合。
/// 领域层不依赖调度器实现，调度器通过 `Completion` 特质接收完成事件。
pub mod models;
