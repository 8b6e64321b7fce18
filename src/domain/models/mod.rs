// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域模型模块
///
/// - 动作（action）：流经管道的消息及其队列键
/// - 能力（capabilities）：构造时提供、原样传给任务的 `dispatch` 与 `get_state`
/// - 任务（task）：排队执行的工作单元及其完成续延
pub mod action;
pub mod capabilities;
pub mod task;
