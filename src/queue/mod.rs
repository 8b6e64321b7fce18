// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 队列模块
///
/// 提供按键分组的先进先出队列、队列注册表和串行调度器
pub mod key_queue;
pub mod registry;
pub mod scheduler;
