// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 能力集合
///
/// 构造调度器时提供一次，之后原样借给每个任务。
/// 任务拿到的 `dispatch` 与 `get_state` 始终指向这里保存的同一份值。
#[derive(Debug, Clone)]
pub struct Capabilities<D, G> {
    /// 派发新动作的能力
    pub dispatch: D,
    /// 读取状态的能力
    pub get_state: G,
}

impl<D, G> Capabilities<D, G> {
    pub fn new(dispatch: D, get_state: G) -> Self {
        Self {
            dispatch,
            get_state,
        }
    }
}
