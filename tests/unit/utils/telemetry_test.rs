// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use keyqueue::config::settings::TelemetrySettings;
use keyqueue::utils::telemetry;

#[test]
fn test_telemetry_initialization() {
    let settings = TelemetrySettings {
        filter: "debug".to_string(),
        json: false,
    };

    // 初始化遥测系统
    let _ = telemetry::init_telemetry(&settings);
    tracing::debug!(key = "T", sequence = 1, "Task enqueued");

    // 全局订阅器只能安装一次
    assert!(telemetry::init_telemetry(&settings).is_err());
}
