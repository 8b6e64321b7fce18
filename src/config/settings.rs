// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// 应用程序配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// 队列配置
    pub queue: QueueSettings,
    /// 日志配置
    pub telemetry: TelemetrySettings,
    /// 演示程序配置
    pub demo: DemoSettings,
}

/// 队列配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct QueueSettings {
    /// 注册表初始容量，只影响内存预分配
    pub registry_capacity: usize,
}

impl Default for QueueSettings {
    fn default() -> Self {
        Self {
            registry_capacity: 64,
        }
    }
}

/// 日志配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct TelemetrySettings {
    /// 未设置 `RUST_LOG` 时使用的过滤规则
    pub filter: String,
    /// 是否输出 JSON 格式日志
    pub json: bool,
}

/// 演示程序配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct DemoSettings {
    /// 演示使用的队列键
    pub key: String,
    /// 第一个任务延后调用 `advance` 的毫秒数
    pub defer_ms: u64,
}

impl Settings {
    /// 创建新的配置实例
    ///
    /// 依次读取默认值、`config/default`、`config/{APP_ENVIRONMENT}` 与
    /// `KEYQUEUE__` 前缀的环境变量，后者覆盖前者。
    ///
    /// # Returns
    ///
    /// * `Ok(Settings)` - 成功加载的配置
    /// * `Err(ConfigError)` - 配置加载失败
    pub fn new() -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "default".to_string());
        let config = Self::defaults()?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(Environment::with_prefix("KEYQUEUE").separator("__"))
            .build()?;

        Self::from_config(config)
    }

    /// 从已构建的配置中反序列化
    pub fn from_config(config: Config) -> Result<Self, ConfigError> {
        config.try_deserialize()
    }

    /// 带默认值的配置构建器
    pub fn defaults() -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        Config::builder()
            .set_default("queue.registry_capacity", 64)?
            .set_default("telemetry.filter", "info,keyqueue=debug")?
            .set_default("telemetry.json", false)?
            .set_default("demo.key", "T")?
            .set_default("demo.defer_ms", 50)
    }
}
