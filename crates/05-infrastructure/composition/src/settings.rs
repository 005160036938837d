//! 容器配置
//!
//! 配置来源依次为默认值、TOML/JSON 配置文件、环境变量，后者覆盖前者。

use di_abstractions::ResolveOptions;
use infrastructure_common::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// 容器配置
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContainerSettings {
    /// 解析器配置
    pub resolver: ResolverSettings,
    /// 日志配置
    pub logging: LoggingConfig,
}

/// 解析器配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverSettings {
    /// 最大解析嵌套深度
    pub max_resolution_depth: usize,
}

impl Default for ResolverSettings {
    fn default() -> Self {
        Self {
            max_resolution_depth: ResolveOptions::default().max_depth,
        }
    }
}

/// 日志配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// 日志级别
    pub level: String,
    /// 是否显示目标
    pub show_target: bool,
    /// 是否显示线程ID
    pub show_thread_ids: bool,
    /// 是否显示文件名
    pub show_file: bool,
    /// 是否显示行号
    pub show_line_number: bool,
    /// 是否使用 JSON 格式
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            show_target: true,
            show_thread_ids: false,
            show_file: false,
            show_line_number: false,
            json_format: false,
        }
    }
}

impl LoggingConfig {
    /// 创建开发环境日志配置
    pub fn development() -> Self {
        Self {
            level: "debug".to_string(),
            show_target: true,
            show_thread_ids: true,
            show_file: true,
            show_line_number: true,
            json_format: false,
        }
    }

    /// 创建生产环境日志配置
    pub fn production() -> Self {
        Self {
            level: "info".to_string(),
            show_target: false,
            show_thread_ids: false,
            show_file: false,
            show_line_number: false,
            json_format: true,
        }
    }

    /// 解析日志级别
    pub fn parsed_level(&self) -> ConfigResult<tracing::Level> {
        self.level
            .parse::<tracing::Level>()
            .map_err(|_| ConfigError::ValidationError {
                message: format!("无效的日志级别: {}", self.level),
            })
    }

    /// 构建日志过滤器
    ///
    /// 设置了 `RUST_LOG` 时以其为准，否则使用配置的级别。
    pub fn env_filter(&self) -> ConfigResult<EnvFilter> {
        let level = self.parsed_level()?;
        Ok(EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::default().add_directive(level.into())))
    }
}

impl ContainerSettings {
    /// 从 TOML 文本加载
    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        toml::from_str(content).map_err(|e| ConfigError::ParseError {
            source: Box::new(e),
        })
    }

    /// 从 JSON 文本加载
    pub fn from_json_str(content: &str) -> ConfigResult<Self> {
        serde_json::from_str(content).map_err(|e| ConfigError::ParseError {
            source: Box::new(e),
        })
    }

    /// 从配置文件加载，按扩展名选择格式
    pub fn from_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileNotFound {
                path: path.display().to_string(),
            });
        }

        debug!("加载容器配置文件: {}", path.display());
        let content = std::fs::read_to_string(path)?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Self::from_toml_str(&content),
            Some("json") => Self::from_json_str(&content),
            _ => Err(ConfigError::ValidationError {
                message: format!("不支持的配置文件格式: {}", path.display()),
            }),
        }
    }

    /// 应用进程环境变量覆盖
    pub fn apply_env_overrides(&mut self, prefix: &str) -> ConfigResult<()> {
        self.apply_overrides_from(prefix, std::env::vars())
    }

    /// 应用给定键值对中的覆盖
    ///
    /// 识别 `<PREFIX>_MAX_RESOLUTION_DEPTH`、`<PREFIX>_LOG_LEVEL`、`<PREFIX>_LOG_JSON`。
    pub fn apply_overrides_from<I>(&mut self, prefix: &str, vars: I) -> ConfigResult<()>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let prefix = format!("{}_", prefix.trim_end_matches('_').to_uppercase());
        for (key, value) in vars {
            let Some(name) = key.strip_prefix(&prefix) else {
                continue;
            };
            match name {
                "MAX_RESOLUTION_DEPTH" => {
                    self.resolver.max_resolution_depth =
                        value.parse().map_err(|_| ConfigError::ValidationError {
                            message: format!("{key} 不是有效的整数: {value}"),
                        })?;
                }
                "LOG_LEVEL" => self.logging.level = value,
                "LOG_JSON" => {
                    self.logging.json_format =
                        value.parse().map_err(|_| ConfigError::ValidationError {
                            message: format!("{key} 不是有效的布尔值: {value}"),
                        })?;
                }
                _ => continue,
            }
            info!("应用环境变量覆盖: {}", key);
        }
        Ok(())
    }

    /// 验证配置
    pub fn validate(&self) -> ConfigResult<()> {
        if self.resolver.max_resolution_depth == 0 {
            return Err(ConfigError::ValidationError {
                message: "resolver.max_resolution_depth 必须大于 0".to_string(),
            });
        }
        self.logging.parsed_level()?;
        Ok(())
    }

    /// 转换为解析选项
    pub fn resolve_options(&self) -> ResolveOptions {
        ResolveOptions {
            max_depth: self.resolver.max_resolution_depth,
        }
    }
}
