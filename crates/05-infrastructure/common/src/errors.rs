//! 错误类型定义

use thiserror::Error;

/// 依赖注入错误类型
#[derive(Error, Debug)]
pub enum DependencyError {
    #[error("能力重复注册: {capability}")]
    DuplicateRegistration { capability: String },

    #[error("能力未注册: {capability}")]
    UnknownCapability { capability: String },

    #[error("检测到循环解析: {dependency_chain}")]
    CyclicResolution { dependency_chain: String },

    #[error("注册表已封存，拒绝注册: {capability}")]
    RegistrySealed { capability: String },

    #[error("能力类型不匹配: {capability}, 期望 {expected}")]
    TypeMismatch {
        capability: String,
        expected: &'static str,
    },

    #[error("解析深度超过上限 {max_depth}: {capability}")]
    ResolutionDepthExceeded { capability: String, max_depth: usize },

    #[error("能力工厂执行失败: {capability}, 原因: {source}")]
    FactoryFailed {
        capability: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl DependencyError {
    /// 创建未注册错误
    pub fn unknown(capability: impl Into<String>) -> Self {
        Self::UnknownCapability {
            capability: capability.into(),
        }
    }

    /// 包装工厂自身的错误
    pub fn factory_failed(
        capability: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::FactoryFailed {
            capability: capability.into(),
            source: source.into(),
        }
    }

    /// 是否属于配置错误（重试无意义，应在启动期暴露）
    pub fn is_misconfiguration(&self) -> bool {
        matches!(
            self,
            Self::DuplicateRegistration { .. }
                | Self::RegistrySealed { .. }
                | Self::CyclicResolution { .. }
        )
    }
}

/// 配置错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置文件不存在: {path}")]
    FileNotFound { path: String },

    #[error("配置文件读取失败: {source}")]
    FileReadError {
        #[from]
        source: std::io::Error,
    },

    #[error("配置解析失败: {source}")]
    ParseError {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("配置验证失败: {message}")]
    ValidationError { message: String },
}

/// 基础设施错误类型
#[derive(Error, Debug)]
pub enum InfrastructureError {
    #[error("配置错误: {source}")]
    ConfigError {
        #[from]
        source: ConfigError,
    },

    #[error("依赖注入错误: {source}")]
    DependencyError {
        #[from]
        source: DependencyError,
    },

    #[error("基础设施启动失败: {message}")]
    BootstrapFailed { message: String },
}

/// 结果类型别名
pub type DependencyResult<T> = Result<T, DependencyError>;
pub type ConfigResult<T> = Result<T, ConfigError>;
pub type InfrastructureResult<T> = Result<T, InfrastructureError>;
