//! # Infrastructure Common
//!
//! 依赖注入核心各 crate 共用的错误类型和能力元数据。
//!
//! ## 核心类型
//!
//! - [`DependencyError`] - 注册与解析阶段的错误
//! - [`ConfigError`] - 容器配置加载错误
//! - [`InfrastructureError`] - 组合层汇总错误
//! - [`CapabilityMetadata`] - 已注册能力的描述信息

pub mod errors;
pub mod metadata;

pub use errors::*;
pub use metadata::*;
