//! # 基础设施组合层
//!
//! 将配置、日志和依赖容器组合成一个可运行的整体。
//!
//! ## 主要功能
//!
//! - **容器构建器**: 使用构建者模式注册默认实现并封存注册表
//! - **容器配置**: 从 TOML/JSON 文件和环境变量加载解析与日志配置
//! - **依赖容器**: 在根作用域或派生作用域中解析能力
//!
//! ## 基本使用
//!
//! ```rust,ignore
//! use di_abstractions::{CapabilityKey, Resolve};
//! use di_impl::Overrides;
//! use infrastructure_composition::DependencyContainer;
//!
//! const NAMES: CapabilityKey<Vec<String>> = CapabilityKey::new("names");
//! const COUNT: CapabilityKey<usize> = CapabilityKey::new("count");
//!
//! let container = DependencyContainer::builder()
//!     .with_env_overrides("APP")
//!     .register_value(&NAMES, vec!["All".to_string()])
//!     .register_factory(&COUNT, |r: &mut dyn Resolve| Ok(r.resolve(&NAMES)?.len()))
//!     .build()?;
//!
//! let child = container.derive(container.root_scope(), Overrides::new().value(&NAMES, vec![]));
//! assert_eq!(*container.resolve_in(&child, &COUNT)?, 0);
//! ```

pub mod builder;
pub mod container;
pub mod settings;

// 重新导出主要类型
pub use builder::ContainerBuilder;
pub use container::DependencyContainer;
pub use infrastructure_common::{InfrastructureError, InfrastructureResult};
pub use settings::{ContainerSettings, LoggingConfig, ResolverSettings};
