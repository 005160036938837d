//! # Dependency Injection Abstractions
//!
//! 依赖注入抽象层，定义能力注册和作用域解析的核心接口。
//!
//! ## 核心接口
//!
//! - [`CapabilityId`] / [`CapabilityKey`] - 能力标识
//! - [`Binding`] - 作用域内的一条绑定（具体值或工厂）
//! - [`Resolve`] - 工厂被调用时拿到的环境作用域入口
//! - [`CapabilityRegistry`] - 默认实现注册表接口
//! - [`ResolveContext`] - 单次解析的进行中集合

pub mod capability;
pub mod factory;
pub mod registry;
pub mod resolver;

pub use capability::*;
pub use factory::*;
pub use registry::*;
pub use resolver::*;
