//! # 依赖注入具体实现
//!
//! 提供能力注册表、不可变作用域链、环境作用域解析器和覆盖构建器。
//!
//! 解析总是以发起查找的作用域作为环境作用域：派生能力的工厂在被调用时拿到
//! 这个作用域，并从它开始解析自己依赖的能力。因此子作用域中对基础能力的覆盖
//! 会传播到在根作用域注册的派生能力。
//!
//! ```ignore
//! let registry = Arc::new(CapabilityRegistryImpl::new());
//! registry.register_value(&NAMES, vec!["All".to_string(), "names".to_string()])?;
//! registry.register_factory(&ALL_NAMES, |r: &mut dyn Resolve| Ok((*r.resolve(&NAMES)?).clone()))?;
//!
//! let root = Scope::root(registry);
//! let child = OverrideBuilder::derive(&root, Overrides::new().value(&NAMES, vec!["Mock".to_string()]));
//! assert_eq!(*Resolver::default().resolve(&child, &ALL_NAMES)?, vec!["Mock".to_string()]);
//! ```

pub mod builder;
pub mod registry;
pub mod resolver;
pub mod scope;

pub use builder::{OverrideBuilder, Overrides};
pub use registry::{global_registry, CapabilityRegistryImpl};
pub use resolver::Resolver;
pub use scope::{Ancestors, Scope};
