//! 能力工厂与绑定
//!
//! 工厂只能通过调用时传入的 [`Resolve`] 访问其他能力。`Resolve` 携带发起解析的
//! 环境作用域，因此工厂在定义时无法捕获任何作用域。

use crate::capability::{Capability, CapabilityId, CapabilityKey};
use infrastructure_common::DependencyError;
use std::fmt;
use std::sync::Arc;

/// 工厂调用时可见的解析入口
pub trait Resolve {
    /// 从环境作用域解析能力
    fn resolve_by_id(&mut self, id: &CapabilityId) -> Result<Capability, DependencyError>;

    /// 环境作用域名称
    fn scope_name(&self) -> &str;

    /// 当前嵌套深度（最外层为 1）
    fn depth(&self) -> usize;
}

impl<'a> dyn Resolve + 'a {
    /// 按类型化键解析
    pub fn resolve<T: Send + Sync + 'static>(
        &mut self,
        key: &CapabilityKey<T>,
    ) -> Result<Arc<T>, DependencyError> {
        let capability = self.resolve_by_id(key.id())?;
        key.downcast(capability)
    }
}

/// 能力工厂函数类型
pub type CapabilityFactory =
    Arc<dyn Fn(&mut dyn Resolve) -> Result<Capability, DependencyError> + Send + Sync>;

/// 将类型化工厂擦除为 [`CapabilityFactory`]
pub fn erase_factory<T, F>(factory: F) -> CapabilityFactory
where
    T: Send + Sync + 'static,
    F: Fn(&mut dyn Resolve) -> Result<T, DependencyError> + Send + Sync + 'static,
{
    Arc::new(move |resolve: &mut dyn Resolve| {
        factory(resolve).map(|value| Arc::new(value) as Capability)
    })
}

/// 将固定实例包装为 [`CapabilityFactory`]，每次调用返回同一个 `Arc`
pub fn value_factory<T: Send + Sync + 'static>(value: T) -> CapabilityFactory {
    let value: Capability = Arc::new(value);
    Arc::new(move |_: &mut dyn Resolve| Ok(Arc::clone(&value)))
}

/// 作用域内的一条绑定
#[derive(Clone)]
pub enum Binding {
    /// 具体实例，每次解析返回同一个 `Arc`
    Value(Capability),
    /// 工厂，每次解析都重新调用
    Factory(CapabilityFactory),
}

impl Binding {
    /// 绑定具体值
    pub fn value<T: Send + Sync + 'static>(value: T) -> Self {
        Self::Value(Arc::new(value))
    }

    /// 绑定类型化工厂
    pub fn factory<T, F>(factory: F) -> Self
    where
        T: Send + Sync + 'static,
        F: Fn(&mut dyn Resolve) -> Result<T, DependencyError> + Send + Sync + 'static,
    {
        Self::Factory(erase_factory(factory))
    }

    /// 产生能力实例；工厂在此刻以传入的环境作用域执行
    pub fn produce(&self, resolve: &mut dyn Resolve) -> Result<Capability, DependencyError> {
        match self {
            Self::Value(value) => Ok(Arc::clone(value)),
            Self::Factory(factory) => factory(resolve),
        }
    }

    /// 是否为工厂绑定
    pub fn is_factory(&self) -> bool {
        matches!(self, Self::Factory(_))
    }
}

impl From<CapabilityFactory> for Binding {
    fn from(factory: CapabilityFactory) -> Self {
        Self::Factory(factory)
    }
}

impl fmt::Debug for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(_) => f.write_str("Binding::Value(<instance>)"),
            Self::Factory(_) => f.write_str("Binding::Factory(<function>)"),
        }
    }
}
