//! 覆盖构建器
//!
//! 从已有作用域派生新的子作用域。派生是纯操作：不解析任何能力，整组覆盖在
//! 子作用域构建时一次性生效，读者不会看到只应用了一部分的作用域。

use crate::scope::Scope;
use di_abstractions::{Binding, CapabilityId, CapabilityKey, Resolve};
use infrastructure_common::DependencyResult;
use std::collections::HashMap;
use std::sync::Arc;

/// 一组覆盖
///
/// 同一组内对同一能力的后续覆盖替换之前的覆盖。
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    bindings: HashMap<CapabilityId, Binding>,
}

impl Overrides {
    /// 创建空覆盖组
    pub fn new() -> Self {
        Self::default()
    }

    /// 覆盖为固定实例
    pub fn value<T: Send + Sync + 'static>(mut self, key: &CapabilityKey<T>, value: T) -> Self {
        self.set_value(key, value);
        self
    }

    /// 覆盖为工厂
    pub fn factory<T, F>(mut self, key: &CapabilityKey<T>, factory: F) -> Self
    where
        T: Send + Sync + 'static,
        F: Fn(&mut dyn Resolve) -> DependencyResult<T> + Send + Sync + 'static,
    {
        self.set_factory(key, factory);
        self
    }

    /// 覆盖为任意绑定
    pub fn binding(mut self, id: impl Into<CapabilityId>, binding: Binding) -> Self {
        self.set_binding(id, binding);
        self
    }

    /// 就地覆盖为固定实例
    pub fn set_value<T: Send + Sync + 'static>(
        &mut self,
        key: &CapabilityKey<T>,
        value: T,
    ) -> &mut Self {
        self.set_binding(key.id().clone(), Binding::value(value))
    }

    /// 就地覆盖为工厂
    pub fn set_factory<T, F>(&mut self, key: &CapabilityKey<T>, factory: F) -> &mut Self
    where
        T: Send + Sync + 'static,
        F: Fn(&mut dyn Resolve) -> DependencyResult<T> + Send + Sync + 'static,
    {
        self.set_binding(key.id().clone(), Binding::factory(factory))
    }

    /// 就地覆盖为任意绑定
    pub fn set_binding(&mut self, id: impl Into<CapabilityId>, binding: Binding) -> &mut Self {
        self.bindings.insert(id.into(), binding);
        self
    }

    /// 覆盖数量
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// 是否覆盖了该能力
    pub fn contains(&self, id: &CapabilityId) -> bool {
        self.bindings.contains_key(id)
    }

    pub(crate) fn into_bindings(self) -> HashMap<CapabilityId, Binding> {
        self.bindings
    }
}

/// 覆盖构建器
#[derive(Debug, Clone, Copy, Default)]
pub struct OverrideBuilder;

impl OverrideBuilder {
    /// 从 `from` 派生子作用域并应用覆盖
    pub fn derive(from: &Arc<Scope>, overrides: Overrides) -> Arc<Scope> {
        from.child(overrides)
    }

    /// 从 `from` 派生具名子作用域
    pub fn derive_named(
        from: &Arc<Scope>,
        name: impl AsRef<str>,
        overrides: Overrides,
    ) -> Arc<Scope> {
        from.child_named(name, overrides)
    }

    /// 先通过 `configure` 收集覆盖，派生子作用域后交给 `operation`
    ///
    /// 用于在新的激活上下文中构造对象，例如由父视图模型创建子视图模型。
    pub fn with_overrides<R>(
        from: &Arc<Scope>,
        configure: impl FnOnce(&mut Overrides),
        operation: impl FnOnce(Arc<Scope>) -> R,
    ) -> R {
        let mut overrides = Overrides::new();
        configure(&mut overrides);
        operation(Self::derive(from, overrides))
    }
}
