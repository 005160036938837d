//! 依赖容器
//!
//! 持有已封存的注册表、根作用域和解析器，对外提供解析与派生的统一入口。

use crate::builder::ContainerBuilder;
use crate::settings::ContainerSettings;
use di_abstractions::{CapabilityKey, CapabilityRegistry};
use di_impl::{CapabilityRegistryImpl, OverrideBuilder, Overrides, Resolver, Scope};
use infrastructure_common::{CapabilityMetadata, DependencyResult};
use std::sync::Arc;
use tracing::debug;

/// 依赖容器
#[derive(Debug, Clone)]
pub struct DependencyContainer {
    registry: Arc<CapabilityRegistryImpl>,
    resolver: Resolver,
    root: Arc<Scope>,
    settings: ContainerSettings,
}

impl DependencyContainer {
    pub(crate) fn new(
        registry: Arc<CapabilityRegistryImpl>,
        resolver: Resolver,
        root: Arc<Scope>,
        settings: ContainerSettings,
    ) -> Self {
        Self {
            registry,
            resolver,
            root,
            settings,
        }
    }

    /// 创建容器构建器
    pub fn builder() -> ContainerBuilder {
        ContainerBuilder::new()
    }

    /// 根作用域
    pub fn root_scope(&self) -> &Arc<Scope> {
        &self.root
    }

    /// 解析器
    pub fn resolver(&self) -> &Resolver {
        &self.resolver
    }

    /// 注册表
    pub fn registry(&self) -> &Arc<CapabilityRegistryImpl> {
        &self.registry
    }

    /// 容器配置
    pub fn settings(&self) -> &ContainerSettings {
        &self.settings
    }

    /// 在根作用域中解析
    pub fn resolve<T: Send + Sync + 'static>(
        &self,
        key: &CapabilityKey<T>,
    ) -> DependencyResult<Arc<T>> {
        self.resolver.resolve(&self.root, key)
    }

    /// 在指定作用域中解析
    pub fn resolve_in<T: Send + Sync + 'static>(
        &self,
        scope: &Scope,
        key: &CapabilityKey<T>,
    ) -> DependencyResult<Arc<T>> {
        self.resolver.resolve(scope, key)
    }

    /// 从指定作用域派生子作用域
    pub fn derive(&self, from: &Arc<Scope>, overrides: Overrides) -> Arc<Scope> {
        debug!(parent = from.name(), overrides = overrides.len(), "派生作用域");
        OverrideBuilder::derive(from, overrides)
    }

    /// 从指定作用域派生具名子作用域
    pub fn derive_named(
        &self,
        from: &Arc<Scope>,
        name: impl AsRef<str>,
        overrides: Overrides,
    ) -> Arc<Scope> {
        debug!(
            parent = from.name(),
            name = name.as_ref(),
            overrides = overrides.len(),
            "派生具名作用域"
        );
        OverrideBuilder::derive_named(from, name, overrides)
    }

    /// 已注册能力的元数据
    pub fn capabilities(&self) -> Vec<CapabilityMetadata> {
        self.registry.registered_capabilities()
    }
}
