//! 环境作用域解析器
//!
//! 解析从请求所在的作用域开始，沿父链向根查找最近的显式绑定，找不到时回落到
//! 注册表的默认工厂。无论绑定在哪一层找到，工厂都以发起查找的作用域作为环境
//! 作用域执行，其内部的嵌套解析同样从这个作用域开始。解析器不缓存结果。

use crate::scope::Scope;
use di_abstractions::{
    Capability, CapabilityFactory, CapabilityId, CapabilityKey, Resolve, ResolveContext,
    ResolveOptions,
};
use infrastructure_common::{DependencyError, DependencyResult};
use std::sync::Arc;
use tracing::{debug, trace};

/// 解析器
#[derive(Debug, Clone, Default)]
pub struct Resolver {
    options: ResolveOptions,
}

impl Resolver {
    /// 创建新的解析器
    pub fn new(options: ResolveOptions) -> Self {
        Self { options }
    }

    /// 解析选项
    pub fn options(&self) -> &ResolveOptions {
        &self.options
    }

    /// 在 `scope` 中解析类型化能力
    pub fn resolve<T: Send + Sync + 'static>(
        &self,
        scope: &Scope,
        key: &CapabilityKey<T>,
    ) -> DependencyResult<Arc<T>> {
        let capability = self.resolve_by_id(scope, key.id())?;
        key.downcast(capability)
    }

    /// 在 `scope` 中按标识解析能力
    pub fn resolve_by_id(&self, scope: &Scope, id: &CapabilityId) -> DependencyResult<Capability> {
        let mut context = ResolveContext::new(self.options.clone());
        self.resolve_in_context(scope, id, &mut context)
    }

    /// 检查能力能否在 `scope` 中找到绑定，不调用任何工厂
    pub fn can_resolve(&self, scope: &Scope, id: &CapabilityId) -> bool {
        scope.lookup(id).is_some() || scope.registry().is_registered(id)
    }

    fn resolve_in_context(
        &self,
        ambient: &Scope,
        id: &CapabilityId,
        context: &mut ResolveContext,
    ) -> DependencyResult<Capability> {
        context.push(id)?;
        let result = self.produce(ambient, id, context);
        context.pop();
        result
    }

    fn produce(
        &self,
        ambient: &Scope,
        id: &CapabilityId,
        context: &mut ResolveContext,
    ) -> DependencyResult<Capability> {
        let source = Self::locate(ambient, id)?;
        let mut frame = ResolutionFrame {
            resolver: self,
            scope: ambient,
            context,
        };
        let frame: &mut dyn Resolve = &mut frame;

        match source {
            BindingSource::Scoped(binding) => binding.produce(frame),
            BindingSource::Default(factory) => factory(frame),
        }
    }

    fn locate(ambient: &Scope, id: &CapabilityId) -> DependencyResult<BindingSource> {
        if let Some((found_in, binding)) = ambient.lookup(id) {
            debug!(
                capability = %id,
                found_in = found_in.name(),
                ambient = ambient.name(),
                "使用作用域覆盖"
            );
            return Ok(BindingSource::Scoped(binding.clone()));
        }

        let factory = ambient.registry().default_factory(id).map_err(|err| {
            debug!(capability = %id, ambient = ambient.name(), "能力未注册");
            err
        })?;
        trace!(capability = %id, ambient = ambient.name(), "使用默认实现");
        Ok(BindingSource::Default(factory))
    }
}

/// 绑定来源
enum BindingSource {
    Scoped(di_abstractions::Binding),
    Default(CapabilityFactory),
}

/// 一次工厂调用期间的解析入口，携带环境作用域和进行中集合
struct ResolutionFrame<'a> {
    resolver: &'a Resolver,
    scope: &'a Scope,
    context: &'a mut ResolveContext,
}

impl Resolve for ResolutionFrame<'_> {
    fn resolve_by_id(&mut self, id: &CapabilityId) -> Result<Capability, DependencyError> {
        self.resolver.resolve_in_context(self.scope, id, self.context)
    }

    fn scope_name(&self) -> &str {
        self.scope.name()
    }

    fn depth(&self) -> usize {
        self.context.depth()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::Overrides;
    use crate::registry::CapabilityRegistryImpl;

    const BASE: CapabilityKey<u32> = CapabilityKey::new("base");
    const DOUBLED: CapabilityKey<u32> = CapabilityKey::new("doubled");
    const SEEN_SCOPE: CapabilityKey<String> = CapabilityKey::new("seen_scope");

    fn registry() -> Arc<CapabilityRegistryImpl> {
        let registry = Arc::new(CapabilityRegistryImpl::new());
        registry.register_value(&BASE, 1).unwrap();
        registry
            .register_factory(&DOUBLED, |r: &mut dyn Resolve| Ok(*r.resolve(&BASE)? * 2))
            .unwrap();
        registry
            .register_factory(&SEEN_SCOPE, |r: &mut dyn Resolve| Ok(r.scope_name().to_string()))
            .unwrap();
        registry
    }

    #[test]
    fn default_factory_runs_with_requesting_scope_as_ambient() {
        let root = Scope::root(registry());
        let child = root.child_named("sheet", Overrides::new().value(&BASE, 10));
        let resolver = Resolver::default();

        assert_eq!(*resolver.resolve(&root, &DOUBLED).unwrap(), 2);
        assert_eq!(*resolver.resolve(&child, &DOUBLED).unwrap(), 20);
        assert_eq!(*resolver.resolve(&child, &SEEN_SCOPE).unwrap(), "root.sheet");
    }

    #[test]
    fn factory_found_in_ancestor_still_sees_descendant_overrides() {
        let root = Scope::root(registry());
        let middle = root.child_named(
            "middle",
            Overrides::new().factory(&DOUBLED, |r: &mut dyn Resolve| Ok(*r.resolve(&BASE)? * 100)),
        );
        let leaf = middle.child_named("leaf", Overrides::new().value(&BASE, 3));
        let resolver = Resolver::default();

        assert_eq!(*resolver.resolve(&middle, &DOUBLED).unwrap(), 100);
        assert_eq!(*resolver.resolve(&leaf, &DOUBLED).unwrap(), 300);
    }

    #[test]
    fn factories_are_reinvoked_on_every_resolution() {
        use std::sync::atomic::{AtomicUsize, Ordering};

        const TICKET: CapabilityKey<usize> = CapabilityKey::new("ticket");
        let counter = Arc::new(AtomicUsize::new(0));
        let registry = Arc::new(CapabilityRegistryImpl::new());
        let issued = Arc::clone(&counter);
        registry
            .register_factory(&TICKET, move |_: &mut dyn Resolve| {
                Ok(issued.fetch_add(1, Ordering::SeqCst))
            })
            .unwrap();

        let root = Scope::root(registry);
        let resolver = Resolver::default();
        assert_eq!(*resolver.resolve(&root, &TICKET).unwrap(), 0);
        assert_eq!(*resolver.resolve(&root, &TICKET).unwrap(), 1);
        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn unknown_capability_is_reported() {
        const MISSING: CapabilityKey<u8> = CapabilityKey::new("missing");
        let root = Scope::root(registry());
        let resolver = Resolver::default();

        assert!(!resolver.can_resolve(&root, MISSING.id()));
        assert!(matches!(
            resolver.resolve(&root, &MISSING),
            Err(DependencyError::UnknownCapability { .. })
        ));
    }

    #[test]
    fn wrong_key_type_is_a_type_mismatch() {
        const BASE_AS_TEXT: CapabilityKey<String> = CapabilityKey::new("base");
        let root = Scope::root(registry());

        assert!(matches!(
            Resolver::default().resolve(&root, &BASE_AS_TEXT),
            Err(DependencyError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn depth_limit_applies_without_cycle() {
        const L1: CapabilityKey<u32> = CapabilityKey::new("l1");
        const L2: CapabilityKey<u32> = CapabilityKey::new("l2");
        let registry = registry();
        registry
            .register_factory(&L1, |r: &mut dyn Resolve| r.resolve(&L2).map(|v| *v))
            .unwrap();
        registry
            .register_factory(&L2, |r: &mut dyn Resolve| r.resolve(&DOUBLED).map(|v| *v))
            .unwrap();
        let root = Scope::root(registry);

        let shallow = Resolver::new(ResolveOptions { max_depth: 3 });
        assert!(matches!(
            shallow.resolve(&root, &L1),
            Err(DependencyError::ResolutionDepthExceeded { max_depth: 3, .. })
        ));
        assert_eq!(*Resolver::default().resolve(&root, &L1).unwrap(), 2);
    }

    #[test]
    fn factory_errors_propagate_unchanged() {
        const FLAKY: CapabilityKey<u32> = CapabilityKey::new("flaky");
        const USES_FLAKY: CapabilityKey<u32> = CapabilityKey::new("uses_flaky");
        let registry = registry();
        registry
            .register_factory(&FLAKY, |_: &mut dyn Resolve| -> DependencyResult<u32> {
                Err(DependencyError::factory_failed("flaky", "上游不可用"))
            })
            .unwrap();
        registry
            .register_factory(&USES_FLAKY, |r: &mut dyn Resolve| r.resolve(&FLAKY).map(|v| *v))
            .unwrap();
        let root = Scope::root(registry);

        match Resolver::default().resolve(&root, &USES_FLAKY) {
            Err(DependencyError::FactoryFailed { capability, source }) => {
                assert_eq!(capability, "flaky");
                assert_eq!(source.to_string(), "上游不可用");
            }
            other => panic!("expected factory failure, got {other:?}"),
        }
    }

    #[test]
    fn long_cycle_under_small_depth_limit_reports_depth() {
        const A: CapabilityKey<u32> = CapabilityKey::new("a");
        const B: CapabilityKey<u32> = CapabilityKey::new("b");
        const C: CapabilityKey<u32> = CapabilityKey::new("c");
        let registry = Arc::new(CapabilityRegistryImpl::new());
        registry
            .register_factory(&A, |r: &mut dyn Resolve| r.resolve(&B).map(|v| *v))
            .unwrap();
        registry
            .register_factory(&B, |r: &mut dyn Resolve| r.resolve(&C).map(|v| *v))
            .unwrap();
        registry
            .register_factory(&C, |r: &mut dyn Resolve| r.resolve(&A).map(|v| *v))
            .unwrap();
        let root = Scope::root(registry);

        match Resolver::new(ResolveOptions { max_depth: 2 }).resolve(&root, &A) {
            Err(DependencyError::ResolutionDepthExceeded { capability, max_depth }) => {
                assert_eq!(capability, "c");
                assert_eq!(max_depth, 2);
            }
            other => panic!("expected depth limit, got {other:?}"),
        }
        match Resolver::default().resolve(&root, &A) {
            Err(DependencyError::CyclicResolution { dependency_chain }) => {
                assert_eq!(dependency_chain, "a -> b -> c -> a");
            }
            other => panic!("expected cyclic resolution, got {other:?}"),
        }
    }
}
