//! 作用域覆盖的跨 crate 集成测试

use di_abstractions::{CapabilityKey, Resolve};
use di_impl::{CapabilityRegistryImpl, OverrideBuilder, Overrides, Resolver, Scope};
use infrastructure_common::DependencyError;
use infrastructure_composition::{ContainerBuilder, DependencyContainer};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// A：直接能力
const NAMES: CapabilityKey<Vec<String>> = CapabilityKey::new("names_client");
/// B：由 A 派生
const ALL_NAMES: CapabilityKey<Vec<String>> = CapabilityKey::new("get_all_names_client");

fn names(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn root_scope() -> Arc<Scope> {
    let registry = Arc::new(CapabilityRegistryImpl::new());
    registry
        .register_value(&NAMES, names(&["All", "names"]))
        .unwrap();
    registry
        .register_factory(&ALL_NAMES, |r: &mut dyn Resolve| {
            Ok((*r.resolve(&NAMES)?).clone())
        })
        .unwrap();
    Scope::root(registry)
}

#[test]
fn test_direct_override_visible_in_child_only() {
    let root = root_scope();
    let child = OverrideBuilder::derive(&root, Overrides::new().value(&NAMES, names(&["Mock"])));
    let resolver = Resolver::default();

    assert_eq!(*resolver.resolve(&child, &NAMES).unwrap(), ["Mock"]);
    assert_eq!(*resolver.resolve(&root, &NAMES).unwrap(), ["All", "names"]);
}

#[test]
fn test_override_of_dependency_propagates_to_derived_capability() {
    let root = root_scope();
    let child = OverrideBuilder::derive(&root, Overrides::new().value(&NAMES, names(&["Mock"])));
    let resolver = Resolver::default();

    assert_eq!(*resolver.resolve(&root, &ALL_NAMES).unwrap(), ["All", "names"]);
    assert_eq!(*resolver.resolve(&child, &ALL_NAMES).unwrap(), ["Mock"]);
}

#[test]
fn test_propagation_reaches_grandchild_without_own_overrides() {
    let root = root_scope();
    let child = OverrideBuilder::derive(&root, Overrides::new().value(&NAMES, names(&["Mock"])));
    let grandchild = OverrideBuilder::derive_named(&child, "sheet", Overrides::new());

    assert_eq!(grandchild.name(), "root.child.sheet");
    assert_eq!(
        *Resolver::default().resolve(&grandchild, &ALL_NAMES).unwrap(),
        ["Mock"]
    );
}

#[test]
fn test_derived_capability_override_is_independent_of_dependency() {
    let root = root_scope();
    let child = OverrideBuilder::derive(
        &root,
        Overrides::new().value(&ALL_NAMES, names(&["mock"])),
    );
    let both = OverrideBuilder::derive(
        &child,
        Overrides::new().value(&NAMES, names(&["ignored"])),
    );
    let resolver = Resolver::default();

    assert_eq!(*resolver.resolve(&child, &ALL_NAMES).unwrap(), ["mock"]);
    assert_eq!(*resolver.resolve(&both, &ALL_NAMES).unwrap(), ["mock"]);
    assert_eq!(*resolver.resolve(&both, &NAMES).unwrap(), ["ignored"]);
}

#[test]
fn test_overrides_never_leak_upward_or_sideways() {
    let root = root_scope();
    let left = OverrideBuilder::derive_named(
        &root,
        "left",
        Overrides::new().value(&NAMES, names(&["Mock"])),
    );
    let right = OverrideBuilder::derive_named(&root, "right", Overrides::new());
    let resolver = Resolver::default();

    assert_eq!(*resolver.resolve(&left, &ALL_NAMES).unwrap(), ["Mock"]);
    assert_eq!(*resolver.resolve(&right, &ALL_NAMES).unwrap(), ["All", "names"]);
    assert_eq!(*resolver.resolve(&root, &ALL_NAMES).unwrap(), ["All", "names"]);
    assert!(!root.has_own_binding(NAMES.id()));
}

#[test]
fn test_unknown_capability_in_every_ancestor() {
    const MISSING: CapabilityKey<u8> = CapabilityKey::new("missing");
    let root = root_scope();
    let child = OverrideBuilder::derive(&root, Overrides::new().value(&NAMES, Vec::new()));

    match Resolver::default().resolve(&child, &MISSING) {
        Err(DependencyError::UnknownCapability { capability }) => {
            assert_eq!(capability, "missing");
        }
        other => panic!("expected unknown capability, got {other:?}"),
    }
}

#[test]
fn test_cycle_yields_error_instead_of_overflow() {
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

    match Resolver::default().resolve(&root, &B) {
        Err(DependencyError::CyclicResolution { dependency_chain }) => {
            assert_eq!(dependency_chain, "b -> c -> a -> b");
        }
        other => panic!("expected cyclic resolution, got {other:?}"),
    }

    // 子作用域打断循环后可正常解析
    let child = OverrideBuilder::derive(&root, Overrides::new().value(&C, 7));
    assert_eq!(*Resolver::default().resolve(&child, &A).unwrap(), 7);
}

#[test]
fn test_duplicate_registration_is_rejected() {
    let registry = CapabilityRegistryImpl::new();
    registry.register_value(&NAMES, Vec::new()).unwrap();

    assert!(matches!(
        registry.register_value(&NAMES, Vec::new()),
        Err(DependencyError::DuplicateRegistration { .. })
    ));
}

#[test]
fn test_derivation_does_not_invoke_factories() {
    const COUNTED: CapabilityKey<usize> = CapabilityKey::new("counted");
    let calls = Arc::new(AtomicUsize::new(0));
    let registry = Arc::new(CapabilityRegistryImpl::new());
    let seen = Arc::clone(&calls);
    registry
        .register_factory(&COUNTED, move |_: &mut dyn Resolve| {
            Ok(seen.fetch_add(1, Ordering::SeqCst))
        })
        .unwrap();
    let root = Scope::root(registry);

    let child = OverrideBuilder::derive(&root, Overrides::new());
    let _grandchild = OverrideBuilder::derive(&child, Overrides::new());
    assert_eq!(calls.load(Ordering::SeqCst), 0);

    Resolver::default().resolve(&child, &COUNTED).unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

fn demo_container() -> DependencyContainer {
    ContainerBuilder::new()
        .register_value(&NAMES, names(&["All", "names"]))
        .register_factory(&ALL_NAMES, |r: &mut dyn Resolve| {
            Ok((*r.resolve(&NAMES)?).clone())
        })
        .build()
        .unwrap()
}

#[test]
fn test_container_child_activation_context() -> anyhow::Result<()> {
    let container = demo_container();

    let child_names = OverrideBuilder::with_overrides(
        container.root_scope(),
        |o| {
            o.set_value(&NAMES, names(&["Mock"]));
        },
        |scope| container.resolve_in(&scope, &ALL_NAMES),
    )?;

    assert_eq!(*child_names, ["Mock"]);
    assert_eq!(*container.resolve(&ALL_NAMES)?, ["All", "names"]);
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_resolution_across_sibling_scopes() {
    let container = Arc::new(demo_container());
    let mocked = container.derive(
        container.root_scope(),
        Overrides::new().value(&NAMES, names(&["Mock"])),
    );

    let mut handles = Vec::new();
    for i in 0..32 {
        let container = Arc::clone(&container);
        let scope = if i % 2 == 0 {
            Arc::clone(&mocked)
        } else {
            Arc::clone(container.root_scope())
        };
        handles.push(tokio::spawn(async move {
            (i, container.resolve_in(&scope, &ALL_NAMES).unwrap())
        }));
    }

    for handle in handles {
        let (i, resolved) = handle.await.unwrap();
        if i % 2 == 0 {
            assert_eq!(*resolved, ["Mock"]);
        } else {
            assert_eq!(*resolved, ["All", "names"]);
        }
    }
}
