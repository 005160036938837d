//! 不可变作用域链
//!
//! 作用域在构建后不再变化。覆盖总是产生新的子作用域；子作用域持有父作用域的
//! 强引用，父作用域不知道子作用域，因此作用域之间只能构成树。

use crate::builder::Overrides;
use di_abstractions::{Binding, CapabilityId, CapabilityRegistry};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// 作用域
pub struct Scope {
    id: uuid::Uuid,
    name: String,
    created_at: chrono::DateTime<chrono::Utc>,
    bindings: HashMap<CapabilityId, Binding>,
    parent: Option<Arc<Scope>>,
    registry: Arc<dyn CapabilityRegistry>,
}

impl Scope {
    /// 创建根作用域
    ///
    /// 根作用域没有显式绑定，查找最终回落到注册表的默认工厂。创建根作用域会封存
    /// 注册表，保证任何解析发生之后都不能再注册。
    pub fn root(registry: Arc<dyn CapabilityRegistry>) -> Arc<Self> {
        registry.seal();
        let scope = Self {
            id: uuid::Uuid::new_v4(),
            name: "root".to_string(),
            created_at: chrono::Utc::now(),
            bindings: HashMap::new(),
            parent: None,
            registry,
        };
        debug!("创建根作用域: {}", scope.id);
        Arc::new(scope)
    }

    /// 创建子作用域，自身绑定恰好是 `overrides`
    ///
    /// 不复制也不解析父作用域的绑定，父链上的查找在解析时才发生。
    pub fn child(self: &Arc<Self>, overrides: Overrides) -> Arc<Self> {
        self.child_named("child", overrides)
    }

    /// 创建具名子作用域
    pub fn child_named(self: &Arc<Self>, name: impl AsRef<str>, overrides: Overrides) -> Arc<Self> {
        let scope = Self {
            id: uuid::Uuid::new_v4(),
            name: format!("{}.{}", self.name, name.as_ref()),
            created_at: chrono::Utc::now(),
            bindings: overrides.into_bindings(),
            parent: Some(Arc::clone(self)),
            registry: Arc::clone(&self.registry),
        };
        debug!(
            "创建子作用域: {} (覆盖 {} 个能力)",
            scope.name,
            scope.bindings.len()
        );
        Arc::new(scope)
    }

    /// 作用域标识
    pub fn id(&self) -> uuid::Uuid {
        self.id
    }

    /// 作用域名称（以点分隔的路径）
    pub fn name(&self) -> &str {
        &self.name
    }

    /// 创建时间
    pub fn created_at(&self) -> chrono::DateTime<chrono::Utc> {
        self.created_at
    }

    /// 父作用域
    pub fn parent(&self) -> Option<&Arc<Scope>> {
        self.parent.as_ref()
    }

    /// 默认实现注册表
    pub fn registry(&self) -> &Arc<dyn CapabilityRegistry> {
        &self.registry
    }

    /// 是否为根作用域
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// 到根作用域的距离，根为 0
    pub fn depth(&self) -> usize {
        self.ancestors().count() - 1
    }

    /// 自身的绑定（不查父链）
    pub fn binding(&self, id: &CapabilityId) -> Option<&Binding> {
        self.bindings.get(id)
    }

    /// 自身是否覆盖了该能力
    pub fn has_own_binding(&self, id: &CapabilityId) -> bool {
        self.bindings.contains_key(id)
    }

    /// 自身覆盖的能力标识，按标识排序
    pub fn overridden_ids(&self) -> Vec<&CapabilityId> {
        let mut ids: Vec<&CapabilityId> = self.bindings.keys().collect();
        ids.sort();
        ids
    }

    /// 沿父链查找最近的显式绑定，返回绑定及其所在作用域
    pub fn lookup(&self, id: &CapabilityId) -> Option<(&Scope, &Binding)> {
        self.ancestors()
            .find_map(|scope| scope.binding(id).map(|binding| (scope, binding)))
    }

    /// 从自身开始到根作用域的迭代器
    pub fn ancestors(&self) -> Ancestors<'_> {
        Ancestors { next: Some(self) }
    }
}

impl fmt::Debug for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scope")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("bindings", &self.overridden_ids())
            .field("parent", &self.parent.as_ref().map(|p| p.name.as_str()))
            .finish()
    }
}

/// 作用域链迭代器
#[derive(Debug, Clone)]
pub struct Ancestors<'a> {
    next: Option<&'a Scope>,
}

impl<'a> Iterator for Ancestors<'a> {
    type Item = &'a Scope;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = current.parent.as_deref();
        Some(current)
    }
}
