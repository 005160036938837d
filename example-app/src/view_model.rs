//! 父子视图模型
//!
//! 每个视图模型持有自己的激活作用域，子视图模型的作用域由父视图模型派生。

use crate::clients::{GetAllNamesClient, NamesClient, GET_ALL_NAMES_CLIENT, NAMES_CLIENT};
use di_impl::{OverrideBuilder, Overrides, Resolver, Scope};
use infrastructure_common::DependencyResult;
use std::sync::Arc;
use tracing::info;

/// 导航目标
#[derive(Debug, Default)]
pub enum Destination {
    #[default]
    None,
    Child(ChildViewModel),
}

/// 父视图模型
#[derive(Debug)]
pub struct ViewModel {
    scope: Arc<Scope>,
    resolver: Resolver,
    pub names: Vec<String>,
    pub destination: Destination,
}

impl ViewModel {
    pub fn new(scope: Arc<Scope>, resolver: Resolver) -> Self {
        Self {
            scope,
            resolver,
            names: Vec::new(),
            destination: Destination::None,
        }
    }

    /// 加载名称
    pub fn load_names(&mut self) -> DependencyResult<&[String]> {
        let client = self.resolver.resolve(&self.scope, &GET_ALL_NAMES_CLIENT)?;
        self.names = client.get_all_names();
        info!(scope = self.scope.name(), names = ?self.names, "父视图加载名称");
        Ok(&self.names)
    }

    /// 仅覆盖 get_all_names_client 后进入子视图
    pub fn go_to_child_with_get_all_names_override(&mut self) {
        self.go_to_child(|overrides| {
            overrides.set_value(&GET_ALL_NAMES_CLIENT, GetAllNamesClient::mock());
        });
    }

    /// 仅覆盖 names_client 后进入子视图
    pub fn go_to_child_with_names_override(&mut self) {
        self.go_to_child(|overrides| {
            overrides.set_value(&NAMES_CLIENT, NamesClient::mock());
        });
    }

    /// 当前展示的子视图
    pub fn child_mut(&mut self) -> Option<&mut ChildViewModel> {
        match &mut self.destination {
            Destination::Child(child) => Some(child),
            Destination::None => None,
        }
    }

    fn go_to_child(&mut self, configure: impl FnOnce(&mut Overrides)) {
        let resolver = self.resolver.clone();
        let child = OverrideBuilder::with_overrides(&self.scope, configure, |scope| {
            ChildViewModel::new(scope, resolver)
        });
        info!(
            parent = self.scope.name(),
            child = child.scope().name(),
            "进入子视图"
        );
        self.destination = Destination::Child(child);
    }
}

/// 子视图模型
#[derive(Debug)]
pub struct ChildViewModel {
    scope: Arc<Scope>,
    resolver: Resolver,
    pub names: Vec<String>,
}

impl ChildViewModel {
    pub fn new(scope: Arc<Scope>, resolver: Resolver) -> Self {
        Self {
            scope,
            resolver,
            names: Vec::new(),
        }
    }

    pub fn scope(&self) -> &Arc<Scope> {
        &self.scope
    }

    /// 从自己的作用域加载名称
    pub fn load_names(&mut self) -> DependencyResult<&[String]> {
        let client = self.resolver.resolve(&self.scope, &GET_ALL_NAMES_CLIENT)?;
        self.names = client.get_all_names();
        info!(scope = self.scope.name(), names = ?self.names, "子视图加载名称");
        Ok(&self.names)
    }
}
