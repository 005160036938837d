//! 演示用客户端及其默认实现

use di_abstractions::{CapabilityKey, Resolve};
use infrastructure_composition::ContainerBuilder;
use std::fmt;
use std::sync::Arc;

type NamesFn = Arc<dyn Fn() -> Vec<String> + Send + Sync>;

/// 名称客户端
pub const NAMES_CLIENT: CapabilityKey<NamesClient> = CapabilityKey::new("names_client");
/// 由名称客户端派生的获取全部名称客户端
pub const GET_ALL_NAMES_CLIENT: CapabilityKey<GetAllNamesClient> =
    CapabilityKey::new("get_all_names_client");

/// 名称客户端
#[derive(Clone)]
pub struct NamesClient {
    get_all_names: NamesFn,
}

impl NamesClient {
    pub fn new(get_all_names: impl Fn() -> Vec<String> + Send + Sync + 'static) -> Self {
        Self {
            get_all_names: Arc::new(get_all_names),
        }
    }

    /// 线上实现
    pub fn live() -> Self {
        Self::new(|| vec!["All".to_string(), "names".to_string()])
    }

    /// 模拟实现
    pub fn mock() -> Self {
        Self::new(|| vec!["Mock".to_string()])
    }

    pub fn get_all_names(&self) -> Vec<String> {
        (self.get_all_names)()
    }
}

impl fmt::Debug for NamesClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NamesClient").finish_non_exhaustive()
    }
}

/// 获取全部名称客户端
#[derive(Clone)]
pub struct GetAllNamesClient {
    get_all_names: NamesFn,
}

impl GetAllNamesClient {
    pub fn new(get_all_names: impl Fn() -> Vec<String> + Send + Sync + 'static) -> Self {
        Self {
            get_all_names: Arc::new(get_all_names),
        }
    }

    /// 线上实现：转发给解析到的名称客户端
    ///
    /// 名称客户端在工厂执行时从环境作用域解析，因此子作用域对名称客户端的覆盖
    /// 会在这里生效。
    pub fn live(resolve: &mut dyn Resolve) -> infrastructure_common::DependencyResult<Self> {
        let names_client = resolve.resolve(&NAMES_CLIENT)?;
        tracing::debug!(scope = resolve.scope_name(), "构造 GetAllNamesClient");
        Ok(Self::new(move || names_client.get_all_names()))
    }

    /// 模拟实现
    pub fn mock() -> Self {
        Self::new(|| vec!["mock".to_string()])
    }

    pub fn get_all_names(&self) -> Vec<String> {
        (self.get_all_names)()
    }
}

impl fmt::Debug for GetAllNamesClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GetAllNamesClient").finish_non_exhaustive()
    }
}

/// 注册两个客户端的线上实现
pub fn register_live_clients(builder: ContainerBuilder) -> ContainerBuilder {
    builder
        .register_described(&NAMES_CLIENT, "返回全部名称", |_: &mut dyn Resolve| {
            Ok(NamesClient::live())
        })
        .register_described(
            &GET_ALL_NAMES_CLIENT,
            "转发给 names_client",
            GetAllNamesClient::live,
        )
}
