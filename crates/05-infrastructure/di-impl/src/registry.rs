//! 能力注册表实现
//!
//! 两阶段生命周期：注册阶段用互斥锁保护；封存后注册表移入 `OnceCell`，
//! 之后的查找不再加锁。

use di_abstractions::{
    erase_factory, value_factory, CapabilityFactory, CapabilityId, CapabilityKey,
    CapabilityRegistry, Resolve,
};
use infrastructure_common::{CapabilityMetadata, DependencyError, DependencyResult};
use once_cell::sync::{Lazy, OnceCell};
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// 单个能力的注册信息
#[derive(Clone)]
struct CapabilityRegistration {
    metadata: CapabilityMetadata,
    factory: CapabilityFactory,
}

type RegistrationTable = HashMap<CapabilityId, CapabilityRegistration>;

/// 能力注册表实现
pub struct CapabilityRegistryImpl {
    /// 注册阶段的可变表；封存后为 `None`
    open: Mutex<Option<RegistrationTable>>,
    /// 封存后的只读表
    sealed: OnceCell<RegistrationTable>,
}

impl CapabilityRegistryImpl {
    /// 创建新的注册表
    pub fn new() -> Self {
        Self {
            open: Mutex::new(Some(HashMap::new())),
            sealed: OnceCell::new(),
        }
    }

    /// 注册类型化工厂
    pub fn register_factory<T, F>(&self, key: &CapabilityKey<T>, factory: F) -> DependencyResult<()>
    where
        T: Send + Sync + 'static,
        F: Fn(&mut dyn Resolve) -> DependencyResult<T> + Send + Sync + 'static,
    {
        let metadata = CapabilityMetadata::new(key.id().as_str()).with_type::<T>();
        self.register(key.id().clone(), metadata, erase_factory(factory))
    }

    /// 注册带描述的类型化工厂
    pub fn register_described<T, F>(
        &self,
        key: &CapabilityKey<T>,
        description: impl Into<String>,
        factory: F,
    ) -> DependencyResult<()>
    where
        T: Send + Sync + 'static,
        F: Fn(&mut dyn Resolve) -> DependencyResult<T> + Send + Sync + 'static,
    {
        let metadata = CapabilityMetadata::new(key.id().as_str())
            .with_type::<T>()
            .with_description(description);
        self.register(key.id().clone(), metadata, erase_factory(factory))
    }

    /// 注册固定实例，每次解析返回同一个 `Arc`
    pub fn register_value<T>(&self, key: &CapabilityKey<T>, value: T) -> DependencyResult<()>
    where
        T: Send + Sync + 'static,
    {
        let metadata = CapabilityMetadata::new(key.id().as_str()).with_type::<T>();
        self.register(key.id().clone(), metadata, value_factory(value))
    }

    /// 批量注册
    ///
    /// 在同一次加锁内先校验整批再写入：任何一项失败时注册表保持原样。
    pub fn register_all<I>(&self, registrations: I) -> DependencyResult<usize>
    where
        I: IntoIterator<Item = (CapabilityId, CapabilityMetadata, CapabilityFactory)>,
    {
        let registrations: Vec<_> = registrations.into_iter().collect();
        let mut open = self.open.lock();
        let Some(table) = open.as_mut() else {
            let capability = registrations
                .first()
                .map(|(id, _, _)| id.to_string())
                .unwrap_or_default();
            warn!("注册表已封存，拒绝批量注册");
            return Err(DependencyError::RegistrySealed { capability });
        };

        let mut batch = HashSet::with_capacity(registrations.len());
        for (id, _, _) in &registrations {
            if table.contains_key(id) || !batch.insert(id) {
                warn!("能力重复注册，整批放弃: {}", id);
                return Err(DependencyError::DuplicateRegistration {
                    capability: id.to_string(),
                });
            }
        }

        let count = registrations.len();
        for (id, metadata, factory) in registrations {
            info!("注册能力: {}", id);
            table.insert(id, CapabilityRegistration { metadata, factory });
        }
        Ok(count)
    }

    /// 已注册能力数量
    pub fn len(&self) -> usize {
        self.with_table(HashMap::len)
    }

    /// 是否没有注册任何能力
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn with_table<R>(&self, f: impl FnOnce(&RegistrationTable) -> R) -> R {
        if let Some(table) = self.sealed.get() {
            return f(table);
        }
        let open = self.open.lock();
        match open.as_ref() {
            Some(table) => f(table),
            // 封存在持有锁期间完成，此时只读表一定已就绪
            None => f(self.sealed.get().unwrap_or(&*EMPTY_TABLE)),
        }
    }
}

static EMPTY_TABLE: Lazy<RegistrationTable> = Lazy::new(HashMap::new);

impl Default for CapabilityRegistryImpl {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for CapabilityRegistryImpl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CapabilityRegistryImpl")
            .field("capabilities", &self.len())
            .field("sealed", &self.is_sealed())
            .finish()
    }
}

impl CapabilityRegistry for CapabilityRegistryImpl {
    fn register(
        &self,
        id: CapabilityId,
        metadata: CapabilityMetadata,
        factory: CapabilityFactory,
    ) -> DependencyResult<()> {
        let mut open = self.open.lock();
        let Some(table) = open.as_mut() else {
            warn!("注册表已封存，拒绝注册: {}", id);
            return Err(DependencyError::RegistrySealed {
                capability: id.to_string(),
            });
        };

        if table.contains_key(&id) {
            warn!("能力重复注册: {}", id);
            return Err(DependencyError::DuplicateRegistration {
                capability: id.to_string(),
            });
        }

        info!("注册能力: {}", id);
        table.insert(id, CapabilityRegistration { metadata, factory });
        Ok(())
    }

    fn default_factory(&self, id: &CapabilityId) -> DependencyResult<CapabilityFactory> {
        self.with_table(|table| {
            table
                .get(id)
                .map(|registration| Arc::clone(&registration.factory))
                .ok_or_else(|| DependencyError::unknown(id.to_string()))
        })
    }

    fn is_registered(&self, id: &CapabilityId) -> bool {
        self.with_table(|table| table.contains_key(id))
    }

    fn registered_capabilities(&self) -> Vec<CapabilityMetadata> {
        let mut capabilities: Vec<CapabilityMetadata> = self.with_table(|table| {
            table
                .values()
                .map(|registration| registration.metadata.clone())
                .collect()
        });
        capabilities.sort_by(|a, b| a.name.cmp(&b.name));
        capabilities
    }

    fn seal(&self) {
        let mut open = self.open.lock();
        if let Some(table) = open.take() {
            let count = table.len();
            if self.sealed.set(table).is_err() {
                debug!("注册表已处于封存状态");
            }
            info!("注册表已封存，共 {} 个能力", count);
        }
    }

    fn is_sealed(&self) -> bool {
        self.sealed.get().is_some()
    }
}

/// 进程级能力注册表
static GLOBAL_CAPABILITY_REGISTRY: Lazy<Arc<CapabilityRegistryImpl>> =
    Lazy::new(|| Arc::new(CapabilityRegistryImpl::new()));

/// 获取进程级能力注册表
///
/// 在启动阶段完成全部注册，再由 [`Scope::root`](crate::Scope::root) 封存。
pub fn global_registry() -> Arc<CapabilityRegistryImpl> {
    Arc::clone(&GLOBAL_CAPABILITY_REGISTRY)
}
