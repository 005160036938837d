//! 容器构建器

use crate::container::DependencyContainer;
use crate::settings::{ContainerSettings, LoggingConfig};
use di_abstractions::{
    erase_factory, value_factory, CapabilityFactory, CapabilityId, CapabilityKey, Resolve,
};
use di_impl::{global_registry, CapabilityRegistryImpl, Resolver, Scope};
use infrastructure_common::{
    CapabilityMetadata, DependencyResult, InfrastructureError, InfrastructureResult,
};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

/// 待注册的默认实现
struct PendingRegistration {
    id: CapabilityId,
    metadata: CapabilityMetadata,
    factory: CapabilityFactory,
}

/// 容器构建器
///
/// 收集配置和默认实现，在 [`build`](Self::build) 时一次性注册并封存注册表。
pub struct ContainerBuilder {
    /// 容器配置
    settings: ContainerSettings,
    /// 目标注册表
    registry: Arc<CapabilityRegistryImpl>,
    /// 待注册的默认实现
    pending: Vec<PendingRegistration>,
    /// 环境变量前缀
    env_prefix: Option<String>,
    /// 是否启用日志初始化
    logging_enabled: bool,
}

impl ContainerBuilder {
    /// 创建新的容器构建器，使用独立的注册表
    pub fn new() -> Self {
        Self {
            settings: ContainerSettings::default(),
            registry: Arc::new(CapabilityRegistryImpl::new()),
            pending: Vec::new(),
            env_prefix: None,
            logging_enabled: false, // 默认不启用日志初始化
        }
    }

    /// 改为向进程级注册表注册
    pub fn use_global_registry(mut self) -> Self {
        debug!("使用进程级注册表");
        self.registry = global_registry();
        self
    }

    /// 替换容器配置
    pub fn with_settings(mut self, settings: ContainerSettings) -> Self {
        self.settings = settings;
        self
    }

    /// 从配置文件加载容器配置
    pub fn add_settings_file<P: AsRef<Path>>(mut self, path: P) -> InfrastructureResult<Self> {
        let path = path.as_ref();
        info!("加载容器配置文件: {}", path.display());
        self.settings = ContainerSettings::from_file(path)?;
        Ok(self)
    }

    /// 构建时应用环境变量覆盖
    pub fn with_env_overrides<S: Into<String>>(mut self, prefix: S) -> Self {
        let prefix = prefix.into();
        info!("添加环境变量配置源，前缀: {}", prefix);
        self.env_prefix = Some(prefix);
        self
    }

    /// 配置日志并在构建时初始化
    pub fn with_logging(mut self, config: LoggingConfig) -> Self {
        self.settings.logging = config;
        self.logging_enabled = true;
        self
    }

    /// 按已加载的配置在构建时初始化日志
    pub fn enable_logging(mut self, enabled: bool) -> Self {
        self.logging_enabled = enabled;
        self
    }

    /// 注册固定实例作为默认实现
    pub fn register_value<T: Send + Sync + 'static>(
        mut self,
        key: &CapabilityKey<T>,
        value: T,
    ) -> Self {
        self.push::<T>(key, None, value_factory(value));
        self
    }

    /// 注册工厂作为默认实现
    pub fn register_factory<T, F>(mut self, key: &CapabilityKey<T>, factory: F) -> Self
    where
        T: Send + Sync + 'static,
        F: Fn(&mut dyn Resolve) -> DependencyResult<T> + Send + Sync + 'static,
    {
        self.push::<T>(key, None, erase_factory(factory));
        self
    }

    /// 注册带描述的工厂作为默认实现
    pub fn register_described<T, F>(
        mut self,
        key: &CapabilityKey<T>,
        description: impl Into<String>,
        factory: F,
    ) -> Self
    where
        T: Send + Sync + 'static,
        F: Fn(&mut dyn Resolve) -> DependencyResult<T> + Send + Sync + 'static,
    {
        self.push::<T>(key, Some(description.into()), erase_factory(factory));
        self
    }

    fn push<T: 'static>(
        &mut self,
        key: &CapabilityKey<T>,
        description: Option<String>,
        factory: CapabilityFactory,
    ) {
        let mut metadata = CapabilityMetadata::new(key.id().as_str()).with_type::<T>();
        if let Some(description) = description {
            metadata = metadata.with_description(description);
        }
        self.pending.push(PendingRegistration {
            id: key.id().clone(),
            metadata,
            factory,
        });
    }

    /// 构建容器
    pub fn build(mut self) -> InfrastructureResult<DependencyContainer> {
        info!("开始构建依赖容器");

        if let Some(prefix) = &self.env_prefix {
            self.settings.apply_env_overrides(prefix)?;
        }
        self.settings.validate()?;

        // 只有在明确配置了日志时才初始化日志
        // 避免在测试环境中重复初始化
        if self.logging_enabled {
            initialize_logging(&self.settings.logging)?;
        }

        // 整批注册，失败时目标注册表保持原样
        let registration_count = self.registry.register_all(
            self.pending
                .into_iter()
                .map(|pending| (pending.id, pending.metadata, pending.factory)),
        )?;

        let root = Scope::root(self.registry.clone());
        let resolver = Resolver::new(self.settings.resolve_options());

        info!("依赖容器构建完成，注册了 {} 个能力", registration_count);
        Ok(DependencyContainer::new(
            self.registry,
            resolver,
            root,
            self.settings,
        ))
    }
}

impl Default for ContainerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// 初始化日志系统
fn initialize_logging(config: &LoggingConfig) -> InfrastructureResult<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(config.env_filter()?)
        .with_target(config.show_target)
        .with_thread_ids(config.show_thread_ids)
        .with_file(config.show_file)
        .with_line_number(config.show_line_number);

    if config.json_format {
        subscriber.json().try_init()
    } else {
        subscriber.try_init()
    }
    .map_err(|e| InfrastructureError::BootstrapFailed {
        message: format!("日志初始化失败: {}", e),
    })?;

    info!("日志系统初始化完成");
    Ok(())
}
