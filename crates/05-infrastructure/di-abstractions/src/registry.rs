//! 能力注册表抽象接口

use crate::capability::CapabilityId;
use crate::factory::CapabilityFactory;
use infrastructure_common::{CapabilityMetadata, DependencyError};

/// 注册表阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegistryPhase {
    /// 注册阶段，单线程启动期
    Open,
    /// 已封存，只读
    Sealed,
}

/// 能力注册表 trait
///
/// 保存每个能力的默认（live）工厂。注册只允许发生在封存之前。
pub trait CapabilityRegistry: Send + Sync {
    /// 注册默认工厂
    fn register(
        &self,
        id: CapabilityId,
        metadata: CapabilityMetadata,
        factory: CapabilityFactory,
    ) -> Result<(), DependencyError>;

    /// 获取默认工厂
    fn default_factory(&self, id: &CapabilityId) -> Result<CapabilityFactory, DependencyError>;

    /// 检查能力是否已注册
    fn is_registered(&self, id: &CapabilityId) -> bool;

    /// 获取所有已注册能力的元数据，按标识排序
    fn registered_capabilities(&self) -> Vec<CapabilityMetadata>;

    /// 封存注册表，之后只读
    fn seal(&self);

    /// 是否已封存
    fn is_sealed(&self) -> bool;

    /// 当前阶段
    fn phase(&self) -> RegistryPhase {
        if self.is_sealed() {
            RegistryPhase::Sealed
        } else {
            RegistryPhase::Open
        }
    }
}
