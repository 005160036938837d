//! 能力标识
//!
//! 能力按稳定的字符串标识索引，不依赖运行时类型信息

use infrastructure_common::DependencyError;
use std::any::Any;
use std::borrow::Cow;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

/// 能力实例
pub type Capability = Arc<dyn Any + Send + Sync>;

/// 能力标识
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CapabilityId(Cow<'static, str>);

impl CapabilityId {
    /// 从静态字符串创建标识
    pub const fn from_static(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }

    /// 从运行时字符串创建标识
    pub fn new(name: impl Into<String>) -> Self {
        Self(Cow::Owned(name.into()))
    }

    /// 标识字符串
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CapabilityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&'static str> for CapabilityId {
    fn from(name: &'static str) -> Self {
        Self::from_static(name)
    }
}

impl From<String> for CapabilityId {
    fn from(name: String) -> Self {
        Self::new(name)
    }
}

/// 带类型的能力键
///
/// 通常声明为常量：
///
/// ```ignore
/// pub const NAMES_CLIENT: CapabilityKey<NamesClient> = CapabilityKey::new("names_client");
/// ```
pub struct CapabilityKey<T> {
    id: CapabilityId,
    _marker: PhantomData<fn() -> T>,
}

impl<T> CapabilityKey<T> {
    /// 创建能力键
    pub const fn new(name: &'static str) -> Self {
        Self {
            id: CapabilityId::from_static(name),
            _marker: PhantomData,
        }
    }

    /// 能力标识
    pub fn id(&self) -> &CapabilityId {
        &self.id
    }
}

impl<T: Send + Sync + 'static> CapabilityKey<T> {
    /// 将解析结果还原为具体类型
    pub fn downcast(&self, capability: Capability) -> Result<Arc<T>, DependencyError> {
        capability
            .downcast::<T>()
            .map_err(|_| DependencyError::TypeMismatch {
                capability: self.id.to_string(),
                expected: std::any::type_name::<T>(),
            })
    }
}

impl<T> Clone for CapabilityKey<T> {
    fn clone(&self) -> Self {
        Self {
            id: self.id.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T> fmt::Debug for CapabilityKey<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CapabilityKey")
            .field("id", &self.id)
            .field("type", &std::any::type_name::<T>())
            .finish()
    }
}
