//! 元数据定义
//!
//! 提供已注册能力的描述信息

/// 能力元数据
#[derive(Debug, Clone)]
pub struct CapabilityMetadata {
    /// 能力标识
    pub name: String,
    /// 能力描述
    pub description: Option<String>,
    /// 值类型名称（仅用于诊断）
    pub type_name: Option<&'static str>,
    /// 注册时间
    pub registered_at: chrono::DateTime<chrono::Utc>,
}

impl CapabilityMetadata {
    /// 创建新的能力元数据
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            type_name: None,
            registered_at: chrono::Utc::now(),
        }
    }

    /// 设置描述
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// 记录值类型
    pub fn with_type<T: ?Sized + 'static>(mut self) -> Self {
        self.type_name = Some(std::any::type_name::<T>());
        self
    }

    /// 获取简短的类型名称（不包含模块路径）
    pub fn short_type_name(&self) -> Option<&str> {
        self.type_name
            .map(|name| name.rsplit("::").next().unwrap_or(name))
    }
}
