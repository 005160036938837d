//! 解析上下文
//!
//! 记录单次解析的进行中能力链，用于检测循环依赖和限制嵌套深度

use crate::capability::CapabilityId;
use infrastructure_common::DependencyError;

/// 解析上下文
#[derive(Debug, Clone, Default)]
pub struct ResolveContext {
    /// 当前解析链，用于检测循环依赖
    pub resolution_chain: Vec<CapabilityId>,
    /// 解析选项
    pub options: ResolveOptions,
}

impl ResolveContext {
    /// 创建新的解析上下文
    pub fn new(options: ResolveOptions) -> Self {
        Self {
            resolution_chain: Vec::new(),
            options,
        }
    }

    /// 添加能力到解析链
    ///
    /// 已在链上的能力报告循环；链长达到 `max_depth` 时报告深度超限。
    pub fn push(&mut self, id: &CapabilityId) -> Result<(), DependencyError> {
        if self.resolution_chain.contains(id) {
            let chain = self
                .resolution_chain
                .iter()
                .map(CapabilityId::as_str)
                .chain(std::iter::once(id.as_str()))
                .collect::<Vec<_>>()
                .join(" -> ");
            return Err(DependencyError::CyclicResolution {
                dependency_chain: chain,
            });
        }
        if self.resolution_chain.len() >= self.options.max_depth {
            return Err(DependencyError::ResolutionDepthExceeded {
                capability: id.to_string(),
                max_depth: self.options.max_depth,
            });
        }
        tracing::trace!(capability = %id, depth = self.resolution_chain.len() + 1, "进入解析");
        self.resolution_chain.push(id.clone());
        Ok(())
    }

    /// 从解析链中移除最近的能力
    pub fn pop(&mut self) {
        self.resolution_chain.pop();
    }

    /// 当前深度
    pub fn depth(&self) -> usize {
        self.resolution_chain.len()
    }
}

/// 解析选项
#[derive(Debug, Clone)]
pub struct ResolveOptions {
    /// 最大嵌套深度
    ///
    /// 深度检查先于循环闭合发生：长度超过该值的循环在回到起点之前就会以
    /// [`DependencyError::ResolutionDepthExceeded`] 结束，而不是
    /// [`DependencyError::CyclicResolution`]。两者都会终止解析。
    pub max_depth: usize,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self { max_depth: 100 }
    }
}
