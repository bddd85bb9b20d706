//! 组件处理上下文
//!
//! 封装"我正在处理第几个组件"这一信息，只用于日志

use std::fmt::Display;

/// 组件处理上下文
#[derive(Debug, Clone)]
pub struct ItemCtx {
    /// 组件ID
    pub item_id: String,

    /// 组件在整个列表中的下标（从0开始）
    pub index: usize,

    /// 组件总数
    pub total: usize,
}

impl ItemCtx {
    pub fn new(item_id: impl Into<String>, index: usize, total: usize) -> Self {
        Self {
            item_id: item_id.into(),
            index,
            total,
        }
    }
}

impl Display for ItemCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[组件 {}/{} #{}]", self.index + 1, self.total, self.item_id)
    }
}
