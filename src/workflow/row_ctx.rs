//! 单行处理上下文
//!
//! 封装"我正在处理第几行、哪个基因"这一信息

use std::fmt::Display;

/// 单行处理上下文
#[derive(Debug, Clone)]
pub struct RowCtx {
    /// 行序号（从 1 开始，派发时确定）
    pub index: usize,

    /// 基因名称
    pub name: String,
}

impl RowCtx {
    pub fn new(index: usize, name: impl Into<String>) -> Self {
        Self {
            index,
            name: name.into(),
        }
    }
}

impl Display for RowCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[行 {} 基因 {}]", self.index, self.name)
    }
}
