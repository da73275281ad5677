//! 结果发送器 - 基础设施层
//!
//! 持有汇总通道的发送端，只暴露"修改本行结果"的能力。
//! 结果在 `Drop` 时发送，任何退出路径（正常返回、提前返回、panic 展开）
//! 都恰好发送一次。

use crate::models::{PrimerPair, RowResult, Status};
use tokio::sync::mpsc::UnboundedSender;
use tracing::error;

/// 单行结果发送器
///
/// 职责：
/// - 持有本行唯一的 `RowResult`
/// - 离开作用域时发送到汇总通道
/// - 不认识其他行
pub struct ResultEmitter {
    tx: UnboundedSender<RowResult>,
    result: Option<RowResult>,
}

impl ResultEmitter {
    /// 创建发送器，初始结果为失败
    pub fn new(tx: UnboundedSender<RowResult>, index: usize, name: impl Into<String>) -> Self {
        Self {
            tx,
            result: Some(RowResult::pending(index, name)),
        }
    }

    /// 标记成功
    pub fn succeed(&mut self, seq: String, pairs: Vec<PrimerPair>) {
        if let Some(result) = self.result.as_mut() {
            result.status = Status::Success;
            result.seq = seq;
            result.capture_primers = pairs;
            result.error = None;
        }
    }

    /// 标记失败，清空已有的引物对
    pub fn fail(&mut self, reason: impl std::fmt::Display) {
        if let Some(result) = self.result.as_mut() {
            result.status = Status::Fail;
            result.capture_primers.clear();
            result.error = Some(reason.to_string());
        }
    }
}

impl Drop for ResultEmitter {
    fn drop(&mut self) {
        if let Some(result) = self.result.take() {
            let index = result.index;
            if self.tx.send(result).is_err() {
                error!("[行 {}] 汇总通道已关闭，结果丢失", index);
            }
        }
    }
}
