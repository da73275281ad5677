//! 捕获引物流程 - 流程层
//!
//! 核心职责：定义"一条序列"的完整计算流程
//!
//! 流程顺序：
//! 1. 构建序列并计算统计信息
//! 2. 搜索捕获锚点（出错或为空即失败，不重试）
//! 3. 按锚点顺序构建引物对
//!
//! 本流程是同步的 CPU 计算，由编排层放到阻塞线程池中执行。

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::{AnalysisError, AppResult};
use crate::infrastructure::CancelToken;
use crate::models::{PrimerPair, WindowPolicy};
use crate::services::{build_primer_pair, AnchorParams, SequenceAnalyzer};
use crate::utils::truncate_text;
use crate::workflow::row_ctx::RowCtx;

/// 单行计算的成功产出
#[derive(Debug, Clone, PartialEq)]
pub struct CaptureOutcome {
    /// 规范化后的序列
    pub seq: String,
    pub pairs: Vec<PrimerPair>,
}

/// 捕获引物流程
///
/// - 编排分析 → 锚点 → 引物窗口
/// - 不持有任何共享可变状态
/// - 只依赖业务能力（services）
pub struct CaptureFlow {
    analyzer: Arc<dyn SequenceAnalyzer>,
    params: AnchorParams,
    window_policy: WindowPolicy,
}

impl CaptureFlow {
    /// 按本次运行的窗口长度创建流程
    pub fn new(analyzer: Arc<dyn SequenceAnalyzer>, total_length: usize, config: &Config) -> Self {
        Self {
            analyzer,
            params: AnchorParams {
                total_length,
                min_spacing: config.min_anchor_spacing,
            },
            window_policy: config.window_policy,
        }
    }

    pub fn run(
        &self,
        raw_seq: &str,
        ctx: &RowCtx,
        cancel: &CancelToken,
    ) -> AppResult<CaptureOutcome> {
        debug!("{} 原始序列: {}", ctx, truncate_text(raw_seq.trim(), 40));

        // ========== 步骤 1: 构建序列 + 统计 ==========
        let record = self.analyzer.analyze(&ctx.name, raw_seq)?;
        info!(
            "{} 序列长度 {}，窗口长度 {}",
            ctx,
            record.len(),
            self.params.total_length
        );

        if cancel.is_cancelled() {
            return Err(AnalysisError::Cancelled.into());
        }

        // ========== 步骤 2: 搜索锚点 ==========
        let anchors = self.analyzer.find_anchors(&record, &self.params, cancel)?;
        if anchors.is_empty() {
            warn!("{} 未找到捕获锚点", ctx);
            return Err(AnalysisError::NoAnchors {
                name: ctx.name.clone(),
            }
            .into());
        }

        // ========== 步骤 3: 构建引物对 ==========
        let pairs = anchors
            .iter()
            .enumerate()
            .map(|(i, anchor)| {
                build_primer_pair(
                    anchor,
                    self.params.total_length,
                    &record.seq,
                    i + 1,
                    self.window_policy,
                )
            })
            .collect::<Result<Vec<_>, _>>()?;

        info!("{} ✓ 生成 {} 对捕获引物", ctx, pairs.len());
        Ok(CaptureOutcome {
            seq: record.seq,
            pairs,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::models::CaptureAnchor;
    use crate::services::SequenceRecord;

    /// 返回固定锚点的分析器
    struct FixedAnchors(Vec<(usize, usize)>);

    impl SequenceAnalyzer for FixedAnchors {
        fn find_anchors(
            &self,
            record: &SequenceRecord,
            _params: &AnchorParams,
            _cancel: &CancelToken,
        ) -> Result<Vec<CaptureAnchor>, AnalysisError> {
            Ok(self
                .0
                .iter()
                .map(|&(s, e)| CaptureAnchor::new(record.name.clone(), s, e))
                .collect())
        }
    }

    fn flow(anchors: Vec<(usize, usize)>, policy: WindowPolicy) -> CaptureFlow {
        let config = Config {
            window_policy: policy,
            ..Config::default()
        };
        CaptureFlow::new(Arc::new(FixedAnchors(anchors)), 150, &config)
    }

    #[test]
    fn test_single_anchor_pair() {
        let seq = "ACGT".repeat(250);
        let out = flow(vec![(500, 520)], WindowPolicy::Fail)
            .run(&seq, &RowCtx::new(1, "TP53"), &CancelToken::never())
            .unwrap();
        assert_eq!(out.seq.len(), 1000);
        assert_eq!(out.pairs.len(), 1);
        let pair = &out.pairs[0];
        assert_eq!(pair.primer_5f.name, "TP53-5F-1");
        assert_eq!((pair.primer_5f.start, pair.primer_5f.end), (370, 520));
        assert_eq!(pair.primer_3r.name, "TP53-3R-1");
        assert_eq!((pair.primer_3r.start, pair.primer_3r.end), (500, 650));
    }

    #[test]
    fn test_two_anchors_keep_order() {
        let seq = "ACGT".repeat(250);
        let out = flow(vec![(700, 720), (300, 320)], WindowPolicy::Fail)
            .run(&seq, &RowCtx::new(1, "EGFR"), &CancelToken::never())
            .unwrap();
        assert_eq!(out.pairs[0].primer_3r.start, 700);
        assert_eq!(out.pairs[1].primer_3r.start, 300);
        assert_eq!(out.pairs[1].primer_5f.name, "EGFR-5F-2");
        assert_eq!(out.pairs[1].primer_3r.name, "EGFR-3R-2");
    }

    #[test]
    fn test_zero_anchors_fail() {
        let err = flow(Vec::new(), WindowPolicy::Fail)
            .run("ACGTACGT", &RowCtx::new(1, "g"), &CancelToken::never())
            .unwrap_err();
        assert!(matches!(err, AppError::Analysis(AnalysisError::NoAnchors { .. })));
    }

    #[test]
    fn test_out_of_range_window_fails_row() {
        let seq = "ACGT".repeat(50);
        let err = flow(vec![(10, 30)], WindowPolicy::Fail)
            .run(&seq, &RowCtx::new(1, "g"), &CancelToken::never())
            .unwrap_err();
        assert!(matches!(err, AppError::Window(_)));

        let out = flow(vec![(10, 30)], WindowPolicy::Clip)
            .run(&seq, &RowCtx::new(1, "g"), &CancelToken::never())
            .unwrap();
        assert_eq!(out.pairs[0].primer_5f.start, 0);
    }

    #[test]
    fn test_invalid_sequence_fails_before_search() {
        let err = flow(vec![(0, 10)], WindowPolicy::Fail)
            .run("", &RowCtx::new(1, "g"), &CancelToken::never())
            .unwrap_err();
        assert!(matches!(
            err,
            AppError::Analysis(AnalysisError::EmptySequence { .. })
        ));
    }
}
