//! 序列分析服务 - 业务能力层
//!
//! 只负责"分析一条序列、给出捕获锚点"的能力，不关心批次和顺序。
//!
//! `SequenceAnalyzer` 是可替换的接缝：流程层只依赖这个 trait。
//! `GcWindowAnalyzer` 是随程序提供的参考实现：在序列上滑动固定长度窗口，
//! 选取 GC 含量落在区间内、且两侧引物窗口都能放下的位置作为锚点。

use crate::config::Config;
use crate::error::AnalysisError;
use crate::infrastructure::CancelToken;
use crate::models::CaptureAnchor;
use regex::Regex;
use std::sync::OnceLock;
use tracing::debug;

/// 允许的碱基字符（IUPAC DNA）
const IUPAC_DNA: &[u8] = b"ACGTNRYSWKMBDHV";

/// 每扫描多少个位置检查一次取消信号
const CANCEL_CHECK_INTERVAL: usize = 1024;

fn noise_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[\s\d]+").expect("静态正则"))
}

/// 序列统计信息
#[derive(Debug, Clone, PartialEq)]
pub struct SequenceStats {
    pub length: usize,
    pub gc_count: usize,
    pub ambiguous_count: usize,
    pub gc_content: f64,
    gc_prefix: Vec<u32>,
    ambiguous_prefix: Vec<u32>,
}

impl SequenceStats {
    pub fn calculate(seq: &str) -> Self {
        let bytes = seq.as_bytes();
        let mut gc_prefix = Vec::with_capacity(bytes.len() + 1);
        let mut ambiguous_prefix = Vec::with_capacity(bytes.len() + 1);
        let (mut gc, mut amb) = (0u32, 0u32);
        gc_prefix.push(0);
        ambiguous_prefix.push(0);
        for &b in bytes {
            match b {
                b'G' | b'C' => gc += 1,
                b'A' | b'T' => {}
                // S = G/C，计入 GC 但仍是简并碱基
                b'S' => {
                    gc += 1;
                    amb += 1;
                }
                _ => amb += 1,
            }
            gc_prefix.push(gc);
            ambiguous_prefix.push(amb);
        }
        let length = bytes.len();
        Self {
            length,
            gc_count: gc as usize,
            ambiguous_count: amb as usize,
            gc_content: if length == 0 { 0.0 } else { gc as f64 / length as f64 },
            gc_prefix,
            ambiguous_prefix,
        }
    }

    /// `[start, end)` 内的 G/C 数量
    pub fn gc_in(&self, start: usize, end: usize) -> usize {
        (self.gc_prefix[end] - self.gc_prefix[start]) as usize
    }

    /// `[start, end)` 内的简并碱基数量
    pub fn ambiguous_in(&self, start: usize, end: usize) -> usize {
        (self.ambiguous_prefix[end] - self.ambiguous_prefix[start]) as usize
    }
}

/// 待分析的序列
#[derive(Debug, Clone, PartialEq)]
pub struct SequenceRecord {
    pub name: String,
    /// 规范化后的序列（大写、无空白和数字）
    pub seq: String,
    stats: Option<SequenceStats>,
}

impl SequenceRecord {
    /// 从原始文本构建序列
    ///
    /// 去掉 FASTA 标题行、空白和数字，转为大写后校验字符。
    pub fn new(name: &str, raw: &str) -> Result<Self, AnalysisError> {
        let body = if raw.trim_start().starts_with('>') {
            raw.trim_start().split_once('\n').map(|(_, rest)| rest).unwrap_or("")
        } else {
            raw
        };
        let seq = noise_pattern().replace_all(body, "").to_ascii_uppercase();

        if seq.is_empty() {
            return Err(AnalysisError::EmptySequence {
                name: name.to_string(),
            });
        }
        if let Some((position, found)) = seq
            .char_indices()
            .find(|(_, c)| !c.is_ascii() || !IUPAC_DNA.contains(&(*c as u8)))
        {
            return Err(AnalysisError::InvalidSequence {
                name: name.to_string(),
                position,
                found,
            });
        }

        Ok(Self {
            name: name.to_string(),
            seq,
            stats: None,
        })
    }

    pub fn len(&self) -> usize {
        self.seq.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seq.is_empty()
    }

    pub fn calculate_stats(&mut self) {
        self.stats = Some(SequenceStats::calculate(&self.seq));
    }

    pub fn stats(&self) -> Option<&SequenceStats> {
        self.stats.as_ref()
    }
}

/// 锚点搜索参数
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnchorParams {
    pub total_length: usize,
    pub min_spacing: usize,
}

/// 序列分析能力
///
/// 实现必须是无状态或内部同步的：同一个实例会被多个工作任务并发调用。
pub trait SequenceAnalyzer: Send + Sync {
    /// 构建序列并计算统计信息
    fn analyze(&self, name: &str, raw: &str) -> Result<SequenceRecord, AnalysisError> {
        let mut record = SequenceRecord::new(name, raw)?;
        record.calculate_stats();
        Ok(record)
    }

    /// 搜索捕获锚点，按发现顺序返回
    fn find_anchors(
        &self,
        record: &SequenceRecord,
        params: &AnchorParams,
        cancel: &CancelToken,
    ) -> Result<Vec<CaptureAnchor>, AnalysisError>;
}

/// GC 平衡窗口分析器（参考实现）
#[derive(Debug, Clone)]
pub struct GcWindowAnalyzer {
    anchor_length: usize,
    gc_min: f64,
    gc_max: f64,
}

impl GcWindowAnalyzer {
    pub fn new(anchor_length: usize, gc_min: f64, gc_max: f64) -> Self {
        Self {
            anchor_length: anchor_length.max(1),
            gc_min,
            gc_max,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.anchor_length, config.gc_min, config.gc_max)
    }
}

impl SequenceAnalyzer for GcWindowAnalyzer {
    fn find_anchors(
        &self,
        record: &SequenceRecord,
        params: &AnchorParams,
        cancel: &CancelToken,
    ) -> Result<Vec<CaptureAnchor>, AnalysisError> {
        let stats = record.stats().ok_or_else(|| AnalysisError::MissingStats {
            name: record.name.clone(),
        })?;
        let width = self.anchor_length;

        // 5F 窗口 [end - L, end) 要求 end >= L；3R 窗口 [start, start + L) 要求 start + L <= len
        let min_start = params.total_length.saturating_sub(width);
        let Some(max_start) = record.len().checked_sub(params.total_length.max(width)) else {
            debug!("序列 {} 长度 {} 不足以放下引物窗口", record.name, record.len());
            return Ok(Vec::new());
        };

        let mut anchors = Vec::new();
        let mut start = min_start;
        let mut steps = 0usize;
        while start <= max_start {
            if steps % CANCEL_CHECK_INTERVAL == 0 && cancel.is_cancelled() {
                return Err(AnalysisError::Cancelled);
            }
            steps += 1;

            let end = start + width;
            if stats.ambiguous_in(start, end) == 0 {
                let gc = stats.gc_in(start, end) as f64 / width as f64;
                if gc >= self.gc_min && gc <= self.gc_max {
                    anchors.push(CaptureAnchor::new(record.name.clone(), start, end));
                    start = end + params.min_spacing;
                    continue;
                }
            }
            start += 1;
        }

        debug!("序列 {} 找到 {} 个锚点", record.name, anchors.len());
        Ok(anchors)
    }
}
