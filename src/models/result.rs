use crate::models::primer::PrimerPair;
use serde::{Deserialize, Serialize};

/// 处理状态
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    #[default]
    Fail,
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Status::Success => write!(f, "success"),
            Status::Fail => write!(f, "fail"),
        }
    }
}

/// 单行处理结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowResult {
    /// 序号（从 1 开始，派发时确定）
    pub index: usize,
    pub status: Status,
    pub name: String,
    pub seq: String,
    #[serde(rename = "capturePrimers")]
    pub capture_primers: Vec<PrimerPair>,
    /// 失败原因
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RowResult {
    /// 创建初始结果，默认状态为失败
    pub fn pending(index: usize, name: impl Into<String>) -> Self {
        Self {
            index,
            status: Status::Fail,
            name: name.into(),
            seq: String::new(),
            capture_primers: Vec::new(),
            error: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == Status::Success
    }
}

/// 整批汇总结果
///
/// 默认值为失败且结果为空，用于表格无法读取的情况。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AllResult {
    pub status: Status,
    pub results: Vec<RowResult>,
}

impl AllResult {
    /// 汇总乱序到达的结果：计算整体状态并按序号稳定排序
    pub fn from_unordered(mut results: Vec<RowResult>) -> Self {
        let status = if results.iter().all(RowResult::is_success) {
            Status::Success
        } else {
            Status::Fail
        };
        results.sort_by_key(|r| r.index);
        Self { status, results }
    }

    pub fn is_success(&self) -> bool {
        self.status == Status::Success
    }

    pub fn success_count(&self) -> usize {
        self.results.iter().filter(|r| r.is_success()).count()
    }

    pub fn pair_count(&self) -> usize {
        self.results.iter().map(|r| r.capture_primers.len()).sum()
    }

    /// 成功的行（导出表格使用）
    pub fn successful(&self) -> impl Iterator<Item = &RowResult> {
        self.results.iter().filter(|r| r.is_success())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ok(index: usize) -> RowResult {
        RowResult {
            status: Status::Success,
            ..RowResult::pending(index, format!("g{}", index))
        }
    }

    #[test]
    fn test_from_unordered_sorts_and_keeps_failures() {
        let all = AllResult::from_unordered(vec![ok(3), RowResult::pending(1, "g1"), ok(2)]);
        let indices: Vec<_> = all.results.iter().map(|r| r.index).collect();
        assert_eq!(indices, vec![1, 2, 3]);
        assert_eq!(all.status, Status::Fail);
        assert_eq!(all.success_count(), 2);
    }

    #[test]
    fn test_all_success() {
        let all = AllResult::from_unordered(vec![ok(2), ok(1)]);
        assert!(all.is_success());
    }

    #[test]
    fn test_default_is_failed_and_empty() {
        let all = AllResult::default();
        assert_eq!(all.status, Status::Fail);
        assert!(all.results.is_empty());
    }

    #[test]
    fn test_status_json() {
        let json = serde_json::to_string(&ok(1)).unwrap();
        assert!(json.contains("\"status\":\"success\""));
        assert!(json.contains("\"capturePrimers\":[]"));
        assert!(!json.contains("\"error\""));
    }
}
