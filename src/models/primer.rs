use serde::{Deserialize, Serialize};

/// 捕获锚点：序列内的半开区间 `[start, end)`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureAnchor {
    pub name: String,
    pub start: usize,
    pub end: usize,
}

impl CaptureAnchor {
    pub fn new(name: impl Into<String>, start: usize, end: usize) -> Self {
        Self {
            name: name.into(),
            start,
            end,
        }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// 引物：模板序列上的一个命名窗口
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Primer {
    pub name: String,
    pub start: usize,
    pub end: usize,
    pub seq: String,
    pub length: usize,
}

impl Primer {
    /// 截取模板 `[start, end)`，越界时返回 None
    pub fn from_template(
        name: impl Into<String>,
        template: &str,
        start: usize,
        end: usize,
    ) -> Option<Self> {
        let seq = template.get(start..end)?.to_string();
        Some(Self {
            name: name.into(),
            start,
            end,
            length: end - start,
            seq,
        })
    }
}

/// 引物对：同一锚点派生的 5F 和 3R 引物
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrimerPair {
    #[serde(rename = "primer5F")]
    pub primer_5f: Primer,
    #[serde(rename = "primer3R")]
    pub primer_3r: Primer,
}

/// 引物窗口越界策略
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WindowPolicy {
    /// 越界即失败
    #[default]
    Fail,
    /// 截断到序列范围内
    Clip,
}

impl std::str::FromStr for WindowPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fail" => Ok(WindowPolicy::Fail),
            "clip" => Ok(WindowPolicy::Clip),
            other => Err(format!("未知的窗口策略: {}", other)),
        }
    }
}
