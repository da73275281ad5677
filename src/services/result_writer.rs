//! 结果导出服务 - 业务能力层
//!
//! 只负责"把结果写成表格 / JSON"能力，不关心流程

use crate::error::{AppError, TableError};
use crate::models::{delimiter_for, AllResult};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

/// 导出表格的默认扩展名
const DEFAULT_EXTENSION: &str = "csv";

/// 结果导出服务
///
/// 职责：
/// - 导出两列表格（name, seq），只包含成功的行
/// - 导出完整的 JSON 报告
/// - 写入失败不影响已计算的结果
pub struct ResultWriter;

impl ResultWriter {
    pub fn new() -> Self {
        Self
    }

    /// 补全扩展名：不是支持的表格扩展名时追加默认扩展名
    pub fn resolve_path(&self, path: &Path) -> PathBuf {
        let supported = path
            .extension()
            .and_then(|s| s.to_str())
            .map(|ext| {
                let ext = ext.to_ascii_lowercase();
                matches!(ext.as_str(), "csv" | "tsv" | "txt")
            })
            .unwrap_or(false);
        if supported {
            path.to_path_buf()
        } else {
            let mut os = path.as_os_str().to_owned();
            os.push(".");
            os.push(DEFAULT_EXTENSION);
            PathBuf::from(os)
        }
    }

    /// 导出成功行，返回实际写入的路径
    pub async fn write_table(&self, all: &AllResult, path: &Path) -> Result<PathBuf, TableError> {
        let path = self.resolve_path(path);
        let path_str = path.display().to_string();

        let mut writer = csv::WriterBuilder::new()
            .delimiter(delimiter_for(&path))
            .from_writer(Vec::new());
        writer
            .write_record(["name", "seq"])
            .map_err(|e| TableError::write_failed(&path_str, e))?;
        for result in all.successful() {
            writer
                .write_record([result.name.as_str(), result.seq.as_str()])
                .map_err(|e| TableError::write_failed(&path_str, e))?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|e| TableError::write_failed(&path_str, e.into_error()))?;

        debug!("写入 {} 字节到 {}", bytes.len(), path_str);
        fs::write(&path, bytes)
            .await
            .map_err(|e| TableError::write_failed(&path_str, e))?;

        info!("💾 已保存 {} 行到 {}", all.success_count(), path_str);
        Ok(path)
    }

    /// 导出完整报告（包括失败行和引物对）
    pub async fn write_json(&self, all: &AllResult, path: &Path) -> Result<(), AppError> {
        let json = serde_json::to_vec_pretty(all)?;
        fs::write(path, json)
            .await
            .map_err(|e| TableError::write_failed(path.display().to_string(), e))?;
        info!("💾 已保存 JSON 报告到 {}", path.display());
        Ok(())
    }
}

impl Default for ResultWriter {
    fn default() -> Self {
        Self::new()
    }
}
