//! 批量序列处理器 - 编排层
//!
//! ## 职责
//!
//! 本模块是整个计算的入口，负责批量序列的派发和结果汇总。
//!
//! ## 核心功能
//!
//! 1. **批量加载**：读取输入表格（`Vec<InputRow>`）
//! 2. **派发**：每行一个 tokio 任务，序号在派发时确定
//! 3. **并发控制**：使用 Semaphore 限制同时计算的行数
//! 4. **汇总**：从通道收齐所有结果，按序号恢复原始顺序
//! 5. **导出**：成功的行写入表格，完整报告写入 JSON
//!
//! ## 设计特点
//!
//! - **顶层编排**：不处理单条序列的细节
//! - **失败隔离**：单行失败只体现在该行的状态中
//! - **向下委托**：委托 row_processor 处理单行

use crate::config::Config;
use crate::error::AppResult;
use crate::infrastructure::CancelToken;
use crate::models::{load_table, AllResult, InputRow, RowResult, Status};
use crate::orchestrator::row_processor::RowWorker;
use crate::services::{GcWindowAnalyzer, ResultWriter, SequenceAnalyzer};
use crate::utils::logging::log_rows_loaded;
use crate::workflow::CaptureFlow;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

/// 应用主结构
pub struct App {
    config: Config,
    analyzer: Arc<dyn SequenceAnalyzer>,
    writer: ResultWriter,
}

impl App {
    /// 使用指定的分析器创建应用
    pub fn new(config: Config, analyzer: Arc<dyn SequenceAnalyzer>) -> Self {
        Self {
            config,
            analyzer,
            writer: ResultWriter::new(),
        }
    }

    /// 使用内置的 GC 窗口分析器创建应用
    pub fn with_reference_analyzer(config: Config) -> Self {
        let analyzer = Arc::new(GcWindowAnalyzer::from_config(&config));
        Self::new(config, analyzer)
    }

    /// 读取表格并计算所有序列
    ///
    /// 表格无法读取时返回错误，且不会派发任何任务。
    pub async fn run_capture(&self, path: &Path, total_length: usize) -> AppResult<AllResult> {
        self.run_capture_with_cancel(path, total_length, CancelToken::never())
            .await
    }

    /// 同 `run_capture`，可由外部取消
    pub async fn run_capture_with_cancel(
        &self,
        path: &Path,
        total_length: usize,
        cancel: CancelToken,
    ) -> AppResult<AllResult> {
        info!("\n📁 正在读取输入表格: {}", path.display());
        let rows = match load_table(path).await {
            Ok(rows) => rows,
            Err(e) => {
                error!("❌ 读取表格失败: {}", e);
                return Err(e.into());
            }
        };
        log_rows_loaded(&path.display().to_string(), rows.len());

        Ok(self.run_rows(rows, total_length, cancel).await)
    }

    /// 计算已加载的行
    pub async fn run_rows(
        &self,
        rows: Vec<InputRow>,
        total_length: usize,
        cancel: CancelToken,
    ) -> AllResult {
        let flow = Arc::new(CaptureFlow::new(
            self.analyzer.clone(),
            total_length,
            &self.config,
        ));
        let dispatch = self.dispatch(rows, flow, cancel);
        aggregate(dispatch).await
    }

    /// 每行派发一个任务，全部启动后立即返回
    fn dispatch(
        &self,
        rows: Vec<InputRow>,
        flow: Arc<CaptureFlow>,
        cancel: CancelToken,
    ) -> Dispatch {
        let (tx, rx) = mpsc::unbounded_channel();
        let permits = Arc::new(Semaphore::new(self.config.max_concurrent_rows));
        let worker = RowWorker::new(flow, permits, cancel, self.config.row_timeout(), tx);

        let handles: Vec<_> = rows
            .into_iter()
            .enumerate()
            .map(|(i, row)| {
                let index = i + 1;
                debug!("[行 {}] 派发: {}", index, row.gene_name());
                tokio::spawn(worker.clone().process(index, row))
            })
            .collect();

        // 释放最后一个发送端：所有任务结束后通道关闭
        drop(worker);

        info!("🚀 已派发 {} 个任务", handles.len());
        Dispatch {
            dispatched: handles.len(),
            handles,
            rx,
        }
    }

    /// 导出成功的行，返回实际写入路径
    pub async fn save_rows(&self, all: &AllResult, path: &Path) -> AppResult<PathBuf> {
        Ok(self.writer.write_table(all, path).await?)
    }

    /// 导出完整 JSON 报告
    pub async fn save_report(&self, all: &AllResult, path: &Path) -> AppResult<()> {
        self.writer.write_json(all, path).await
    }
}

/// 派发结果：任务句柄和汇总通道的接收端
struct Dispatch {
    dispatched: usize,
    handles: Vec<JoinHandle<()>>,
    rx: UnboundedReceiver<RowResult>,
}

/// 收齐所有结果后计算整体状态并按序号排序
async fn aggregate(dispatch: Dispatch) -> AllResult {
    let Dispatch {
        dispatched,
        handles,
        mut rx,
    } = dispatch;

    let mut received = Vec::with_capacity(dispatched);
    while received.len() < dispatched {
        match rx.recv().await {
            Some(result) => received.push(result),
            None => break,
        }
    }

    // 等待所有任务退出，不留悬挂任务
    for (i, joined) in futures::future::join_all(handles)
        .await
        .into_iter()
        .enumerate()
    {
        if let Err(e) = joined {
            error!("[行 {}] 任务执行失败: {}", i + 1, e);
        }
    }

    let mut all = AllResult::from_unordered(received);
    if all.results.len() != dispatched {
        error!(
            "结果数量不符: 派发 {} 个，收到 {} 个",
            dispatched,
            all.results.len()
        );
        all.status = Status::Fail;
    }
    info!(
        "✓ 汇总完成: 成功 {}/{}",
        all.success_count(),
        all.results.len()
    );
    all
}
