//! 单行处理器 - 编排层
//!
//! ## 职责
//!
//! 把一行输入的完整计算包装成一个隔离的工作单元，无论结果如何都恰好发出一个结果。
//!
//! ## 核心功能
//!
//! 1. **结果保证**：`ResultEmitter` 在任何退出路径上发送结果
//! 2. **并发限制**：先从工作池（Semaphore）取得许可再计算
//! 3. **阻塞隔离**：CPU 计算放到 `spawn_blocking`，panic 转为失败结果
//! 4. **超时与取消**：超时或整次运行取消时本行立即失败，并通知分析器停止；
//!    许可由阻塞计算持有，直到计算真正结束才归还

use crate::error::AnalysisError;
use crate::infrastructure::{CancelToken, ResultEmitter};
use crate::models::{InputRow, RowResult};
use crate::workflow::{CaptureFlow, RowCtx};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;
use tokio::sync::Semaphore;
use tracing::{debug, error, warn};

/// 单行工作者
///
/// 每个任务持有一份克隆；字段都是共享只读的句柄，行与行之间没有可变共享状态。
#[derive(Clone)]
pub struct RowWorker {
    flow: Arc<CaptureFlow>,
    permits: Arc<Semaphore>,
    cancel: CancelToken,
    timeout: Option<Duration>,
    tx: UnboundedSender<RowResult>,
}

impl RowWorker {
    pub fn new(
        flow: Arc<CaptureFlow>,
        permits: Arc<Semaphore>,
        cancel: CancelToken,
        timeout: Option<Duration>,
        tx: UnboundedSender<RowResult>,
    ) -> Self {
        Self {
            flow,
            permits,
            cancel,
            timeout,
            tx,
        }
    }

    /// 处理一行，结果通过汇总通道发出
    ///
    /// # 参数
    /// - `index`: 行序号（从 1 开始）
    /// - `row`: 本行数据（所有权移入本任务）
    pub async fn process(self, index: usize, row: InputRow) {
        let RowWorker {
            flow,
            permits,
            cancel,
            timeout,
            tx,
        } = self;

        let ctx = RowCtx::new(index, row.gene_name());
        let mut emitter = ResultEmitter::new(tx, index, ctx.name.clone());

        // 等待工作池许可
        let permit = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                warn!("{} 运行已取消，未开始计算", ctx);
                emitter.fail(AnalysisError::Cancelled);
                return;
            }
            permit = permits.acquire_owned() => match permit {
                Ok(p) => p,
                Err(e) => {
                    error!("{} 工作池已关闭: {}", ctx, e);
                    emitter.fail(format!("工作池已关闭: {}", e));
                    return;
                }
            },
        };
        debug!("{} 开始计算", ctx);

        let row_cancel = cancel.child();
        let mut handle = {
            let ctx = ctx.clone();
            let row_cancel = row_cancel.clone();
            tokio::task::spawn_blocking(move || {
                // 许可随计算一起释放，超时后仍在运行的计算继续占用名额
                let _permit = permit;
                flow.run(row.raw_sequence(), &ctx, &row_cancel)
            })
        };

        let deadline = async move {
            match timeout {
                Some(d) => tokio::time::sleep(d).await,
                None => std::future::pending::<()>().await,
            }
        };

        let finished = tokio::select! {
            joined = &mut handle => {
                match joined {
                    Ok(Ok(outcome)) => emitter.succeed(outcome.seq, outcome.pairs),
                    Ok(Err(e)) => {
                        warn!("{} ❌ 计算失败: {}", ctx, e);
                        emitter.fail(e);
                    }
                    Err(join_err) => {
                        let err = if join_err.is_panic() {
                            AnalysisError::from_panic(join_err.into_panic().as_ref())
                        } else {
                            AnalysisError::WorkerPanicked(join_err.to_string())
                        };
                        error!("{} ❌ {}", ctx, err);
                        emitter.fail(err);
                    }
                }
                true
            }
            _ = deadline => {
                row_cancel.cancel_local();
                let secs = timeout.map(|d| d.as_secs()).unwrap_or_default();
                warn!("{} ⏱️ 计算超时 ({} 秒)", ctx, secs);
                emitter.fail(AnalysisError::TimedOut { secs });
                false
            }
            _ = cancel.cancelled() => {
                row_cancel.cancel_local();
                warn!("{} 运行已取消，中止计算", ctx);
                emitter.fail(AnalysisError::Cancelled);
                false
            }
        };

        if !finished {
            // 先发出本行结果，再等阻塞计算真正结束
            drop(emitter);
            match handle.await {
                Ok(_) => debug!("{} 后台计算已结束", ctx),
                Err(e) => debug!("{} 后台计算异常结束: {}", ctx, e),
            }
        }
    }
}
