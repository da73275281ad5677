//! # Capture Primer Designer
//!
//! 批量为 DNA 序列设计捕获引物对的 Rust 应用程序
//!
//! ## 架构设计
//!
//! 本系统采用严格的四层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有稀缺资源，只暴露能力
//! - `ResultEmitter` - 唯一持有本行结果和汇总通道发送端，离开作用域时发送
//! - `CancelSource` / `CancelToken` - 运行级取消信号
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，只处理单条序列
//! - `SequenceAnalyzer` - 序列统计与捕获锚点搜索（可替换）
//! - `build_primer_pair` - 锚点 → 5F/3R 引物窗口
//! - `ResultWriter` - 导出结果表格 / JSON
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一条序列"的完整计算流程
//! - `RowCtx` - 上下文封装（序号 + 基因名称）
//! - `CaptureFlow` - 流程编排（分析 → 锚点 → 引物对）
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/batch_processor` - 派发每行任务，汇总并恢复原始顺序
//! - `orchestrator/row_processor` - 单行工作者：并发许可、超时、取消、panic 隔离
//!
//! ## 模块结构

pub mod config;
pub mod error;
pub mod infrastructure;
pub mod logger;

pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::Config;
pub use error::{AppError, AppResult};
pub use infrastructure::{CancelSource, CancelToken};
pub use models::{
    AllResult, CaptureAnchor, InputRow, Primer, PrimerPair, RowResult, Status, WindowPolicy,
};
pub use orchestrator::App;
pub use services::{AnchorParams, GcWindowAnalyzer, SequenceAnalyzer, SequenceRecord};
pub use workflow::{CaptureFlow, RowCtx};
