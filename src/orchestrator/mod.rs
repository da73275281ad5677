//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责批量派发和结果汇总，是整个系统的"指挥中心"。
//!
//! ## 模块划分
//!
//! ### `batch_processor` - 批量序列处理器
//! - 读取输入表格（Vec<InputRow>）
//! - 每行派发一个任务（Dispatcher）
//! - 收齐结果并按序号排序（Aggregator）
//! - 导出结果表格和 JSON 报告
//!
//! ### `row_processor` - 单行处理器
//! - 取得工作池许可
//! - 在阻塞线程池中运行 CaptureFlow
//! - 处理超时、取消和 panic
//! - 恰好发出一个结果
//!
//! ## 层次关系
//!
//! ```text
//! batch_processor (处理 Vec<InputRow>)
//!     ↓
//! row_processor (处理单行)
//!     ↓
//! workflow::CaptureFlow (分析 → 锚点 → 引物窗口)
//!     ↓
//! services (能力层：sequence_analysis / primer_window / result_writer)
//!     ↓
//! infrastructure (基础设施：ResultEmitter / CancelToken)
//! ```

pub mod batch_processor;
pub mod row_processor;

// 重新导出主要类型
pub use batch_processor::App;
pub use row_processor::RowWorker;
