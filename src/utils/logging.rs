/// 日志工具模块
///
/// 提供批次日志格式化和输出的辅助函数
use crate::models::AllResult;
use tracing::info;

/// 记录程序启动信息
///
/// # 参数
/// - `max_concurrent`: 工作池大小
/// - `total_length`: 引物窗口长度
pub fn log_startup(max_concurrent: usize, total_length: usize) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 捕获引物并发设计模式");
    info!("📊 工作池大小: {}", max_concurrent);
    info!("📏 引物窗口长度: {}", total_length);
    info!("{}", "=".repeat(60));
}

/// 记录序列加载信息
///
/// # 参数
/// - `path`: 输入表格路径
/// - `total`: 序列总数
pub fn log_rows_loaded(path: &str, total: usize) {
    info!("✓ 从 {} 读取到 {} 条序列", path, total);
    info!("💡 每条序列独立计算，结果按原始顺序汇总\n");
}

/// 打印最终统计信息
///
/// # 参数
/// - `all`: 汇总结果
pub fn print_final_stats(all: &AllResult) {
    let total = all.results.len();
    let success = all.success_count();
    info!("\n{}", "=".repeat(60));
    info!("📊 全部处理完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("✅ 成功: {}/{}", success, total);
    info!("❌ 失败: {}", total - success);
    info!("🧬 捕获引物对: {}", all.pair_count());
    info!("{}", "=".repeat(60));
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
