use anyhow::Result;
use capture_primer_designer::utils::logging::{log_startup, print_final_stats};
use capture_primer_designer::{logger, AllResult, App, CancelSource, Config, WindowPolicy};
use clap::Parser;
use std::path::PathBuf;
use tracing::{error, info, warn};

/// 批量设计捕获引物
#[derive(Parser)]
#[command(name = "capture_primer_designer")]
#[command(version)]
#[command(about = "为表格中的每条 DNA 序列设计捕获引物对", long_about = None)]
struct Cli {
    /// 输入表格（XLSX/CSV/TSV，表头包含 基因名称 / DNA序列）
    input: PathBuf,
    /// 引物窗口长度（默认取配置）
    #[arg(short = 'l', long)]
    total_length: Option<usize>,
    /// 结果表格输出路径（默认取配置中的文件名）
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// 完整 JSON 报告输出路径
    #[arg(long)]
    json: Option<PathBuf>,
    /// TOML 配置文件
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// 同时计算的序列数
    #[arg(long)]
    threads: Option<usize>,
    /// 单行超时（秒，0 表示不限制）
    #[arg(long)]
    timeout: Option<u64>,
    /// 窗口越界策略（fail / clip）
    #[arg(long)]
    window_policy: Option<WindowPolicy>,
    /// 显示详细日志
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 加载配置：默认值 < 配置文件 < 环境变量 < 命令行
    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(n) = cli.threads {
        config.max_concurrent_rows = n;
    }
    if let Some(secs) = cli.timeout {
        config.row_timeout_secs = secs;
    }
    if let Some(policy) = cli.window_policy {
        config.window_policy = policy;
    }
    if let Some(l) = cli.total_length {
        config.total_length = l;
    }
    config.validate()?;

    // 初始化日志
    logger::init(config.verbose_logging || cli.verbose);

    let total_length = config.total_length;
    log_startup(config.max_concurrent_rows, total_length);

    let output = cli
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(&config.default_output_name));
    let app = App::with_reference_analyzer(config);

    // Ctrl-C 取消整次运行
    let cancel = CancelSource::new();
    let token = cancel.token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("⚠️ 收到中断信号，正在取消运行...");
            cancel.cancel();
        }
    });

    let all = match app
        .run_capture_with_cancel(&cli.input, total_length, token)
        .await
    {
        Ok(all) => all,
        Err(e) => {
            print_final_stats(&AllResult::default());
            error!("❌ 运行失败: {}", e);
            return Err(e.into());
        }
    };

    for failed in all.results.iter().filter(|r| !r.is_success()) {
        warn!(
            "[行 {}] {} 失败: {}",
            failed.index,
            failed.name,
            failed.error.as_deref().unwrap_or("未知原因")
        );
    }
    print_final_stats(&all);

    // 写入失败不影响已计算的结果
    match app.save_rows(&all, &output).await {
        Ok(path) => info!("✓ 保存完成: {}", path.display()),
        Err(e) => error!("❌ 保存失败: {}", e),
    }
    if let Some(json) = cli.json {
        if let Err(e) = app.save_report(&all, &json).await {
            error!("❌ JSON 报告保存失败: {}", e);
        }
    }

    Ok(())
}
