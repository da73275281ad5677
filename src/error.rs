use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 表格读写错误
    #[error("表格错误: {0}")]
    Table(#[from] TableError),
    /// 序列分析错误
    #[error("分析错误: {0}")]
    Analysis(#[from] AnalysisError),
    /// 引物窗口错误
    #[error("引物窗口错误: {0}")]
    Window(#[from] WindowError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
    /// 序列化错误
    #[error("JSON序列化失败: {0}")]
    Json(#[from] serde_json::Error),
}

/// 表格读写错误（整批级别）
#[derive(Debug, Error)]
pub enum TableError {
    /// 文件不存在
    #[error("文件不存在: {path}")]
    NotFound { path: String },
    /// 读取或解析失败
    #[error("读取表格失败 ({path}): {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: csv::Error,
    },
    /// 工作簿无法打开或工作表无法读取
    #[error("读取工作簿失败 ({path}): {reason}")]
    WorkbookFailed { path: String, reason: String },
    /// 没有表头
    #[error("表格为空，缺少表头: {path}")]
    Empty { path: String },
    /// 缺少必需的列
    #[error("表格 {path} 缺少列: {column}")]
    MissingColumn { path: String, column: &'static str },
    /// 写入失败
    #[error("写入表格失败 ({path}): {source}")]
    WriteFailed {
        path: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// 序列分析错误（单行级别，不会向上传播）
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// 序列为空
    #[error("序列为空: {name}")]
    EmptySequence { name: String },
    /// 序列包含非法字符
    #[error("序列 {name} 在位置 {position} 含有非法字符 '{found}'")]
    InvalidSequence {
        name: String,
        position: usize,
        found: char,
    },
    /// 统计信息尚未计算
    #[error("序列 {name} 尚未计算统计信息")]
    MissingStats { name: String },
    /// 未找到捕获锚点
    #[error("序列 {name} 未找到捕获锚点")]
    NoAnchors { name: String },
    /// 运行被取消
    #[error("运行已取消")]
    Cancelled,
    /// 单行计算超时
    #[error("计算超时 ({secs} 秒)")]
    TimedOut { secs: u64 },
    /// 工作任务异常退出
    #[error("工作任务异常退出: {0}")]
    WorkerPanicked(String),
    /// 分析器自定义失败
    #[error("{0}")]
    Failed(String),
}

/// 引物窗口错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WindowError {
    /// 窗口超出模板范围
    #[error("引物 {name} 窗口 [{start}, {end}) 超出序列范围 [0, {len})")]
    OutOfRange {
        name: String,
        start: i64,
        end: i64,
        len: usize,
    },
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 配置文件读取失败
    #[error("读取配置文件失败 ({path}): {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// TOML 解析失败
    #[error("配置文件解析失败 ({path}): {source}")]
    TomlParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },
    /// 配置值非法
    #[error("配置项 {field} 非法: {reason}")]
    Invalid { field: &'static str, reason: String },
}

// ========== 便捷构造函数 ==========

impl TableError {
    /// 创建写入失败错误
    pub fn write_failed(
        path: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        TableError::WriteFailed {
            path: path.into(),
            source: Box::new(source),
        }
    }
}

impl AnalysisError {
    /// 从 panic 负载中提取可读信息
    pub fn from_panic(payload: &(dyn std::any::Any + Send)) -> Self {
        let msg = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "未知 panic".to_string()
        };
        AnalysisError::WorkerPanicked(msg)
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
