use crate::error::ConfigError;
use crate::models::WindowPolicy;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// 程序配置文件
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 同时计算的序列数量（工作池大小）
    pub max_concurrent_rows: usize,
    /// 每条引物窗口覆盖的长度
    pub total_length: usize,
    /// 相邻捕获锚点之间的最小间隔
    pub min_anchor_spacing: usize,
    /// 单行计算超时（秒），0 表示不限制
    pub row_timeout_secs: u64,
    /// 引物窗口越界时的处理策略
    pub window_policy: WindowPolicy,
    // --- 参考分析器配置 ---
    pub anchor_length: usize,
    pub gc_min: f64,
    pub gc_max: f64,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    /// 导出结果的默认文件名
    pub default_output_name: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_concurrent_rows: num_cpus::get().max(1),
            total_length: 150,
            min_anchor_spacing: 200,
            row_timeout_secs: 0,
            window_policy: WindowPolicy::Fail,
            anchor_length: 20,
            gc_min: 0.40,
            gc_max: 0.60,
            verbose_logging: false,
            default_output_name: "capture.primer.csv".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::default().with_env()
    }

    /// 从 TOML 文件加载，缺省项使用默认值
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFailed {
            path: path.display().to_string(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::TomlParseFailed {
            path: path.display().to_string(),
            source,
        })
    }

    /// 按 默认值 < 配置文件 < 环境变量 的顺序加载并校验
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(p) => Self::from_toml_file(p)?.with_env(),
            None => Self::from_env(),
        };
        config.validate()?;
        Ok(config)
    }

    /// 用环境变量覆盖已有配置，无法解析的值会被忽略
    pub fn with_env(self) -> Self {
        Self {
            max_concurrent_rows: env_parse("MAX_CONCURRENT_ROWS")
                .unwrap_or(self.max_concurrent_rows),
            total_length: env_parse("TOTAL_LENGTH").unwrap_or(self.total_length),
            min_anchor_spacing: env_parse("MIN_ANCHOR_SPACING").unwrap_or(self.min_anchor_spacing),
            row_timeout_secs: env_parse("ROW_TIMEOUT_SECS").unwrap_or(self.row_timeout_secs),
            window_policy: env_parse("WINDOW_POLICY").unwrap_or(self.window_policy),
            anchor_length: env_parse("ANCHOR_LENGTH").unwrap_or(self.anchor_length),
            gc_min: env_parse("GC_MIN").unwrap_or(self.gc_min),
            gc_max: env_parse("GC_MAX").unwrap_or(self.gc_max),
            verbose_logging: env_parse("VERBOSE_LOGGING").unwrap_or(self.verbose_logging),
            default_output_name: std::env::var("DEFAULT_OUTPUT_NAME")
                .unwrap_or(self.default_output_name),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_concurrent_rows == 0 {
            return Err(ConfigError::Invalid {
                field: "max_concurrent_rows",
                reason: "必须大于 0".to_string(),
            });
        }
        if self.total_length == 0 {
            return Err(ConfigError::Invalid {
                field: "total_length",
                reason: "必须大于 0".to_string(),
            });
        }
        if self.anchor_length == 0 {
            return Err(ConfigError::Invalid {
                field: "anchor_length",
                reason: "必须大于 0".to_string(),
            });
        }
        if !(0.0..=1.0).contains(&self.gc_min)
            || !(0.0..=1.0).contains(&self.gc_max)
            || self.gc_min > self.gc_max
        {
            return Err(ConfigError::Invalid {
                field: "gc_min/gc_max",
                reason: format!(
                    "需满足 0 <= gc_min <= gc_max <= 1，当前 {} / {}",
                    self.gc_min, self.gc_max
                ),
            });
        }
        Ok(())
    }

    /// 单行超时，未配置时返回 None
    pub fn row_timeout(&self) -> Option<Duration> {
        (self.row_timeout_secs > 0).then(|| Duration::from_secs(self.row_timeout_secs))
    }
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.min_anchor_spacing, 200);
        assert!(config.row_timeout().is_none());
    }

    #[test]
    fn test_toml_partial_override() {
        let config: Config = toml::from_str(
            r#"
            total_length = 120
            window_policy = "clip"
            row_timeout_secs = 5
            "#,
        )
        .unwrap();
        assert_eq!(config.total_length, 120);
        assert_eq!(config.window_policy, WindowPolicy::Clip);
        assert_eq!(config.row_timeout(), Some(Duration::from_secs(5)));
        // 未指定的字段保持默认
        assert_eq!(config.anchor_length, 20);
    }

    #[test]
    fn test_load_without_file_uses_env_layer() {
        let loaded = Config::load(None).unwrap();
        let from_env = Config::from_env();
        assert_eq!(loaded.total_length, from_env.total_length);
        assert_eq!(loaded.window_policy, from_env.window_policy);
        assert_eq!(loaded.default_output_name, from_env.default_output_name);
    }

    #[test]
    fn test_load_missing_file() {
        assert!(matches!(
            Config::load(Some(Path::new("/nonexistent/capture.toml"))),
            Err(ConfigError::ReadFailed { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_bad_gc_range() {
        let config = Config {
            gc_min: 0.7,
            gc_max: 0.3,
            ..Config::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field: "gc_min/gc_max", .. })
        ));
    }

    #[test]
    fn test_validate_rejects_zero_pool() {
        let config = Config {
            max_concurrent_rows: 0,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }
}
