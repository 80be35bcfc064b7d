//! 进程自身的诊断日志
//!
//! 把 `tracing` 事件写入 `{directory}/{file_name}`，按天滚动。
//! `RUST_LOG` 存在时优先于配置中的级别。

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::LoggingConfig;
use crate::error::{ChanlogError, Result};
use crate::utils::FileTools;

/// 构建过滤器：`RUST_LOG` 优先，否则使用配置级别
pub fn build_filter(level: &str) -> Result<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    EnvFilter::try_new(level.to_lowercase())
        .map_err(|e| ChanlogError::InvalidLogLevel(format!("{}: {}", level, e)))
}

/// 安装全局 subscriber
///
/// 返回的 guard 必须存活到进程退出，否则缓冲中的日志会丢失。
pub fn init_logging(config: &LoggingConfig) -> Result<WorkerGuard> {
    FileTools::ensure_directory_exists(&config.directory)?;

    let appender = tracing_appender::rolling::daily(&config.directory, &config.file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let layer = fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true)
        .with_filter(build_filter(&config.level)?);

    tracing_subscriber::registry()
        .with(layer)
        .try_init()
        .map_err(|e| ChanlogError::TracingError(e.to_string()))?;

    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_filter_accepts_config_levels() {
        for level in ["TRACE", "DEBUG", "INFO", "WARN", "ERROR"] {
            assert!(build_filter(level).is_ok(), "level {}", level);
        }
    }

    #[test]
    fn test_init_logging_creates_directory() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = LoggingConfig {
            directory: dir.path().join("logs"),
            ..Default::default()
        };

        // 其他测试可能已经装好全局 subscriber，这里只关心目录
        let _guard = init_logging(&config);
        assert!(config.directory.is_dir());
    }
}
