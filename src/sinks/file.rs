//! 每日文本记录 Sink
//!
//! 所有频道共用一个按日期命名的文件 `{log_dir}/{YYYY-MM-DD}.log`，每个事件追加一行，
//! 行首为本地时间 `HH:MM:SS`。没有重试：打开或写入失败直接返回给调用方。

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{Local, NaiveDateTime};

use crate::config::ChanlogConfig;
use crate::diagnostics::Diagnostics;
use crate::error::{ChanlogError, Result};
use crate::sinks::traits::TranscriptSink;
use crate::utils::FileTools;

/// 时间来源，测试中替换为固定时间
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}

/// 本地时区的系统时钟
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalClock;

impl Clock for LocalClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// 每日文本记录 Sink
pub struct FileSink {
    log_dir: PathBuf,
    clock: Box<dyn Clock>,
    diagnostics: Arc<Diagnostics>,
}

impl std::fmt::Debug for FileSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileSink")
            .field("log_dir", &self.log_dir)
            .finish()
    }
}

impl FileSink {
    /// 创建新的文件 sink，不检查目录
    pub fn new(log_dir: impl Into<PathBuf>) -> Self {
        Self {
            log_dir: log_dir.into(),
            clock: Box::new(LocalClock),
            diagnostics: Arc::new(Diagnostics::new()),
        }
    }

    /// 创建文件 sink 并确认目录存在且可写
    pub fn open(log_dir: impl Into<PathBuf>) -> Result<Self> {
        let log_dir = log_dir.into();
        FileTools::ensure_directory_exists(&log_dir)?;

        if !FileTools::is_directory_writable(&log_dir) {
            return Err(ChanlogError::IoError {
                source: std::io::Error::new(
                    std::io::ErrorKind::PermissionDenied,
                    format!("目录不可写: {}", log_dir.display()),
                ),
            });
        }

        Ok(Self::new(log_dir))
    }

    /// 按配置中的 `logs.folder_path` 打开
    pub fn from_config(config: &ChanlogConfig) -> Result<Self> {
        Self::open(&config.logs.folder_path)
    }

    /// 替换时间来源
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn log_dir(&self) -> &Path {
        &self.log_dir
    }

    /// 指定时刻对应的记录文件路径
    pub fn path_for(&self, at: NaiveDateTime) -> PathBuf {
        self.log_dir.join(format!("{}.log", at.format("%Y-%m-%d")))
    }

    pub fn diagnostics(&self) -> Arc<Diagnostics> {
        Arc::clone(&self.diagnostics)
    }

    /// 加上时间前缀并追加到当天的文件
    fn append(&self, body: &str) -> Result<()> {
        let now = self.clock.now();
        let line = format!("{} {}\n", now.format("%H:%M:%S"), body);
        FileTools::append_line(self.path_for(now), &line)?;
        self.diagnostics.increment_transcript_lines();
        Ok(())
    }
}

impl TranscriptSink for FileSink {
    fn write_message(&mut self, user: &str, text: &str) -> Result<()> {
        self.append(&format!("<{}> {}", user, text))
    }

    fn write_join(&mut self, user: &str, host: &str, channel: &str) -> Result<()> {
        self.append(&format!("--> <{}> ({}) joins {} ", user, host, channel))
    }

    fn write_part(&mut self, user: &str, host: &str, channel: &str) -> Result<()> {
        self.append(&format!("<-- <{}> ({}) parts {} ", user, host, channel))
    }

    fn write_quit(&mut self, user: &str, host: &str, channel: &str) -> Result<()> {
        self.append(&format!("<-- <{}> ({}) quits {} ", user, host, channel))
    }

    fn write_kick(&mut self, target: &str, nick: &str, channel: &str) -> Result<()> {
        self.append(&format!("{} has kicked {} from {} ", nick, target, channel))
    }

    fn write_ban(
        &mut self,
        nick: &str,
        _host: &str,
        mode: &str,
        target: &str,
        _channel: &str,
    ) -> Result<()> {
        self.append(&format!("{} sets mode: {} {}", nick, mode, target))
    }

    fn write_unban(
        &mut self,
        nick: &str,
        _host: &str,
        mode: &str,
        target: &str,
        _channel: &str,
    ) -> Result<()> {
        self.append(&format!("{} sets mode: {} {}", nick, mode, target))
    }

    fn name(&self) -> &'static str {
        "file"
    }
}
