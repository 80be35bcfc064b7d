//! 集成测试共用的配置与可控连接器

#![allow(dead_code)]

use std::io;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use chanlog::config::{ChanlogConfig, DatabaseConfig, DatabaseType, LoggingConfig, LogsConfig};
use chanlog::error::{ChanlogError, Result};
use chanlog::sinks::database::{
    ChannelStore, Connector, DieselConnector, DieselStore, NewBan, NewMessage, NewUserCount,
};
use tempfile::TempDir;
use tracing_subscriber::fmt::MakeWriter;

/// 指向临时目录中 SQLite 文件与文本记录目录的配置
pub fn sqlite_config(dir: &TempDir) -> ChanlogConfig {
    ChanlogConfig {
        database: DatabaseConfig {
            backend: DatabaseType::Sqlite,
            host: String::new(),
            dbname: dir.path().join("chanlog.db").to_string_lossy().into_owned(),
            user: String::new(),
            password: String::new(),
            auto_create_schema: true,
        },
        logs: LogsConfig {
            folder_path: dir.path().join("transcripts"),
        },
        logging: LoggingConfig::default(),
    }
}

/// 写入 SQLite 配置的 TOML 文件，返回文件路径
pub fn write_sqlite_config_file(dir: &TempDir) -> std::path::PathBuf {
    let path = dir.path().join("chanlog.toml");
    let content = format!(
        "[database]\nbackend = \"sqlite\"\ndbname = '{}'\nauto_create_schema = true\n\n[logs]\nfolder_path = '{}'\n",
        dir.path().join("chanlog.db").display(),
        dir.path().join("transcripts").display()
    );
    std::fs::write(&path, content).unwrap();
    path
}

/// 收集 fmt 层输出的内存缓冲
#[derive(Debug, Clone, Default)]
pub struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogBuffer {
    type Writer = LogBuffer;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// 在 DEBUG 级别的临时 subscriber 下执行 `f`，返回结果和日志文本
pub fn capture_logs<T>(f: impl FnOnce() -> T) -> (T, String) {
    let buffer = LogBuffer::default();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .with_writer(buffer.clone())
        .finish();

    let result = tracing::subscriber::with_default(subscriber, f);
    let logs = String::from_utf8(buffer.0.lock().unwrap().clone()).unwrap();
    (result, logs)
}

/// 日志中某一级别的行
pub fn lines_at<'a>(logs: &'a str, level: &str) -> Vec<&'a str> {
    logs.lines()
        .filter(|line| line.split_whitespace().nth(1) == Some(level))
        .collect()
}

/// 测试用的故障开关，连接器和它创建的所有会话共享
#[derive(Debug, Clone, Default)]
pub struct Faults {
    /// 下一次存储操作报告断线
    pub lose_connection: Arc<AtomicBool>,
    /// 每次存储操作都报告普通数据库错误
    pub broken: Arc<AtomicBool>,
    /// 插入报告冲突但不写入，之后的查询找不到该行
    pub swallow_inserts: Arc<AtomicBool>,
    /// 拒绝建立新会话
    pub refuse_connect: Arc<AtomicBool>,
    /// 已建立的会话数
    pub connects: Arc<AtomicUsize>,
}

impl Faults {
    pub fn connects(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }

    pub fn lose_next(&self) {
        self.lose_connection.store(true, Ordering::SeqCst);
    }
}

/// 包装 Diesel 连接器，按 [`Faults`] 注入故障
#[derive(Debug, Clone, Default)]
pub struct FlakyConnector {
    pub faults: Faults,
}

impl Connector for FlakyConnector {
    type Store = FlakyStore;

    fn connect(&self, config: &DatabaseConfig) -> Result<FlakyStore> {
        if self.faults.refuse_connect.load(Ordering::SeqCst) {
            return Err(ChanlogError::ConnectionError("refused".to_string()));
        }
        let inner = DieselConnector.connect(config)?;
        self.faults.connects.fetch_add(1, Ordering::SeqCst);
        Ok(FlakyStore {
            inner,
            faults: self.faults.clone(),
        })
    }
}

pub struct FlakyStore {
    pub inner: DieselStore,
    faults: Faults,
}

impl FlakyStore {
    fn check(&self) -> Result<()> {
        if self.faults.lose_connection.swap(false, Ordering::SeqCst) {
            return Err(ChanlogError::connection_lost("server closed the connection"));
        }
        if self.faults.broken.load(Ordering::SeqCst) {
            return Err(ChanlogError::database("disk I/O error"));
        }
        Ok(())
    }
}

impl ChannelStore for FlakyStore {
    fn find_user(&mut self, name: &str, host: &str) -> Result<Option<i32>> {
        self.check()?;
        self.inner.find_user(name, host)
    }

    fn insert_user(&mut self, name: &str, host: &str) -> Result<Option<i32>> {
        self.check()?;
        if self.faults.swallow_inserts.load(Ordering::SeqCst) {
            return Ok(None);
        }
        self.inner.insert_user(name, host)
    }

    fn find_channel(&mut self, name: &str) -> Result<Option<i32>> {
        self.check()?;
        self.inner.find_channel(name)
    }

    fn insert_channel(&mut self, name: &str) -> Result<Option<i32>> {
        self.check()?;
        if self.faults.swallow_inserts.load(Ordering::SeqCst) {
            return Ok(None);
        }
        self.inner.insert_channel(name)
    }

    fn insert_message(&mut self, message: &NewMessage<'_>) -> Result<()> {
        self.check()?;
        self.inner.insert_message(message)
    }

    fn insert_user_count(&mut self, count: &NewUserCount<'_>) -> Result<()> {
        self.check()?;
        self.inner.insert_user_count(count)
    }

    fn insert_ban(&mut self, ban: &NewBan<'_>) -> Result<()> {
        self.check()?;
        self.inner.insert_ban(ban)
    }

    fn lift_ban(&mut self, channel_id: i32, banmask: &str) -> Result<usize> {
        self.check()?;
        self.inner.lift_ban(channel_id, banmask)
    }
}
