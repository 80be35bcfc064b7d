//! chanlog - 频道活动记录库
//!
//! 把聊天频道的活动（消息、进出、踢人、封禁、在线人数）同时写入两个互相独立的目标：
//! 关系型数据库，以及按日期分文件的文本记录。
//!
//! # 快速开始
//!
//! ```rust,no_run
//! use chanlog::{ChannelEvent, ChannelRecorder, ConfigFile};
//!
//! fn main() -> chanlog::Result<()> {
//!     let mut recorder = ChannelRecorder::open(ConfigFile::new("chanlog.toml"))?;
//!
//!     let report = recorder.handle(&ChannelEvent::Join {
//!         user: "alice".to_string(),
//!         host: "alice@example.org".to_string(),
//!         channel: "#rust".to_string(),
//!     });
//!     for e in report.into_errors() {
//!         tracing::error!("{}", e);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # 单独使用某个 sink
//!
//! ```rust,no_run
//! use chanlog::sinks::{FileSink, TranscriptSink};
//!
//! fn main() -> chanlog::Result<()> {
//!     let mut transcript = FileSink::open("/var/lib/chanlog/transcripts")?;
//!     transcript.write_message("alice", "hello")?;
//!     Ok(())
//! }
//! ```

#[cfg(not(any(feature = "sqlite", feature = "postgres")))]
compile_error!("chanlog needs at least one database backend: enable `sqlite` or `postgres`");

pub mod config;
pub mod diagnostics;
pub mod env_config;
pub mod error;
pub mod event;
pub mod logging;
pub mod recorder;
pub mod sinks;
pub mod utils;

// 重新导出主要类型
pub use config::{
    load_config_from_file, ChanlogConfig, ConfigFile, ConfigSource, DatabaseConfig, DatabaseType,
    LoggingConfig, LogsConfig,
};
pub use diagnostics::{Diagnostics, DiagnosticsSnapshot};
pub use error::{ChanlogError, Result};
pub use event::ChannelEvent;
pub use recorder::{ChannelRecorder, RecordReport};
pub use sinks::database::OCCUPANCY_INTERVAL;
pub use sinks::{FileSink, NullTranscript, RecordOutcome, RelationalSink, TranscriptSink};

/// 库版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
