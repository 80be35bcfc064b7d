//! chanlog Sinks 模块
//!
//! 两个互相独立的记录目标：
//!
//! - `database`：关系型数据库，用户与频道去重，断线后自动重连
//! - `file`：按日期分文件的文本记录，失败直接返回

pub mod database;
pub mod file;
pub mod traits;

// 重新导出主要类型
pub use database::{RecordOutcome, RelationalSink};
pub use file::{Clock, FileSink, LocalClock};
pub use traits::{NullTranscript, TranscriptSink};
