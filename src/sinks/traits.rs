//! chanlog Sink Traits
//!
//! 定义文本记录 sink 的统一接口。`FileSink` 是主要实现；当主记录文件无法打开时，
//! 调用方换用 [`NullTranscript`]，让其余记录照常进行。
//!
//! # 使用示例
//!
//! ```rust
//! use chanlog::sinks::traits::{NullTranscript, TranscriptSink};
//!
//! let mut sink: Box<dyn TranscriptSink> = Box::new(NullTranscript);
//! sink.write_join("alice", "alice@host", "#rust").unwrap();
//! assert_eq!(sink.name(), "null");
//! ```

use std::fmt::Debug;

use crate::error::Result;

/// 文本记录 sink trait
///
/// 每个方法写入一行；错误不在这一层处理，直接交给调用方。
pub trait TranscriptSink: Send + Debug {
    fn write_message(&mut self, user: &str, text: &str) -> Result<()>;

    fn write_join(&mut self, user: &str, host: &str, channel: &str) -> Result<()>;

    fn write_part(&mut self, user: &str, host: &str, channel: &str) -> Result<()>;

    fn write_quit(&mut self, user: &str, host: &str, channel: &str) -> Result<()>;

    /// `nick` 把 `target` 踢出 `channel`
    fn write_kick(&mut self, target: &str, nick: &str, channel: &str) -> Result<()>;

    fn write_ban(
        &mut self,
        nick: &str,
        host: &str,
        mode: &str,
        target: &str,
        channel: &str,
    ) -> Result<()>;

    fn write_unban(
        &mut self,
        nick: &str,
        host: &str,
        mode: &str,
        target: &str,
        channel: &str,
    ) -> Result<()>;

    /// 获取 sink 的名称
    ///
    /// 用于日志和调试目的
    fn name(&self) -> &'static str;
}

/// 丢弃所有写入的文本记录 sink
#[derive(Debug, Default, Clone, Copy)]
pub struct NullTranscript;

impl TranscriptSink for NullTranscript {
    fn write_message(&mut self, _user: &str, _text: &str) -> Result<()> {
        Ok(())
    }

    fn write_join(&mut self, _user: &str, _host: &str, _channel: &str) -> Result<()> {
        Ok(())
    }

    fn write_part(&mut self, _user: &str, _host: &str, _channel: &str) -> Result<()> {
        Ok(())
    }

    fn write_quit(&mut self, _user: &str, _host: &str, _channel: &str) -> Result<()> {
        Ok(())
    }

    fn write_kick(&mut self, _target: &str, _nick: &str, _channel: &str) -> Result<()> {
        Ok(())
    }

    fn write_ban(
        &mut self,
        _nick: &str,
        _host: &str,
        _mode: &str,
        _target: &str,
        _channel: &str,
    ) -> Result<()> {
        Ok(())
    }

    fn write_unban(
        &mut self,
        _nick: &str,
        _host: &str,
        _mode: &str,
        _target: &str,
        _channel: &str,
    ) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &'static str {
        "null"
    }
}
