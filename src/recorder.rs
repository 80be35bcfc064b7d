//! 频道记录器
//!
//! 把一个 [`ChannelEvent`] 分别交给关系型 sink 和文本记录 sink。两边互不依赖：
//! 一边失败不会阻止另一边写入，两边的结果都放进 [`RecordReport`] 交给调用方。

use tracing::{error, warn};

use crate::config::ConfigSource;
use crate::error::{ChanlogError, Result};
use crate::event::ChannelEvent;
use crate::sinks::database::{Connector, DieselConnector, RecordOutcome, RelationalSink};
use crate::sinks::file::FileSink;
use crate::sinks::traits::{NullTranscript, TranscriptSink};

/// 以 `no_log_prefix` 开头的消息被替换成的文本
pub const NOT_LOGGED_PLACEHOLDER: &str = "-= THIS MESSAGE NOT LOGGED =-";

/// 一个事件在两个 sink 上的结果
#[derive(Debug, Default)]
pub struct RecordReport {
    pub relational: Vec<Result<RecordOutcome>>,
    pub transcript: Vec<Result<()>>,
}

impl RecordReport {
    /// 两边都没有错误
    pub fn is_clean(&self) -> bool {
        self.relational.iter().all(|r| r.is_ok()) && self.transcript.iter().all(|r| r.is_ok())
    }

    /// 因断线被丢弃的关系型记录数
    pub fn dropped(&self) -> usize {
        self.relational
            .iter()
            .filter(|r| matches!(r, Ok(RecordOutcome::Dropped)))
            .count()
    }

    pub fn into_errors(self) -> Vec<ChanlogError> {
        self.relational
            .into_iter()
            .filter_map(|r| r.err())
            .chain(self.transcript.into_iter().filter_map(|r| r.err()))
            .collect()
    }
}

fn redact<'a>(no_log_prefix: Option<&str>, text: &'a str) -> &'a str {
    match no_log_prefix {
        Some(prefix) if text.starts_with(prefix) => NOT_LOGGED_PLACEHOLDER,
        _ => text,
    }
}

/// 频道记录器
pub struct ChannelRecorder<C: Connector = DieselConnector> {
    relational: RelationalSink<C>,
    transcript: Box<dyn TranscriptSink>,
    no_log_prefix: Option<String>,
}

impl<C: Connector> std::fmt::Debug for ChannelRecorder<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChannelRecorder")
            .field("relational", &self.relational)
            .field("transcript", &self.transcript)
            .field("no_log_prefix", &self.no_log_prefix)
            .finish()
    }
}

impl ChannelRecorder<DieselConnector> {
    /// 按配置打开两个 sink
    pub fn open(source: impl ConfigSource + 'static) -> Result<Self> {
        Self::open_with_connector(source, DieselConnector)
    }
}

impl<C: Connector> ChannelRecorder<C> {
    /// 按配置打开两个 sink，使用指定的连接器
    ///
    /// 数据库连接失败返回错误；文本记录目录不可用时改用 [`NullTranscript`]。
    pub fn open_with_connector(source: impl ConfigSource + 'static, connector: C) -> Result<Self> {
        let config = source.load()?;
        let transcript: Box<dyn TranscriptSink> = match FileSink::from_config(&config) {
            Ok(sink) => Box::new(sink),
            Err(e) => {
                warn!(
                    "Transcript directory {} unusable, transcripts disabled: {}",
                    config.logs.folder_path.display(),
                    e
                );
                Box::new(NullTranscript)
            }
        };
        let relational = RelationalSink::with_connector(source, connector)?;
        Ok(Self::from_parts(relational, transcript))
    }

    pub fn from_parts(relational: RelationalSink<C>, transcript: Box<dyn TranscriptSink>) -> Self {
        Self {
            relational,
            transcript,
            no_log_prefix: None,
        }
    }

    /// 以该前缀开头的消息与动作内容不会被记录
    ///
    /// 替换同时作用于数据库行和文本记录：两个 sink 都只会看到
    /// [`NOT_LOGGED_PLACEHOLDER`]，原文不落盘。
    pub fn with_no_log_prefix(mut self, prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        self.no_log_prefix = (!prefix.is_empty()).then_some(prefix);
        self
    }

    pub fn relational_mut(&mut self) -> &mut RelationalSink<C> {
        &mut self.relational
    }

    pub fn transcript_name(&self) -> &'static str {
        self.transcript.name()
    }

    /// 处理一个事件
    pub fn handle(&mut self, event: &ChannelEvent) -> RecordReport {
        let mut report = RecordReport::default();
        let transcript = &mut self.transcript;

        match event {
            ChannelEvent::Message {
                user,
                host,
                channel,
                text,
            } => {
                let text = redact(self.no_log_prefix.as_deref(), text);
                report
                    .relational
                    .push(self.relational.record_message(user, host, text, channel));
                report.transcript.push(transcript.write_message(user, text));
            }
            ChannelEvent::Emote {
                user,
                host,
                channel,
                text,
            } => {
                let text = redact(self.no_log_prefix.as_deref(), text);
                report
                    .relational
                    .push(self.relational.record_emote(user, host, text, channel));
                report.transcript.push(transcript.write_message(user, text));
            }
            ChannelEvent::Join {
                user,
                host,
                channel,
            } => {
                report
                    .relational
                    .push(self.relational.record_join(user, host, channel));
                report
                    .transcript
                    .push(transcript.write_join(user, host, channel));
            }
            ChannelEvent::Part {
                user,
                host,
                channel,
            } => {
                report
                    .relational
                    .push(self.relational.record_part(user, host, channel));
                report
                    .transcript
                    .push(transcript.write_part(user, host, channel));
            }
            ChannelEvent::Quit {
                user,
                host,
                channels,
            } => {
                for channel in channels {
                    report
                        .relational
                        .push(self.relational.record_quit(user, host, channel));
                    report
                        .transcript
                        .push(transcript.write_quit(user, host, channel));
                }
            }
            ChannelEvent::Kick {
                nick,
                target,
                channel,
            } => {
                report
                    .transcript
                    .push(transcript.write_kick(target, nick, channel));
            }
            ChannelEvent::Mode {
                nick,
                host,
                mode,
                target,
                channel,
            } => match mode.as_str() {
                "+b" => {
                    report
                        .relational
                        .push(self.relational.record_ban(nick, host, mode, target, channel));
                    report
                        .transcript
                        .push(transcript.write_ban(nick, host, mode, target, channel));
                }
                "-b" => {
                    report
                        .relational
                        .push(self.relational.record_unban(nick, host, mode, target, channel));
                    report
                        .transcript
                        .push(transcript.write_unban(nick, host, mode, target, channel));
                }
                _ => {}
            },
            ChannelEvent::Occupancy {
                channel,
                count,
                topic,
            } => {
                report
                    .relational
                    .push(self.relational.record_occupancy(*count, channel, topic));
            }
        }

        for e in report.transcript.iter().filter_map(|r| r.as_ref().err()) {
            error!("Transcript write for {} failed: {}", event.kind(), e);
        }
        report
    }
}
