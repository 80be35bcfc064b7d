//! chanlog 事件定义
//!
//! 客户端交给记录器的频道事件。字段都已由客户端解析好，这里不涉及网络协议。

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// 频道事件
///
/// 以 JSON 表示时使用 `kind` 字段区分类型，例如：
///
/// ```json
/// {"kind": "join", "user": "alice", "host": "alice@host", "channel": "#rust"}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChannelEvent {
    Message {
        user: String,
        host: String,
        channel: String,
        text: String,
    },
    Emote {
        user: String,
        host: String,
        channel: String,
        text: String,
    },
    Join {
        user: String,
        host: String,
        channel: String,
    },
    Part {
        user: String,
        host: String,
        channel: String,
    },
    /// 用户退出时所在的所有频道
    Quit {
        user: String,
        host: String,
        channels: Vec<String>,
    },
    /// `nick` 把 `target` 踢出频道
    Kick {
        nick: String,
        target: String,
        channel: String,
    },
    Mode {
        nick: String,
        host: String,
        mode: String,
        target: String,
        channel: String,
    },
    /// 外部定时器的在线人数采样
    Occupancy {
        channel: String,
        count: usize,
        #[serde(default)]
        topic: String,
    },
}

impl ChannelEvent {
    /// 解析一行 JSON
    pub fn from_json_line(line: &str) -> Result<Self> {
        Ok(serde_json::from_str(line.trim())?)
    }

    /// 事件类型名，与 JSON 中的 `kind` 一致
    pub fn kind(&self) -> &'static str {
        match self {
            ChannelEvent::Message { .. } => "message",
            ChannelEvent::Emote { .. } => "emote",
            ChannelEvent::Join { .. } => "join",
            ChannelEvent::Part { .. } => "part",
            ChannelEvent::Quit { .. } => "quit",
            ChannelEvent::Kick { .. } => "kick",
            ChannelEvent::Mode { .. } => "mode",
            ChannelEvent::Occupancy { .. } => "occupancy",
        }
    }
}
