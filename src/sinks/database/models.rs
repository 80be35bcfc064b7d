//! chanlog 数据库模型定义
//!
//! 此模块定义了与数据库表对应的 Rust 结构体，用于 Diesel ORM 操作。
//! 插入结构体借用调用方的字符串，查询结构体拥有数据。

use crate::sinks::database::schema::{bans, channels, messages, user_count, users};
use diesel::prelude::*;
use std::fmt;

/// 消息事件的动作类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    Message,
    Emote,
    Join,
    Part,
    Quit,
}

impl ActionKind {
    /// 存储在 `messages.action` 列中的文本
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKind::Message => "message",
            ActionKind::Emote => "emote",
            ActionKind::Join => "join",
            ActionKind::Part => "part",
            ActionKind::Quit => "quit",
        }
    }

    /// 只有 message 与 emote 带有正文
    pub fn carries_content(&self) -> bool {
        matches!(self, ActionKind::Message | ActionKind::Emote)
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub struct NewUser<'a> {
    pub user_name: &'a str,
    pub host: &'a str,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = channels)]
pub struct NewChannel<'a> {
    pub channel_name: &'a str,
}

/// 用于插入新消息事件的结构体
///
/// `content` 为 `None` 时该列不出现在 INSERT 中。
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = messages)]
pub struct NewMessage<'a> {
    pub user_id: i32,
    pub content: Option<&'a str>,
    pub action: &'a str,
    pub channel_id: i32,
}

impl<'a> NewMessage<'a> {
    /// 按动作类型决定是否携带正文
    pub fn new(user_id: i32, channel_id: i32, kind: ActionKind, text: &'a str) -> Self {
        Self {
            user_id,
            content: kind.carries_content().then_some(text),
            action: kind.as_str(),
            channel_id,
        }
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = user_count)]
pub struct NewUserCount<'a> {
    pub user_total: i32,
    pub channel_id: i32,
    pub topic: &'a str,
}

/// 用于插入新封禁记录的结构体，`still_banned` 使用数据库默认值
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = bans)]
pub struct NewBan<'a> {
    pub banmask: &'a str,
    pub banned_by: &'a str,
    pub channel: i32,
    pub reason: Option<&'a str>,
}

#[derive(Queryable, Selectable, Debug, Clone, PartialEq, Eq)]
#[diesel(table_name = users)]
pub struct User {
    pub id: i32,
    pub user_name: String,
    pub host: String,
}

#[derive(Queryable, Selectable, Debug, Clone, PartialEq, Eq)]
#[diesel(table_name = channels)]
pub struct Channel {
    pub id: i32,
    pub channel_name: String,
}

#[derive(Queryable, Selectable, Debug, Clone, PartialEq, Eq)]
#[diesel(table_name = messages)]
pub struct Message {
    pub id: i32,
    pub user_id: i32,
    pub content: Option<String>,
    pub action: String,
    pub channel_id: i32,
}

#[derive(Queryable, Selectable, Debug, Clone, PartialEq, Eq)]
#[diesel(table_name = user_count)]
pub struct UserCount {
    pub id: i32,
    pub user_total: i32,
    pub channel_id: i32,
    pub topic: String,
}

#[derive(Queryable, Selectable, Debug, Clone, PartialEq, Eq)]
#[diesel(table_name = bans)]
pub struct Ban {
    pub id: i32,
    pub banmask: String,
    pub banned_by: String,
    pub channel: i32,
    pub reason: Option<String>,
    pub still_banned: bool,
}
