//! 用户与频道的 resolve-or-create
//!
//! 先按自然键查询；查不到就插入并直接拿到新 id。插入因唯一键冲突而没有
//! 返回 id 时（另一个写入者抢先插入），只再查询一次，仍然查不到即为不一致。
//! 不一致错误由调用它的 sink 统一记录日志。

use crate::error::{ChanlogError, Result};
use crate::sinks::database::store::ChannelStore;

/// 解析或创建 (user, host) 对应的用户 id
pub fn user_id_or_create<S: ChannelStore>(store: &mut S, name: &str, host: &str) -> Result<i32> {
    if let Some(id) = store.find_user(name, host)? {
        return Ok(id);
    }
    if let Some(id) = store.insert_user(name, host)? {
        return Ok(id);
    }
    match store.find_user(name, host)? {
        Some(id) => Ok(id),
        None => Err(ChanlogError::inconsistency(format!(
            "user ({}, {}) missing after insert",
            name, host
        ))),
    }
}

/// 解析或创建频道 id
pub fn channel_id_or_create<S: ChannelStore>(store: &mut S, name: &str) -> Result<i32> {
    if let Some(id) = store.find_channel(name)? {
        return Ok(id);
    }
    if let Some(id) = store.insert_channel(name)? {
        return Ok(id);
    }
    match store.find_channel(name)? {
        Some(id) => Ok(id),
        None => Err(ChanlogError::inconsistency(format!(
            "channel {} missing after insert",
            name
        ))),
    }
}
