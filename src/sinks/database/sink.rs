//!
//! 关系型 Sink 实现
//!
//! 把频道活动写入关系型数据库：用户与频道按自然键去重，事件、封禁、在线人数
//! 作为只追加的事实写入。会话断开时同步重连，触发断线的那条记录被丢弃，
//! 不重试也不排队。

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, error, info};

use crate::config::ConfigSource;
use crate::diagnostics::Diagnostics;
use crate::error::{ChanlogError, Result};
use crate::sinks::database::ban_target::BanTarget;
use crate::sinks::database::models::{ActionKind, NewBan, NewMessage, NewUserCount};
use crate::sinks::database::resolve::{channel_id_or_create, user_id_or_create};
use crate::sinks::database::store::{ChannelStore, Connector, DieselConnector};

/// 外部定时器采样在线人数的间隔
pub const OCCUPANCY_INTERVAL: Duration = Duration::from_secs(600);

/// 一次记录调用的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordOutcome {
    /// 已写入
    Recorded,
    /// 会话断开，已重连，但这条记录丢失
    Dropped,
}

/// 关系型 Sink
///
/// 单线程同步使用：每个操作都需要 `&mut self`，同一时刻只有一条数据库操作在进行。
pub struct RelationalSink<C: Connector = DieselConnector> {
    connector: C,
    source: Box<dyn ConfigSource>,
    store: C::Store,
    diagnostics: Arc<Diagnostics>,
}

impl<C: Connector> std::fmt::Debug for RelationalSink<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RelationalSink")
            .field("store", &"<ChannelStore>")
            .field("diagnostics", &self.diagnostics.snapshot())
            .finish()
    }
}

impl RelationalSink<DieselConnector> {
    /// 使用 Diesel 连接器创建 sink
    pub fn new(source: impl ConfigSource + 'static) -> Result<Self> {
        Self::with_connector(source, DieselConnector)
    }
}

impl<C: Connector> RelationalSink<C> {
    /// 使用指定连接器创建 sink
    ///
    /// 配置缺失或连接失败都直接返回错误，由调用方决定是否退出进程。
    pub fn with_connector(source: impl ConfigSource + 'static, connector: C) -> Result<Self> {
        let source: Box<dyn ConfigSource> = Box::new(source);
        let store = Self::open_store(source.as_ref(), &connector)?;

        Ok(Self {
            connector,
            source,
            store,
            diagnostics: Arc::new(Diagnostics::new()),
        })
    }

    fn open_store(source: &dyn ConfigSource, connector: &C) -> Result<C::Store> {
        debug!("Attempting to connect with database...");
        let config = source.load()?;
        let store = connector.connect(&config.database)?;
        info!("connected!");
        Ok(store)
    }

    /// 重新读取配置并建立新会话，新会话就绪后才替换旧会话
    fn reconnect(&mut self) -> Result<()> {
        debug!("Attempting to reconnect with database...");
        let store = Self::open_store(self.source.as_ref(), &self.connector)?;
        self.store = store;
        self.diagnostics.increment_reconnects();
        Ok(())
    }

    /// 执行一次存储操作；断线时先重连，再把原错误交还调用方
    ///
    /// 重连失败（配置缺失、无法建立会话等）包装为 [`ChanlogError::ReconnectFailed`]。
    fn run<T, F>(&mut self, operation: &'static str, f: F) -> Result<T>
    where
        F: FnOnce(&mut C::Store) -> Result<T>,
    {
        let result = f(&mut self.store);
        if let Err(ref e) = result {
            error!("Error within {}: {}", operation, e);
            if e.is_connection_lost() {
                self.reconnect()
                    .map_err(|cause| ChanlogError::ReconnectFailed(Box::new(cause)))?;
            } else {
                self.diagnostics.increment_store_errors();
            }
        }
        result
    }

    /// 记录类操作：断线被吞掉并报告为 `Dropped`，其他错误照常传播
    fn record<F>(&mut self, operation: &'static str, f: F) -> Result<RecordOutcome>
    where
        F: FnOnce(&mut C::Store) -> Result<()>,
    {
        match self.run(operation, f) {
            Ok(()) => {
                self.diagnostics.increment_records_written();
                Ok(RecordOutcome::Recorded)
            }
            Err(e) if e.is_connection_lost() => {
                self.diagnostics.increment_records_dropped();
                Ok(RecordOutcome::Dropped)
            }
            Err(e) => Err(e),
        }
    }

    /// 记录一次频道在线人数与话题
    pub fn record_occupancy(
        &mut self,
        count: usize,
        channel: &str,
        topic: &str,
    ) -> Result<RecordOutcome> {
        let user_total = i32::try_from(count).unwrap_or(i32::MAX);
        self.record("record_occupancy", |store| {
            let channel_id = channel_id_or_create(store, channel)?;
            store.insert_user_count(&NewUserCount {
                user_total,
                channel_id,
                topic,
            })
        })
    }

    pub fn record_message(
        &mut self,
        user: &str,
        host: &str,
        text: &str,
        channel: &str,
    ) -> Result<RecordOutcome> {
        self.record_event(user, host, text, ActionKind::Message, channel)
    }

    pub fn record_emote(
        &mut self,
        user: &str,
        host: &str,
        text: &str,
        channel: &str,
    ) -> Result<RecordOutcome> {
        self.record_event(user, host, text, ActionKind::Emote, channel)
    }

    pub fn record_join(&mut self, user: &str, host: &str, channel: &str) -> Result<RecordOutcome> {
        self.record_event(user, host, "", ActionKind::Join, channel)
    }

    pub fn record_part(&mut self, user: &str, host: &str, channel: &str) -> Result<RecordOutcome> {
        self.record_event(user, host, "", ActionKind::Part, channel)
    }

    pub fn record_quit(&mut self, user: &str, host: &str, channel: &str) -> Result<RecordOutcome> {
        self.record_event(user, host, "", ActionKind::Quit, channel)
    }

    fn record_event(
        &mut self,
        user: &str,
        host: &str,
        text: &str,
        kind: ActionKind,
        channel: &str,
    ) -> Result<RecordOutcome> {
        self.record("record_event", |store| {
            let user_id = user_id_or_create(store, user, host)?;
            let channel_id = channel_id_or_create(store, channel)?;
            store.insert_message(&NewMessage::new(user_id, channel_id, kind, text))
        })
    }

    /// 记录一次 `+b`
    ///
    /// 目标带有 `$#channel` 转发后缀时，banmask 去掉后缀，原因写明转发频道。
    pub fn record_ban(
        &mut self,
        actor: &str,
        _host: &str,
        _mode: &str,
        target: &str,
        channel: &str,
    ) -> Result<RecordOutcome> {
        let target = BanTarget::parse(target);
        let reason = target.reason();
        self.record("record_ban", |store| {
            let channel_id = channel_id_or_create(store, channel)?;
            store.insert_ban(&NewBan {
                banmask: target.banmask,
                banned_by: actor,
                channel: channel_id,
                reason: reason.as_deref(),
            })
        })
    }

    /// 记录一次 `-b`：把匹配的生效封禁标记为解除，不新增行
    pub fn record_unban(
        &mut self,
        _actor: &str,
        _host: &str,
        _mode: &str,
        target: &str,
        channel: &str,
    ) -> Result<RecordOutcome> {
        let banmask = BanTarget::parse(target).banmask;
        self.record("record_unban", |store| {
            let channel_id = channel_id_or_create(store, channel)?;
            let lifted = store.lift_ban(channel_id, banmask)?;
            debug!("{} ban(s) on {} lifted in {}", lifted, banmask, channel);
            Ok(())
        })
    }

    /// 精确查询用户 id，不存在时返回 `None`
    pub fn resolve_user_id(&mut self, name: &str, host: &str) -> Result<Option<i32>> {
        self.run("resolve_user_id", |store| store.find_user(name, host))
    }

    /// 解析或创建用户 id
    pub fn resolve_or_create_user(&mut self, name: &str, host: &str) -> Result<i32> {
        self.run("resolve_or_create_user", |store| {
            user_id_or_create(store, name, host)
        })
    }

    /// 解析或创建频道 id
    pub fn resolve_channel_id(&mut self, name: &str) -> Result<i32> {
        self.run("resolve_channel_id", |store| channel_id_or_create(store, name))
    }

    /// 当前会话，主要供查询与测试使用
    pub fn store_mut(&mut self) -> &mut C::Store {
        &mut self.store
    }

    pub fn diagnostics(&self) -> Arc<Diagnostics> {
        Arc::clone(&self.diagnostics)
    }
}
