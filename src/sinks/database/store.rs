//! 数据库会话与存储操作
//!
//! [`ChannelStore`] 是关系型 sink 与具体存储之间的接缝：sink 只负责解析实体、
//! 断线恢复，所有 SQL 都在这里。[`Connector`] 负责建立新的会话，重连时使用。

use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use tracing::{debug, info};

#[cfg(feature = "postgres")]
use diesel::pg::PgConnection;
#[cfg(feature = "sqlite")]
use diesel::sqlite::SqliteConnection;

use crate::config::{DatabaseConfig, DatabaseType};
use crate::error::{ChanlogError, Result};
use crate::sinks::database::models::{
    Ban, Channel, Message, NewBan, NewChannel, NewMessage, NewUser, NewUserCount, User, UserCount,
};
use crate::sinks::database::schema::{bans, channels, messages, user_count, users};

/// 关系型 sink 需要的存储操作
///
/// `insert_*` 返回新行的 id；唯一键冲突时返回 `None`，由调用方重新查询。
pub trait ChannelStore {
    fn find_user(&mut self, name: &str, host: &str) -> Result<Option<i32>>;
    fn insert_user(&mut self, name: &str, host: &str) -> Result<Option<i32>>;
    fn find_channel(&mut self, name: &str) -> Result<Option<i32>>;
    fn insert_channel(&mut self, name: &str) -> Result<Option<i32>>;
    fn insert_message(&mut self, message: &NewMessage<'_>) -> Result<()>;
    fn insert_user_count(&mut self, count: &NewUserCount<'_>) -> Result<()>;
    fn insert_ban(&mut self, ban: &NewBan<'_>) -> Result<()>;
    /// 把 (channel, banmask) 上仍然生效的封禁标记为解除，返回受影响行数
    fn lift_ban(&mut self, channel_id: i32, banmask: &str) -> Result<usize>;
}

/// 按配置建立新的存储会话
pub trait Connector {
    type Store: ChannelStore;

    fn connect(&self, config: &DatabaseConfig) -> Result<Self::Store>;
}

/// 数据库连接枚举
pub enum StoreConnection {
    #[cfg(feature = "sqlite")]
    Sqlite(SqliteConnection),
    #[cfg(feature = "postgres")]
    Postgres(PgConnection),
}

// 每个分支单独类型检查，查询代码对两种后端只写一遍
macro_rules! with_connection {
    ($conn:expr, |$c:ident| $body:expr) => {
        match $conn {
            #[cfg(feature = "sqlite")]
            StoreConnection::Sqlite($c) => $body,
            #[cfg(feature = "postgres")]
            StoreConnection::Postgres($c) => $body,
        }
    };
}

/// 基于 Diesel 的存储实现，持有一条长连接
pub struct DieselStore {
    conn: StoreConnection,
    backend: DatabaseType,
}

impl std::fmt::Debug for DieselStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DieselStore")
            .field("backend", &self.backend)
            .field("conn", &"<StoreConnection>")
            .finish()
    }
}

impl DieselStore {
    /// 建立连接，按需创建表结构
    pub fn connect(config: &DatabaseConfig) -> Result<Self> {
        let conn = Self::establish(config)?;
        let mut store = Self {
            conn,
            backend: config.backend,
        };

        store.prepare_session()?;
        if config.auto_create_schema {
            store.create_tables_if_not_exist()?;
        }

        info!("数据库连接已建立，后端: {:?}", config.backend);
        Ok(store)
    }

    fn establish(config: &DatabaseConfig) -> Result<StoreConnection> {
        match config.backend {
            #[cfg(feature = "sqlite")]
            DatabaseType::Sqlite => Ok(StoreConnection::Sqlite(SqliteConnection::establish(
                &config.dbname,
            )?)),
            #[cfg(feature = "postgres")]
            DatabaseType::Postgres => Ok(StoreConnection::Postgres(PgConnection::establish(
                &config.postgres_conninfo(),
            )?)),
            #[cfg(not(feature = "sqlite"))]
            DatabaseType::Sqlite => Err(ChanlogError::FeatureNotEnabled("sqlite".to_string())),
            #[cfg(not(feature = "postgres"))]
            DatabaseType::Postgres => {
                Err(ChanlogError::FeatureNotEnabled("postgres".to_string()))
            }
        }
    }

    fn prepare_session(&mut self) -> Result<()> {
        match &mut self.conn {
            #[cfg(feature = "sqlite")]
            StoreConnection::Sqlite(c) => {
                c.batch_execute("PRAGMA foreign_keys = ON; PRAGMA busy_timeout = 5000;")?
            }
            #[cfg(feature = "postgres")]
            StoreConnection::Postgres(_) => {}
        }
        Ok(())
    }

    /// 创建表（如果不存在）
    pub fn create_tables_if_not_exist(&mut self) -> Result<()> {
        use crate::sinks::database::schema::create_table_sql;

        debug!("正在创建数据库表结构");
        match &mut self.conn {
            #[cfg(feature = "sqlite")]
            StoreConnection::Sqlite(c) => c.batch_execute(create_table_sql::SQLITE_CREATE_TABLES)?,
            #[cfg(feature = "postgres")]
            StoreConnection::Postgres(c) => {
                c.batch_execute(create_table_sql::POSTGRES_CREATE_TABLES)?
            }
        }
        Ok(())
    }

    pub fn users(&mut self) -> Result<Vec<User>> {
        Ok(with_connection!(&mut self.conn, |c| users::table
            .order(users::id)
            .select(User::as_select())
            .load(c))?)
    }

    pub fn channels(&mut self) -> Result<Vec<Channel>> {
        Ok(with_connection!(&mut self.conn, |c| channels::table
            .order(channels::id)
            .select(Channel::as_select())
            .load(c))?)
    }

    pub fn messages(&mut self) -> Result<Vec<Message>> {
        Ok(with_connection!(&mut self.conn, |c| messages::table
            .order(messages::id)
            .select(Message::as_select())
            .load(c))?)
    }

    pub fn user_counts(&mut self, channel_id: i32) -> Result<Vec<UserCount>> {
        Ok(with_connection!(&mut self.conn, |c| user_count::table
            .filter(user_count::channel_id.eq(channel_id))
            .order(user_count::id)
            .select(UserCount::as_select())
            .load(c))?)
    }

    pub fn bans(&mut self, channel_id: i32) -> Result<Vec<Ban>> {
        Ok(with_connection!(&mut self.conn, |c| bans::table
            .filter(bans::channel.eq(channel_id))
            .order(bans::id)
            .select(Ban::as_select())
            .load(c))?)
    }
}

impl ChannelStore for DieselStore {
    fn find_user(&mut self, name: &str, host: &str) -> Result<Option<i32>> {
        Ok(with_connection!(&mut self.conn, |c| users::table
            .filter(users::user_name.eq(name))
            .filter(users::host.eq(host))
            .select(users::id)
            .first::<i32>(c)
            .optional())?)
    }

    fn insert_user(&mut self, name: &str, host: &str) -> Result<Option<i32>> {
        let new_user = NewUser {
            user_name: name,
            host,
        };
        Ok(with_connection!(&mut self.conn, |c| diesel::insert_into(
            users::table
        )
        .values(&new_user)
        .on_conflict_do_nothing()
        .returning(users::id)
        .get_result::<i32>(c)
        .optional())?)
    }

    fn find_channel(&mut self, name: &str) -> Result<Option<i32>> {
        Ok(with_connection!(&mut self.conn, |c| channels::table
            .filter(channels::channel_name.eq(name))
            .select(channels::id)
            .first::<i32>(c)
            .optional())?)
    }

    fn insert_channel(&mut self, name: &str) -> Result<Option<i32>> {
        let new_channel = NewChannel { channel_name: name };
        Ok(with_connection!(&mut self.conn, |c| diesel::insert_into(
            channels::table
        )
        .values(&new_channel)
        .on_conflict_do_nothing()
        .returning(channels::id)
        .get_result::<i32>(c)
        .optional())?)
    }

    fn insert_message(&mut self, message: &NewMessage<'_>) -> Result<()> {
        with_connection!(&mut self.conn, |c| diesel::insert_into(messages::table)
            .values(message)
            .execute(c))?;
        Ok(())
    }

    fn insert_user_count(&mut self, count: &NewUserCount<'_>) -> Result<()> {
        with_connection!(&mut self.conn, |c| diesel::insert_into(user_count::table)
            .values(count)
            .execute(c))?;
        Ok(())
    }

    fn insert_ban(&mut self, ban: &NewBan<'_>) -> Result<()> {
        with_connection!(&mut self.conn, |c| diesel::insert_into(bans::table)
            .values(ban)
            .execute(c))?;
        Ok(())
    }

    fn lift_ban(&mut self, channel_id: i32, banmask: &str) -> Result<usize> {
        Ok(with_connection!(&mut self.conn, |c| diesel::update(
            bans::table
                .filter(bans::channel.eq(channel_id))
                .filter(bans::banmask.eq(banmask))
                .filter(bans::still_banned.eq(true))
        )
        .set(bans::still_banned.eq(false))
        .execute(c))?)
    }
}

/// 默认的 Diesel 连接器
#[derive(Debug, Default, Clone, Copy)]
pub struct DieselConnector;

impl Connector for DieselConnector {
    type Store = DieselStore;

    fn connect(&self, config: &DatabaseConfig) -> Result<DieselStore> {
        DieselStore::connect(config)
    }
}
