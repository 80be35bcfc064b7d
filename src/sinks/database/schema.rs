//! chanlog 数据库表结构定义
//!
//! 此模块使用 Diesel 的 table! 宏定义数据库表结构，PostgreSQL 与 SQLite 共用。
//! `created_at` 列由数据库默认值填充，不在此声明。

diesel::table! {
    users (id) {
        id -> Integer,
        #[sql_name = "user"]
        user_name -> Text,
        host -> Text,
    }
}

diesel::table! {
    channels (id) {
        id -> Integer,
        channel_name -> Text,
    }
}

diesel::table! {
    messages (id) {
        id -> Integer,
        #[sql_name = "user"]
        user_id -> Integer,
        content -> Nullable<Text>,
        action -> Text,
        channel_id -> Integer,
    }
}

diesel::table! {
    user_count (id) {
        id -> Integer,
        #[sql_name = "count"]
        user_total -> Integer,
        channel_id -> Integer,
        topic -> Text,
    }
}

diesel::table! {
    bans (id) {
        id -> Integer,
        banmask -> Text,
        banned_by -> Text,
        channel -> Integer,
        reason -> Nullable<Text>,
        still_banned -> Bool,
    }
}

/// 创建表的 SQL 语句
pub mod create_table_sql {
    /// PostgreSQL 创建表语句
    #[cfg(feature = "postgres")]
    pub const POSTGRES_CREATE_TABLES: &str = r#"
        CREATE TABLE IF NOT EXISTS users (
            id SERIAL PRIMARY KEY,
            "user" TEXT NOT NULL,
            host TEXT NOT NULL,
            UNIQUE ("user", host)
        );

        CREATE TABLE IF NOT EXISTS channels (
            id SERIAL PRIMARY KEY,
            channel_name TEXT NOT NULL UNIQUE
        );

        CREATE TABLE IF NOT EXISTS messages (
            id SERIAL PRIMARY KEY,
            "user" INTEGER NOT NULL REFERENCES users(id),
            content TEXT,
            action TEXT NOT NULL,
            channel_id INTEGER NOT NULL REFERENCES channels(id),
            created_at TIMESTAMPTZ NOT NULL DEFAULT CURRENT_TIMESTAMP
        );

        CREATE TABLE IF NOT EXISTS user_count (
            id SERIAL PRIMARY KEY,
            count INTEGER NOT NULL,
            channel_id INTEGER NOT NULL REFERENCES channels(id),
            topic TEXT NOT NULL,
            created_at TIMESTAMPTZ NOT NULL DEFAULT CURRENT_TIMESTAMP
        );

        CREATE TABLE IF NOT EXISTS bans (
            id SERIAL PRIMARY KEY,
            banmask TEXT NOT NULL,
            banned_by TEXT NOT NULL,
            channel INTEGER NOT NULL REFERENCES channels(id),
            reason TEXT,
            still_banned BOOLEAN NOT NULL DEFAULT TRUE,
            created_at TIMESTAMPTZ NOT NULL DEFAULT CURRENT_TIMESTAMP
        );

        CREATE INDEX IF NOT EXISTS idx_messages_channel ON messages(channel_id);
        CREATE INDEX IF NOT EXISTS idx_user_count_channel ON user_count(channel_id);
        CREATE INDEX IF NOT EXISTS idx_bans_channel_banmask ON bans(channel, banmask);
    "#;

    /// SQLite 创建表语句
    #[cfg(feature = "sqlite")]
    pub const SQLITE_CREATE_TABLES: &str = r#"
        CREATE TABLE IF NOT EXISTS users (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            "user" TEXT NOT NULL,
            host TEXT NOT NULL,
            UNIQUE ("user", host)
        );

        CREATE TABLE IF NOT EXISTS channels (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            channel_name TEXT NOT NULL UNIQUE
        );

        CREATE TABLE IF NOT EXISTS messages (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            "user" INTEGER NOT NULL REFERENCES users(id),
            content TEXT,
            action TEXT NOT NULL,
            channel_id INTEGER NOT NULL REFERENCES channels(id),
            created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        );

        CREATE TABLE IF NOT EXISTS user_count (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            count INTEGER NOT NULL,
            channel_id INTEGER NOT NULL REFERENCES channels(id),
            topic TEXT NOT NULL,
            created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        );

        CREATE TABLE IF NOT EXISTS bans (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            banmask TEXT NOT NULL,
            banned_by TEXT NOT NULL,
            channel INTEGER NOT NULL REFERENCES channels(id),
            reason TEXT,
            still_banned BOOLEAN NOT NULL DEFAULT 1,
            created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        );

        CREATE INDEX IF NOT EXISTS idx_messages_channel ON messages(channel_id);
        CREATE INDEX IF NOT EXISTS idx_user_count_channel ON user_count(channel_id);
        CREATE INDEX IF NOT EXISTS idx_bans_channel_banmask ON bans(channel, banmask);
    "#;
}
