//! 环境变量配置模块
//!
//! 此模块提供从环境变量安全读取敏感凭证的功能，避免把数据库密码写进配置文件。

use std::env;

use crate::config::ChanlogConfig;

/// 覆盖 `database.password` 的环境变量名
pub const DB_PASSWORD_VAR: &str = "CHANLOG_DB_PASSWORD";

/// 指定配置文件路径的环境变量名
pub const CONFIG_PATH_VAR: &str = "CHANLOG_CONFIG";

/// 不记录消息内容的前缀
pub const NO_LOG_PREFIX_VAR: &str = "CHANLOG_NO_LOG_PREFIX";

/// 环境变量配置管理器
pub struct EnvConfig;

impl EnvConfig {
    /// 从环境变量读取数据库密码
    pub fn get_db_password() -> Option<String> {
        env::var(DB_PASSWORD_VAR).ok().filter(|s| !s.is_empty())
    }

    /// 从环境变量读取配置文件路径
    pub fn get_config_path() -> Option<String> {
        env::var(CONFIG_PATH_VAR).ok().filter(|s| !s.is_empty())
    }

    pub fn get_no_log_prefix() -> Option<String> {
        env::var(NO_LOG_PREFIX_VAR).ok().filter(|s| !s.is_empty())
    }

    /// 把环境变量中的凭证覆盖到已加载的配置上
    pub fn apply_overrides(config: &mut ChanlogConfig) {
        if let Some(password) = Self::get_db_password() {
            tracing::debug!("使用环境变量 {} 中的数据库密码", DB_PASSWORD_VAR);
            config.database.password = password;
        }
    }
}
