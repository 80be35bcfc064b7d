//! 定义 chanlog 的所有配置结构体。
//!
//! 配置文件默认为 TOML；扩展名为 `.json` 时按 JSON 解析。`[database]` 与 `[logs]`
//! 两节没有默认值，缺失即为启动失败。

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::env_config::EnvConfig;
use crate::error::{ChanlogError, Result};

// --- 辅助函数，用于提供配置项的默认值 ---
fn default_false() -> bool {
    false
}
fn default_logging_directory() -> PathBuf {
    PathBuf::from(".")
}
fn default_logging_level() -> String {
    "DEBUG".to_string()
}
fn default_logging_file_name() -> String {
    "combined.log".to_string()
}

/// 关系型存储后端类型。
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseType {
    #[default]
    #[serde(alias = "postgresql")]
    Postgres,
    Sqlite,
}

/// chanlog 的顶层配置结构体。
#[derive(Deserialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct ChanlogConfig {
    pub database: DatabaseConfig,
    pub logs: LogsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// 数据库连接配置。
///
/// 对 SQLite 后端而言 `dbname` 是数据库文件路径，其余连接字段被忽略。
#[derive(Deserialize, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub backend: DatabaseType,
    #[serde(default)]
    pub host: String,
    pub dbname: String,
    #[serde(default)]
    pub user: String,
    #[serde(default)]
    pub password: String,
    #[serde(default = "default_false")]
    pub auto_create_schema: bool,
}

// 安全的Debug实现，避免泄露密码
impl std::fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("backend", &self.backend)
            .field("host", &self.host)
            .field("dbname", &self.dbname)
            .field("user", &self.user)
            .field("password", &"[REDACTED]")
            .field("auto_create_schema", &self.auto_create_schema)
            .finish()
    }
}

impl DatabaseConfig {
    /// 构建 libpq 关键字格式的连接串。
    pub fn postgres_conninfo(&self) -> String {
        format!(
            "host='{}' dbname='{}' user='{}' password='{}'",
            escape_conninfo(&self.host),
            escape_conninfo(&self.dbname),
            escape_conninfo(&self.user),
            escape_conninfo(&self.password)
        )
    }
}

fn escape_conninfo(value: &str) -> String {
    value.replace('\\', "\\\\").replace('\'', "\\'")
}

/// 每日文本记录的输出目录。
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct LogsConfig {
    #[serde(alias = "folderPath")]
    pub folder_path: PathBuf,
}

/// 进程自身诊断日志（`combined.log`）的配置。
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    #[serde(default = "default_logging_directory")]
    pub directory: PathBuf,
    #[serde(default = "default_logging_file_name")]
    pub file_name: String,
    #[serde(default = "default_logging_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            directory: default_logging_directory(),
            file_name: default_logging_file_name(),
            level: default_logging_level(),
        }
    }
}

/// 配置来源。
///
/// 关系型 sink 在构造时以及每次重连时都会重新加载配置。
pub trait ConfigSource: Send + Sync {
    fn load(&self) -> Result<ChanlogConfig>;
}

/// 从磁盘文件加载配置。
#[derive(Debug, Clone)]
pub struct ConfigFile {
    path: PathBuf,
}

impl ConfigFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ConfigSource for ConfigFile {
    fn load(&self) -> Result<ChanlogConfig> {
        load_config_from_file(&self.path)
    }
}

// 内存中的配置，主要供测试和嵌入式调用方使用
impl ConfigSource for ChanlogConfig {
    fn load(&self) -> Result<ChanlogConfig> {
        let mut config = self.clone();
        EnvConfig::apply_overrides(&mut config);
        validate_config(&config)?;
        Ok(config)
    }
}

/// 从文件加载 `ChanlogConfig`，应用环境变量覆盖并验证。
pub fn load_config_from_file(path: &Path) -> Result<ChanlogConfig> {
    if !path.exists() {
        return Err(ChanlogError::ConfigFileMissing(
            path.to_string_lossy().into_owned(),
        ));
    }

    let config_str = std::fs::read_to_string(path)?;
    let is_json = path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let mut config = if is_json {
        load_config_from_json_str(&config_str)?
    } else {
        load_config_from_str(&config_str)?
    };

    EnvConfig::apply_overrides(&mut config);
    validate_config(&config)?;
    Ok(config)
}

/// 用于从 TOML 字符串加载 `ChanlogConfig` 的辅助函数。
pub fn load_config_from_str(config_str: &str) -> Result<ChanlogConfig> {
    Ok(toml::from_str(config_str)?)
}

/// 用于从 JSON 字符串加载 `ChanlogConfig` 的辅助函数。
pub fn load_config_from_json_str(config_str: &str) -> Result<ChanlogConfig> {
    Ok(serde_json::from_str(config_str)?)
}

/// 验证配置的有效性。
pub fn validate_config(config: &ChanlogConfig) -> Result<()> {
    let db = &config.database;

    match db.backend {
        DatabaseType::Postgres => {
            if db.host.trim().is_empty() {
                return Err(ChanlogError::config("数据库主机不能为空"));
            }
            if db.dbname.trim().is_empty() {
                return Err(ChanlogError::config("数据库名不能为空"));
            }
            if db.user.trim().is_empty() {
                return Err(ChanlogError::config("数据库用户不能为空"));
            }
        }
        DatabaseType::Sqlite => {
            if db.dbname.trim().is_empty() {
                return Err(ChanlogError::config("SQLite 数据库路径不能为空"));
            }
        }
    }

    if config.logs.folder_path.as_os_str().is_empty() {
        return Err(ChanlogError::config("日志目录 folder_path 不能为空"));
    }

    match config.logging.level.to_uppercase().as_str() {
        "TRACE" | "DEBUG" | "INFO" | "WARN" | "ERROR" => {}
        _ => return Err(ChanlogError::InvalidLogLevel(config.logging.level.clone())),
    }

    if config.logging.file_name.trim().is_empty() {
        return Err(ChanlogError::config("诊断日志文件名不能为空"));
    }

    Ok(())
}
