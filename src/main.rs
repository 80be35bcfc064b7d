//! chanlog - 从标准输入读取频道事件并记录
//!
//! 每行一个 JSON 编码的 `ChannelEvent`。配置文件路径取第一个命令行参数，
//! 其次是 `CHANLOG_CONFIG`，最后是 `chanlog.toml`。

use std::io::{self, BufRead};
use std::process::ExitCode;

use anyhow::Context;
use tracing::{error, info, warn};

use chanlog::env_config::EnvConfig;
use chanlog::{logging, ChannelEvent, ChannelRecorder, ConfigFile, ConfigSource};

fn main() -> ExitCode {
    let config_path = std::env::args()
        .nth(1)
        .or_else(EnvConfig::get_config_path)
        .unwrap_or_else(|| "chanlog.toml".to_string());

    let source = ConfigFile::new(&config_path);
    let config = match source.load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("chanlog: cannot load configuration from {}: {}", config_path, e);
            return ExitCode::FAILURE;
        }
    };

    let _guard = match logging::init_logging(&config.logging) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("chanlog: cannot initialise logging: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match run(source) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("chanlog stopped: {:#}", e);
            eprintln!("chanlog: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(source: ConfigFile) -> anyhow::Result<()> {
    let mut recorder = ChannelRecorder::open(source).context("opening sinks")?;
    if let Some(prefix) = EnvConfig::get_no_log_prefix() {
        recorder = recorder.with_no_log_prefix(prefix);
    }
    info!("chanlog {} recording (transcript: {})", chanlog::VERSION, recorder.transcript_name());

    let stdin = io::stdin();
    for (number, line) in stdin.lock().lines().enumerate() {
        let line = line.context("reading stdin")?;
        if line.trim().is_empty() {
            continue;
        }

        let event = match ChannelEvent::from_json_line(&line) {
            Ok(event) => event,
            Err(e) => {
                warn!("Skipping malformed event on line {}: {}", number + 1, e);
                continue;
            }
        };

        let report = recorder.handle(&event);
        if report.dropped() > 0 {
            warn!("{} record(s) of {} lost to a reconnect", report.dropped(), event.kind());
        }
        for e in report.into_errors() {
            // 重连失败后数据库不可用，继续读取没有意义
            if e.is_fatal() {
                return Err(e).context("database unusable");
            }
            warn!("{} event not fully recorded: {}", event.kind(), e);
        }
    }

    let snapshot = recorder.relational_mut().diagnostics().snapshot();
    info!(
        "input closed: {} written, {} dropped, {} reconnects ({:.1}% recorded)",
        snapshot.records_written,
        snapshot.records_dropped,
        snapshot.reconnects,
        snapshot.success_rate_percent()
    );
    Ok(())
}
