//! 记录器的内部诊断与指标。
//!
//! 每个 sink 持有一个 `Arc<Diagnostics>`，调用方可以随时取快照，
//! 用来观察断线期间丢弃了多少条记录。

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// 内部诊断与指标数据结构。
///
/// 使用原子操作确保线程安全。
#[derive(Debug, Default)]
pub struct Diagnostics {
    /// 创建时间
    start_time: Option<Instant>,

    /// 成功写入数据库的记录数
    records_written: AtomicU64,

    /// 因断线而丢弃的记录数
    records_dropped: AtomicU64,

    /// 重连次数
    reconnects: AtomicU64,

    /// 未被恢复、向调用方传播的存储错误数
    store_errors: AtomicU64,

    /// 写入文本记录的行数
    transcript_lines: AtomicU64,
}

/// 诊断数据的快照，用于外部查询。
#[derive(Debug, Clone, PartialEq)]
pub struct DiagnosticsSnapshot {
    pub uptime: Option<Duration>,
    pub records_written: u64,
    pub records_dropped: u64,
    pub reconnects: u64,
    pub store_errors: u64,
    pub transcript_lines: u64,
}

impl Diagnostics {
    /// 创建新的诊断实例。
    pub fn new() -> Self {
        Self {
            start_time: Some(Instant::now()),
            ..Default::default()
        }
    }

    pub fn increment_records_written(&self) {
        self.records_written.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_records_dropped(&self) {
        self.records_dropped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_reconnects(&self) {
        self.reconnects.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_store_errors(&self) {
        self.store_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_transcript_lines(&self) {
        self.transcript_lines.fetch_add(1, Ordering::Relaxed);
    }

    /// 获取诊断数据的快照。
    pub fn snapshot(&self) -> DiagnosticsSnapshot {
        DiagnosticsSnapshot {
            uptime: self.start_time.map(|start| start.elapsed()),
            records_written: self.records_written.load(Ordering::Relaxed),
            records_dropped: self.records_dropped.load(Ordering::Relaxed),
            reconnects: self.reconnects.load(Ordering::Relaxed),
            store_errors: self.store_errors.load(Ordering::Relaxed),
            transcript_lines: self.transcript_lines.load(Ordering::Relaxed),
        }
    }
}

impl DiagnosticsSnapshot {
    /// 写入成功率（百分比），没有任何记录时为 100。
    pub fn success_rate_percent(&self) -> f64 {
        let attempted = self.records_written + self.records_dropped + self.store_errors;
        if attempted == 0 {
            100.0
        } else {
            (self.records_written as f64 / attempted as f64) * 100.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters() {
        let diagnostics = Diagnostics::new();
        diagnostics.increment_records_written();
        diagnostics.increment_records_written();
        diagnostics.increment_records_written();
        diagnostics.increment_records_dropped();
        diagnostics.increment_reconnects();
        diagnostics.increment_transcript_lines();

        let snapshot = diagnostics.snapshot();
        assert!(snapshot.uptime.is_some());
        assert_eq!(snapshot.records_written, 3);
        assert_eq!(snapshot.records_dropped, 1);
        assert_eq!(snapshot.reconnects, 1);
        assert_eq!(snapshot.store_errors, 0);
        assert_eq!(snapshot.transcript_lines, 1);
        assert_eq!(snapshot.success_rate_percent(), 75.0);
    }

    #[test]
    fn test_empty_success_rate() {
        let snapshot = Diagnostics::new().snapshot();
        assert_eq!(snapshot.success_rate_percent(), 100.0);
    }
}
