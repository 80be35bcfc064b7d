//! 封禁与解除封禁

#![cfg(feature = "sqlite")]

mod common;

use chanlog::sinks::database::{RecordOutcome, RelationalSink};
use common::sqlite_config;
use tempfile::TempDir;

#[test]
fn forwarded_ban_records_reason() {
    let dir = TempDir::new().unwrap();
    let mut sink = RelationalSink::new(sqlite_config(&dir)).unwrap();

    let outcome = sink
        .record_ban("op", "op@host", "+b", "*!*@1.2.3.4$#forwarded", "#rust")
        .unwrap();
    assert_eq!(outcome, RecordOutcome::Recorded);

    let channel_id = sink.resolve_channel_id("#rust").unwrap();
    let bans = sink.store_mut().bans(channel_id).unwrap();
    assert_eq!(bans.len(), 1);
    assert_eq!(bans[0].banmask, "*!*@1.2.3.4");
    assert_eq!(bans[0].banned_by, "op");
    assert!(bans[0].still_banned);
    let reason = bans[0].reason.as_deref().unwrap();
    assert!(reason.contains("forwarded"), "reason: {}", reason);
}

#[test]
fn plain_ban_has_no_reason() {
    let dir = TempDir::new().unwrap();
    let mut sink = RelationalSink::new(sqlite_config(&dir)).unwrap();

    sink.record_ban("op", "op@host", "+b", "*!*@1.2.3.4", "#rust")
        .unwrap();

    let channel_id = sink.resolve_channel_id("#rust").unwrap();
    let bans = sink.store_mut().bans(channel_id).unwrap();
    assert_eq!(bans.len(), 1);
    assert_eq!(bans[0].banmask, "*!*@1.2.3.4");
    assert_eq!(bans[0].reason, None);
}

#[test]
fn unban_lifts_without_new_row() {
    let dir = TempDir::new().unwrap();
    let mut sink = RelationalSink::new(sqlite_config(&dir)).unwrap();

    sink.record_ban("op", "op@host", "+b", "*!*@1.2.3.4", "#rust")
        .unwrap();
    sink.record_ban("op", "op@host", "+b", "*!*@5.6.7.8", "#rust")
        .unwrap();
    sink.record_ban("op", "op@host", "+b", "*!*@1.2.3.4", "#other")
        .unwrap();

    sink.record_unban("op", "op@host", "-b", "*!*@1.2.3.4", "#rust")
        .unwrap();

    let rust = sink.resolve_channel_id("#rust").unwrap();
    let bans = sink.store_mut().bans(rust).unwrap();
    assert_eq!(bans.len(), 2);
    for ban in &bans {
        assert_eq!(ban.still_banned, ban.banmask != "*!*@1.2.3.4", "{}", ban.banmask);
    }

    // 其他频道的同名封禁不受影响
    let other = sink.resolve_channel_id("#other").unwrap();
    let bans = sink.store_mut().bans(other).unwrap();
    assert_eq!(bans.len(), 1);
    assert!(bans[0].still_banned);
}

#[test]
fn unban_of_unknown_mask_is_recorded_noop() {
    let dir = TempDir::new().unwrap();
    let mut sink = RelationalSink::new(sqlite_config(&dir)).unwrap();

    let outcome = sink
        .record_unban("op", "op@host", "-b", "*!*@9.9.9.9", "#rust")
        .unwrap();
    assert_eq!(outcome, RecordOutcome::Recorded);

    let channel_id = sink.resolve_channel_id("#rust").unwrap();
    assert!(sink.store_mut().bans(channel_id).unwrap().is_empty());
}
