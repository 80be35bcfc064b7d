//! resolve-or-create 的幂等性

#![cfg(feature = "sqlite")]

mod common;

use std::sync::atomic::Ordering;

use chanlog::error::ChanlogError;
use chanlog::sinks::database::RelationalSink;
use common::{capture_logs, lines_at, sqlite_config, FlakyConnector};
use proptest::prelude::*;
use tempfile::TempDir;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn user_pairs_resolve_to_stable_ids(
        pairs in proptest::collection::vec(("[a-z]{1,3}", "[a-z]{1,2}@h"), 1..12)
    ) {
        let dir = TempDir::new().unwrap();
        let mut sink = RelationalSink::new(sqlite_config(&dir)).unwrap();

        let mut seen = std::collections::HashMap::new();
        for (name, host) in &pairs {
            let id = sink.resolve_or_create_user(name, host).unwrap();
            let previous = *seen.entry((name.clone(), host.clone())).or_insert(id);
            prop_assert_eq!(previous, id);
            prop_assert_eq!(sink.resolve_user_id(name, host).unwrap(), Some(id));
        }

        let users = sink.store_mut().users().unwrap();
        prop_assert_eq!(users.len(), seen.len());
    }

    #[test]
    fn channels_are_never_duplicated(names in proptest::collection::vec("#[a-c]{1,2}", 1..12)) {
        let dir = TempDir::new().unwrap();
        let mut sink = RelationalSink::new(sqlite_config(&dir)).unwrap();

        let mut seen = std::collections::HashMap::new();
        for name in &names {
            let id = sink.resolve_channel_id(name).unwrap();
            prop_assert_eq!(*seen.entry(name.clone()).or_insert(id), id);
        }

        prop_assert_eq!(sink.store_mut().channels().unwrap().len(), seen.len());
    }
}

#[test]
fn distinct_hosts_are_distinct_users() {
    let dir = TempDir::new().unwrap();
    let mut sink = RelationalSink::new(sqlite_config(&dir)).unwrap();

    let home = sink.resolve_or_create_user("alice", "alice@home").unwrap();
    let work = sink.resolve_or_create_user("alice", "alice@work").unwrap();
    assert_ne!(home, work);
}

#[test]
fn missing_row_after_insert_is_logged_once() {
    let dir = TempDir::new().unwrap();
    let connector = FlakyConnector::default();
    let faults = connector.faults.clone();
    let mut sink = RelationalSink::with_connector(sqlite_config(&dir), connector).unwrap();

    faults.swallow_inserts.store(true, Ordering::SeqCst);
    let (result, logs) = capture_logs(|| sink.resolve_channel_id("#ghost"));

    assert!(matches!(result, Err(ChanlogError::Inconsistency(_))));
    let errors = lines_at(&logs, "ERROR");
    assert_eq!(errors.len(), 1, "{}", logs);
    assert!(errors[0].contains("Error within resolve_channel_id"));
    assert!(errors[0].contains("#ghost"));
    assert_eq!(sink.diagnostics().snapshot().store_errors, 1);
}
