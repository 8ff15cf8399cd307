//! Retention tests
//!
//! Stream limits from the config file, enforced on disk: bounded
//! streams hold at most N files and always the newest N, unbounded
//! streams never lose a record.

use std::time::Duration;

use crate::common::*;
use palisade::{ERROR_STREAM, SNAPSHOT_STREAM, SUCCESS_STREAM};
use serde_json::json;

// Identifier timestamps are millisecond-resolution; spacing appends
// keeps creation order and name order identical.
fn pace() {
    std::thread::sleep(Duration::from_millis(2));
}

#[test]
fn snapshot_stream_keeps_only_newest_files() {
    let gateway = TestGateway::open_with_config(
        r#"
[snapshot]
interval = "1h"
retention = 7
"#,
    );

    let mut ids = Vec::new();
    for _ in 0..9 {
        ids.push(gateway.service.write_snapshot().unwrap());
        pace();
    }

    let expected: Vec<String> = ids[2..].iter().map(|id| id.file_name("snap")).collect();
    assert_eq!(gateway.files_in(SNAPSHOT_STREAM), expected);
}

#[test]
fn success_stream_is_unbounded_by_default() {
    let gateway = TestGateway::open();

    for i in 0..20 {
        let result = gateway
            .service
            .handle(&add("tasks", json!([{"n": i}])))
            .unwrap();
        assert!(result.is_success);
        pace();
    }

    assert_eq!(gateway.stream_len(SUCCESS_STREAM), 20);
}

#[test]
fn success_log_retention_from_config() {
    let gateway = TestGateway::open_with_config(
        r#"
[success_log]
retention = 5
"#,
    );

    for i in 0..12 {
        gateway
            .service
            .handle(&add("tasks", json!([{"n": i}])))
            .unwrap();
        pace();
    }

    assert_eq!(gateway.stream_len(SUCCESS_STREAM), 5);

    // The survivors are the five newest: their payloads are the last
    // five requests.
    let journal = gateway.service.journal();
    let ids = journal.list(SUCCESS_STREAM).unwrap();
    let kept: Vec<i64> = ids
        .iter()
        .map(|id| {
            journal.read(SUCCESS_STREAM, id).unwrap()["params"]["items"][0]["n"]
                .as_i64()
                .unwrap()
        })
        .collect();
    assert_eq!(kept, vec![7, 8, 9, 10, 11]);
}

#[test]
fn error_log_retention_is_independent() {
    let gateway = TestGateway::open_with_config(
        r#"
[error_log]
retention = 3
"#,
    );

    for i in 0..5 {
        // Invalid add, lands in the error stream.
        gateway
            .service
            .handle(&single("add", "tasks", json!({})))
            .unwrap();
        pace();
        gateway
            .service
            .handle(&add("tasks", json!([{"n": i}])))
            .unwrap();
        pace();
    }

    assert_eq!(gateway.stream_len(ERROR_STREAM), 3);
    assert_eq!(gateway.stream_len(SUCCESS_STREAM), 5);
}

#[test]
fn retention_counts_files_across_reopen() {
    let config = r#"
[snapshot]
interval = "1h"
retention = 7
"#;
    let mut gateway = TestGateway::open_with_config(config);

    for _ in 0..5 {
        gateway.service.write_snapshot().unwrap();
        pace();
    }
    gateway.reopen();
    for _ in 0..5 {
        gateway.service.write_snapshot().unwrap();
        pace();
    }

    // Files from the first instance count against the limit.
    assert_eq!(gateway.files_in(SNAPSHOT_STREAM).len(), 7);
}
