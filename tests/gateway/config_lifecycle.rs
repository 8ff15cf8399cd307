//! Config and lifecycle tests
//!
//! The data directory contract across service restarts: the config
//! file is created once and then owned by the operator, journal
//! records are durable, store contents are not.

use crate::common::*;
use palisade::{GatewayConfig, CONFIG_FILE_NAME, SUCCESS_STREAM};
use serde_json::json;

#[test]
fn first_open_writes_default_config() {
    let gateway = TestGateway::open();

    let path = gateway.dir.path().join(CONFIG_FILE_NAME);
    assert!(path.exists());

    // The written file must parse back to the running defaults.
    let parsed = GatewayConfig::from_file(&path).unwrap();
    assert_eq!(parsed.snapshot.retention, 7);
    assert_eq!(gateway.service.config().snapshot.retention, 7);
    assert!(parsed.policy.is_none());
}

#[test]
fn customized_config_survives_reopen() {
    let mut gateway = TestGateway::open_with_config(
        r#"
[snapshot]
interval = "12h"
retention = 3

[policy]
tasks = ["add", "getAll"]
"#,
    );
    gateway.reopen();

    let config = gateway.service.config();
    assert_eq!(config.snapshot.retention, 3);
    assert!(config.policy.is_some());

    // Policy from the file is still enforced after the restart.
    let err = gateway
        .service
        .handle(&single("clear", "tasks", json!(null)))
        .unwrap_err();
    assert_eq!(err.code(), "permissionDenied");
}

#[test]
fn journal_persists_but_store_does_not() {
    let mut gateway = TestGateway::open();
    for i in 0..3 {
        gateway
            .service
            .handle(&add("tasks", json!([{"n": i}])))
            .unwrap();
    }
    assert_eq!(gateway.stream_len(SUCCESS_STREAM), 3);

    gateway.reopen();

    // Journaled requests are on disk; the in-memory store starts
    // empty.
    assert_eq!(gateway.stream_len(SUCCESS_STREAM), 3);
    let all = gateway
        .service
        .handle(&single("getAll", "tasks", json!(null)))
        .unwrap();
    assert_eq!(all.result, Some(json!([])));
}
