//! Request flow tests
//!
//! The externally observable contract of `Service::handle`: which
//! requests reach the store, what the caller gets back, and which
//! stream each request lands in.

use crate::common::*;
use palisade::{GatewayError, OperationKind, ERROR_STREAM, SUCCESS_STREAM};
use serde_json::json;

const USERS_POLICY: &str = r#"
[policy]
users = ["add", "getAll"]
"#;

#[test]
fn authorized_request_succeeds_and_is_journaled() {
    let gateway = TestGateway::open_with_config(USERS_POLICY);

    let result = gateway
        .service
        .handle(&add("users", json!([{"name": "ada"}])))
        .unwrap();

    assert!(result.is_success);
    assert_eq!(result.result, Some(json!({"added": 1})));
    assert_eq!(gateway.stream_len(SUCCESS_STREAM), 1);
    assert_eq!(gateway.stream_len(ERROR_STREAM), 0);
}

#[test]
fn denied_request_is_rejected_and_audited() {
    let gateway = TestGateway::open_with_config(USERS_POLICY);
    gateway
        .service
        .handle(&add("users", json!([{"name": "ada"}])))
        .unwrap();

    let denied = single("clear", "users", json!(null));
    let err = gateway.service.handle(&denied).unwrap_err();

    assert!(matches!(
        err,
        GatewayError::PermissionDenied {
            op: OperationKind::Clear,
            ..
        }
    ));
    assert_eq!(gateway.stream_len(SUCCESS_STREAM), 1);
    assert_eq!(gateway.stream_len(ERROR_STREAM), 1);

    // The audit record is the original request, byte for byte.
    let journal = gateway.service.journal();
    let ids = journal.list(ERROR_STREAM).unwrap();
    assert_eq!(journal.read(ERROR_STREAM, &ids[0]).unwrap(), denied);

    // The denied clear never reached the store.
    let all = gateway
        .service
        .handle(&single("getAll", "users", json!(null)))
        .unwrap();
    assert_eq!(all.result, Some(json!([{"name": "ada"}])));
}

#[test]
fn malformed_request_never_reaches_journal() {
    let gateway = TestGateway::open();

    let err = gateway
        .service
        .handle(&json!({"op": "levitate", "collection": "users"}))
        .unwrap_err();

    assert!(matches!(err, GatewayError::MalformedRequest { .. }));
    assert_eq!(gateway.stream_len(SUCCESS_STREAM), 0);
    assert_eq!(gateway.stream_len(ERROR_STREAM), 0);
}

#[test]
fn execution_failure_is_journaled_to_error_stream() {
    let gateway = TestGateway::open();

    // Well-formed but invalid for the store: add without items.
    let result = gateway
        .service
        .handle(&single("add", "tasks", json!({})))
        .unwrap();

    assert!(!result.is_success);
    assert!(result.error.is_some());
    assert_eq!(gateway.stream_len(SUCCESS_STREAM), 0);
    assert_eq!(gateway.stream_len(ERROR_STREAM), 1);
}

#[test]
fn transaction_is_atomic_through_the_gateway() {
    let gateway = TestGateway::open();
    gateway
        .service
        .handle(&add("tasks", json!([{"stale": true}])))
        .unwrap();

    let result = gateway
        .service
        .handle(&json!({
            "transaction": [
                {"op": "clear", "collection": "tasks"},
                {"op": "add", "collection": "tasks",
                 "params": {"items": [{"n": 1}, {"n": 2}]}}
            ]
        }))
        .unwrap();

    assert!(result.is_success);
    assert_eq!(
        result.result,
        Some(json!([{"cleared": 1}, {"added": 2}]))
    );

    let all = gateway
        .service
        .handle(&single("getAll", "tasks", json!(null)))
        .unwrap();
    assert_eq!(all.result, Some(json!([{"n": 1}, {"n": 2}])));
}

#[test]
fn failed_transaction_member_rolls_back_the_whole_request() {
    let gateway = TestGateway::open();
    gateway
        .service
        .handle(&add("tasks", json!([{"keep": true}])))
        .unwrap();

    let result = gateway
        .service
        .handle(&json!({
            "transaction": [
                {"op": "clear", "collection": "tasks"},
                {"op": "add", "collection": "tasks", "params": {}}
            ]
        }))
        .unwrap();

    assert!(!result.is_success);
    assert_eq!(gateway.stream_len(ERROR_STREAM), 1);

    // The clear from the failed transaction is not visible.
    let all = gateway
        .service
        .handle(&single("getAll", "tasks", json!(null)))
        .unwrap();
    assert_eq!(all.result, Some(json!([{"keep": true}])));
}

#[test]
fn transaction_is_denied_when_any_member_is() {
    let gateway = TestGateway::open_with_config(USERS_POLICY);

    let err = gateway
        .service
        .handle(&json!({
            "transaction": [
                {"op": "add", "collection": "users",
                 "params": {"items": [{"name": "eve"}]}},
                {"op": "delete", "collection": "users",
                 "params": {"where": {"name": "ada"}}}
            ]
        }))
        .unwrap_err();

    assert!(matches!(
        err,
        GatewayError::PermissionDenied {
            op: OperationKind::Delete,
            ..
        }
    ));

    // No member executed, including the allowed first one.
    let all = gateway
        .service
        .handle(&single("getAll", "users", json!(null)))
        .unwrap();
    assert_eq!(all.result, Some(json!([])));
}

#[test]
fn empty_transaction_is_vacuously_authorized() {
    // A policy table with no collections denies every operation,
    // but there is nothing to deny here.
    let gateway = TestGateway::open_with_config("[policy]\n");

    let result = gateway.service.handle(&json!({"transaction": []})).unwrap();
    assert!(result.is_success);
    assert_eq!(gateway.stream_len(SUCCESS_STREAM), 1);
}

#[test]
fn unlisted_collection_is_unreachable() {
    let gateway = TestGateway::open_with_config(USERS_POLICY);

    let err = gateway
        .service
        .handle(&single("getAll", "secrets", json!(null)))
        .unwrap_err();
    assert!(matches!(err, GatewayError::PermissionDenied { .. }));
}

#[test]
fn absent_policy_table_allows_everything() {
    let gateway = TestGateway::open();

    for body in [
        add("anything", json!([{"x": 1}])),
        single("clear", "anything", json!(null)),
        single("count", "anything", json!(null)),
    ] {
        assert!(gateway.service.handle(&body).unwrap().is_success);
    }
}
