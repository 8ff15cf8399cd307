//! Snapshot tests
//!
//! Scheduled and on-demand snapshots at the Service level: cadence
//! from the config file, content matching store state, and consistency
//! under concurrent transactional writes.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::common::*;
use palisade::SNAPSHOT_STREAM;
use serde_json::json;

#[test]
fn scheduled_snapshots_follow_config_cadence() {
    let gateway = TestGateway::open_with_config(
        r#"
[snapshot]
interval = "50ms"
retention = 0
"#,
    );

    std::thread::sleep(Duration::from_millis(300));
    gateway.service.shutdown();

    let ticked = gateway.stream_len(SNAPSHOT_STREAM);
    assert!(ticked >= 2, "expected at least 2 snapshots, got {ticked}");

    // No more ticks after shutdown.
    std::thread::sleep(Duration::from_millis(150));
    assert_eq!(gateway.stream_len(SNAPSHOT_STREAM), ticked);
}

#[test]
fn snapshot_content_matches_store_state() {
    let gateway = TestGateway::open();
    gateway
        .service
        .handle(&add("tasks", json!([{"title": "a"}, {"title": "b"}])))
        .unwrap();
    gateway
        .service
        .handle(&add("notes", json!([{"text": "hi"}])))
        .unwrap();

    let id = gateway.service.write_snapshot().unwrap();
    let image = gateway.service.journal().read(SNAPSHOT_STREAM, &id).unwrap();

    assert_eq!(image["version"], 2);
    assert_eq!(
        image["collections"]["tasks"],
        json!([{"title": "a"}, {"title": "b"}])
    );
    assert_eq!(image["collections"]["notes"], json!([{"text": "hi"}]));
}

// Interleaves two-member transactions with snapshot writes. Every
// member pair adds one document to each of two collections, so any
// snapshot carrying a half-applied transaction would show unequal
// collection sizes.
#[test]
fn snapshot_never_captures_partial_transaction() {
    let gateway = TestGateway::open_with_config(
        r#"
[snapshot]
interval = "1h"
retention = 0
"#,
    );
    let rounds = 40;

    let done = Arc::new(AtomicBool::new(false));
    let writer = {
        let service = Arc::clone(&gateway.service);
        let done = Arc::clone(&done);
        std::thread::spawn(move || {
            for i in 0..rounds {
                let result = service
                    .handle(&json!({
                        "transaction": [
                            {"op": "add", "collection": "left",
                             "params": {"items": [{"round": i}]}},
                            {"op": "add", "collection": "right",
                             "params": {"items": [{"round": i}]}}
                        ]
                    }))
                    .unwrap();
                assert!(result.is_success);
            }
            done.store(true, Ordering::Release);
        })
    };

    let journal = gateway.service.journal();
    while !done.load(Ordering::Acquire) {
        let id = gateway.service.write_snapshot().unwrap();
        let image = journal.read(SNAPSHOT_STREAM, &id).unwrap();
        let left = image["collections"]["left"]
            .as_array()
            .map_or(0, |docs| docs.len());
        let right = image["collections"]["right"]
            .as_array()
            .map_or(0, |docs| docs.len());
        assert_eq!(left, right, "snapshot shows a half-applied transaction");
    }
    writer.join().unwrap();

    let id = gateway.service.write_snapshot().unwrap();
    let image = journal.read(SNAPSHOT_STREAM, &id).unwrap();
    assert_eq!(image["collections"]["left"].as_array().unwrap().len(), rounds);
    assert_eq!(
        image["collections"]["right"].as_array().unwrap().len(),
        rounds
    );
}
