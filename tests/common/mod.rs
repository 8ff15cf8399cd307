//! Shared test utilities for the integration suites.
//!
//! Import via `#[path = "../common/mod.rs"] mod common;` from any
//! suite's main.rs.

#![allow(dead_code)]

use std::sync::Arc;

use palisade::{Service, CONFIG_FILE_NAME};
use serde_json::{json, Value};
use tempfile::TempDir;

/// A gateway service over a throwaway data directory.
///
/// The directory is removed when the wrapper drops; the service shuts
/// its scheduler down first.
pub struct TestGateway {
    pub service: Arc<Service>,
    pub dir: TempDir,
}

impl TestGateway {
    /// Open a gateway with the default configuration.
    pub fn open() -> Self {
        let dir = TempDir::new().expect("create temp dir");
        let service = Service::open(dir.path()).expect("open gateway");
        TestGateway {
            service: Arc::new(service),
            dir,
        }
    }

    /// Write `config` as the data directory's palisade.toml, then open.
    pub fn open_with_config(config: &str) -> Self {
        let dir = TempDir::new().expect("create temp dir");
        std::fs::write(dir.path().join(CONFIG_FILE_NAME), config).expect("write config");
        let service = Service::open(dir.path()).expect("open gateway");
        TestGateway {
            service: Arc::new(service),
            dir,
        }
    }

    /// Reopen a service over the same data directory.
    ///
    /// The current service is shut down first so only one scheduler
    /// runs at a time.
    pub fn reopen(&mut self) {
        self.service.shutdown();
        self.service = Arc::new(Service::open(self.dir.path()).expect("reopen gateway"));
    }

    /// Number of records currently in `stream`.
    pub fn stream_len(&self, stream: &str) -> usize {
        self.service
            .journal()
            .list(stream)
            .expect("list stream")
            .len()
    }

    /// File names currently on disk in a stream directory, sorted.
    pub fn files_in(&self, stream: &str) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(self.dir.path().join(stream))
            .expect("read stream dir")
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }
}

/// Single-operation request body.
pub fn single(op: &str, collection: &str, params: Value) -> Value {
    json!({"op": op, "collection": collection, "params": params})
}

/// An `add` request carrying `items`.
pub fn add(collection: &str, items: Value) -> Value {
    single("add", collection, json!({"items": items}))
}
