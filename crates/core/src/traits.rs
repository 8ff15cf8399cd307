//! The seam between the gateway and the execution engine
//!
//! The gateway itself never touches collections. It validates and
//! authorizes a request, hands it to a [`QueryExecutor`], and journals
//! the outcome. Everything about how operations mutate data sits behind
//! this trait, so the engine can be swapped (or stubbed in tests)
//! without touching the gateway.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::envelope::ExecuteResult;
use crate::operation::OperationRequest;

/// Point-in-time copy of the store's full state.
///
/// Captured atomically with respect to concurrent mutations: an image
/// either contains all effects of a transaction or none of them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateImage {
    /// Store version at capture time. Strictly increases with every
    /// applied mutation, so equal versions imply identical contents.
    pub version: u64,
    /// Every collection with its documents, in name order.
    pub collections: BTreeMap<String, Vec<serde_json::Value>>,
}

impl StateImage {
    /// An image of an empty store.
    pub fn empty() -> Self {
        StateImage {
            version: 0,
            collections: BTreeMap::new(),
        }
    }

    /// Total number of documents across all collections.
    pub fn document_count(&self) -> usize {
        self.collections.values().map(Vec::len).sum()
    }
}

/// Execution engine consumed by the gateway.
///
/// Thread safety: the gateway calls `execute` from many request threads
/// and `state_image` from the snapshot scheduler, all concurrently, so
/// implementations require `Send + Sync`.
pub trait QueryExecutor: Send + Sync {
    /// Execute a validated, authorized request and report the outcome.
    ///
    /// Engine-level refusals (bad params, unknown collection semantics,
    /// a failing transaction member) come back as a failed
    /// [`ExecuteResult`], never as a panic. A transaction either applies
    /// fully or leaves the store untouched.
    fn execute(&self, request: &OperationRequest) -> ExecuteResult;

    /// Capture a consistent full-state image for snapshotting.
    ///
    /// Must never observe a partially applied transaction.
    fn state_image(&self) -> StateImage;
}
