//! The in-memory store behind the executor trait
//!
//! One `RwLock` guards the whole store. Reads (`getAll`, `search`,
//! `count`) run under the read lock; mutations and transactions run
//! under the write lock. A transaction stages a clone of the
//! collections map, applies every member in order, and swaps the clone
//! in only if all of them succeed, so no reader and no state image can
//! ever observe a partial application.
//!
//! The clone-and-swap commit is O(data) per transaction. Acceptable
//! here: this is the reference executor and working sets are small; the
//! executor trait is the seam for anything smarter.

use palisade_core::{ExecuteResult, Operation, OperationRequest, QueryExecutor, StateImage};
use parking_lot::RwLock;
use serde_json::Value;

use crate::error::StoreError;
use crate::ops::{self, Collections};

struct StoreInner {
    collections: Collections,
    /// Counts applied mutating requests. Two state images with equal
    /// versions have identical contents.
    version: u64,
}

/// Reference in-memory executor.
pub struct MemoryStore {
    inner: RwLock<StoreInner>,
}

impl MemoryStore {
    /// Create an empty store at version 0.
    pub fn new() -> Self {
        MemoryStore {
            inner: RwLock::new(StoreInner {
                collections: Collections::new(),
                version: 0,
            }),
        }
    }

    /// Current store version.
    pub fn version(&self) -> u64 {
        self.inner.read().version
    }

    fn execute_single(&self, operation: &Operation) -> ExecuteResult {
        if operation.op.mutates() {
            let mut inner = self.inner.write();
            match ops::apply_write(&mut inner.collections, operation) {
                Ok(result) => {
                    inner.version += 1;
                    ExecuteResult::success(result)
                }
                Err(err) => ExecuteResult::failure(err.to_string()),
            }
        } else {
            let inner = self.inner.read();
            match ops::apply_read(&inner.collections, operation) {
                Ok(result) => ExecuteResult::success(result),
                Err(err) => ExecuteResult::failure(err.to_string()),
            }
        }
    }

    fn execute_transaction(&self, operations: &[Operation]) -> ExecuteResult {
        let mut inner = self.inner.write();
        let mut staged = inner.collections.clone();

        let mut results = Vec::with_capacity(operations.len());
        for (index, operation) in operations.iter().enumerate() {
            match ops::apply(&mut staged, operation) {
                Ok(result) => results.push(result),
                Err(err) => {
                    // Staged copy is dropped; the store is untouched.
                    return ExecuteResult::failure(
                        StoreError::MemberFailed {
                            index,
                            cause: err.to_string(),
                        }
                        .to_string(),
                    );
                }
            }
        }

        let mutated = operations.iter().any(|operation| operation.op.mutates());
        inner.collections = staged;
        if mutated {
            inner.version += 1;
        }
        ExecuteResult::success(Value::Array(results))
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        MemoryStore::new()
    }
}

impl QueryExecutor for MemoryStore {
    fn execute(&self, request: &OperationRequest) -> ExecuteResult {
        match request {
            OperationRequest::Single(operation) => self.execute_single(operation),
            OperationRequest::Transaction(txn) => self.execute_transaction(&txn.operations),
        }
    }

    /// Clones `(version, collections)` under the read lock and returns.
    /// Serialization of the image happens at the caller, outside any
    /// store lock.
    fn state_image(&self) -> StateImage {
        let inner = self.inner.read();
        StateImage {
            version: inner.version,
            collections: inner.collections.clone(),
        }
    }
}
