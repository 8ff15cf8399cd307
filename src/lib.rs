//! Palisade - durability and access-control gateway for an in-memory store
//!
//! Palisade fronts a versioned in-memory document store with a request
//! gateway that authorizes, executes and journals every operation, and
//! a background scheduler that captures periodic full-state snapshots.
//!
//! # Quick Start
//!
//! ```ignore
//! use palisade::Service;
//! use serde_json::json;
//!
//! // Open a gateway over ./data (config and journal streams are
//! // created on first use)
//! let service = Service::open("./data")?;
//!
//! let result = service.handle(&json!({
//!     "op": "add",
//!     "collection": "tasks",
//!     "params": {"items": [{"title": "write docs"}]}
//! }))?;
//! assert!(result.is_success);
//! ```
//!
//! # Architecture
//!
//! Requests flow through [`Service::handle`]: parse into an
//! [`OperationRequest`], check it against the configured
//! [`PermissionPolicy`], execute it on the store, and append the
//! original request to the success or error stream of the [`Journal`].
//! The [`SnapshotScheduler`] runs beside this flow and writes the
//! store's [`StateImage`] to the snapshot stream on a fixed cadence.

// Re-export the public API of the member crates
pub use palisade_core::*;
pub use palisade_gateway::*;
pub use palisade_journal::{
    CodecError, Journal, JournalError, JournalResult, PlainCodec, RecordCodec, RecordId,
    RetentionPolicy, StreamConfig,
};
pub use palisade_store::{MemoryStore, StoreError};
