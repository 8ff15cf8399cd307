//! Reference in-memory executor for Palisade
//!
//! [`MemoryStore`] implements the gateway's executor trait over a
//! single `RwLock`-guarded map of collections. Semantics are
//! deliberately minimal and schema-free: documents are raw JSON values,
//! filters are field-equality objects, and transactions commit
//! all-or-nothing by staging a clone and swapping it in. The executor
//! trait remains the contract; a real engine can replace this crate
//! without touching the gateway.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod ops;
pub mod store;

pub use error::StoreError;
pub use store::MemoryStore;
