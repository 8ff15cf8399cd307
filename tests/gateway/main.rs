//! Integration tests for the gateway.
//!
//! These exercise the full Service lifecycle (open, handle, journal,
//! snapshot) over a real data directory. Unit tests in the member
//! crates cover parsing, policy evaluation, journal mechanics and
//! store semantics in isolation; these cover the end-to-end contract.

#[path = "../common/mod.rs"]
mod common;

mod config_lifecycle;
mod request_flow;
mod retention;
mod snapshot_consistency;
