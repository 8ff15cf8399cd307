//! Core types for Palisade
//!
//! This crate defines the vocabulary shared by every layer of the gateway:
//! - OperationKind / Operation / OperationRequest: the instruction set
//! - PermissionPolicy + authorize: explicit-allow authorization
//! - ExecuteResult: the outcome envelope returned by the executor
//! - GatewayError: hard request-level failures (malformed, denied)
//! - QueryExecutor / StateImage: the seam between gateway and engine

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod envelope;
pub mod error;
pub mod operation;
pub mod policy;
pub mod traits;

pub use envelope::{error_response, ExecuteResult};
pub use error::{GatewayError, Result};
pub use operation::{Operation, OperationKind, OperationRequest, Transaction};
pub use policy::{authorize, first_denied, PermissionPolicy};
pub use traits::{QueryExecutor, StateImage};
