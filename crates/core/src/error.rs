//! Gateway error taxonomy
//!
//! [`GatewayError`] covers the two hard request-level failures: a
//! payload that does not decode, and a policy denial. Both are reported
//! to the caller as distinct outcomes and neither reaches the executor.
//!
//! The other two failure classes of the system live elsewhere:
//! - execution failure travels inside [`ExecuteResult`] with
//!   `is_success == false` (the engine ran and said no)
//! - persistence failure (journals, snapshots) is logged operationally
//!   and never changes an already-computed outcome
//!
//! [`ExecuteResult`]: crate::envelope::ExecuteResult

use serde::{Deserialize, Serialize};

use crate::operation::OperationKind;

/// Hard request-level failures.
///
/// Structured and serializable so error responses can carry typed
/// details to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, thiserror::Error)]
pub enum GatewayError {
    /// The payload does not decode into an operation request.
    #[error("malformed request: {reason}")]
    MalformedRequest {
        /// Decode failure detail, suitable for the caller.
        reason: String,
    },

    /// The policy rejects at least one member operation.
    #[error("operation not permitted: {op} on {collection}")]
    PermissionDenied {
        /// Collection the denied member targeted.
        collection: String,
        /// Kind of the denied member.
        op: OperationKind,
    },
}

impl GatewayError {
    /// Stable wire code for error responses.
    pub fn code(&self) -> &'static str {
        match self {
            GatewayError::MalformedRequest { .. } => "malformedRequest",
            GatewayError::PermissionDenied { .. } => "permissionDenied",
        }
    }
}

/// Result alias for gateway operations.
pub type Result<T> = std::result::Result<T, GatewayError>;
