//! Store error types
//!
//! Store errors never cross the executor trait as errors: the store
//! converts them into failure envelopes (`isSuccess == false`) at the
//! boundary. They exist so operation code can fail with structure
//! instead of ad-hoc strings.

use thiserror::Error;

/// Errors raised while applying operations to collections.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The params payload does not fit the operation kind.
    #[error("invalid params for {op}: {reason}")]
    InvalidParams {
        /// Wire name of the offending kind.
        op: String,
        /// What was wrong with the payload.
        reason: String,
    },

    /// A transaction member failed; nothing was applied.
    #[error("transaction member {index} failed: {cause}")]
    MemberFailed {
        /// Zero-based position of the failing member.
        index: usize,
        /// The member's own failure message.
        cause: String,
    },
}

impl StoreError {
    /// Invalid-params constructor taking the kind's wire name.
    pub fn invalid_params(op: impl std::fmt::Display, reason: impl Into<String>) -> Self {
        StoreError::InvalidParams {
            op: op.to_string(),
            reason: reason.into(),
        }
    }
}
