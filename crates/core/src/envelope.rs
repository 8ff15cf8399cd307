//! Execution outcome envelope
//!
//! Every request that reaches the executor produces an
//! [`ExecuteResult`], success or not. The gateway never inspects store
//! state to decide how a request went: `is_success` is the single
//! source of truth, and journal routing (success stream vs error
//! stream) keys off it alone.

use serde::{Deserialize, Serialize};

use crate::error::GatewayError;

/// Outcome of executing a request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecuteResult {
    /// Whether the executor applied the request.
    pub is_success: bool,
    /// Result payload when successful: matched documents, counts,
    /// affected-row tallies, whatever the verb returns.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
    /// Failure cause when not.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ExecuteResult {
    /// A successful outcome carrying `result`.
    pub fn success(result: serde_json::Value) -> Self {
        ExecuteResult {
            is_success: true,
            result: Some(result),
            error: None,
        }
    }

    /// A failed outcome carrying the cause.
    pub fn failure(cause: impl Into<String>) -> Self {
        ExecuteResult {
            is_success: false,
            result: None,
            error: Some(cause.into()),
        }
    }
}

/// Wire form of a hard gateway error:
/// `{"isSuccess": false, "error": {"code": …, "message": …}}`.
///
/// Hard errors never carry a result payload; the `code` lets callers
/// branch without parsing the message.
pub fn error_response(error: &GatewayError) -> serde_json::Value {
    serde_json::json!({
        "isSuccess": false,
        "error": {
            "code": error.code(),
            "message": error.to_string(),
        }
    })
}
