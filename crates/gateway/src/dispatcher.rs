//! Request dispatch: parse, authorize, execute, record
//!
//! Every inbound request passes through [`Dispatcher::handle`] and ends
//! in exactly one of three terminal states:
//!
//! - malformed: rejected before any side effect, nothing journaled
//! - denied: journaled to the error stream, surfaced as a permission
//!   error
//! - executed: the executor's envelope is returned verbatim and the
//!   request is journaled to the success or error stream by its
//!   success flag
//!
//! Journal writes never fail a request that already executed; a failed
//! append is logged and the response still reaches the caller.

use std::sync::Arc;

use palisade_core::{
    first_denied, ExecuteResult, GatewayError, OperationRequest, PermissionPolicy, QueryExecutor,
    Result,
};
use palisade_journal::Journal;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::{ERROR_STREAM, SUCCESS_STREAM};

/// Routes requests through authorization, execution and journaling.
pub struct Dispatcher {
    executor: Arc<dyn QueryExecutor>,
    journal: Arc<Journal>,
    policy: Option<PermissionPolicy>,
}

impl Dispatcher {
    /// Create a dispatcher over an executor and a journal.
    ///
    /// `policy = None` allows every operation on every collection.
    pub fn new(
        executor: Arc<dyn QueryExecutor>,
        journal: Arc<Journal>,
        policy: Option<PermissionPolicy>,
    ) -> Self {
        Dispatcher {
            executor,
            journal,
            policy,
        }
    }

    /// Handle one raw request.
    ///
    /// Returns `Ok` with the executor's envelope when the request was
    /// executed (successfully or not), and `Err` when it never reached
    /// the executor: malformed input or a policy denial.
    pub fn handle(&self, raw: &Value) -> Result<ExecuteResult> {
        let request = match OperationRequest::deserialize(raw) {
            Ok(request) => request,
            Err(err) => {
                debug!(target: "palisade::gateway", error = %err, "rejected malformed request");
                return Err(GatewayError::MalformedRequest {
                    reason: err.to_string(),
                });
            }
        };

        if let Some(denied) = first_denied(&request, self.policy.as_ref()) {
            warn!(
                target: "palisade::gateway",
                collection = %denied.collection,
                op = %denied.op,
                "request denied by policy"
            );
            let err = GatewayError::PermissionDenied {
                collection: denied.collection.clone(),
                op: denied.op,
            };
            self.record(ERROR_STREAM, raw);
            return Err(err);
        }

        let result = self.executor.execute(&request);
        let stream = if result.is_success {
            SUCCESS_STREAM
        } else {
            ERROR_STREAM
        };
        self.record(stream, raw);
        Ok(result)
    }

    /// Append the original request to a journal stream.
    ///
    /// The response already belongs to the caller at this point, so an
    /// append failure is logged rather than propagated.
    fn record(&self, stream: &str, raw: &Value) {
        if let Err(err) = self.journal.append(stream, raw) {
            warn!(
                target: "palisade::gateway",
                stream,
                error = %err,
                "failed to journal request"
            );
        }
    }
}
