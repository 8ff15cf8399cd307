//! Explicit-allow authorization
//!
//! A [`PermissionPolicy`] maps collection names to the set of operation
//! kinds callers may run against them. The evaluator [`authorize`]
//! applies it to a whole request:
//!
//! - no policy configured (`None`): every request is allowed
//! - policy configured: an operation is allowed iff its collection is
//!   present in the map and its kind is in that collection's set
//! - a transaction is allowed iff every member is allowed
//!
//! There is no deny list and no wildcard. A collection absent from a
//! configured policy is fully denied, and an empty allow set locks a
//! collection down while keeping it visible in the policy.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::operation::{Operation, OperationKind, OperationRequest};

/// Per-collection allow sets.
///
/// Serializes as a bare map (`{"tasks": ["add", "getAll"]}`), so a
/// config table or a JSON document decodes straight into it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PermissionPolicy {
    collections: BTreeMap<String, BTreeSet<OperationKind>>,
}

impl PermissionPolicy {
    /// Create a policy that denies everything.
    pub fn new() -> Self {
        PermissionPolicy::default()
    }

    /// Add (or replace) the allow set for a collection.
    pub fn allow(
        mut self,
        collection: impl Into<String>,
        kinds: impl IntoIterator<Item = OperationKind>,
    ) -> Self {
        self.collections
            .insert(collection.into(), kinds.into_iter().collect());
        self
    }

    /// Whether the policy allows one operation.
    pub fn allows(&self, operation: &Operation) -> bool {
        self.collections
            .get(&operation.collection)
            .map_or(false, |kinds| kinds.contains(&operation.op))
    }

    /// Collections the policy mentions, in name order.
    pub fn collections(&self) -> impl Iterator<Item = &str> {
        self.collections.keys().map(String::as_str)
    }

    /// Number of collections the policy mentions.
    pub fn len(&self) -> usize {
        self.collections.len()
    }

    /// Whether the policy mentions no collection at all.
    pub fn is_empty(&self) -> bool {
        self.collections.is_empty()
    }
}

impl From<BTreeMap<String, BTreeSet<OperationKind>>> for PermissionPolicy {
    fn from(collections: BTreeMap<String, BTreeSet<OperationKind>>) -> Self {
        PermissionPolicy { collections }
    }
}

/// Decide whether `request` may proceed under `policy`.
///
/// `None` means no policy is configured and everything is allowed. With
/// a policy set, every member operation must be allowed; an empty
/// transaction has no members to deny and passes.
pub fn authorize(request: &OperationRequest, policy: Option<&PermissionPolicy>) -> bool {
    first_denied(request, policy).is_none()
}

/// The first member operation the policy rejects, if any.
///
/// Members are checked in request order, so the reported operation is
/// deterministic for a given request.
pub fn first_denied<'r>(
    request: &'r OperationRequest,
    policy: Option<&PermissionPolicy>,
) -> Option<&'r Operation> {
    let policy = policy?;
    request.members().iter().find(|op| !policy.allows(op))
}
