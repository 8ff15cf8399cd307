//! Operation descriptors
//!
//! This module defines the instruction vocabulary the gateway accepts:
//! - `OperationKind`: the closed set of verbs the engine understands
//! - `Operation`: one verb aimed at one collection, with opaque params
//! - `Transaction`: an ordered batch applied as a unit
//! - `OperationRequest`: the inbound sum of the two shapes
//!
//! Wire names are camelCase (`getAll`, `clearAdd`, ...) and unknown
//! fields are rejected during decode, so a misspelt request surfaces as
//! malformed instead of being silently ignored.

use serde::{Deserialize, Serialize};

/// The closed set of operation verbs.
///
/// Read verbs (`GetAll`, `Search`, `Count`) never mutate the store;
/// everything else does. Authorization treats all kinds uniformly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OperationKind {
    /// Insert documents into a collection.
    Add,
    /// Modify documents matching a predicate.
    Update,
    /// Remove documents matching a predicate.
    Delete,
    /// Return every document in a collection.
    GetAll,
    /// Return documents matching a predicate.
    Search,
    /// Count documents matching a predicate.
    Count,
    /// Remove every document in a collection.
    Clear,
    /// Clear a collection, then insert replacement documents.
    ClearAdd,
    /// Reshape every document to a field template.
    ConformToTemplate,
    /// Rename a field across every document.
    RenameField,
}

impl OperationKind {
    /// Every kind, in declaration order.
    pub const ALL: [OperationKind; 10] = [
        OperationKind::Add,
        OperationKind::Update,
        OperationKind::Delete,
        OperationKind::GetAll,
        OperationKind::Search,
        OperationKind::Count,
        OperationKind::Clear,
        OperationKind::ClearAdd,
        OperationKind::ConformToTemplate,
        OperationKind::RenameField,
    ];

    /// Whether this kind changes store contents.
    pub fn mutates(&self) -> bool {
        !matches!(
            self,
            OperationKind::GetAll | OperationKind::Search | OperationKind::Count
        )
    }

    /// Wire name of this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationKind::Add => "add",
            OperationKind::Update => "update",
            OperationKind::Delete => "delete",
            OperationKind::GetAll => "getAll",
            OperationKind::Search => "search",
            OperationKind::Count => "count",
            OperationKind::Clear => "clear",
            OperationKind::ClearAdd => "clearAdd",
            OperationKind::ConformToTemplate => "conformToTemplate",
            OperationKind::RenameField => "renameField",
        }
    }
}

impl std::fmt::Display for OperationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One operation: a verb, a target collection, and a verb-specific payload.
///
/// `params` is opaque here. The gateway validates shape and authorizes
/// the (collection, op) pair; only the executor interprets the payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Operation {
    /// What to do.
    pub op: OperationKind,
    /// Which collection to do it to.
    pub collection: String,
    /// Verb-specific payload. Absent on the wire decodes as `Null`.
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub params: serde_json::Value,
}

impl Operation {
    /// Create an operation with no params.
    pub fn new(op: OperationKind, collection: impl Into<String>) -> Self {
        Operation {
            op,
            collection: collection.into(),
            params: serde_json::Value::Null,
        }
    }

    /// Attach a params payload.
    pub fn with_params(mut self, params: serde_json::Value) -> Self {
        self.params = params;
        self
    }
}

/// An ordered batch of operations applied as a single unit.
///
/// Order is significant: members execute front to back, and a failure
/// at any member leaves the store as if none had run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Transaction {
    /// Member operations in execution order.
    #[serde(rename = "transaction")]
    pub operations: Vec<Operation>,
}

impl Transaction {
    /// Create a transaction from its members.
    pub fn new(operations: Vec<Operation>) -> Self {
        Transaction { operations }
    }
}

/// An inbound request: one operation, or a transaction of several.
///
/// The wire shape is discriminated by structure, not by a tag: an object
/// with a `transaction` array decodes as [`Transaction`], an object with
/// `op` and `collection` decodes as a single [`Operation`]. Anything
/// else is malformed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OperationRequest {
    /// An ordered batch.
    Transaction(Transaction),
    /// One operation.
    Single(Operation),
}

impl OperationRequest {
    /// All member operations in order: one for a single, n for a batch.
    pub fn members(&self) -> &[Operation] {
        match self {
            OperationRequest::Single(op) => std::slice::from_ref(op),
            OperationRequest::Transaction(txn) => &txn.operations,
        }
    }

    /// Whether this request is a transaction.
    pub fn is_transaction(&self) -> bool {
        matches!(self, OperationRequest::Transaction(_))
    }
}

impl From<Operation> for OperationRequest {
    fn from(op: Operation) -> Self {
        OperationRequest::Single(op)
    }
}

impl From<Transaction> for OperationRequest {
    fn from(txn: Transaction) -> Self {
        OperationRequest::Transaction(txn)
    }
}
