//! Operation semantics over raw collections
//!
//! Documents are arbitrary JSON values; collections are ordered lists
//! of them. The params vocabulary per kind:
//!
//! | kind                | params                          | result              |
//! |---------------------|---------------------------------|---------------------|
//! | `add`               | `{"items": [docs]}`             | `{"added": n}`      |
//! | `update`            | `{"where"?, "set": {fields}}`   | `{"updated": n}`    |
//! | `delete`            | `{"where": {fields}}`           | `{"deleted": n}`    |
//! | `getAll`            | ignored                         | `[docs]`            |
//! | `search`            | `{"where"?}`                    | `[docs]`            |
//! | `count`             | `{"where"?}`                    | `{"count": n}`      |
//! | `clear`             | ignored                         | `{"cleared": n}`    |
//! | `clearAdd`          | `{"items": [docs]}`             | `{"cleared", "added"}` |
//! | `conformToTemplate` | `{"template": {fields}}`        | `{"conformed": n}`  |
//! | `renameField`       | `{"from": f, "to": t}`          | `{"renamed": n}`    |
//!
//! A `where` filter is an object of field equalities; a document
//! matches if it is an object carrying every listed field with exactly
//! the listed value. A missing or empty `where` matches every document.
//! `delete` alone requires a non-empty filter; wiping a collection is
//! spelled `clear`.
//!
//! Write operations validate params before touching the map, so a
//! failed operation leaves collections exactly as they were.

use std::collections::BTreeMap;

use palisade_core::{Operation, OperationKind};
use serde_json::{json, Map, Value};

use crate::error::StoreError;

/// Collection name to documents.
pub type Collections = BTreeMap<String, Vec<Value>>;

/// Apply one operation of any kind. Used by the transaction path,
/// where reads and writes both run against the staged copy.
pub(crate) fn apply(
    collections: &mut Collections,
    operation: &Operation,
) -> Result<Value, StoreError> {
    if operation.op.mutates() {
        apply_write(collections, operation)
    } else {
        apply_read(collections, operation)
    }
}

/// Apply a read operation (`getAll`, `search`, `count`).
pub(crate) fn apply_read(
    collections: &Collections,
    operation: &Operation,
) -> Result<Value, StoreError> {
    let docs = collections
        .get(&operation.collection)
        .map(Vec::as_slice)
        .unwrap_or(&[]);

    match operation.op {
        OperationKind::GetAll => Ok(Value::Array(docs.to_vec())),
        OperationKind::Search => {
            let filter = filter_of(operation)?;
            Ok(Value::Array(
                docs.iter()
                    .filter(|doc| filter.map_or(true, |f| matches(doc, f)))
                    .cloned()
                    .collect(),
            ))
        }
        OperationKind::Count => {
            let filter = filter_of(operation)?;
            let count = docs
                .iter()
                .filter(|doc| filter.map_or(true, |f| matches(doc, f)))
                .count();
            Ok(json!({ "count": count }))
        }
        _ => unreachable!("mutating kind dispatched to read path"),
    }
}

/// Apply a mutating operation.
pub(crate) fn apply_write(
    collections: &mut Collections,
    operation: &Operation,
) -> Result<Value, StoreError> {
    match operation.op {
        OperationKind::Add => {
            let items = items_of(operation)?.to_vec();
            let added = items.len();
            collections
                .entry(operation.collection.clone())
                .or_default()
                .extend(items);
            Ok(json!({ "added": added }))
        }
        OperationKind::Update => {
            let filter = filter_of(operation)?;
            let set = object_param(operation, "set")?;
            if set.is_empty() {
                return Err(StoreError::invalid_params(
                    operation.op,
                    "`set` must name at least one field",
                ));
            }

            let mut updated = 0;
            if let Some(docs) = collections.get_mut(&operation.collection) {
                for doc in docs.iter_mut() {
                    if !filter.map_or(doc.is_object(), |f| matches(doc, f)) {
                        continue;
                    }
                    if let Some(fields) = doc.as_object_mut() {
                        for (key, value) in set {
                            fields.insert(key.clone(), value.clone());
                        }
                        updated += 1;
                    }
                }
            }
            Ok(json!({ "updated": updated }))
        }
        OperationKind::Delete => {
            let filter = filter_of(operation)?.ok_or_else(|| {
                StoreError::invalid_params(
                    operation.op,
                    "requires a non-empty `where`; use clear to remove all documents",
                )
            })?;

            let mut deleted = 0;
            if let Some(docs) = collections.get_mut(&operation.collection) {
                let before = docs.len();
                docs.retain(|doc| !matches(doc, filter));
                deleted = before - docs.len();
            }
            Ok(json!({ "deleted": deleted }))
        }
        OperationKind::Clear => {
            let cleared = collections
                .remove(&operation.collection)
                .map_or(0, |docs| docs.len());
            Ok(json!({ "cleared": cleared }))
        }
        OperationKind::ClearAdd => {
            let items = items_of(operation)?.to_vec();
            let cleared = collections
                .remove(&operation.collection)
                .map_or(0, |docs| docs.len());
            let added = items.len();
            collections.insert(operation.collection.clone(), items);
            Ok(json!({ "cleared": cleared, "added": added }))
        }
        OperationKind::ConformToTemplate => {
            let template = object_param(operation, "template")?;

            let mut conformed = 0;
            if let Some(docs) = collections.get_mut(&operation.collection) {
                for doc in docs.iter_mut() {
                    let mut shaped = Map::with_capacity(template.len());
                    for (key, default) in template {
                        let value = doc
                            .as_object()
                            .and_then(|fields| fields.get(key))
                            .cloned()
                            .unwrap_or_else(|| default.clone());
                        shaped.insert(key.clone(), value);
                    }
                    *doc = Value::Object(shaped);
                    conformed += 1;
                }
            }
            Ok(json!({ "conformed": conformed }))
        }
        OperationKind::RenameField => {
            let from = str_param(operation, "from")?.to_string();
            let to = str_param(operation, "to")?.to_string();
            if from == to {
                return Err(StoreError::invalid_params(
                    operation.op,
                    "`from` and `to` must differ",
                ));
            }

            let mut renamed = 0;
            if let Some(docs) = collections.get_mut(&operation.collection) {
                for doc in docs.iter_mut() {
                    if let Some(fields) = doc.as_object_mut() {
                        if let Some(value) = fields.remove(&from) {
                            fields.insert(to.clone(), value);
                            renamed += 1;
                        }
                    }
                }
            }
            Ok(json!({ "renamed": renamed }))
        }
        _ => unreachable!("read kind dispatched to write path"),
    }
}

/// The `where` filter, normalized: missing params, missing `where`, or
/// an empty object all mean "match everything" (`None`).
fn filter_of(operation: &Operation) -> Result<Option<&Map<String, Value>>, StoreError> {
    let params = match &operation.params {
        Value::Null => return Ok(None),
        Value::Object(params) => params,
        _ => {
            return Err(StoreError::invalid_params(
                operation.op,
                "params must be an object",
            ))
        }
    };
    match params.get("where") {
        None => Ok(None),
        Some(Value::Object(filter)) if filter.is_empty() => Ok(None),
        Some(Value::Object(filter)) => Ok(Some(filter)),
        Some(_) => Err(StoreError::invalid_params(
            operation.op,
            "`where` must be an object of field equalities",
        )),
    }
}

/// Whether `doc` is an object carrying every filter field with exactly
/// the filter's value.
fn matches(doc: &Value, filter: &Map<String, Value>) -> bool {
    doc.as_object()
        .map_or(false, |fields| {
            filter.iter().all(|(key, value)| fields.get(key) == Some(value))
        })
}

fn items_of(operation: &Operation) -> Result<&Vec<Value>, StoreError> {
    operation
        .params
        .as_object()
        .and_then(|params| params.get("items"))
        .and_then(Value::as_array)
        .ok_or_else(|| StoreError::invalid_params(operation.op, "missing `items` array"))
}

fn object_param<'a>(
    operation: &'a Operation,
    key: &str,
) -> Result<&'a Map<String, Value>, StoreError> {
    operation
        .params
        .as_object()
        .and_then(|params| params.get(key))
        .and_then(Value::as_object)
        .ok_or_else(|| {
            StoreError::invalid_params(operation.op, format!("missing `{}` object", key))
        })
}

fn str_param<'a>(operation: &'a Operation, key: &str) -> Result<&'a str, StoreError> {
    operation
        .params
        .as_object()
        .and_then(|params| params.get(key))
        .and_then(Value::as_str)
        .ok_or_else(|| {
            StoreError::invalid_params(operation.op, format!("missing `{}` string", key))
        })
}
