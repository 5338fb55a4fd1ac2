//! Server-managed field stripping.
//!
//! Relationship fields come back from the source fully hydrated: the related
//! document, with its own metadata, sits inside the parent's data. The target
//! refuses that metadata on create, so it is stripped at every level. When the
//! target still refuses the nested payload, [`flatten_relationships`] reduces
//! each related document to its identifier instead.

use serde_json::{Map, Value};

/// Identity, audit and permission fields set by the service itself.
pub const SERVER_MANAGED_FIELDS: [&str; 6] = [
    "$id",
    "$databaseId",
    "$collectionId",
    "$permissions",
    "$createdAt",
    "$updatedAt",
];

/// Field whose presence marks an object as an embedded document.
const IDENTITY_FIELD: &str = "$id";

pub fn is_server_managed(key: &str) -> bool {
    SERVER_MANAGED_FIELDS.contains(&key)
}

/// An object carrying an identity field is a (related) document.
pub fn is_embedded_document(value: &Value) -> bool {
    value
        .as_object()
        .is_some_and(|object| object.get(IDENTITY_FIELD).is_some_and(Value::is_string))
}

/// Strip server-managed fields from a document and from every embedded
/// document reachable through its fields or sequences of them.
///
/// Values that are neither documents nor sequences containing documents are
/// copied untouched. Applying it twice gives the same result as once.
pub fn sanitize(fields: &Map<String, Value>) -> Map<String, Value> {
    fields
        .iter()
        .filter(|(key, _)| !is_server_managed(key))
        .map(|(key, value)| (key.clone(), sanitize_value(value)))
        .collect()
}

fn sanitize_value(value: &Value) -> Value {
    match value {
        Value::Object(object) if is_embedded_document(value) => Value::Object(sanitize(object)),
        Value::Array(items) if items.iter().any(is_embedded_document) => Value::Array(
            items
                .iter()
                .map(|item| match item {
                    Value::Object(object) if is_embedded_document(item) => {
                        Value::Object(sanitize(object))
                    }
                    other => other.clone(),
                })
                .collect(),
        ),
        other => other.clone(),
    }
}

/// Strip top-level server-managed fields and replace each embedded document
/// (alone or inside a sequence) by its bare identifier.
pub fn flatten_relationships(fields: &Map<String, Value>) -> Map<String, Value> {
    fields
        .iter()
        .filter(|(key, _)| !is_server_managed(key))
        .map(|(key, value)| (key.clone(), flatten_value(value)))
        .collect()
}

fn flatten_value(value: &Value) -> Value {
    match value {
        Value::Object(object) if is_embedded_document(value) => object[IDENTITY_FIELD].clone(),
        Value::Array(items) if items.iter().any(is_embedded_document) => Value::Array(
            items
                .iter()
                .map(|item| match item {
                    Value::Object(object) if is_embedded_document(item) => {
                        object[IDENTITY_FIELD].clone()
                    }
                    other => other.clone(),
                })
                .collect(),
        ),
        other => other.clone(),
    }
}
