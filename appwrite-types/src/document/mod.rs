//! Documents and the payloads built from them.

mod sanitizer;

pub use sanitizer::{
    flatten_relationships, is_embedded_document, is_server_managed, sanitize,
    SERVER_MANAGED_FIELDS,
};

use serde::Deserialize;
use serde_json::{json, Map, Value};

use crate::errors::ShapeError;

/// A document read from the source.
///
/// `fields` holds the document exactly as fetched, metadata included, so that
/// both the sanitized payload and the flattened fallback can be derived from it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "Value")]
pub struct Document {
    pub id: String,
    pub database_id: String,
    pub collection_id: String,
    pub permissions: Vec<String>,
    fields: Map<String, Value>,
}

impl Document {
    /// Decode a raw document, requiring its identity metadata.
    pub fn from_value(value: Value) -> Result<Self, ShapeError> {
        let Value::Object(fields) = value else {
            return Err(ShapeError::NotAnObject { kind: "document" });
        };

        let string_field = |field: &'static str| -> Result<String, ShapeError> {
            fields
                .get(field)
                .and_then(Value::as_str)
                .map(str::to_string)
                .ok_or_else(|| ShapeError::missing("document", field))
        };

        let id = string_field("$id")?;
        let database_id = string_field("$databaseId")?;
        let collection_id = string_field("$collectionId")?;
        let permissions = match fields.get("$permissions") {
            None | Some(Value::Null) => Vec::new(),
            Some(value) => serde_json::from_value(value.clone())
                .map_err(|e| ShapeError::invalid("document", e.to_string()))?,
        };

        Ok(Self {
            id,
            database_id,
            collection_id,
            permissions,
            fields,
        })
    }

    /// Data with server-managed fields stripped at every nesting level.
    pub fn sanitized_data(&self) -> Map<String, Value> {
        sanitize(&self.fields)
    }

    /// Data with every related document reduced to its bare identifier.
    pub fn flattened_data(&self) -> Map<String, Value> {
        flatten_relationships(&self.fields)
    }

    /// Body for the create (POST) and update (PATCH) document calls.
    pub fn write_payload(&self, data: Map<String, Value>) -> Value {
        json!({
            "databaseId": self.database_id,
            "collectionId": self.collection_id,
            "documentId": self.id,
            "data": data,
            "permissions": self.permissions,
        })
    }
}

impl TryFrom<Value> for Document {
    type Error = ShapeError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Self::from_value(value)
    }
}
