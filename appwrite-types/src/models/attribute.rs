use serde::Deserialize;
use serde_json::{Map, Value};

/// Fields the service sets on an attribute that a create call does not accept.
const SERVER_MANAGED_ATTRIBUTE_FIELDS: [&str; 4] = ["status", "error", "$createdAt", "$updatedAt"];

/// Formats of `string` attributes that have their own create endpoint.
const FORMATTED_STRING_KINDS: [&str; 4] = ["email", "url", "ip", "enum"];

/// A schema field of a collection.
///
/// The common fields are typed; type-specific fields (`size`, `min`, `max`,
/// `elements`, `twoWay`, `onDelete`, ...) are kept verbatim in `fields` and
/// forwarded to the create call.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attribute {
    pub key: String,
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(default)]
    pub format: Option<String>,
    #[serde(default)]
    pub related_collection: Option<String>,
    #[serde(default)]
    pub relation_type: Option<String>,
    #[serde(default)]
    pub side: Option<String>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Attribute {
    pub fn is_relationship(&self) -> bool {
        self.type_name == "relationship"
    }

    /// The child side of a two-way relationship is created by its parent side.
    pub fn is_relationship_child(&self) -> bool {
        self.is_relationship() && self.side.as_deref() == Some("child")
    }

    /// Last path segment of the create endpoint, `.../attributes/{kind}`.
    pub fn endpoint_kind(&self) -> &str {
        match self.type_name.as_str() {
            "double" => "float",
            "string" => match self.format.as_deref() {
                Some(format) if FORMATTED_STRING_KINDS.contains(&format) => format,
                _ => "string",
            },
            other => other,
        }
    }

    /// Body for the create call on the target.
    pub fn create_payload(&self) -> Value {
        let mut body: Map<String, Value> = self
            .fields
            .iter()
            .filter(|(key, _)| !SERVER_MANAGED_ATTRIBUTE_FIELDS.contains(&key.as_str()))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();

        body.insert("key".to_string(), Value::String(self.key.clone()));

        if self.is_relationship() {
            if let Some(related) = &self.related_collection {
                body.insert(
                    "relatedCollectionId".to_string(),
                    Value::String(related.clone()),
                );
            }
            if let Some(relation_type) = &self.relation_type {
                body.insert("type".to_string(), Value::String(relation_type.clone()));
            }
        }

        Value::Object(body)
    }
}
