use serde::Deserialize;
use serde_json::{json, Map, Value};

/// A database on the source instance.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Database {
    #[serde(rename = "$id")]
    pub id: String,
    pub name: String,
}

impl Database {
    pub fn create_payload(&self) -> Value {
        json!({
            "databaseId": self.id,
            "name": self.name,
        })
    }
}

/// A collection inside a database.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Collection {
    #[serde(rename = "$id")]
    pub id: String,
    pub name: String,
    #[serde(rename = "$databaseId", default)]
    pub database_id: String,
    #[serde(rename = "$permissions", default)]
    pub permissions: Option<Vec<String>>,
    #[serde(default)]
    pub document_security: Option<bool>,
}

impl Collection {
    pub fn create_payload(&self) -> Value {
        let mut body = Map::new();
        body.insert("collectionId".to_string(), json!(self.id));
        body.insert("name".to_string(), json!(self.name));
        if let Some(permissions) = &self.permissions {
            body.insert("permissions".to_string(), json!(permissions));
        }
        if let Some(document_security) = self.document_security {
            body.insert("documentSecurity".to_string(), json!(document_security));
        }
        Value::Object(body)
    }
}
