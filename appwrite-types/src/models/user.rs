use serde::Deserialize;
use serde_json::{json, Map, Value};

/// Algorithm used when the source does not report one.
const DEFAULT_HASH: &str = "argon2";

/// A user account with its exported password hash.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "$id")]
    pub id: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub hash: Option<String>,
    #[serde(default)]
    pub hash_options: Option<Map<String, Value>>,
}

impl User {
    /// Import endpoint segment for the user's hash algorithm.
    pub fn import_algorithm(&self) -> &str {
        match self.hash.as_deref() {
            Some("scryptMod") => "scrypt-modified",
            Some(hash) if !hash.is_empty() => hash,
            _ => DEFAULT_HASH,
        }
    }

    /// Body for `POST /v1/users/{algorithm}`.
    ///
    /// Algorithms with parameters get them from `hashOptions`, renamed to
    /// what the import endpoints expect.
    pub fn import_payload(&self) -> Value {
        let mut body = Map::new();
        body.insert("userId".to_string(), json!(self.id));
        body.insert("email".to_string(), json!(self.email));
        body.insert("password".to_string(), json!(self.password));
        body.insert("name".to_string(), json!(self.name));

        let renames: &[(&str, &str)] = match self.import_algorithm() {
            "scrypt" => &[
                ("salt", "passwordSalt"),
                ("costCpu", "passwordCpu"),
                ("costMemory", "passwordMemory"),
                ("costParallel", "passwordParallel"),
                ("length", "passwordLength"),
            ],
            "scrypt-modified" => &[
                ("salt", "passwordSalt"),
                ("saltSeparator", "passwordSaltSeparator"),
                ("signerKey", "passwordSignerKey"),
            ],
            "sha" => &[("version", "passwordVersion")],
            _ => &[],
        };

        if let Some(options) = &self.hash_options {
            for (from, to) in renames {
                if let Some(value) = options.get(*from) {
                    body.insert((*to).to_string(), value.clone());
                }
            }
        }

        Value::Object(body)
    }
}
