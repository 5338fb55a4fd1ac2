//! Instance endpoint.

use std::fmt;

use serde::Deserialize;

/// One Appwrite instance: where it lives, which project, and the key to use.
///
/// Immutable once built. The API key is redacted from `Debug` output so an
/// endpoint can be logged freely.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Endpoint {
    host: String,
    project_id: String,
    api_key: String,
}

impl Endpoint {
    /// Create an endpoint. Trailing slashes on the host are trimmed.
    pub fn new(
        host: impl Into<String>,
        project_id: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        let host: String = host.into();
        Self {
            host: host.trim_end_matches('/').to_string(),
            project_id: project_id.into(),
            api_key: api_key.into(),
        }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Join an API path (starting with `/v1`) onto the host.
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.host, path)
    }
}

impl fmt::Debug for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Endpoint")
            .field("host", &self.host)
            .field("project_id", &self.project_id)
            .field("api_key", &"<redacted>")
            .finish()
    }
}
