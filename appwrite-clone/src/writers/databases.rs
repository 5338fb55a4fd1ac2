use appwrite_client::ApiError;
use appwrite_types::{Attribute, Collection, Database};
use serde_json::Value;
use tracing::debug;

use super::TargetWriter;
use crate::policy::{create_or_replace, WriteOutcome};

const DATABASE_EXISTS: &str = "database_already_exists";
const COLLECTION_EXISTS: &str = "collection_already_exists";

impl TargetWriter {
    /// Create a database.
    ///
    /// Databases are never replaced: a colliding database is always reported
    /// as existing, whatever the run's override flag says.
    pub async fn create_database(&self, database: &Database) -> WriteOutcome {
        debug!(database_id = %database.id, "Creating database");
        let body = database.create_payload();
        let policy = self.policy.without_override();
        let (client, body) = (&self.client, &body);
        create_or_replace(
            &policy,
            |err: &ApiError| err.has_type(DATABASE_EXISTS),
            move || client.post("/v1/databases", body),
            || self.delete_database(&database.id),
        )
        .await
    }

    pub async fn create_collection(
        &self,
        database_id: &str,
        collection: &Collection,
    ) -> WriteOutcome {
        debug!(
            database_id = %database_id,
            collection_id = %collection.id,
            "Creating collection"
        );
        let path = format!("/v1/databases/{}/collections", database_id);
        let body = collection.create_payload();
        let (client, path, body) = (&self.client, path.as_str(), &body);
        create_or_replace(
            &self.policy,
            |err: &ApiError| err.has_type(COLLECTION_EXISTS),
            move || client.post(path, body),
            || self.delete_collection(database_id, &collection.id),
        )
        .await
    }

    /// Create one attribute. Best effort: failures are only traced. Returns
    /// whether the attribute was created.
    pub async fn create_attribute(
        &self,
        database_id: &str,
        collection_id: &str,
        attribute: &Attribute,
    ) -> bool {
        let path = format!(
            "/v1/databases/{}/collections/{}/attributes/{}",
            database_id,
            collection_id,
            attribute.endpoint_kind()
        );
        match self.client.post(&path, &attribute.create_payload()).await {
            Ok(_) => {
                debug!(key = %attribute.key, path = %path, "Created attribute");
                true
            }
            Err(e) => {
                debug!(key = %attribute.key, path = %path, error = %e, "Attribute not created");
                false
            }
        }
    }

    async fn delete_database(&self, database_id: &str) -> Result<Value, ApiError> {
        self.client
            .delete(&format!("/v1/databases/{}", database_id), None)
            .await
    }

    async fn delete_collection(
        &self,
        database_id: &str,
        collection_id: &str,
    ) -> Result<Value, ApiError> {
        self.client
            .delete(
                &format!("/v1/databases/{}/collections/{}", database_id, collection_id),
                None,
            )
            .await
    }
}
