use appwrite_client::ApiError;
use appwrite_types::User;
use tracing::debug;

use super::TargetWriter;
use crate::policy::{create_or_replace, WriteOutcome};

const USER_EXISTS: &str = "user_already_exists";

impl TargetWriter {
    /// Import a user with its password hash.
    pub async fn create_user(&self, user: &User) -> WriteOutcome {
        let path = format!("/v1/users/{}", user.import_algorithm());
        let body = user.import_payload();
        debug!(user_id = %user.id, path = %path, "Importing user");

        let (client, path, body) = (&self.client, path.as_str(), &body);
        create_or_replace(
            &self.policy,
            |err: &ApiError| err.has_type(USER_EXISTS),
            move || client.post(path, body),
            || self.delete_user(&user.id),
        )
        .await
    }

    async fn delete_user(&self, user_id: &str) -> Result<serde_json::Value, ApiError> {
        self.client
            .delete(&format!("/v1/users/{}", user_id), None)
            .await
    }
}
