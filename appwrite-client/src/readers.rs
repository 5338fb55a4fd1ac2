//! Entity readers.
//!
//! Each reader issues one capped GET and decodes the list envelope into typed
//! entities, quarantining elements of the wrong shape.

use appwrite_types::{Attribute, Collection, Database, Document, EntityList, Membership, Team, User};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::client::AppwriteClient;
use crate::errors::ApiError;
use crate::Result;

impl AppwriteClient {
    async fn list<T: DeserializeOwned>(
        &self,
        path: &str,
        key: &'static str,
    ) -> Result<EntityList<T>> {
        let envelope = self.get(path).await?;
        let list = EntityList::from_envelope(&envelope, key)
            .map_err(|e| ApiError::decode(e.to_string()))?;

        if list.quarantined > 0 {
            warn!(
                path = %path,
                skipped = list.quarantined,
                "Skipped entities with unexpected shape"
            );
        }
        if list.total > list.items.len() as u64 + list.quarantined as u64 {
            warn!(
                path = %path,
                total = list.total,
                fetched = list.items.len(),
                "List exceeds one page; only the first page is used"
            );
        }
        debug!(path = %path, count = list.items.len(), "Listed entities");
        Ok(list)
    }

    pub async fn list_databases(&self) -> Result<EntityList<Database>> {
        self.list("/v1/databases", "databases").await
    }

    pub async fn list_collections(&self, database_id: &str) -> Result<EntityList<Collection>> {
        self.list(
            &format!("/v1/databases/{}/collections", database_id),
            "collections",
        )
        .await
    }

    pub async fn list_attributes(
        &self,
        database_id: &str,
        collection_id: &str,
    ) -> Result<EntityList<Attribute>> {
        self.list(
            &format!(
                "/v1/databases/{}/collections/{}/attributes",
                database_id, collection_id
            ),
            "attributes",
        )
        .await
    }

    pub async fn list_documents(
        &self,
        database_id: &str,
        collection_id: &str,
    ) -> Result<EntityList<Document>> {
        self.list(
            &format!(
                "/v1/databases/{}/collections/{}/documents",
                database_id, collection_id
            ),
            "documents",
        )
        .await
    }

    pub async fn list_users(&self) -> Result<EntityList<User>> {
        self.list("/v1/users", "users").await
    }

    pub async fn list_memberships(&self, team_id: &str) -> Result<EntityList<Membership>> {
        self.list(&format!("/v1/teams/{}/memberships", team_id), "memberships")
            .await
    }

    /// Teams, each hydrated with its memberships.
    pub async fn list_teams(&self) -> Result<EntityList<Team>> {
        let mut teams: EntityList<Team> = self.list("/v1/teams", "teams").await?;
        for team in &mut teams.items {
            team.memberships = self.list_memberships(&team.id).await?.items;
        }
        Ok(teams)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use appwrite_types::Endpoint;
    use serde_json::json;

    use crate::{AppwriteClient, Method, MockTransport, Pacing};

    fn client(mock: &Arc<MockTransport>) -> AppwriteClient {
        AppwriteClient::new(
            Endpoint::new("http://source", "proj", "key"),
            mock.clone(),
            Pacing::none(),
        )
    }

    #[tokio::test]
    async fn teams_are_hydrated_with_memberships() {
        let mock = Arc::new(MockTransport::new());
        mock.respond_ok(
            Method::Get,
            "/v1/teams",
            json!({"total": 2, "teams": [
                {"$id": "t1", "name": "Core", "total": 1},
                {"$id": "t2", "name": "Ops", "total": 0}
            ]}),
        );
        mock.respond_ok(
            Method::Get,
            "/v1/teams/t1/memberships",
            json!({"total": 1, "memberships": [
                {"$id": "m1", "userEmail": "ada@example.com", "roles": ["owner"]}
            ]}),
        );
        mock.respond_ok(
            Method::Get,
            "/v1/teams/t2/memberships",
            json!({"total": 0, "memberships": []}),
        );

        let teams = client(&mock).list_teams().await.unwrap();

        assert_eq!(teams.total, 2);
        assert_eq!(teams.items[0].memberships.len(), 1);
        assert_eq!(teams.items[0].memberships[0].roles, vec!["owner".to_string()]);
        assert!(teams.items[1].memberships.is_empty());
        assert_eq!(
            mock.call_log(),
            vec![
                "GET /v1/teams".to_string(),
                "GET /v1/teams/t1/memberships".to_string(),
                "GET /v1/teams/t2/memberships".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn documents_without_identity_are_quarantined() {
        let mock = Arc::new(MockTransport::new());
        mock.respond_ok(
            Method::Get,
            "/v1/databases/db1/collections/c1/documents",
            json!({"total": 2, "documents": [
                {"$id": "d1", "$databaseId": "db1", "$collectionId": "c1", "title": "ok"},
                {"title": "orphan"}
            ]}),
        );

        let docs = client(&mock).list_documents("db1", "c1").await.unwrap();
        assert_eq!(docs.items.len(), 1);
        assert_eq!(docs.quarantined, 1);
        assert_eq!(docs.items[0].id, "d1");
    }

    #[tokio::test]
    async fn malformed_envelope_is_a_decode_error() {
        let mock = Arc::new(MockTransport::new());
        mock.respond_ok(Method::Get, "/v1/users", json!({"total": 1}));

        let err = client(&mock).list_users().await.unwrap_err();
        assert!(matches!(err, crate::ApiError::Decode(_)));
    }
}
