use appwrite_client::ApiError;
use appwrite_types::Document;
use tracing::debug;

use super::TargetWriter;

const DOCUMENT_EXISTS: &str = "document_already_exists";

/// Result of writing one document.
#[derive(Debug, Clone, PartialEq)]
pub enum DocumentOutcome {
    /// Created with the sanitized body.
    Created,
    /// Created after relationship fields were reduced to identifiers.
    CreatedFlattened,
    /// Already on the target; updated in place.
    Updated,
    Failed(ApiError),
}

impl DocumentOutcome {
    pub fn is_written(&self) -> bool {
        !matches!(self, Self::Failed(_))
    }
}

impl TargetWriter {
    /// Write one document into its database and collection on the target.
    ///
    /// The sanitized body is posted first. An unauthorized answer is retried
    /// once with relationships flattened to identifiers; a conflict is retried
    /// once as an update. Documents are never deleted.
    pub async fn create_document(&self, document: &Document) -> DocumentOutcome {
        let path = format!(
            "/v1/databases/{}/collections/{}/documents",
            document.database_id, document.collection_id
        );
        let body = document.write_payload(document.sanitized_data());

        let err = match self.client.post(&path, &body).await {
            Ok(_) => return DocumentOutcome::Created,
            Err(err) => err,
        };

        if err.is_unauthorized() {
            debug!(document_id = %document.id, "Retrying with flattened relationships");
            let flattened = document.write_payload(document.flattened_data());
            return match self.client.post(&path, &flattened).await {
                Ok(_) => DocumentOutcome::CreatedFlattened,
                Err(err) => DocumentOutcome::Failed(err),
            };
        }

        if err.is_conflict() || err.has_type(DOCUMENT_EXISTS) {
            debug!(document_id = %document.id, "Document exists, updating in place");
            let update_path = format!("{}/{}", path, document.id);
            return match self.client.patch(&update_path, &body).await {
                Ok(_) => DocumentOutcome::Updated,
                Err(err) => DocumentOutcome::Failed(err),
            };
        }

        DocumentOutcome::Failed(err)
    }
}
