use appwrite_client::ApiError;
use appwrite_types::{Membership, Team};
use serde_json::Value;
use tracing::debug;

use super::TargetWriter;
use crate::policy::{create_or_replace, WriteOutcome};

const INVITE_EXISTS: &str = "team_invite_already_exists";

impl TargetWriter {
    /// Create a team.
    ///
    /// A colliding team id is reported by the service as a server error, so
    /// any 5xx answer counts as a collision here. With override on, that
    /// deletes the target team even when the 5xx had another cause.
    pub async fn create_team(&self, team: &Team) -> WriteOutcome {
        debug!(team_id = %team.id, "Creating team");
        let body = team.create_payload();
        let (client, body) = (&self.client, &body);
        create_or_replace(
            &self.policy,
            ApiError::is_server_error,
            move || client.post("/v1/teams", body),
            || self.delete_team(&team.id),
        )
        .await
    }

    /// Invite `membership`'s user into the target team. The invitation
    /// redirect url is the target host.
    pub async fn create_membership(
        &self,
        team_id: &str,
        membership: &Membership,
    ) -> WriteOutcome {
        debug!(team_id = %team_id, email = %membership.user_email, "Creating membership");
        let path = format!("/v1/teams/{}/memberships", team_id);
        let body = membership.create_payload(team_id, self.client.endpoint().host());

        let (client, path, body) = (&self.client, path.as_str(), &body);
        create_or_replace(
            &self.policy,
            |err: &ApiError| err.has_type(INVITE_EXISTS),
            move || client.post(path, body),
            || self.delete_membership(team_id, &membership.id),
        )
        .await
    }

    async fn delete_team(&self, team_id: &str) -> Result<Value, ApiError> {
        self.client
            .delete(&format!("/v1/teams/{}", team_id), None)
            .await
    }

    async fn delete_membership(
        &self,
        team_id: &str,
        membership_id: &str,
    ) -> Result<Value, ApiError> {
        self.client
            .delete(
                &format!("/v1/teams/{}/memberships/{}", team_id, membership_id),
                None,
            )
            .await
    }
}
