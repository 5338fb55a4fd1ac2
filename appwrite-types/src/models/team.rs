use serde::Deserialize;
use serde_json::{json, Value};

/// A team, hydrated with its memberships after listing.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Team {
    #[serde(rename = "$id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub memberships: Vec<Membership>,
}

impl Team {
    pub fn create_payload(&self) -> Value {
        json!({
            "teamId": self.id,
            "name": self.name,
        })
    }
}

/// A user's membership in a team.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Membership {
    #[serde(rename = "$id")]
    pub id: String,
    pub user_email: String,
    #[serde(default)]
    pub roles: Vec<String>,
}

impl Membership {
    /// Body for `POST /v1/teams/{team}/memberships`. `url` is the redirect
    /// the service puts into the invitation.
    pub fn create_payload(&self, team_id: &str, url: &str) -> Value {
        json!({
            "teamId": team_id,
            "email": self.user_email,
            "roles": self.roles,
            "url": url,
        })
    }
}
