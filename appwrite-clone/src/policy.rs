//! Create-with-conflict-policy.
//!
//! Users, teams, memberships and collections all resolve a collision the same
//! way: with override enabled the existing target entity is deleted, the
//! service is given a cooldown to settle, and the create is retried exactly
//! once with override off. [`create_or_replace`] is that operation,
//! parameterized by the create call, the delete call and the collision
//! predicate of each kind.

use std::future::Future;
use std::time::Duration;

use appwrite_client::ApiError;
use serde_json::Value;
use tokio::time::sleep;
use tracing::{info, warn};

/// Default wait between an override delete and the retried create.
pub const DEFAULT_COOLDOWN: Duration = Duration::from_secs(2);

/// Run-wide override flag and the cooldown that goes with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConflictPolicy {
    pub override_existing: bool,
    pub cooldown: Duration,
}

impl Default for ConflictPolicy {
    fn default() -> Self {
        Self {
            override_existing: false,
            cooldown: DEFAULT_COOLDOWN,
        }
    }
}

impl ConflictPolicy {
    pub fn new(override_existing: bool) -> Self {
        Self {
            override_existing,
            ..Self::default()
        }
    }

    pub fn with_cooldown(mut self, cooldown: Duration) -> Self {
        self.cooldown = cooldown;
        self
    }

    /// The same policy with override turned off.
    pub fn without_override(self) -> Self {
        Self {
            override_existing: false,
            ..self
        }
    }
}

/// Result of one create-or-resolve write.
#[derive(Debug, Clone, PartialEq)]
pub enum WriteOutcome {
    /// Created on the first attempt.
    Created(Value),
    /// Created after deleting the colliding target entity.
    Replaced(Value),
    /// The target already holds the entity and it was left alone.
    Existed(ApiError),
    /// Any other failure.
    Failed(ApiError),
}

impl WriteOutcome {
    pub fn is_created(&self) -> bool {
        matches!(self, Self::Created(_) | Self::Replaced(_))
    }

    pub fn error(&self) -> Option<&ApiError> {
        match self {
            Self::Existed(err) | Self::Failed(err) => Some(err),
            _ => None,
        }
    }
}

/// Create an entity, resolving a collision according to `policy`.
///
/// `delete` runs at most once and `create` at most twice. The retry never
/// recurses: a second collision is reported as [`WriteOutcome::Existed`].
/// A failed delete is logged and the retry still happens.
pub async fn create_or_replace<C, CF, D, DF>(
    policy: &ConflictPolicy,
    is_collision: impl Fn(&ApiError) -> bool,
    mut create: C,
    delete: D,
) -> WriteOutcome
where
    C: FnMut() -> CF,
    CF: Future<Output = Result<Value, ApiError>>,
    D: FnOnce() -> DF,
    DF: Future<Output = Result<Value, ApiError>>,
{
    let err = match create().await {
        Ok(created) => return WriteOutcome::Created(created),
        Err(err) => err,
    };

    if !is_collision(&err) {
        return WriteOutcome::Failed(err);
    }
    if !policy.override_existing {
        return WriteOutcome::Existed(err);
    }

    info!(error = %err, "Entity exists on target, replacing it");
    if let Err(delete_err) = delete().await {
        warn!(error = %delete_err, "Failed to delete existing entity");
    }
    sleep(policy.cooldown).await;

    match create().await {
        Ok(created) => WriteOutcome::Replaced(created),
        Err(err) if is_collision(&err) => WriteOutcome::Existed(err),
        Err(err) => WriteOutcome::Failed(err),
    }
}
