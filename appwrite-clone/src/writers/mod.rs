//! Entity writers.
//!
//! Every writer converts its remote failures into a returned outcome; nothing
//! here returns an error or panics, so one failed entity never stops a run.

mod databases;
mod documents;
mod teams;
mod users;

pub use documents::DocumentOutcome;

use appwrite_client::AppwriteClient;

use crate::policy::ConflictPolicy;

/// Writes entities to the target instance under one conflict policy.
#[derive(Clone)]
pub struct TargetWriter {
    client: AppwriteClient,
    policy: ConflictPolicy,
}

impl TargetWriter {
    pub fn new(client: AppwriteClient, policy: ConflictPolicy) -> Self {
        Self { client, policy }
    }
}
