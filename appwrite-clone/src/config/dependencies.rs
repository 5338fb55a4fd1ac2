//! Dependency wiring for the clone tool.

use std::sync::Arc;

use appwrite_client::{AppwriteClient, HttpTransport, Transport};
use tracing::info;

use super::Config;
use crate::errors::CloneError;
use crate::orchestrator::CloneEngine;
use crate::writers::TargetWriter;

/// Container for all initialized dependencies.
pub struct Dependencies {
    /// Engine bound to the configured source and target.
    pub engine: CloneEngine,
}

impl Dependencies {
    /// Build the HTTP transport and the engine from `config`.
    pub fn new(config: &Config) -> Result<Self, CloneError> {
        let transport = HttpTransport::new(config.http_timeout)
            .map_err(|e| CloneError::config(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    /// Wire the engine over an existing transport.
    pub fn with_transport(config: &Config, transport: Arc<dyn Transport>) -> Self {
        info!(
            source_host = %config.source.host(),
            source_project = %config.source.project_id(),
            target_host = %config.target.host(),
            target_project = %config.target.project_id(),
            override_existing = config.policy.override_existing,
            "Initializing dependencies"
        );

        let source = AppwriteClient::new(config.source.clone(), transport.clone(), config.pacing);
        let target = AppwriteClient::new(config.target.clone(), transport, config.pacing);
        let engine = CloneEngine::new(source, TargetWriter::new(target, config.policy));

        Self { engine }
    }
}
