//! Appwrite REST access for the clone tool.
//!
//! This crate provides:
//! - [`Transport`] trait abstracting one authenticated REST call
//! - [`HttpTransport`] production transport backed by reqwest
//! - [`MockTransport`] scripted transport that records every call, for tests
//! - [`AppwriteClient`] paced client bound to one [`Endpoint`], with the
//!   entity readers (`list_databases`, `list_documents`, ...)
//!
//! ## Usage
//!
//! ```ignore
//! use std::sync::Arc;
//! use appwrite_client::{AppwriteClient, HttpTransport, Pacing};
//! use appwrite_types::Endpoint;
//!
//! let transport = Arc::new(HttpTransport::new(Duration::from_secs(30))?);
//! let source = AppwriteClient::new(
//!     Endpoint::new("https://cloud.appwrite.io", "project", "key"),
//!     transport,
//!     Pacing::default(),
//! );
//! let databases = source.list_databases().await?;
//! ```
//!
//! List calls request a single page capped at [`PAGE_LIMIT`] items. Nothing
//! here follows further pages: a collection with more documents than the cap
//! is cloned partially.

mod client;
mod errors;
mod http;
mod mock;
mod readers;

pub use client::{AppwriteClient, Pacing};
pub use errors::{ApiError, ErrorBody};
pub use http::HttpTransport;
pub use mock::{MockTransport, RecordedCall};

use std::fmt;

use appwrite_types::Endpoint;
use async_trait::async_trait;
use serde_json::Value;

/// Maximum number of items requested by every list call.
pub const PAGE_LIMIT: u32 = 1000;

pub type Result<T> = std::result::Result<T, ApiError>;

/// HTTP verbs used against the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Patch,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }

    pub fn is_read(&self) -> bool {
        matches!(self, Self::Get)
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One authenticated REST call against an instance.
///
/// Implementations attach the project and key headers of `endpoint`, ask GET
/// calls for one capped page, and classify failures into [`ApiError`]. They
/// never retry and never sleep; pacing belongs to [`AppwriteClient`] and
/// retry policy to the writers.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Issue the call. A 2xx response yields its decoded JSON body
    /// (`Value::Null` when empty).
    async fn request(
        &self,
        method: Method,
        url: &str,
        endpoint: &Endpoint,
        body: Option<&Value>,
    ) -> Result<Value>;
}
