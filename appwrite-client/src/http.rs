//! reqwest-backed transport.

use std::time::Duration;

use appwrite_types::Endpoint;
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client as ReqwestClient;
use serde_json::Value;
use tracing::{debug, warn};

use crate::errors::{ApiError, ErrorBody};
use crate::{Method, Result, Transport, PAGE_LIMIT};

const PROJECT_HEADER: &str = "X-Appwrite-Project";
const KEY_HEADER: &str = "X-Appwrite-Key";
const LIMIT_PARAM: &str = "queries[]";

/// Production transport speaking JSON over HTTP(S).
///
/// # Example
///
/// ```ignore
/// let transport = HttpTransport::new(Duration::from_secs(30))?;
/// let body = transport
///     .request(Method::Get, &endpoint.url("/v1/databases"), &endpoint, None)
///     .await?;
/// ```
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: ReqwestClient,
}

impl HttpTransport {
    /// Build a transport whose calls time out after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = ReqwestClient::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }
}

fn reqwest_method(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Post => reqwest::Method::POST,
        Method::Patch => reqwest::Method::PATCH,
        Method::Delete => reqwest::Method::DELETE,
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn request(
        &self,
        method: Method,
        url: &str,
        endpoint: &Endpoint,
        body: Option<&Value>,
    ) -> Result<Value> {
        debug!(method = %method, url = %url, "Sending request");

        let mut builder = self
            .client
            .request(reqwest_method(method), url)
            .header(PROJECT_HEADER, endpoint.project_id())
            .header(KEY_HEADER, endpoint.api_key())
            .header(CONTENT_TYPE, "application/json");

        if method.is_read() {
            builder = builder.query(&[(LIMIT_PARAM, format!("limit({})", PAGE_LIMIT))]);
        }

        if let Some(body) = body {
            let bytes = serde_json::to_vec(body).map_err(|e| ApiError::decode(e.to_string()))?;
            builder = builder.body(bytes);
        }

        let response = builder.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        if status.is_success() {
            if bytes.is_empty() {
                return Ok(Value::Null);
            }
            return serde_json::from_slice(&bytes).map_err(|e| ApiError::decode(e.to_string()));
        }

        let body = ErrorBody::parse(status.as_u16(), &bytes);
        warn!(
            method = %method,
            url = %url,
            status = status.as_u16(),
            error_type = body.error_type.as_deref().unwrap_or(""),
            "Request failed"
        );
        Err(ApiError::status(status.as_u16(), body))
    }
}
