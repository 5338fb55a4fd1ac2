//! Paced client bound to one instance.

use std::sync::Arc;
use std::time::Duration;

use appwrite_types::Endpoint;
use serde_json::Value;
use tokio::time::sleep;

use crate::{Method, Result, Transport};

/// Default delay before each read.
const DEFAULT_READ_DELAY: Duration = Duration::from_millis(100);

/// Default delay before each write.
const DEFAULT_WRITE_DELAY: Duration = Duration::from_millis(500);

/// Fixed delays applied before every call.
///
/// A plain fixed-rate throttle: the same delay precedes every read, another
/// precedes every write, whatever the service answered before.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pacing {
    pub read: Duration,
    pub write: Duration,
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            read: DEFAULT_READ_DELAY,
            write: DEFAULT_WRITE_DELAY,
        }
    }
}

impl Pacing {
    /// No delays at all.
    pub fn none() -> Self {
        Self {
            read: Duration::ZERO,
            write: Duration::ZERO,
        }
    }

    fn delay_for(&self, method: Method) -> Duration {
        if method.is_read() {
            self.read
        } else {
            self.write
        }
    }
}

/// Client for one instance. Calls are issued one at a time, each preceded by
/// its pacing delay.
#[derive(Clone)]
pub struct AppwriteClient {
    endpoint: Endpoint,
    transport: Arc<dyn Transport>,
    pacing: Pacing,
}

impl AppwriteClient {
    pub fn new(endpoint: Endpoint, transport: Arc<dyn Transport>, pacing: Pacing) -> Self {
        Self {
            endpoint,
            transport,
            pacing,
        }
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    pub async fn get(&self, path: &str) -> Result<Value> {
        self.send(Method::Get, path, None).await
    }

    pub async fn post(&self, path: &str, body: &Value) -> Result<Value> {
        self.send(Method::Post, path, Some(body)).await
    }

    pub async fn patch(&self, path: &str, body: &Value) -> Result<Value> {
        self.send(Method::Patch, path, Some(body)).await
    }

    pub async fn delete(&self, path: &str, body: Option<&Value>) -> Result<Value> {
        self.send(Method::Delete, path, body).await
    }

    async fn send(&self, method: Method, path: &str, body: Option<&Value>) -> Result<Value> {
        let delay = self.pacing.delay_for(method);
        if !delay.is_zero() {
            sleep(delay).await;
        }
        let url = self.endpoint.url(path);
        self.transport
            .request(method, &url, &self.endpoint, body)
            .await
    }
}
