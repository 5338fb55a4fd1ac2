//! Scripted transport for tests and dry runs.
//!
//! Responses are registered per (method, path). Each call pops the next
//! scripted response for its route; the last one registered keeps being
//! returned once the others are used up. Unscripted routes answer 404.
//! Every call is recorded in order, with the (tokio) time it was issued.
//!
//! # Example
//!
//! ```ignore
//! use appwrite_client::{ApiError, ErrorBody, Method, MockTransport};
//!
//! let transport = MockTransport::new();
//! transport.respond_err(
//!     Method::Post,
//!     "/v1/users/argon2",
//!     ApiError::status(409, ErrorBody::new(409, "user_already_exists", "exists")),
//! );
//! transport.respond_ok(Method::Post, "/v1/users/argon2", json!({"$id": "u1"}));
//! ```

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use appwrite_types::Endpoint;
use async_trait::async_trait;
use serde_json::Value;
use tokio::time::Instant;

use crate::errors::{ApiError, ErrorBody};
use crate::{Method, Result, Transport};

/// One call seen by the mock.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub method: Method,
    pub url: String,
    /// The part of the url starting at `/v1`.
    pub path: String,
    pub project_id: String,
    pub body: Option<Value>,
    pub at: Instant,
}

type Route = (Method, String);

pub struct MockTransport {
    routes: Mutex<HashMap<Route, VecDeque<Result<Value>>>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self {
            routes: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Queue a response for a route.
    pub fn respond(&self, method: Method, path: &str, response: Result<Value>) {
        self.routes
            .lock()
            .unwrap()
            .entry((method, path.to_string()))
            .or_default()
            .push_back(response);
    }

    pub fn respond_ok(&self, method: Method, path: &str, body: Value) {
        self.respond(method, path, Ok(body));
    }

    pub fn respond_err(&self, method: Method, path: &str, error: ApiError) {
        self.respond(method, path, Err(error));
    }

    /// Every call so far, in issue order.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// `"METHOD /path"` for every call so far, in issue order.
    pub fn call_log(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|c| format!("{} {}", c.method, c.path))
            .collect()
    }

    fn next_response(&self, method: Method, path: &str) -> Result<Value> {
        let mut routes = self.routes.lock().unwrap();
        match routes.get_mut(&(method, path.to_string())) {
            Some(queue) if queue.len() > 1 => queue.pop_front().unwrap_or(Ok(Value::Null)),
            Some(queue) if !queue.is_empty() => queue[0].clone(),
            _ => Err(ApiError::status(
                404,
                ErrorBody::new(
                    404,
                    "general_route_not_found",
                    format!("route not mocked: {} {}", method, path),
                ),
            )),
        }
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

/// The path part of a url, starting at the API version segment.
fn api_path(url: &str) -> &str {
    url.find("/v1").map(|i| &url[i..]).unwrap_or(url)
}

#[async_trait]
impl Transport for MockTransport {
    async fn request(
        &self,
        method: Method,
        url: &str,
        endpoint: &Endpoint,
        body: Option<&Value>,
    ) -> Result<Value> {
        let path = api_path(url).to_string();
        self.calls.lock().unwrap().push(RecordedCall {
            method,
            url: url.to_string(),
            path: path.clone(),
            project_id: endpoint.project_id().to_string(),
            body: body.cloned(),
            at: Instant::now(),
        });
        self.next_response(method, &path)
    }
}
