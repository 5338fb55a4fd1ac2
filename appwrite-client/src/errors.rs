//! Failure taxonomy of remote calls.

use serde::Deserialize;
use thiserror::Error;

/// Error payload returned by the service, e.g.
/// `{"message": "...", "code": 409, "type": "user_already_exists"}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub code: Option<u16>,
    #[serde(rename = "type", default)]
    pub error_type: Option<String>,
}

impl ErrorBody {
    pub fn new(code: u16, error_type: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: Some(code),
            error_type: Some(error_type.into()),
        }
    }

    /// Decode an error payload. Bodies that are not the service's error shape
    /// are kept as the message text.
    pub fn parse(status: u16, bytes: &[u8]) -> Self {
        match serde_json::from_slice::<ErrorBody>(bytes) {
            Ok(body) => body,
            Err(_) => Self {
                message: String::from_utf8_lossy(bytes).trim().to_string(),
                code: Some(status),
                error_type: None,
            },
        }
    }
}

/// Errors from a remote call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// Network failure or timeout; no response was received.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The service answered with a non-2xx status.
    #[error("{} (status {status})", .body.message)]
    Status { status: u16, body: ErrorBody },

    /// A 2xx response whose body was not the expected shape.
    #[error("Decode error: {0}")]
    Decode(String),
}

impl ApiError {
    /// Create a transport error.
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    /// Create a status error from a decoded error payload.
    pub fn status(status: u16, body: ErrorBody) -> Self {
        Self::Status { status, body }
    }

    /// Create a decode error.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// HTTP status, when a response was received.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// The service's error type string (`user_already_exists`, ...).
    pub fn error_type(&self) -> Option<&str> {
        match self {
            Self::Status { body, .. } => body.error_type.as_deref(),
            _ => None,
        }
    }

    /// Human readable message for log lines.
    pub fn message(&self) -> String {
        match self {
            Self::Status { body, status } if body.message.is_empty() => {
                format!("request failed with status {}", status)
            }
            Self::Status { body, .. } => body.message.clone(),
            Self::Transport(msg) | Self::Decode(msg) => msg.clone(),
        }
    }

    pub fn has_type(&self, error_type: &str) -> bool {
        self.error_type() == Some(error_type)
    }

    /// A 5xx status, or a payload reporting a 5xx code.
    pub fn is_server_error(&self) -> bool {
        match self {
            Self::Status { status, body } => {
                (500..600).contains(status) || body.code.is_some_and(|c| (500..600).contains(&c))
            }
            _ => false,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status_code() == Some(401)
    }

    pub fn is_conflict(&self) -> bool {
        self.status_code() == Some(409)
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}
