//! Shape errors for payloads decoded at the API boundary.

use thiserror::Error;

/// A JSON payload did not have the shape of the entity kind it was read as.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShapeError {
    /// The payload was not a JSON object.
    #[error("Expected a JSON object for {kind}")]
    NotAnObject { kind: &'static str },

    /// A required field was absent or had the wrong JSON type.
    #[error("Missing or invalid field `{field}` on {kind}")]
    MissingField {
        kind: &'static str,
        field: &'static str,
    },

    /// The payload could not be decoded into the entity kind.
    #[error("Invalid {kind}: {message}")]
    Invalid { kind: &'static str, message: String },
}

impl ShapeError {
    /// Create a missing field error.
    pub fn missing(kind: &'static str, field: &'static str) -> Self {
        Self::MissingField { kind, field }
    }

    /// Create an invalid payload error.
    pub fn invalid(kind: &'static str, message: impl Into<String>) -> Self {
        Self::Invalid {
            kind,
            message: message.into(),
        }
    }
}
