//! List envelope decoding.

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::warn;

use crate::errors::ShapeError;

/// One page of entities decoded from a list response.
///
/// List responses look like `{"total": 3, "databases": [...]}`. Elements that
/// do not decode into `T` are quarantined: counted and skipped, never handed
/// to the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityList<T> {
    /// Total reported by the server (may exceed `items.len()` past one page).
    pub total: u64,
    pub items: Vec<T>,
    /// Number of elements skipped because their shape was wrong.
    pub quarantined: usize,
}

impl<T: DeserializeOwned> EntityList<T> {
    /// Decode the array stored under `key` in a list envelope.
    pub fn from_envelope(envelope: &Value, key: &'static str) -> Result<Self, ShapeError> {
        let object = envelope
            .as_object()
            .ok_or(ShapeError::NotAnObject { kind: key })?;
        let elements = object
            .get(key)
            .and_then(Value::as_array)
            .ok_or_else(|| ShapeError::missing(key, "items"))?;

        let mut items = Vec::with_capacity(elements.len());
        let mut quarantined = 0;
        for element in elements {
            match serde_json::from_value::<T>(element.clone()) {
                Ok(item) => items.push(item),
                Err(e) => {
                    warn!(kind = key, error = %e, "Skipping list element with unexpected shape");
                    quarantined += 1;
                }
            }
        }

        let total = object
            .get("total")
            .and_then(Value::as_u64)
            .unwrap_or(elements.len() as u64);

        Ok(Self {
            total,
            items,
            quarantined,
        })
    }
}

impl<T> EntityList<T> {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
