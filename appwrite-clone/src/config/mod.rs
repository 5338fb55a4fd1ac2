//! Configuration and dependency initialization.

mod dependencies;

pub use dependencies::Dependencies;

use std::env;
use std::time::Duration;

use appwrite_client::Pacing;
use appwrite_types::Endpoint;

use crate::errors::CloneError;
use crate::policy::ConflictPolicy;

/// Default pacing before each read, in milliseconds.
const DEFAULT_READ_DELAY_MS: u64 = 100;

/// Default pacing before each write, in milliseconds.
const DEFAULT_WRITE_DELAY_MS: u64 = 500;

/// Default wait after an override delete, in milliseconds.
const DEFAULT_OVERRIDE_COOLDOWN_MS: u64 = 2000;

/// Default HTTP client timeout in seconds.
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Settings for one clone run.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub source: Endpoint,
    pub target: Endpoint,
    pub policy: ConflictPolicy,
    pub pacing: Pacing,
    pub http_timeout: Duration,
    /// Selectors applied to the fetched tree (`*`, `<id>`, `<db>/<collection>`).
    pub selectors: Vec<String>,
}

impl Config {
    /// Read the configuration from the process environment.
    ///
    /// # Environment Variables
    ///
    /// - `SOURCE_HOST`, `SOURCE_PROJECT_ID`, `SOURCE_API_KEY`: source instance (required)
    /// - `TARGET_HOST`, `TARGET_PROJECT_ID`, `TARGET_API_KEY`: target instance (required)
    /// - `CLONE_OVERRIDE`: replace colliding entities, `true`/`1`/`yes` (default: false)
    /// - `CLONE_SELECT`: comma separated selectors (default: none)
    /// - `READ_DELAY_MS`: delay before each read (default: 100)
    /// - `WRITE_DELAY_MS`: delay before each write (default: 500)
    /// - `OVERRIDE_COOLDOWN_MS`: wait after an override delete (default: 2000)
    /// - `HTTP_TIMEOUT_SECS`: HTTP client timeout (default: 30)
    pub fn from_env() -> Result<Self, CloneError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from any key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, CloneError> {
        let required = |key: &str| -> Result<String, CloneError> {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or_else(|| CloneError::config(format!("{} is not set", key)))
        };
        let millis = |key: &str, default: u64| -> Result<Duration, CloneError> {
            parse_u64(&lookup, key, default).map(Duration::from_millis)
        };

        let source = Endpoint::new(
            required("SOURCE_HOST")?,
            required("SOURCE_PROJECT_ID")?,
            required("SOURCE_API_KEY")?,
        );
        let target = Endpoint::new(
            required("TARGET_HOST")?,
            required("TARGET_PROJECT_ID")?,
            required("TARGET_API_KEY")?,
        );

        let override_existing = match lookup("CLONE_OVERRIDE") {
            Some(value) => parse_flag(&value)
                .ok_or_else(|| CloneError::config(format!("Invalid CLONE_OVERRIDE: {}", value)))?,
            None => false,
        };

        let selectors = lookup("CLONE_SELECT")
            .map(|value| {
                value
                    .split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            source,
            target,
            policy: ConflictPolicy::new(override_existing)
                .with_cooldown(millis("OVERRIDE_COOLDOWN_MS", DEFAULT_OVERRIDE_COOLDOWN_MS)?),
            pacing: Pacing {
                read: millis("READ_DELAY_MS", DEFAULT_READ_DELAY_MS)?,
                write: millis("WRITE_DELAY_MS", DEFAULT_WRITE_DELAY_MS)?,
            },
            http_timeout: Duration::from_secs(parse_u64(
                &lookup,
                "HTTP_TIMEOUT_SECS",
                DEFAULT_HTTP_TIMEOUT_SECS,
            )?),
            selectors,
        })
    }
}

fn parse_u64(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: u64,
) -> Result<u64, CloneError> {
    match lookup(key) {
        Some(value) => value
            .trim()
            .parse::<u64>()
            .map_err(|_| CloneError::config(format!("Invalid {}: {}", key, value))),
        None => Ok(default),
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" | "" => Some(false),
        _ => None,
    }
}
