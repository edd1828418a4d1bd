//! Client configuration for reaching the remote service.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration of the API client.
///
/// Fields with defaults can be omitted when loading from files or
/// environment variables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL every resource path is resolved against.
    /// Default: "http://localhost:8080/api"
    #[serde(default = "default_base_url")]
    base_url: String,
    /// Per-request timeout in seconds.
    /// Default: 30
    #[serde(default = "default_request_timeout_seconds")]
    request_timeout_seconds: u64,
}

fn default_base_url() -> String {
    "http://localhost:8080/api".to_string()
}

fn default_request_timeout_seconds() -> u64 {
    30
}

impl ClientConfig {
    /// Creates a configuration for the given base URL with default timeouts.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            request_timeout_seconds: default_request_timeout_seconds(),
        }
    }

    /// Sets the per-request timeout.
    #[must_use]
    pub fn with_request_timeout_seconds(mut self, seconds: u64) -> Self {
        self.request_timeout_seconds = seconds;
        self
    }

    /// Returns the base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the per-request timeout.
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(default_base_url())
    }
}
