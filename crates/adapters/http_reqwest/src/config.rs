//! HTTP data source configuration.

use serde::Deserialize;

/// Configuration for the HTTP data source.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpSourceConfig {
    /// Endpoint returning the JSON array of readings.
    pub url: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for HttpSourceConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            timeout_secs: 10,
        }
    }
}
