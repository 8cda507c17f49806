//! # gridwatch-adapter-http-reqwest
//!
//! HTTP data source: implements the [`DatasetSource`] port with a plain
//! `GET` against a JSON endpoint (typically a spreadsheet web-app export).
//!
//! ## Wire contract
//!
//! | Response | Outcome |
//! |----------|---------|
//! | 2xx with a JSON array of objects | `Ok(dataset)`, oldest reading first |
//! | non-2xx | [`FetchError::Status`] |
//! | 2xx with anything but an array of objects | [`FetchError::Parse`] |
//! | connect failure, timeout, broken body | [`FetchError::Transport`] |
//!
//! Redirects are followed, which spreadsheet web apps rely on.
//!
//! ## Dependency rule
//!
//! Same as other adapters: depends on `gridwatch-app` and `gridwatch-domain`.

mod config;
mod error;

pub use config::HttpSourceConfig;
pub use error::HttpSourceError;

use std::time::Duration;

use gridwatch_app::ports::DatasetSource;
use gridwatch_domain::error::FetchError;
use gridwatch_domain::reading::{Dataset, parse_dataset};

/// Data source that fetches the dataset over HTTP.
#[derive(Debug, Clone)]
pub struct HttpDatasetSource {
    client: reqwest::Client,
    url: String,
}

impl HttpDatasetSource {
    /// Build a source for the configured endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`HttpSourceError::Build`] if the HTTP client cannot be
    /// initialised (e.g. the TLS backend fails to load).
    pub fn new(config: &HttpSourceConfig) -> Result<Self, HttpSourceError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("gridwatch/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(HttpSourceError::Build)?;

        Ok(Self {
            client,
            url: config.url.clone(),
        })
    }

    /// Endpoint this source reads from.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    async fn fetch(&self) -> Result<Dataset, HttpSourceError> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(HttpSourceError::Request)?;

        let status = response.status();
        if !status.is_success() {
            return Err(HttpSourceError::Status(status));
        }

        let body = response.bytes().await.map_err(HttpSourceError::Body)?;
        let dataset = parse_dataset(&body).map_err(HttpSourceError::Parse)?;

        tracing::debug!(url = %self.url, readings = dataset.len(), "dataset fetched");
        Ok(dataset)
    }
}

impl DatasetSource for HttpDatasetSource {
    async fn fetch_dataset(&self) -> Result<Dataset, FetchError> {
        self.fetch().await.map_err(FetchError::from)
    }
}
