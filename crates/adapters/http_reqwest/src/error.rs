//! HTTP data source error types.

use gridwatch_domain::error::FetchError;

/// Errors specific to the HTTP data source.
#[derive(Debug, thiserror::Error)]
pub enum HttpSourceError {
    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client")]
    Build(#[source] reqwest::Error),

    /// The request could not be sent or timed out.
    #[error("request to data source failed")]
    Request(#[source] reqwest::Error),

    /// The endpoint answered with a non-success status.
    #[error("data source returned HTTP {0}")]
    Status(reqwest::StatusCode),

    /// Reading the response body failed.
    #[error("failed to read response body")]
    Body(#[source] reqwest::Error),

    /// The body was not a JSON array of readings.
    #[error("failed to parse dataset")]
    Parse(#[source] serde_json::Error),
}

impl HttpSourceError {
    /// Convert into a [`FetchError`] for propagation across the source port.
    #[must_use]
    pub fn into_fetch(self) -> FetchError {
        match self {
            Self::Status(status) => FetchError::Status {
                status: status.as_u16(),
            },
            Self::Parse(err) => FetchError::Parse(err),
            other => FetchError::transport(other),
        }
    }
}

impl From<HttpSourceError> for FetchError {
    fn from(err: HttpSourceError) -> Self {
        err.into_fetch()
    }
}
