//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into the types
//! below at port boundaries via `From`.

use std::error::Error;

/// Boxed error used to carry transport-level causes across crate boundaries.
pub type BoxError = Box<dyn Error + Send + Sync + 'static>;

/// Failure to obtain a dataset from the data source.
///
/// Every variant is recovered locally by the refresh controller and turned
/// into a human-readable message for the render callbacks.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// The source could not be reached (DNS, connect, timeout, broken body).
    #[error("failed to reach data source")]
    Transport(#[source] BoxError),

    /// The source answered with a non-success HTTP status.
    #[error("data source returned HTTP {status}")]
    Status {
        /// The numeric HTTP status code.
        status: u16,
    },

    /// The body was not a JSON array of reading objects.
    #[error("data source returned a malformed dataset")]
    Parse(#[from] serde_json::Error),
}

impl FetchError {
    /// Wrap any transport-level error.
    pub fn transport(err: impl Into<BoxError>) -> Self {
        Self::Transport(err.into())
    }
}

/// Invariant violations in configured domain values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// The timestamp key of a field mapping is empty.
    #[error("timestamp key must not be empty")]
    EmptyTimestampKey,

    /// A channel was configured without a display name.
    #[error("channel name must not be empty")]
    EmptyChannelName,

    /// Two channels share the same display name.
    #[error("duplicate channel name: {0}")]
    DuplicateChannel(String),

    /// A channel maps a measurement to an empty key.
    #[error("channel {channel} has an empty key for {measurement}")]
    EmptyFieldKey {
        /// Display name of the offending channel.
        channel: String,
        /// Measurement label (e.g. `voltage`).
        measurement: &'static str,
    },
}

/// Render an error and its `source()` chain as a single line.
///
/// `"data source returned a malformed dataset: expected value at line 1 column 1"`
#[must_use]
pub fn display_chain(err: &(dyn Error + 'static)) -> String {
    let mut message = err.to_string();
    let mut current = err.source();
    while let Some(cause) = current {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        current = cause.source();
    }
    message
}
