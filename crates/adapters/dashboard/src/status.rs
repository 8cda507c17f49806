//! Status line shown above the dashboard.

use serde::Serialize;

use gridwatch_domain::time::{Timestamp, clock_label};

/// Human-readable refresh status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusLine {
    pub text: String,
    /// Rendered in red when set.
    pub is_error: bool,
}

impl StatusLine {
    /// Before the first tick settles.
    #[must_use]
    pub fn waiting() -> Self {
        Self::info("Waiting for data")
    }

    /// After a successful refresh.
    #[must_use]
    pub fn updated(at: Timestamp) -> Self {
        Self::info(format!("Last updated: {}", clock_label(at)))
    }

    /// After an empty dataset.
    #[must_use]
    pub fn no_data() -> Self {
        Self::info("No data available")
    }

    /// After a failed fetch.
    #[must_use]
    pub fn error(message: &str) -> Self {
        Self {
            text: format!("Error loading data: {message}"),
            is_error: true,
        }
    }

    fn info(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: false,
        }
    }
}

impl Default for StatusLine {
    fn default() -> Self {
        Self::waiting()
    }
}
