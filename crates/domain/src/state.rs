//! Refresh state: what the polling controller last observed.

use serde::Serialize;

use crate::time::Timestamp;

/// Transient status of a refresh controller.
///
/// Transitions are driven exclusively by the controller's own tick handler.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "status", content = "detail", rename_all = "lowercase")]
pub enum RefreshState {
    /// Not polling (never started, or stopped).
    #[default]
    Idle,
    /// A fetch is in flight.
    Loading,
    /// The last fetch produced a non-empty dataset at the given time.
    Ready(Timestamp),
    /// The last fetch produced an empty dataset.
    Empty,
    /// The last fetch failed; the message is human-readable.
    Error(String),
}

impl RefreshState {
    /// Whether the last fetch produced data.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }

    /// Whether the last fetch failed.
    #[must_use]
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    /// Error message of an [`Error`](Self::Error) state.
    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Error(message) => Some(message),
            _ => None,
        }
    }
}

impl std::fmt::Display for RefreshState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => f.write_str("idle"),
            Self::Loading => f.write_str("loading"),
            Self::Ready(at) => write!(f, "ready ({})", at.to_rfc3339()),
            Self::Empty => f.write_str("empty"),
            Self::Error(message) => write!(f, "error ({message})"),
        }
    }
}
