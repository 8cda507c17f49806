//! HTTP error response mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Failure while rendering the HTML page.
#[derive(Debug)]
pub struct PageError(pub askama::Error);

impl From<askama::Error> for PageError {
    fn from(err: askama::Error) -> Self {
        Self(err)
    }
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self.0, "failed to render dashboard page");
        (StatusCode::INTERNAL_SERVER_ERROR, "internal server error").into_response()
    }
}
