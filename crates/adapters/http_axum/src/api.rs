//! JSON API handlers.
//!
//! - `GET /api/dashboard`: snapshot of the render target
//! - `GET /api/state`: current refresh state

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};

use gridwatch_adapter_dashboard::Dashboard;
use gridwatch_domain::state::RefreshState;

use crate::state::AppState;

/// Build the `/api` sub-router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(dashboard))
        .route("/state", get(refresh_state))
}

/// `GET /api/dashboard`
pub async fn dashboard(State(state): State<AppState>) -> Json<Dashboard> {
    Json(state.dashboard.snapshot())
}

/// `GET /api/state`
pub async fn refresh_state(State(state): State<AppState>) -> Json<RefreshState> {
    Json(state.refresh_state())
}
