//! Shared application state for axum handlers.

use tokio::sync::watch;

use gridwatch_adapter_dashboard::DashboardHandle;
use gridwatch_domain::state::RefreshState;

/// Seconds between automatic reloads of the HTML page.
pub const DEFAULT_PAGE_REFRESH_SECS: u32 = 5;

/// Application state shared across all axum handlers.
///
/// Every field is a cheap handle, so cloning per request is fine.
#[derive(Clone)]
pub struct AppState {
    /// Render target, written by the dashboard renderer.
    pub dashboard: DashboardHandle,
    /// Latest refresh state published by the controller.
    pub refresh_state: watch::Receiver<RefreshState>,
    /// `content` of the page's `<meta http-equiv="refresh">`.
    pub page_refresh_secs: u32,
}

impl AppState {
    /// Create the state with the default page refresh interval.
    #[must_use]
    pub fn new(dashboard: DashboardHandle, refresh_state: watch::Receiver<RefreshState>) -> Self {
        Self {
            dashboard,
            refresh_state,
            page_refresh_secs: DEFAULT_PAGE_REFRESH_SECS,
        }
    }

    /// Override the page refresh interval.
    #[must_use]
    pub fn with_page_refresh(mut self, secs: u32) -> Self {
        self.page_refresh_secs = secs;
        self
    }

    /// Copy of the current refresh state.
    #[must_use]
    pub fn refresh_state(&self) -> RefreshState {
        self.refresh_state.borrow().clone()
    }
}
