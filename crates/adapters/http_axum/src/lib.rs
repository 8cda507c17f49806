//! # gridwatch-adapter-http-axum
//!
//! HTTP adapter built on [axum](https://docs.rs/axum).
//!
//! ## Responsibilities
//! - Serve the live dashboard as **JSON** (`/api/dashboard`, `/api/state`)
//! - Serve a **server-side-rendered HTML page** at `/` (an askama template) that works with
//!   **zero JavaScript**: the chart is inline SVG, the gauge a `<meter>`,
//!   and `<meta http-equiv="refresh">` reloads the page on an interval
//! - Trace every request through `tower-http`
//!
//! The adapter only reads: the [`DashboardHandle`](gridwatch_adapter_dashboard::DashboardHandle)
//! is written by the renderer driven by the refresh controller.
//!
//! ## Dependency rule
//! Depends on `gridwatch-adapter-dashboard` (for the render target) and
//! `gridwatch-domain` (for the refresh state). Never leaks axum types into
//! the domain.

#[allow(clippy::missing_errors_doc)]
pub mod api;
mod error;
pub mod page;
pub mod router;
pub mod state;
