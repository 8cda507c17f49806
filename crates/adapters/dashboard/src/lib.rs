//! # gridwatch-adapter-dashboard
//!
//! Render collaborator for the refresh controller.
//!
//! ## Responsibilities
//! - Own the **render target** ([`Dashboard`]): text fields, line chart,
//!   gauge and status line, shared through a cloneable [`DashboardHandle`]
//! - Implement the [`RefreshCallbacks`](gridwatch_app::ports::RefreshCallbacks)
//!   port ([`DashboardRenderer`]) so every settled tick updates the target
//! - Handle non-numeric readings: text shows `—`, chart points become gaps,
//!   the gauge keeps its previous pointer
//!
//! The handle is created by the composition root and handed both to the
//! renderer and to whatever presents it (the HTTP adapter, tests).
//!
//! ## Dependency rule
//!
//! Same as other adapters: depends on `gridwatch-app` and `gridwatch-domain`.

mod config;
pub mod chart;
pub mod dashboard;
pub mod gauge;
mod renderer;
pub mod status;
pub mod text;

pub use config::DashboardConfig;
pub use dashboard::{Dashboard, DashboardHandle};
pub use renderer::DashboardRenderer;
