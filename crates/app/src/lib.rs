//! # gridwatch-app
//!
//! Application layer: the refresh controller and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement:
//!   - `DatasetSource`: obtain the current dataset (driven/outbound)
//!   - `RefreshCallbacks`: receive ready/empty/error outcomes (render side)
//! - Provide the **refresh controller**: poll a source on a fixed interval,
//!   derive the latest reading and recent window, signal refresh state
//! - Orchestrate domain objects without knowing *how* fetching or rendering works
//!
//! ## Dependency rule
//! Depends on `gridwatch-domain` only (plus `tokio` for timers and channels).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod ports;
pub mod refresh_controller;
