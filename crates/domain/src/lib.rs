//! # gridwatch-domain
//!
//! Pure domain model for the gridwatch monitoring dashboard.
//!
//! ## Responsibilities
//! - Foundational types: error conventions, timestamps
//! - Define **Readings** (one timestamped record from the data source) and
//!   **Datasets** (the ordered sequence returned by one fetch)
//! - Define the **field mapping** that names source-specific measurement keys
//! - Derive the **recent window** (bounded suffix of a dataset)
//! - Define the **refresh state** reported by the polling controller
//! - Centralize numeric field extraction ([`reading::extract_field`])
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod time;

pub mod field;
pub mod reading;
pub mod state;
pub mod window;
