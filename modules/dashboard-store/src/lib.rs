#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Dashboard definition storage.
//!
//! Dashboards are opaque byte blobs addressed by id. [`FsDashboardStore`]
//! keeps each one as `<root>/<id>.rdash`.

pub mod api;
pub mod error;
pub mod fs;

pub use api::{DashboardEntry, DashboardStore};
pub use error::DashboardStoreError;
pub use fs::FsDashboardStore;
