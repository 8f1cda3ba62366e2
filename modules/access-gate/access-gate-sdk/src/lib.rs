#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Access Gate SDK
//!
//! This crate provides the public API of the `access_gate` module:
//!
//! - [`ClaimSet`] - identity facts parsed from the request identity header
//! - [`AuthorizationEnvelope`], [`TableAllowList`] - per-request role, allow-list and connection parameters
//! - [`LogicalDataSourceRef`], [`RewriteResult`] - query rewrite input and output
//! - [`AccessCandidate`] - table/procedure pair checked by the access filter
//! - [`DataSource`], [`DataSourceItem`], [`Credential`] - host object model
//! - [`DashboardHooks`] - host-facing hook trait
//! - [`AccessGateError`] - error types
//!
//! ## Usage
//!
//! ```ignore
//! use access_gate_sdk::DashboardHooks;
//!
//! let hooks: Arc<dyn DashboardHooks> = Arc::new(service);
//!
//! let ctx = hooks.user_context(request.headers()).await;
//! if hooks.filter_item(&ctx, &item).await {
//!     let item = hooks.change_data_source_item(&ctx, "Sales", item).await;
//! }
//! ```

pub mod api;
pub mod error;
pub mod host;
pub mod models;

// Re-export main types at crate root
pub use api::DashboardHooks;
pub use error::AccessGateError;
pub use host::{Credential, DataSource, DataSourceItem, DataSourceKind};
pub use models::{
    AccessCandidate, AuthorizationEnvelope, ClaimSet, ConnectionParams, LogicalDataSourceRef,
    RefKind, RewriteResult, Role, TableAllowList,
};

pub use dashgate_sql::{BoundStatement, SqlValue};
