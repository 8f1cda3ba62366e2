//! Host-facing hook trait.

use async_trait::async_trait;
use http::HeaderMap;

use crate::error::AccessGateError;
use crate::host::{Credential, DataSource, DataSourceItem};
use crate::models::AuthorizationEnvelope;

/// Hooks the dashboard server invokes during a request.
///
/// Implementations hold only static configuration; every call receives the
/// request's [`AuthorizationEnvelope`] explicitly, so one instance can serve
/// any number of concurrent requests:
///
/// ```ignore
/// let ctx = hooks.user_context(req.headers()).await;
/// let creds = hooks.resolve_credentials(&ctx, &source).await;
/// ```
#[async_trait]
pub trait DashboardHooks: Send + Sync {
    /// Build the request's authorization envelope from its headers.
    ///
    /// Never fails: a missing or malformed identity header yields the
    /// envelope of an anonymous caller.
    async fn user_context(&self, headers: &HeaderMap) -> AuthorizationEnvelope;

    /// Credentials for `source`, or `None` when the gate does not manage
    /// this kind of source and the host should fall back to its default.
    async fn resolve_credentials(
        &self,
        ctx: &AuthorizationEnvelope,
        source: &DataSource,
    ) -> Option<Credential>;

    /// Point a managed source at the tenant's host and database.
    async fn change_data_source(
        &self,
        ctx: &AuthorizationEnvelope,
        source: DataSource,
    ) -> DataSource;

    /// Rewrite an item into a tenant-scoped procedure call or query.
    async fn change_data_source_item(
        &self,
        ctx: &AuthorizationEnvelope,
        dashboard_id: &str,
        item: DataSourceItem,
    ) -> DataSourceItem;

    /// Whether `item` is visible to the caller.
    async fn filter_item(&self, ctx: &AuthorizationEnvelope, item: &DataSourceItem) -> bool;

    /// Source-level visibility.
    ///
    /// # Errors
    ///
    /// Implementations that do not filter whole sources must return
    /// [`AccessGateError::Unsupported`] rather than guessing allow or deny.
    async fn filter_data_source(
        &self,
        ctx: &AuthorizationEnvelope,
        source: &DataSource,
    ) -> Result<bool, AccessGateError>;
}
