//! Host hook implementation for the access gate.

use access_gate_sdk::{
    AccessGateError, AuthorizationEnvelope, Credential, DashboardHooks, DataSource,
    DataSourceItem,
};
use async_trait::async_trait;
use http::HeaderMap;

use super::credentials::{populate_connection, resolve_credentials};
use super::filter;
use super::service::Service;

#[async_trait]
impl DashboardHooks for Service {
    async fn user_context(&self, headers: &HeaderMap) -> AuthorizationEnvelope {
        self.request_context_from_headers(headers)
    }

    async fn resolve_credentials(
        &self,
        ctx: &AuthorizationEnvelope,
        source: &DataSource,
    ) -> Option<Credential> {
        resolve_credentials(&source.kind, ctx)
    }

    async fn change_data_source(
        &self,
        ctx: &AuthorizationEnvelope,
        source: DataSource,
    ) -> DataSource {
        populate_connection(ctx, source)
    }

    #[tracing::instrument(skip_all, fields(dashboard_id = %dashboard_id, item_id = %item.id))]
    async fn change_data_source_item(
        &self,
        ctx: &AuthorizationEnvelope,
        dashboard_id: &str,
        item: DataSourceItem,
    ) -> DataSourceItem {
        self.change_data_source_item(ctx, item)
    }

    async fn filter_item(&self, ctx: &AuthorizationEnvelope, item: &DataSourceItem) -> bool {
        filter::filter_item(ctx, item)
    }

    async fn filter_data_source(
        &self,
        ctx: &AuthorizationEnvelope,
        source: &DataSource,
    ) -> Result<bool, AccessGateError> {
        filter::filter_data_source(ctx, source)
    }
}
