//! Service implementation for the access gate.

use access_gate_sdk::{
    AccessGateError, AuthorizationEnvelope, DataSourceItem, LogicalDataSourceRef, RewriteResult,
};
use http::{HeaderMap, HeaderName};

use crate::config::{AccessGateConfig, ConnectionConfig};
use crate::domain::credentials::populate_connection;
use crate::domain::identity;
use crate::domain::policy::TenantPolicy;
use crate::domain::rewriter::QueryRewriter;

/// Access gate service.
///
/// Holds static configuration only. Every request-scoped decision is made
/// from the [`AuthorizationEnvelope`] passed in, so a single instance can be
/// shared across concurrent requests.
#[derive(Debug, Clone)]
pub struct Service {
    header_name: HeaderName,
    policy: TenantPolicy,
    rewriter: QueryRewriter,
    connection: ConnectionConfig,
}

impl Service {
    /// # Errors
    ///
    /// Returns [`AccessGateError::InvalidPolicy`] when the identity header
    /// name is not a valid HTTP header name or the user allow-list is empty.
    pub fn from_config(cfg: &AccessGateConfig) -> Result<Self, AccessGateError> {
        let header_name = HeaderName::from_bytes(cfg.identity.header_name.as_bytes()).map_err(|_| {
            AccessGateError::invalid_policy(format!(
                "identity.header_name '{}' is not a valid header name",
                cfg.identity.header_name
            ))
        })?;
        let policy = TenantPolicy::new(&cfg.policy)?;
        let rewriter = QueryRewriter::new(&cfg.rewrite);

        tracing::info!(
            header = %header_name,
            host = %cfg.connection.host,
            database = %cfg.connection.database,
            "access gate service initialized"
        );

        Ok(Self {
            header_name,
            policy,
            rewriter,
            connection: cfg.connection.clone(),
        })
    }

    #[must_use]
    pub fn header_name(&self) -> &HeaderName {
        &self.header_name
    }

    /// Envelope for a raw identity header value.
    #[must_use]
    pub fn request_context(&self, header: Option<&str>) -> AuthorizationEnvelope {
        let claims = identity::resolve(header);
        self.policy.derive(&claims, &self.connection)
    }

    /// Envelope for a request's headers.
    #[must_use]
    pub fn request_context_from_headers(&self, headers: &HeaderMap) -> AuthorizationEnvelope {
        let claims = identity::resolve_from_headers(headers, self.header_name.as_str());
        self.policy.derive(&claims, &self.connection)
    }

    #[must_use]
    pub fn rewrite(
        &self,
        reference: &LogicalDataSourceRef,
        envelope: &AuthorizationEnvelope,
    ) -> RewriteResult {
        self.rewriter.rewrite(reference, envelope)
    }

    /// Populate the item's connection, then rewrite it for the caller.
    ///
    /// Items outside the SQL Server family are returned untouched.
    #[must_use]
    pub fn change_data_source_item(
        &self,
        envelope: &AuthorizationEnvelope,
        mut item: DataSourceItem,
    ) -> DataSourceItem {
        if !item.data_source.kind.is_sql_server_family() {
            return item;
        }

        item.data_source = populate_connection(envelope, item.data_source);
        let reference = LogicalDataSourceRef::from_item(&item);
        self.rewrite(&reference, envelope).apply_to(&mut item);
        item
    }
}
