//! Credential and connection resolution for managed data sources.

use access_gate_sdk::{AuthorizationEnvelope, Credential, DataSource, DataSourceKind};

/// Credentials for a data source of `kind`.
///
/// Only the SQL Server family is managed; every other kind gets `None` so
/// the host falls back to its own defaults.
#[must_use]
pub fn resolve_credentials(
    kind: &DataSourceKind,
    envelope: &AuthorizationEnvelope,
) -> Option<Credential> {
    if !kind.is_sql_server_family() {
        tracing::debug!(kind = ?kind, "data source kind not managed, no credentials");
        return None;
    }

    let params = envelope.connection_params();
    Some(Credential {
        username: params.username.clone(),
        password: params.password.clone(),
    })
}

/// Point a SQL Server family source at the configured host and database.
#[must_use]
pub fn populate_connection(envelope: &AuthorizationEnvelope, mut source: DataSource) -> DataSource {
    if source.kind.is_sql_server_family() {
        let params = envelope.connection_params();
        source.host = Some(params.host.clone());
        source.database = Some(params.database.clone());
    }
    source
}
