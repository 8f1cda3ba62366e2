//! Role assignment.

use std::collections::HashSet;

use access_gate_sdk::{AccessGateError, AuthorizationEnvelope, ClaimSet, Role, TableAllowList};

use crate::config::{ConnectionConfig, PolicyConfig};

/// Maps parsed claims to an [`AuthorizationEnvelope`].
#[derive(Debug, Clone)]
pub struct TenantPolicy {
    admin_user_ids: HashSet<String>,
    anonymous_is_admin: bool,
    user_tables: TableAllowList,
}

impl TenantPolicy {
    /// # Errors
    ///
    /// Returns [`AccessGateError::InvalidPolicy`] when `user_tables` names no
    /// table, which would silently grant every caller unrestricted access.
    pub fn new(cfg: &PolicyConfig) -> Result<Self, AccessGateError> {
        let user_tables = TableAllowList::new(&cfg.user_tables)
            .map_err(|_| AccessGateError::invalid_policy("policy.user_tables must not be empty"))?;

        if cfg.anonymous_is_admin {
            tracing::warn!(
                "policy.anonymous_is_admin is enabled: requests without a userId claim get unrestricted access"
            );
        }

        Ok(Self {
            admin_user_ids: cfg.admin_user_ids.iter().cloned().collect(),
            anonymous_is_admin: cfg.anonymous_is_admin,
            user_tables,
        })
    }

    #[must_use]
    pub fn role_for(&self, user_id: Option<&str>) -> Role {
        let is_admin = match user_id {
            Some(id) => self.admin_user_ids.contains(id),
            None => self.anonymous_is_admin,
        };
        if is_admin { Role::Admin } else { Role::User }
    }

    /// Build the envelope for one request.
    #[must_use]
    pub fn derive(&self, claims: &ClaimSet, connection: &ConnectionConfig) -> AuthorizationEnvelope {
        let user_id = claims.user_id.clone();
        let tenant_order_id = claims.tenant_order_id.clone();
        let params = connection.to_params();

        let envelope = match self.role_for(user_id.as_deref()) {
            Role::Admin => AuthorizationEnvelope::admin(user_id, tenant_order_id, params),
            Role::User => {
                AuthorizationEnvelope::user(user_id, tenant_order_id, self.user_tables.clone(), params)
            }
        };

        tracing::debug!(
            user_id = envelope.user_id(),
            role = %envelope.role(),
            allowed_tables = envelope.allowed_tables().len(),
            "derived request envelope"
        );
        envelope
    }
}
