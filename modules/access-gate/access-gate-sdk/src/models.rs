//! Domain models for the access gate.
//!
//! Request flow: [`ClaimSet`] → [`AuthorizationEnvelope`] → rewrite
//! ([`LogicalDataSourceRef`] → [`RewriteResult`]) and filtering
//! ([`AccessCandidate`] → `bool`).

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use dashgate_sql::{BoundStatement, SqlValue};
use secrecy::SecretString;
use serde::{Serialize, Serializer};

use crate::error::AccessGateError;
use crate::host::DataSourceItem;

/// Identity facts parsed from the request identity header.
///
/// An absent `user_id` is a legitimate anonymous caller, not an error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ClaimSet {
    /// Value of the `userId` pair.
    pub user_id: Option<String>,
    /// Value of the `orderId` pair.
    pub tenant_order_id: Option<String>,
    /// Every well-formed pair, trimmed, last occurrence wins.
    pub raw_pairs: BTreeMap<String, String>,
}

impl ClaimSet {
    /// `true` when neither recognized claim is present.
    #[must_use]
    pub fn is_anonymous(&self) -> bool {
        self.user_id.is_none() && self.tenant_order_id.is_none()
    }
}

/// Caller role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Role {
    Admin,
    User,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Admin => "Admin",
            Self::User => "User",
        })
    }
}

/// Backing-database connection parameters copied from static configuration.
#[derive(Debug, Clone, Serialize)]
pub struct ConnectionParams {
    pub host: String,
    pub database: String,
    pub username: String,
    #[serde(serialize_with = "redact")]
    pub password: SecretString,
    pub schema: String,
}

fn redact<S: Serializer>(_: &SecretString, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str("[REDACTED]")
}

/// Non-empty set of table/procedure names a restricted caller may reach.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableAllowList(BTreeSet<String>);

impl TableAllowList {
    /// Build an allow-list, trimming names and dropping blank ones.
    ///
    /// # Errors
    ///
    /// Returns [`AccessGateError::InvalidPolicy`] if no names remain, since
    /// an empty allow-list means unrestricted access.
    pub fn new<I, S>(names: I) -> Result<Self, AccessGateError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let set: BTreeSet<String> = names
            .into_iter()
            .map(|n| n.as_ref().trim().to_owned())
            .filter(|n| !n.is_empty())
            .collect();
        if set.is_empty() {
            return Err(AccessGateError::invalid_policy(
                "a table allow-list must name at least one table",
            ));
        }
        Ok(Self(set))
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains(name)
    }
}

/// Per-request authorization envelope.
///
/// `role == Admin` if and only if `allowed_tables` is empty (unrestricted).
/// [`AuthorizationEnvelope::admin`] and [`AuthorizationEnvelope::user`] are
/// the only constructors, and the latter takes a [`TableAllowList`], which is
/// never empty.
#[derive(Debug, Clone, Serialize)]
pub struct AuthorizationEnvelope {
    user_id: Option<String>,
    role: Role,
    tenant_order_id: Option<String>,
    allowed_tables: BTreeSet<String>,
    connection_params: ConnectionParams,
}

impl AuthorizationEnvelope {
    /// Unrestricted envelope.
    #[must_use]
    pub fn admin(
        user_id: Option<String>,
        tenant_order_id: Option<String>,
        connection_params: ConnectionParams,
    ) -> Self {
        Self {
            user_id,
            role: Role::Admin,
            tenant_order_id,
            allowed_tables: BTreeSet::new(),
            connection_params,
        }
    }

    /// Envelope restricted to `allowed_tables`.
    #[must_use]
    pub fn user(
        user_id: Option<String>,
        tenant_order_id: Option<String>,
        allowed_tables: TableAllowList,
        connection_params: ConnectionParams,
    ) -> Self {
        Self {
            user_id,
            role: Role::User,
            tenant_order_id,
            allowed_tables: allowed_tables.0,
            connection_params,
        }
    }

    #[inline]
    #[must_use]
    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    #[inline]
    #[must_use]
    pub fn role(&self) -> Role {
        self.role
    }

    #[inline]
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    #[inline]
    #[must_use]
    pub fn tenant_order_id(&self) -> Option<&str> {
        self.tenant_order_id.as_deref()
    }

    /// Table/procedure allow-list. Empty means unrestricted.
    #[inline]
    #[must_use]
    pub fn allowed_tables(&self) -> &BTreeSet<String> {
        &self.allowed_tables
    }

    #[inline]
    #[must_use]
    pub fn connection_params(&self) -> &ConnectionParams {
        &self.connection_params
    }

    /// Whether `name` passes the allow-list.
    #[must_use]
    pub fn allows(&self, name: &str) -> bool {
        self.allowed_tables.is_empty() || self.allowed_tables.contains(name)
    }
}

/// Shape of a logical data-source reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum RefKind {
    Table,
    Procedure,
    Custom,
}

/// Logical reference to a data-source item, as supplied by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogicalDataSourceRef {
    pub id: String,
    pub kind: RefKind,
    pub table: Option<String>,
    pub procedure: Option<String>,
}

impl LogicalDataSourceRef {
    #[must_use]
    pub fn table(id: impl Into<String>, table: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: RefKind::Table,
            table: Some(table.into()),
            procedure: None,
        }
    }

    #[must_use]
    pub fn procedure(id: impl Into<String>, procedure: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: RefKind::Procedure,
            table: None,
            procedure: Some(procedure.into()),
        }
    }

    #[must_use]
    pub fn custom(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: RefKind::Custom,
            table: None,
            procedure: None,
        }
    }

    /// Derive the reference from a host item. A procedure takes precedence
    /// over a table when both are set.
    #[must_use]
    pub fn from_item(item: &DataSourceItem) -> Self {
        let kind = if item.procedure.is_some() {
            RefKind::Procedure
        } else if item.table.is_some() {
            RefKind::Table
        } else {
            RefKind::Custom
        };
        Self {
            id: item.id.clone(),
            kind,
            table: item.table.clone(),
            procedure: item.procedure.clone(),
        }
    }
}

/// Outcome of rewriting a logical reference. Exactly one variant is produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RewriteResult {
    /// Invoke a stored procedure with the given bound parameters.
    Procedure {
        name: String,
        parameters: BTreeMap<String, SqlValue>,
    },
    /// Run an ad-hoc, parameter-bound query.
    CustomQuery { statement: BoundStatement },
    /// Leave the item as the host supplied it.
    Unchanged,
}

impl RewriteResult {
    #[must_use]
    pub fn is_unchanged(&self) -> bool {
        matches!(self, Self::Unchanged)
    }

    /// Write the result onto a host item.
    pub fn apply_to(self, item: &mut DataSourceItem) {
        match self {
            Self::Procedure { name, parameters } => {
                item.procedure = Some(name);
                item.procedure_parameters = parameters;
            }
            Self::CustomQuery { statement } => {
                item.custom_query = Some(statement);
            }
            Self::Unchanged => {}
        }
    }
}

/// Table/procedure names checked by the access filter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AccessCandidate {
    pub table: Option<String>,
    pub procedure: Option<String>,
}

impl AccessCandidate {
    #[must_use]
    pub fn table(name: impl Into<String>) -> Self {
        Self {
            table: Some(name.into()),
            procedure: None,
        }
    }

    #[must_use]
    pub fn procedure(name: impl Into<String>) -> Self {
        Self {
            table: None,
            procedure: Some(name.into()),
        }
    }

    #[must_use]
    pub fn from_item(item: &DataSourceItem) -> Self {
        Self {
            table: item.table.clone(),
            procedure: item.procedure.clone(),
        }
    }
}
