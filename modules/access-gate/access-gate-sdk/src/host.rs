//! Host object model: the data sources and items the dashboard server hands
//! to the hooks.

use std::collections::BTreeMap;

use dashgate_sql::{BoundStatement, SqlValue};
use secrecy::SecretString;
use serde::Serialize;

/// Supported data-source kinds.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "type", content = "name", rename_all = "snake_case")]
pub enum DataSourceKind {
    SqlServer,
    AzureSql,
    /// Any kind the gate does not manage, tagged with the host's type name.
    Other(String),
}

impl DataSourceKind {
    /// SQL Server and Azure SQL share credentials, connection fields and
    /// query dialect.
    #[must_use]
    pub fn is_sql_server_family(&self) -> bool {
        matches!(self, Self::SqlServer | Self::AzureSql)
    }
}

/// A dashboard data source. `host` and `database` are rewritten per request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DataSource {
    pub id: String,
    pub kind: DataSourceKind,
    pub host: Option<String>,
    pub database: Option<String>,
}

impl DataSource {
    #[must_use]
    pub fn new(id: impl Into<String>, kind: DataSourceKind) -> Self {
        Self {
            id: id.into(),
            kind,
            host: None,
            database: None,
        }
    }
}

/// A data-source item: one table, procedure or query a visualization reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DataSourceItem {
    pub id: String,
    pub title: Option<String>,
    pub data_source: DataSource,
    pub table: Option<String>,
    pub procedure: Option<String>,
    pub procedure_parameters: BTreeMap<String, SqlValue>,
    pub custom_query: Option<BoundStatement>,
}

impl DataSourceItem {
    #[must_use]
    pub fn new(id: impl Into<String>, data_source: DataSource) -> Self {
        Self {
            id: id.into(),
            title: None,
            data_source,
            table: None,
            procedure: None,
            procedure_parameters: BTreeMap::new(),
            custom_query: None,
        }
    }

    #[must_use]
    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = Some(table.into());
        self
    }

    #[must_use]
    pub fn with_procedure(mut self, procedure: impl Into<String>) -> Self {
        self.procedure = Some(procedure.into());
        self
    }
}

/// Username/password credential for a data source.
#[derive(Debug, Clone)]
pub struct Credential {
    pub username: String,
    pub password: SecretString,
}
