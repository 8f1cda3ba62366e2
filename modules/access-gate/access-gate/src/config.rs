use std::path::{Path, PathBuf};

use access_gate_sdk::ConnectionParams;
use figment::Figment;
use figment::providers::{Format, Yaml};
use secrecy::SecretString;
use serde::{Deserialize, Deserializer};

pub const ENV_SQL_SERVER_HOST: &str = "SQL_SERVER_HOST";
pub const ENV_SQL_SERVER_DATABASE: &str = "SQL_SERVER_DATABASE";
pub const ENV_SQL_SERVER_USERNAME: &str = "SQL_SERVER_USERNAME";
pub const ENV_SQL_SERVER_PASSWORD: &str = "SQL_SERVER_PASSWORD";
pub const ENV_SQL_SERVER_SCHEMA: &str = "SQL_SERVER_SCHEMA";

/// Errors raised while loading [`AccessGateConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to load access gate configuration: {0}")]
    Load(#[from] Box<figment::Error>),
}

/// Access gate configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AccessGateConfig {
    pub identity: IdentityConfig,
    pub policy: PolicyConfig,
    pub rewrite: RewriteConfig,
    pub connection: ConnectionConfig,
    pub dashboards: DashboardsConfig,
}

impl AccessGateConfig {
    /// Load configuration from an optional YAML file, then apply the
    /// `SQL_SERVER_*` environment overrides to the connection section.
    ///
    /// A missing file yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Load`] for malformed YAML or unknown fields.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_with(path, |key| std::env::var(key).ok())
    }

    /// Same as [`AccessGateConfig::load`] with an explicit environment lookup.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Load`] for malformed YAML or unknown fields.
    pub fn load_with<F>(path: Option<&Path>, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut figment = Figment::new();
        if let Some(path) = path {
            figment = figment.merge(Yaml::file(path));
        }
        let mut config: Self = figment.extract().map_err(Box::new)?;
        config.connection.apply_overrides(lookup);
        Ok(config)
    }
}

/// Identity header settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IdentityConfig {
    /// Request header carrying the `key:value` identity pairs.
    pub header_name: String,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            header_name: "x-header-one".to_owned(),
        }
    }
}

/// Role assignment rules.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PolicyConfig {
    /// User ids granted unrestricted access.
    pub admin_user_ids: Vec<String>,

    /// Treat callers without a `userId` claim as Admin.
    pub anonymous_is_admin: bool,

    /// Allow-list applied to every non-admin caller. Must not be empty.
    pub user_tables: Vec<String>,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            admin_user_ids: vec!["BLONP".to_owned()],
            anonymous_is_admin: false,
            user_tables: vec!["Customers".to_owned(), "Orders".to_owned()],
        }
    }
}

/// Rewrite rules, matched by item id in declaration order of the lists.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RewriteConfig {
    pub fixed_procedures: Vec<FixedProcedureRule>,
    pub caller_procedures: Vec<CallerProcedureRule>,
    pub order_queries: Vec<OrderQueryRule>,
    pub scoped_tables: ScopedTablesConfig,
}

impl Default for RewriteConfig {
    fn default() -> Self {
        Self {
            fixed_procedures: vec![FixedProcedureRule {
                id: "TenMostExpensiveProducts".to_owned(),
                name: "Ten Most Expensive Products".to_owned(),
            }],
            caller_procedures: vec![
                CallerProcedureRule {
                    id: "CustOrderHist".to_owned(),
                    parameter: default_caller_parameter(),
                },
                CallerProcedureRule {
                    id: "CustOrdersOrders".to_owned(),
                    parameter: default_caller_parameter(),
                },
            ],
            order_queries: vec![OrderQueryRule {
                id: "CustomerOrders".to_owned(),
                table: "Orders".to_owned(),
                column: "OrderId".to_owned(),
            }],
            scoped_tables: ScopedTablesConfig::default(),
        }
    }
}

/// Item id mapped to a procedure with a fixed display name and no parameters.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FixedProcedureRule {
    pub id: String,
    pub name: String,
}

/// Procedure called with the caller's user id bound to `parameter`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CallerProcedureRule {
    pub id: String,
    #[serde(default = "default_caller_parameter")]
    pub parameter: String,
}

fn default_caller_parameter() -> String {
    "@CustomerID".to_owned()
}

/// Item id mapped to `SELECT * FROM [table] WHERE [column] = <order id>`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OrderQueryRule {
    pub id: String,
    pub table: String,
    pub column: String,
}

/// Tables rewritten into a tenant-filtered `SELECT *`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScopedTablesConfig {
    pub tables: Vec<String>,
    /// Column compared against the caller's user id.
    pub tenant_column: String,
}

impl Default for ScopedTablesConfig {
    fn default() -> Self {
        Self {
            tables: vec!["Customers".to_owned(), "Orders".to_owned()],
            tenant_column: "customerId".to_owned(),
        }
    }
}

/// Backing SQL Server connection.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConnectionConfig {
    pub host: String,
    pub database: String,
    pub username: String,
    #[serde(deserialize_with = "secret_from_string")]
    pub password: SecretString,
    pub schema: String,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_owned(),
            database: "Northwind".to_owned(),
            username: "sa".to_owned(),
            password: SecretString::from("password"),
            schema: "dbo".to_owned(),
        }
    }
}

fn secret_from_string<'de, D>(deserializer: D) -> Result<SecretString, D::Error>
where
    D: Deserializer<'de>,
{
    String::deserialize(deserializer).map(SecretString::from)
}

impl ConnectionConfig {
    /// Replace fields whose `SQL_SERVER_*` variable is set to a non-empty value.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| lookup(key).filter(|v| !v.is_empty());

        if let Some(host) = lookup(ENV_SQL_SERVER_HOST) {
            self.host = host;
        }
        if let Some(database) = lookup(ENV_SQL_SERVER_DATABASE) {
            self.database = database;
        }
        if let Some(username) = lookup(ENV_SQL_SERVER_USERNAME) {
            self.username = username;
        }
        if let Some(password) = lookup(ENV_SQL_SERVER_PASSWORD) {
            self.password = SecretString::from(password);
        }
        if let Some(schema) = lookup(ENV_SQL_SERVER_SCHEMA) {
            self.schema = schema;
        }
    }

    #[must_use]
    pub fn to_params(&self) -> ConnectionParams {
        ConnectionParams {
            host: self.host.clone(),
            database: self.database.clone(),
            username: self.username.clone(),
            password: self.password.clone(),
            schema: self.schema.clone(),
        }
    }
}

/// Dashboard definition storage.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DashboardsConfig {
    /// Directory holding `<id>.rdash` files.
    pub root: PathBuf,
}

impl Default for DashboardsConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("dashboards"),
        }
    }
}
