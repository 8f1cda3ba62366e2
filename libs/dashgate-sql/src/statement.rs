//! Bound statements and the builder that produces them.

use std::fmt;

use serde::Serialize;

use crate::error::SqlError;
use crate::ident::quote_ident;
use crate::value::SqlValue;

/// A named positional parameter (`@p1`, `@p2`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoundParam {
    pub name: String,
    pub value: SqlValue,
}

/// Statement text plus the values bound to its placeholders.
///
/// Only [`StatementBuilder`] creates these, so every placeholder in `sql`
/// has exactly one entry in `params`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoundStatement {
    sql: String,
    params: Vec<BoundParam>,
}

impl BoundStatement {
    #[inline]
    #[must_use]
    pub fn sql(&self) -> &str {
        &self.sql
    }

    #[inline]
    #[must_use]
    pub fn params(&self) -> &[BoundParam] {
        &self.params
    }

    /// Look up a bound value by placeholder name.
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&SqlValue> {
        self.params
            .iter()
            .find(|p| p.name == name)
            .map(|p| &p.value)
    }
}

impl fmt::Display for BoundStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.sql)
    }
}

/// Incremental statement builder.
///
/// Raw text is accepted only as `&'static str`, so runtime strings can reach
/// the statement solely as quoted identifiers or bound values.
#[derive(Debug, Default)]
pub struct StatementBuilder {
    sql: String,
    params: Vec<BoundParam>,
}

impl StatementBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append trusted statement text.
    #[must_use]
    pub fn sql(mut self, fragment: &'static str) -> Self {
        self.sql.push_str(fragment);
        self
    }

    /// Append a bracket-quoted identifier.
    ///
    /// # Errors
    ///
    /// Propagates [`SqlError::InvalidIdentifier`] from [`quote_ident`].
    pub fn ident(mut self, name: &str) -> Result<Self, SqlError> {
        self.sql.push_str(&quote_ident(name)?);
        Ok(self)
    }

    /// Append the next positional placeholder and bind `value` to it.
    #[must_use]
    pub fn bind(mut self, value: impl Into<SqlValue>) -> Self {
        let name = format!("@p{}", self.params.len() + 1);
        self.sql.push_str(&name);
        self.params.push(BoundParam {
            name,
            value: value.into(),
        });
        self
    }

    #[must_use]
    pub fn build(self) -> BoundStatement {
        BoundStatement {
            sql: self.sql,
            params: self.params,
        }
    }
}

/// `SELECT * FROM [table]`
///
/// # Errors
///
/// Returns [`SqlError::InvalidIdentifier`] if `table` cannot be quoted.
pub fn select_all(table: &str) -> Result<BoundStatement, SqlError> {
    Ok(StatementBuilder::new()
        .sql("SELECT * FROM ")
        .ident(table)?
        .build())
}

/// `SELECT * FROM [table] WHERE [column] = @p1` with `value` bound to `@p1`.
///
/// # Errors
///
/// Returns [`SqlError::InvalidIdentifier`] if `table` or `column` cannot be quoted.
pub fn select_all_where_eq(
    table: &str,
    column: &str,
    value: impl Into<SqlValue>,
) -> Result<BoundStatement, SqlError> {
    Ok(StatementBuilder::new()
        .sql("SELECT * FROM ")
        .ident(table)?
        .sql(" WHERE ")
        .ident(column)?
        .sql(" = ")
        .bind(value)
        .build())
}
