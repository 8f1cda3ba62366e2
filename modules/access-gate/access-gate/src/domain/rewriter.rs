//! Tenant-scoped query rewriting.
//!
//! Each data-source item is matched against a dispatch table keyed by item
//! id. The first matching rule decides the rewrite:
//!
//! 1. fixed procedures: call a procedure by its configured display name
//! 2. caller procedures: call the procedure named like the item, binding the
//!    caller's user id
//! 3. order queries: select the rows of the caller's order
//! 4. scoped tables: `SELECT *`, filtered by user id for non-admin callers
//!
//! Anything else is left [`RewriteResult::Unchanged`]. All values reach SQL
//! only as bound parameters.

use std::collections::hash_map::Entry;
use std::collections::{BTreeMap, HashMap, HashSet};

use access_gate_sdk::{
    AccessCandidate, AuthorizationEnvelope, LogicalDataSourceRef, RewriteResult, SqlValue,
};
use dashgate_sql::{BoundStatement, SqlError, select_all, select_all_where_eq};

use crate::config::RewriteConfig;
use crate::domain::filter;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Rule {
    FixedProcedure { name: String },
    CallerProcedure { parameter: String },
    OrderQuery { table: String, column: String },
}

impl Rule {
    fn label(&self) -> &'static str {
        match self {
            Self::FixedProcedure { .. } => "fixed_procedure",
            Self::CallerProcedure { .. } => "caller_procedure",
            Self::OrderQuery { .. } => "order_query",
        }
    }
}

/// Rewrites logical data-source references for one caller at a time.
///
/// Built once from [`RewriteConfig`]; holds no per-request state.
#[derive(Debug, Clone)]
pub struct QueryRewriter {
    rules: HashMap<String, Rule>,
    scoped_tables: HashSet<String>,
    tenant_column: String,
}

impl QueryRewriter {
    #[must_use]
    pub fn new(cfg: &RewriteConfig) -> Self {
        let fixed = cfg.fixed_procedures.iter().map(|r| {
            (r.id.as_str(), Rule::FixedProcedure { name: r.name.clone() })
        });
        let caller = cfg.caller_procedures.iter().map(|r| {
            (
                r.id.as_str(),
                Rule::CallerProcedure {
                    parameter: r.parameter.clone(),
                },
            )
        });
        let order = cfg.order_queries.iter().map(|r| {
            (
                r.id.as_str(),
                Rule::OrderQuery {
                    table: r.table.clone(),
                    column: r.column.clone(),
                },
            )
        });

        let mut rules: HashMap<String, Rule> = HashMap::new();
        for (id, rule) in fixed.chain(caller).chain(order) {
            match rules.entry(id.to_owned()) {
                Entry::Occupied(slot) => {
                    tracing::warn!(
                        item_id = id,
                        kept = slot.get().label(),
                        ignored = rule.label(),
                        "rewrite rule id configured more than once, keeping the first"
                    );
                }
                Entry::Vacant(slot) => {
                    slot.insert(rule);
                }
            }
        }

        let scoped_tables: HashSet<String> =
            cfg.scoped_tables.tables.iter().cloned().collect();

        tracing::info!(
            rules = rules.len(),
            scoped_tables = scoped_tables.len(),
            "query rewriter initialized"
        );

        Self {
            rules,
            scoped_tables,
            tenant_column: cfg.scoped_tables.tenant_column.clone(),
        }
    }

    /// Rewrite `reference` for the caller described by `envelope`.
    ///
    /// Never fails; [`RewriteResult::Unchanged`] covers every unmatched or
    /// unrewritable reference.
    #[must_use]
    pub fn rewrite(
        &self,
        reference: &LogicalDataSourceRef,
        envelope: &AuthorizationEnvelope,
    ) -> RewriteResult {
        let result = match self.rules.get(&reference.id) {
            Some(rule) => Self::apply_rule(reference, rule, envelope),
            None => self
                .rewrite_scoped_table(reference, envelope)
                .unwrap_or(RewriteResult::Unchanged),
        };

        tracing::debug!(
            item_id = %reference.id,
            rule = self.rules.get(&reference.id).map(Rule::label),
            unchanged = result.is_unchanged(),
            "rewrote data source reference"
        );
        result
    }

    fn apply_rule(
        reference: &LogicalDataSourceRef,
        rule: &Rule,
        envelope: &AuthorizationEnvelope,
    ) -> RewriteResult {
        match rule {
            Rule::FixedProcedure { name } => RewriteResult::Procedure {
                name: name.clone(),
                parameters: BTreeMap::new(),
            },
            Rule::CallerProcedure { parameter } => RewriteResult::Procedure {
                name: reference.id.clone(),
                parameters: BTreeMap::from([(
                    parameter.clone(),
                    SqlValue::from(envelope.user_id()),
                )]),
            },
            Rule::OrderQuery { table, column } => custom_query(
                &reference.id,
                select_all_where_eq(table, column, envelope.tenant_order_id()),
            )
            .unwrap_or(RewriteResult::Unchanged),
        }
    }

    fn rewrite_scoped_table(
        &self,
        reference: &LogicalDataSourceRef,
        envelope: &AuthorizationEnvelope,
    ) -> Option<RewriteResult> {
        let table = reference.table.as_deref().filter(|t| !t.is_empty())?;
        if !self.scoped_tables.contains(table) {
            return None;
        }
        if !filter::is_allowed(envelope, &AccessCandidate::table(table)) {
            tracing::debug!(item_id = %reference.id, table, "scoped table denied by allow-list");
            return None;
        }

        let statement = if envelope.is_admin() {
            select_all(table)
        } else {
            select_all_where_eq(table, &self.tenant_column, envelope.user_id())
        };
        custom_query(&reference.id, statement)
    }
}

fn custom_query(
    item_id: &str,
    statement: Result<BoundStatement, SqlError>,
) -> Option<RewriteResult> {
    match statement {
        Ok(statement) => Some(RewriteResult::CustomQuery { statement }),
        Err(e) => {
            tracing::warn!(item_id, error = %e, "cannot build tenant query, leaving item unchanged");
            None
        }
    }
}
