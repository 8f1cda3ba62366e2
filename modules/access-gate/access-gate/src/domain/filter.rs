//! Allow-list checks for tables and procedures.

use access_gate_sdk::{AccessCandidate, AccessGateError, AuthorizationEnvelope, DataSource, DataSourceItem};

/// Whether `candidate` passes the envelope's allow-list.
///
/// An empty allow-list allows everything. Otherwise both the table and the
/// procedure, when present, must be listed.
#[must_use]
pub fn is_allowed(envelope: &AuthorizationEnvelope, candidate: &AccessCandidate) -> bool {
    if envelope.allowed_tables().is_empty() {
        return true;
    }
    let denied = |name: Option<&str>| name.is_some_and(|n| !envelope.allows(n));
    !(denied(candidate.table.as_deref()) || denied(candidate.procedure.as_deref()))
}

/// Item-level visibility. Items outside the SQL Server family are not
/// governed by the allow-list.
#[must_use]
pub fn filter_item(envelope: &AuthorizationEnvelope, item: &DataSourceItem) -> bool {
    if !item.data_source.kind.is_sql_server_family() {
        return true;
    }
    let allowed = is_allowed(envelope, &AccessCandidate::from_item(item));
    if !allowed {
        tracing::debug!(
            item_id = %item.id,
            table = item.table.as_deref(),
            procedure = item.procedure.as_deref(),
            "item hidden by allow-list"
        );
    }
    allowed
}

/// Source-level filtering is not supported.
///
/// # Errors
///
/// Always returns [`AccessGateError::Unsupported`].
pub fn filter_data_source(
    _envelope: &AuthorizationEnvelope,
    source: &DataSource,
) -> Result<bool, AccessGateError> {
    tracing::warn!(source_id = %source.id, "filter_data_source is not supported");
    Err(AccessGateError::unsupported("filter_data_source"))
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use access_gate_sdk::{ConnectionParams, DataSourceKind, TableAllowList};
    use secrecy::SecretString;
    use tracing_test::traced_test;

    fn params() -> ConnectionParams {
        ConnectionParams {
            host: "localhost".to_owned(),
            database: "Northwind".to_owned(),
            username: "sa".to_owned(),
            password: SecretString::from("password"),
            schema: "dbo".to_owned(),
        }
    }

    fn user() -> AuthorizationEnvelope {
        let tables = TableAllowList::new(["Customers", "Orders"]).unwrap();
        AuthorizationEnvelope::user(Some("ALFKI".to_owned()), None, tables, params())
    }

    fn admin() -> AuthorizationEnvelope {
        AuthorizationEnvelope::admin(Some("BLONP".to_owned()), None, params())
    }

    #[test]
    fn admin_allows_anything() {
        assert!(is_allowed(&admin(), &AccessCandidate::table("Products")));
        assert!(is_allowed(&admin(), &AccessCandidate::procedure("Ten Most Expensive Products")));
    }

    #[test]
    fn user_allow_list_is_enforced() {
        assert!(is_allowed(&user(), &AccessCandidate::table("Orders")));
        assert!(!is_allowed(&user(), &AccessCandidate::table("Products")));
        assert!(!is_allowed(&user(), &AccessCandidate::procedure("CustOrderHist")));
    }

    #[test]
    fn both_names_must_pass() {
        let candidate = AccessCandidate {
            table: Some("Orders".to_owned()),
            procedure: Some("CustOrderHist".to_owned()),
        };
        assert!(!is_allowed(&user(), &candidate));
    }

    #[test]
    fn empty_candidate_is_allowed() {
        assert!(is_allowed(&user(), &AccessCandidate::default()));
    }

    #[test]
    fn filter_item_only_governs_sql_family() {
        let sql = DataSourceItem::new("p", DataSource::new("ds", DataSourceKind::SqlServer))
            .with_table("Products");
        assert!(!filter_item(&user(), &sql));

        let csv = DataSourceItem::new("p", DataSource::new("csv", DataSourceKind::Other("Csv".to_owned())))
            .with_table("Products");
        assert!(filter_item(&user(), &csv));
    }

    #[traced_test]
    #[test]
    fn filter_data_source_is_unsupported() {
        let source = DataSource::new("ds", DataSourceKind::SqlServer);
        let err = filter_data_source(&admin(), &source).unwrap_err();
        assert_eq!(err, AccessGateError::Unsupported { operation: "filter_data_source" });
        assert!(logs_contain("filter_data_source is not supported"));
    }
}
