//! Property tests for identity parsing and envelope derivation.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::use_debug)]

use access_gate::domain::filter::is_allowed;
use access_gate::domain::identity::resolve;
use access_gate::{AccessGateConfig, Service};
use access_gate_sdk::{AccessCandidate, Role};
use proptest::prelude::*;

fn service() -> Service {
    Service::from_config(&AccessGateConfig::default()).unwrap()
}

fn header_strategy() -> impl Strategy<Value = String> {
    let key = prop_oneof![
        Just("userId".to_owned()),
        Just("USERID".to_owned()),
        Just("orderId".to_owned()),
        "[a-zA-Z ]{0,8}",
    ];
    let value = prop_oneof![Just("BLONP".to_owned()), "[^,]{0,12}"];
    let pair = prop_oneof![
        (key, value).prop_map(|(k, v)| format!("{k}:{v}")),
        "[^,]{0,12}",
    ];
    prop::collection::vec(pair, 0..6).prop_map(|pairs| pairs.join(","))
}

proptest! {
    #[test]
    fn resolver_never_panics(raw in any::<String>()) {
        let claims = resolve(Some(&raw));
        prop_assert!(claims.user_id.as_deref().is_none_or(|v| !v.is_empty()));
        prop_assert!(claims.tenant_order_id.as_deref().is_none_or(|v| !v.is_empty()));
    }

    #[test]
    fn admin_iff_unrestricted(header in header_strategy()) {
        let envelope = service().request_context(Some(&header));
        prop_assert_eq!(envelope.role() == Role::Admin, envelope.allowed_tables().is_empty());
    }

    #[test]
    fn admin_allows_every_candidate(
        table in proptest::option::of("[A-Za-z]{1,12}"),
        procedure in proptest::option::of("[A-Za-z ]{1,24}"),
    ) {
        let envelope = service().request_context(Some("userId:BLONP"));
        let candidate = AccessCandidate { table, procedure };
        prop_assert!(is_allowed(&envelope, &candidate));
    }

    #[test]
    fn scoped_query_text_ignores_user_id(user_id in "[^,:]{1,24}") {
        prop_assume!(!user_id.trim().is_empty() && user_id.trim() != "BLONP");
        let service = service();
        let envelope = service.request_context(Some(&format!("userId:{user_id}")));
        let reference = access_gate_sdk::LogicalDataSourceRef::table("customers", "Customers");

        match service.rewrite(&reference, &envelope) {
            access_gate_sdk::RewriteResult::CustomQuery { statement } => {
                prop_assert_eq!(statement.sql(), "SELECT * FROM [Customers] WHERE [customerId] = @p1");
            }
            other => prop_assert!(false, "expected custom query, got {:?}", other),
        }
    }
}
