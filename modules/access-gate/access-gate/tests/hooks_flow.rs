//! End-to-end request flow through the host hook trait.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;

use access_gate::{AccessGateConfig, Service};
use access_gate_sdk::{
    DashboardHooks, DataSource, DataSourceItem, DataSourceKind, Role, SqlValue,
};
use http::{HeaderMap, HeaderValue};
use secrecy::ExposeSecret;

fn hooks() -> Arc<dyn DashboardHooks> {
    Arc::new(Service::from_config(&AccessGateConfig::default()).unwrap())
}

fn headers(identity: &'static str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert("x-header-one", HeaderValue::from_static(identity));
    headers
}

fn northwind() -> DataSource {
    DataSource::new("northwind", DataSourceKind::SqlServer)
}

#[tokio::test]
async fn user_sees_only_scoped_items() {
    let hooks = hooks();
    let ctx = hooks.user_context(&headers("userId:ALFKI,orderId:10248")).await;
    assert_eq!(ctx.role(), Role::User);

    let items = vec![
        DataSourceItem::new("customers", northwind()).with_table("Customers"),
        DataSourceItem::new("products", northwind()).with_table("Products"),
        DataSourceItem::new("CustomerOrders", northwind()).with_table("Orders"),
    ];

    let mut visible = Vec::new();
    for item in items {
        if hooks.filter_item(&ctx, &item).await {
            visible.push(hooks.change_data_source_item(&ctx, "Sales", item).await);
        }
    }

    let ids: Vec<&str> = visible.iter().map(|i| i.id.as_str()).collect();
    assert_eq!(ids, vec!["customers", "CustomerOrders"]);

    let customers = visible[0].custom_query.as_ref().unwrap();
    assert_eq!(customers.sql(), "SELECT * FROM [Customers] WHERE [customerId] = @p1");
    assert_eq!(customers.param("@p1"), Some(&SqlValue::from("ALFKI")));

    let orders = visible[1].custom_query.as_ref().unwrap();
    assert_eq!(orders.sql(), "SELECT * FROM [Orders] WHERE [OrderId] = @p1");
    assert_eq!(orders.param("@p1"), Some(&SqlValue::from("10248")));
}

#[tokio::test]
async fn admin_sees_everything_unfiltered() {
    let hooks = hooks();
    let ctx = hooks.user_context(&headers("userId:BLONP")).await;
    assert!(ctx.is_admin());

    let products = DataSourceItem::new("products", northwind()).with_table("Products");
    assert!(hooks.filter_item(&ctx, &products).await);
    let unchanged = hooks.change_data_source_item(&ctx, "Sales", products).await;
    assert!(unchanged.custom_query.is_none());
    assert_eq!(unchanged.data_source.database.as_deref(), Some("Northwind"));

    let orders = DataSourceItem::new("orders", northwind()).with_table("Orders");
    let orders = hooks.change_data_source_item(&ctx, "Sales", orders).await;
    assert_eq!(orders.custom_query.unwrap().sql(), "SELECT * FROM [Orders]");

    let top_ten = DataSourceItem::new("TenMostExpensiveProducts", northwind())
        .with_procedure("Ten Most Expensive Products");
    let top_ten = hooks.change_data_source_item(&ctx, "Sales", top_ten).await;
    assert_eq!(top_ten.procedure.as_deref(), Some("Ten Most Expensive Products"));
    assert!(top_ten.procedure_parameters.is_empty());
}

#[tokio::test]
async fn anonymous_caller_is_restricted() {
    let hooks = hooks();
    let ctx = hooks.user_context(&HeaderMap::new()).await;
    assert_eq!(ctx.role(), Role::User);
    assert_eq!(ctx.user_id(), None);

    let item = DataSourceItem::new("CustOrderHist", northwind()).with_procedure("CustOrderHist");
    // Procedures are not on the default allow-list.
    assert!(!hooks.filter_item(&ctx, &item).await);

    let item = hooks.change_data_source_item(&ctx, "Sales", item).await;
    assert_eq!(item.procedure_parameters.get("@CustomerID"), Some(&SqlValue::Null));
}

#[tokio::test]
async fn credentials_come_from_connection_config() {
    let mut cfg = AccessGateConfig::default();
    cfg.connection.apply_overrides(|key| match key {
        "SQL_SERVER_USERNAME" => Some("reporting".to_owned()),
        "SQL_SERVER_PASSWORD" => Some("r3p0rt".to_owned()),
        _ => None,
    });
    let hooks: Arc<dyn DashboardHooks> = Arc::new(Service::from_config(&cfg).unwrap());
    let ctx = hooks.user_context(&headers("userId:ALFKI")).await;

    let credential = hooks.resolve_credentials(&ctx, &northwind()).await.unwrap();
    assert_eq!(credential.username, "reporting");
    assert_eq!(credential.password.expose_secret(), "r3p0rt");

    let sqlite = DataSource::new("local", DataSourceKind::Other("Sqlite".to_owned()));
    assert!(hooks.resolve_credentials(&ctx, &sqlite).await.is_none());
}

#[tokio::test]
async fn hooks_are_shareable_across_tasks() {
    let hooks = hooks();
    let mut handles = Vec::new();
    for identity in ["userId:BLONP", "userId:ALFKI", "userId:ANATR"] {
        let hooks = Arc::clone(&hooks);
        handles.push(tokio::spawn(async move {
            let ctx = hooks.user_context(&headers(identity)).await;
            (identity, ctx.role())
        }));
    }

    for handle in handles {
        let (identity, role) = handle.await.unwrap();
        let expected = if identity == "userId:BLONP" { Role::Admin } else { Role::User };
        assert_eq!(role, expected);
    }
}
