use std::sync::Arc;

use access_gate::{AccessGateConfig, Service};
use access_gate_sdk::{
    DashboardHooks, DataSource, DataSourceItem, DataSourceKind, LogicalDataSourceRef,
};
use anyhow::{Context, Result};
use dashboard_store::{DashboardStore, FsDashboardStore};
use serde_json::{Value, json};

/// Data source the CLI evaluates items against.
const CLI_SOURCE_ID: &str = "cli";

pub struct App {
    service: Arc<Service>,
    store: Arc<dyn DashboardStore>,
}

impl App {
    pub fn from_config(config: &AccessGateConfig) -> Result<Self> {
        let service = Service::from_config(config).context("invalid access gate configuration")?;
        Ok(Self {
            service: Arc::new(service),
            store: Arc::new(FsDashboardStore::new(&config.dashboards.root)),
        })
    }

    pub fn header_name(&self) -> &str {
        self.service.header_name().as_str()
    }

    pub fn context(&self, header: &str) -> Result<Value> {
        let envelope = self.service.request_context(Some(header));
        Ok(serde_json::to_value(&envelope)?)
    }

    pub fn rewrite(
        &self,
        header: &str,
        id: &str,
        table: Option<String>,
        procedure: Option<String>,
    ) -> Result<Value> {
        let envelope = self.service.request_context(Some(header));
        let reference = LogicalDataSourceRef::from_item(&item(id, table, procedure));
        let result = self.service.rewrite(&reference, &envelope);
        Ok(serde_json::to_value(&result)?)
    }

    pub async fn filter(
        &self,
        header: &str,
        table: Option<String>,
        procedure: Option<String>,
    ) -> Result<Value> {
        let hooks: &dyn DashboardHooks = self.service.as_ref();
        let envelope = self.service.request_context(Some(header));
        let allowed = hooks
            .filter_item(&envelope, &item(CLI_SOURCE_ID, table, procedure))
            .await;
        Ok(json!({ "allowed": allowed }))
    }

    pub async fn dashboards(&self) -> Result<Value> {
        let entries = self.store.list().await.context("failed to list dashboards")?;
        Ok(serde_json::to_value(entries)?)
    }

    pub async fn show_dashboard(&self, id: &str) -> Result<Value> {
        let contents = self
            .store
            .load(id)
            .await
            .with_context(|| format!("failed to load dashboard '{id}'"))?;
        Ok(json!({
            "id": id,
            "size_bytes": contents.len(),
            "content": String::from_utf8_lossy(&contents),
        }))
    }

    pub async fn dashboard_exists(&self, id: &str) -> Result<Value> {
        let exists = self
            .store
            .exists(id)
            .await
            .with_context(|| format!("failed to look up dashboard '{id}'"))?;
        Ok(json!({ "exists": exists }))
    }
}

fn item(id: &str, table: Option<String>, procedure: Option<String>) -> DataSourceItem {
    let mut item = DataSourceItem::new(id, DataSource::new(CLI_SOURCE_ID, DataSourceKind::SqlServer));
    item.table = table;
    item.procedure = procedure;
    item
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    fn app() -> App {
        App::from_config(&AccessGateConfig::default()).unwrap()
    }

    #[test]
    fn context_reports_role_without_password() {
        let value = app().context("userId:BLONP").unwrap();
        assert_eq!(value["role"], "Admin");
        assert_eq!(value["connection_params"]["password"], "[REDACTED]");
    }

    #[test]
    fn rewrite_reports_bound_query() {
        let value = app()
            .rewrite("userId:ALFKI", "customers", Some("Customers".to_owned()), None)
            .unwrap();
        assert_eq!(value["type"], "custom_query");
        assert_eq!(
            value["statement"]["sql"],
            "SELECT * FROM [Customers] WHERE [customerId] = @p1"
        );
    }

    #[test]
    fn rewrite_unknown_item_is_unchanged() {
        let value = app().rewrite("userId:ALFKI", "Whatever", None, None).unwrap();
        assert_eq!(value, json!({ "type": "unchanged" }));
    }

    #[tokio::test]
    async fn filter_applies_allow_list() {
        let app = app();
        let denied = app
            .filter("userId:ALFKI", Some("Products".to_owned()), None)
            .await
            .unwrap();
        assert_eq!(denied, json!({ "allowed": false }));

        let allowed = app
            .filter("userId:BLONP", Some("Products".to_owned()), None)
            .await
            .unwrap();
        assert_eq!(allowed, json!({ "allowed": true }));
    }

    #[tokio::test]
    async fn dashboards_lists_store_root() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("Sales.rdash"), b"{}").unwrap();

        let mut config = AccessGateConfig::default();
        config.dashboards.root = dir.path().to_path_buf();
        let value = App::from_config(&config).unwrap().dashboards().await.unwrap();

        assert_eq!(value, json!([{ "id": "Sales", "size_bytes": 2 }]));
    }

    fn app_with_store(root: &std::path::Path) -> App {
        let mut config = AccessGateConfig::default();
        config.dashboards.root = root.to_path_buf();
        App::from_config(&config).unwrap()
    }

    #[tokio::test]
    async fn show_dashboard_prints_definition() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("Sales.rdash"), br#"{"Title":"Sales"}"#).unwrap();
        let app = app_with_store(dir.path());

        let value = app.show_dashboard("Sales").await.unwrap();
        assert_eq!(
            value,
            json!({ "id": "Sales", "size_bytes": 17, "content": r#"{"Title":"Sales"}"# })
        );

        let err = app.show_dashboard("Missing").await.unwrap_err();
        assert!(format!("{err:#}").contains("Missing"));
    }

    #[tokio::test]
    async fn dashboard_exists_checks_store() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("Sales.rdash"), b"{}").unwrap();
        let app = app_with_store(dir.path());

        assert_eq!(app.dashboard_exists("Sales").await.unwrap(), json!({ "exists": true }));
        assert_eq!(app.dashboard_exists("Other").await.unwrap(), json!({ "exists": false }));
        assert!(app.dashboard_exists("../Sales").await.is_err());
    }

    #[test]
    fn header_name_follows_configuration() {
        assert_eq!(app().header_name(), "x-header-one");

        let mut config = AccessGateConfig::default();
        config.identity.header_name = "X-Tenant-Identity".to_owned();
        let app = App::from_config(&config).unwrap();
        assert_eq!(app.header_name(), "x-tenant-identity");
    }
}
