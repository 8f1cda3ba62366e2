use async_trait::async_trait;
use serde::Serialize;

use crate::error::DashboardStoreError;

/// A stored dashboard as reported by [`DashboardStore::list`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardEntry {
    pub id: String,
    pub size_bytes: u64,
}

/// Storage backend for dashboard definitions.
#[async_trait]
pub trait DashboardStore: Send + Sync {
    /// Read a dashboard definition.
    ///
    /// # Errors
    ///
    /// [`DashboardStoreError::NotFound`] when no dashboard has this id,
    /// [`DashboardStoreError::InvalidId`] for unusable ids.
    async fn load(&self, id: &str) -> Result<Vec<u8>, DashboardStoreError>;

    /// Create or replace a dashboard definition.
    ///
    /// # Errors
    ///
    /// [`DashboardStoreError::InvalidId`] for unusable ids, or
    /// [`DashboardStoreError::Io`] when the backend cannot persist it.
    async fn save(&self, id: &str, contents: &[u8]) -> Result<(), DashboardStoreError>;

    /// Whether a dashboard with this id is stored.
    ///
    /// # Errors
    ///
    /// [`DashboardStoreError::InvalidId`] for unusable ids, or
    /// [`DashboardStoreError::Io`] when the backend cannot be queried.
    async fn exists(&self, id: &str) -> Result<bool, DashboardStoreError>;

    /// All stored dashboards, sorted by id.
    ///
    /// # Errors
    ///
    /// [`DashboardStoreError::Io`] when the backend cannot be enumerated.
    async fn list(&self) -> Result<Vec<DashboardEntry>, DashboardStoreError>;
}
