//! File-system dashboard store.

use std::io::ErrorKind;
use std::io::Write;
use std::path::PathBuf;

use async_trait::async_trait;

use crate::api::{DashboardEntry, DashboardStore};
use crate::error::DashboardStoreError;

pub const DASHBOARD_EXTENSION: &str = "rdash";
pub const MAX_ID_LEN: usize = 128;

/// Check that `id` is safe to use as a file stem under the storage root.
///
/// # Errors
///
/// Returns [`DashboardStoreError::InvalidId`] describing the first violated rule.
pub fn validate_id(id: &str) -> Result<(), DashboardStoreError> {
    let invalid = |reason| {
        Err(DashboardStoreError::InvalidId {
            id: id.to_owned(),
            reason,
        })
    };

    if id.trim().is_empty() {
        return invalid("id is blank");
    }
    if id.chars().count() > MAX_ID_LEN {
        return invalid("id exceeds 128 characters");
    }
    if id.starts_with('.') {
        return invalid("id must not start with '.'");
    }
    if !id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | ' '))
    {
        return invalid("id may only contain ASCII letters, digits, '-', '_', '.' and spaces");
    }
    Ok(())
}

/// Dashboards stored as `<root>/<id>.rdash`.
#[derive(Debug, Clone)]
pub struct FsDashboardStore {
    root: PathBuf,
}

impl FsDashboardStore {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path_for(&self, id: &str) -> Result<PathBuf, DashboardStoreError> {
        validate_id(id)?;
        Ok(self.root.join(format!("{id}.{DASHBOARD_EXTENSION}")))
    }
}

#[async_trait]
impl DashboardStore for FsDashboardStore {
    async fn load(&self, id: &str) -> Result<Vec<u8>, DashboardStoreError> {
        let path = self.path_for(id)?;
        match tokio::fs::read(&path).await {
            Ok(contents) => {
                tracing::debug!(dashboard_id = id, bytes = contents.len(), "loaded dashboard");
                Ok(contents)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Err(DashboardStoreError::NotFound {
                id: id.to_owned(),
            }),
            Err(e) => Err(DashboardStoreError::io(path, e)),
        }
    }

    async fn save(&self, id: &str, contents: &[u8]) -> Result<(), DashboardStoreError> {
        let path = self.path_for(id)?;
        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|e| DashboardStoreError::io(&self.root, e))?;

        // Each save stages into its own file so readers never observe a partial
        // write and concurrent saves of one id never share a staging path.
        let root = self.root.clone();
        let target = path.clone();
        let body = contents.to_vec();
        tokio::task::spawn_blocking(move || -> std::io::Result<()> {
            let mut staging = tempfile::NamedTempFile::new_in(&root)?;
            staging.write_all(&body)?;
            staging.as_file().sync_all()?;
            staging.persist(&target).map_err(|e| e.error)?;
            Ok(())
        })
        .await
        .map_err(|e| DashboardStoreError::io(&path, std::io::Error::other(e)))?
        .map_err(|e| DashboardStoreError::io(&path, e))?;

        tracing::info!(dashboard_id = id, bytes = contents.len(), "saved dashboard");
        Ok(())
    }

    async fn exists(&self, id: &str) -> Result<bool, DashboardStoreError> {
        let path = self.path_for(id)?;
        match tokio::fs::metadata(&path).await {
            Ok(metadata) => Ok(metadata.is_file()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(DashboardStoreError::io(path, e)),
        }
    }

    async fn list(&self) -> Result<Vec<DashboardEntry>, DashboardStoreError> {
        let mut dir = match tokio::fs::read_dir(&self.root).await {
            Ok(dir) => dir,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(DashboardStoreError::io(&self.root, e)),
        };

        let mut entries = Vec::new();
        while let Some(entry) = dir
            .next_entry()
            .await
            .map_err(|e| DashboardStoreError::io(&self.root, e))?
        {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(DASHBOARD_EXTENSION) {
                continue;
            }
            let Some(id) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            if validate_id(id).is_err() {
                tracing::debug!(path = %path.display(), "skipping dashboard file with unusable name");
                continue;
            }
            let metadata = entry
                .metadata()
                .await
                .map_err(|e| DashboardStoreError::io(&path, e))?;
            if !metadata.is_file() {
                continue;
            }
            entries.push(DashboardEntry {
                id: id.to_owned(),
                size_bytes: metadata.len(),
            });
        }

        entries.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(entries)
    }
}
