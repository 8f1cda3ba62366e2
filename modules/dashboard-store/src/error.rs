use std::path::PathBuf;

/// Errors surfaced by dashboard storage.
#[derive(Debug, thiserror::Error)]
pub enum DashboardStoreError {
    /// The id could escape the storage root or is otherwise unusable as a
    /// file name.
    #[error("invalid dashboard id '{id}': {reason}")]
    InvalidId { id: String, reason: &'static str },

    #[error("dashboard '{id}' not found")]
    NotFound { id: String },

    #[error("dashboard storage I/O error at {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl DashboardStoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
