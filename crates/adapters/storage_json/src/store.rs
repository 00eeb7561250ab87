//! Snapshot store backed by a single JSON file.

use std::io::ErrorKind;
use std::path::PathBuf;

use casita_app::ports::SnapshotStore;
use casita_domain::error::CasitaError;
use casita_domain::registry::Registry;

use crate::error::StorageError;

/// [`SnapshotStore`] writing the registry to one pretty-printed JSON file.
///
/// Each save rewrites the entire file; the registry's bounded size keeps
/// that cheap. The file's parent directory must exist.
#[derive(Debug, Clone)]
pub struct JsonSnapshotStore {
    path: PathBuf,
}

impl JsonSnapshotStore {
    /// Create a store over the given snapshot file path. No IO happens
    /// until the first load or save.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    async fn read(&self) -> Result<Option<Registry>, StorageError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        let registry = serde_json::from_slice(&bytes)?;
        Ok(Some(registry))
    }

    async fn write(&self, registry: &Registry) -> Result<(), StorageError> {
        let bytes = serde_json::to_vec_pretty(registry)?;
        tokio::fs::write(&self.path, bytes).await?;
        tracing::debug!(path = %self.path.display(), "snapshot written");
        Ok(())
    }
}

impl SnapshotStore for JsonSnapshotStore {
    async fn load(&self) -> Result<Option<Registry>, CasitaError> {
        self.read().await.map_err(Into::into)
    }

    async fn save(&self, registry: &Registry) -> Result<(), CasitaError> {
        self.write(registry).await.map_err(Into::into)
    }
}
