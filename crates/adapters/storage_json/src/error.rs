//! Storage-specific error type wrapping file and JSON errors.

use casita_domain::error::CasitaError;

/// Errors originating from the JSON snapshot file.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Reading or writing the snapshot file failed.
    #[error("snapshot file error")]
    Io(#[from] std::io::Error),

    /// The snapshot file exists but does not hold a valid registry.
    #[error("snapshot JSON error")]
    Json(#[from] serde_json::Error),
}

impl From<StorageError> for CasitaError {
    fn from(err: StorageError) -> Self {
        Self::Storage(Box::new(err))
    }
}
