//! Sync and repository error types.

use fiatlife_storage::StorageError;
use std::time::Duration;
use thiserror::Error;

/// Result type for repository and sync operations.
pub type SyncResult<T> = Result<T, SyncError>;

/// Errors that can occur in repository and sync operations.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("relay error: {0}")]
    Relay(String),

    #[error("blob storage error: {0}")]
    Blob(String),

    #[error("no signer available")]
    NoSigner,

    #[error("relay sync timed out after {0:?}")]
    Timeout(Duration),

    #[error("event has no d tag")]
    MissingDTag,
}
