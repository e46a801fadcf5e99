//! Key store error types.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for key store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur while reading or writing persisted artifacts.
///
/// The underlying cause is exposed through `source()` rather than repeated
/// in the message.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to {op} {}", path.display())]
    Io {
        op: &'static str,
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid JSON in {}", path.display())]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl StoreError {
    /// Path of the artifact involved, if any.
    pub fn path(&self) -> Option<&std::path::Path> {
        match self {
            StoreError::Io { path, .. } | StoreError::Json { path, .. } => Some(path),
            StoreError::Config(_) => None,
        }
    }
}
