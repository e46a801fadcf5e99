//! Orchestrator error types.

use hybridcrypt_crypto::CryptoError;
use hybridcrypt_keystore::StoreError;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for hybrid operations.
pub type HybridResult<T> = Result<T, HybridError>;

/// Errors that can occur while generating keys or encrypting/decrypting files.
///
/// Like [`StoreError`], wrapped causes are reachable through `source()`.
#[derive(Debug, Error)]
pub enum HybridError {
    #[error("key material not found at {}: run key generation first", path.display())]
    KeysNotGenerated { path: PathBuf },

    #[error("encrypted file not found at {}: run encryption first", path.display())]
    EnvelopeMissing { path: PathBuf },

    #[error("{op} failed")]
    Crypto {
        op: &'static str,
        source: CryptoError,
    },

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl HybridError {
    pub(crate) fn crypto(op: &'static str) -> impl FnOnce(CryptoError) -> Self {
        move |source| HybridError::Crypto { op, source }
    }
}
