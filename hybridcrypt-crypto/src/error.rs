//! Cryptographic error types.

use thiserror::Error;

/// Result type for cryptographic operations.
pub type CryptoResult<T> = Result<T, CryptoError>;

/// Errors produced by the symmetric and asymmetric primitives.
#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("invalid symmetric key length: {bits} bits (expected 128, 192 or 256)")]
    InvalidKeyLength { bits: usize },

    #[error("key generation failed: {0}")]
    KeyGeneration(String),

    #[error("key wrap failed: {0}")]
    Wrap(String),

    #[error("payload too large to wrap: {actual} bytes (max {max} for this modulus)")]
    PayloadTooLarge { max: usize, actual: usize },

    #[error("key unwrap failed: {0}")]
    Unwrap(String),

    #[error("invalid padding in decrypted data")]
    Padding,

    #[error("cipher error: {0}")]
    Cipher(String),

    #[error("malformed key encoding: {0}")]
    KeyFormat(String),
}
