//! Cryptographic primitives for hybridcrypt.
//!
//! Provides envelope encryption using:
//! - AES-128/192/256 in CBC mode with PKCS#7 padding for bulk data
//! - RSA-OAEP (SHA-256) for wrapping the AES key
//! - PEM serialization of the RSA key pair
//!
//! # Architecture
//!
//! The encryption uses a two-tier key system:
//!
//! 1. **Key pair**: An RSA key pair generated once. The private key is the
//!    only secret that has to be kept; it is stored as an unencrypted PEM file.
//!
//! 2. **Symmetric key**: A random AES key that encrypts the document. It is
//!    only ever persisted in wrapped form, encrypted under the RSA public key.
//!
//! Ciphertext is not authenticated. Flipping bits in an envelope is detected
//! only when it happens to corrupt the padding.
//!
//! Nothing in this crate touches the filesystem.

pub mod asymmetric;
mod error;
pub mod symmetric;

pub use asymmetric::{
    AsymmetricCipher, AsymmetricKeyPair, DEFAULT_MODULUS_BITS, MIN_MODULUS_BITS, OAEP_OVERHEAD,
    PUBLIC_EXPONENT, PrivateKey, PublicKey, WrappedKey, unwrap_key, wrap_key,
};
pub use error::{CryptoError, CryptoResult};
pub use symmetric::{
    BLOCK_SIZE, Envelope, IV_SIZE, KeyLength, SymmetricCipher, SymmetricKey, decrypt, encrypt,
    generate_key,
};
