//! Hybrid envelope encryption for files at rest.
//!
//! A random AES key encrypts the document; that key is wrapped under an
//! RSA public key and only the wrapped form is ever written to disk.
//!
//! # Lifecycle
//!
//! ```text
//! Uninitialized --generate_keys--> KeysReady --encrypt--> EnvelopeReady
//!                                      ^                      |
//!                                      +------decrypt---------+
//! ```
//!
//! `generate_keys` may run in any state and always replaces the key files.
//! `encrypt` and `decrypt` refuse to run until the key files exist.

mod error;
mod orchestrator;

pub use error::{HybridError, HybridResult};
pub use orchestrator::{HybridSystem, KeyState};

pub use hybridcrypt_crypto::{AsymmetricCipher, DEFAULT_MODULUS_BITS, KeyLength, SymmetricCipher};
pub use hybridcrypt_keystore::{PathKey, PathOverrides, PathsConfig};
