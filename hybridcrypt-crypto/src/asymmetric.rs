//! RSA-OAEP key wrapping.
//!
//! A symmetric key is wrapped under the recipient's RSA public key using
//! OAEP with SHA-256 for both the label hash and MGF1, and an empty label.
//! Keys are exchanged as PEM text: PKCS#1 for the private key and
//! SubjectPublicKeyInfo for the public key.
//!
//! The private key PEM is written without a passphrase. Anyone who can
//! read the file can unwrap every symmetric key wrapped for it.

use crate::error::{CryptoError, CryptoResult};
use rand_core::OsRng;
use rsa::pkcs1::{DecodeRsaPrivateKey, DecodeRsaPublicKey, EncodeRsaPrivateKey};
use rsa::pkcs8::{DecodePrivateKey, DecodePublicKey, EncodePublicKey, LineEnding};
use rsa::traits::PublicKeyParts;
use rsa::{BigUint, Oaep, RsaPrivateKey, RsaPublicKey};
use sha2::Sha256;
use std::fmt;
use tracing::debug;
use zeroize::Zeroizing;

/// Fixed RSA public exponent.
pub const PUBLIC_EXPONENT: u64 = 65537;

/// Modulus size used when none is configured.
pub const DEFAULT_MODULUS_BITS: usize = 2048;

/// Smallest modulus accepted for key generation.
pub const MIN_MODULUS_BITS: usize = 1024;

/// SHA-256 digest length.
const OAEP_HASH_LEN: usize = 32;

/// Bytes of each RSA block consumed by OAEP padding.
pub const OAEP_OVERHEAD: usize = 2 * OAEP_HASH_LEN + 2;

/// RSA private key.
#[derive(Clone)]
pub struct PrivateKey(RsaPrivateKey);

/// RSA public key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PublicKey(RsaPublicKey);

/// A symmetric key encrypted under an RSA public key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WrappedKey(Vec<u8>);

/// Freshly generated RSA key pair.
#[derive(Debug)]
pub struct AsymmetricKeyPair {
    pub private: PrivateKey,
    pub public: PublicKey,
}

impl AsymmetricKeyPair {
    /// Generates a key pair with exponent 65537 and the given modulus size.
    pub fn generate(modulus_bits: usize) -> CryptoResult<Self> {
        if modulus_bits < MIN_MODULUS_BITS {
            return Err(CryptoError::KeyGeneration(format!(
                "modulus of {modulus_bits} bits is below the {MIN_MODULUS_BITS}-bit minimum"
            )));
        }

        debug!("generating {modulus_bits}-bit RSA key pair");
        let exponent = BigUint::from(PUBLIC_EXPONENT);
        let private = RsaPrivateKey::new_with_exp(&mut OsRng, modulus_bits, &exponent)
            .map_err(|e| CryptoError::KeyGeneration(e.to_string()))?;
        let public = RsaPublicKey::from(&private);

        Ok(Self {
            private: PrivateKey(private),
            public: PublicKey(public),
        })
    }
}

impl PrivateKey {
    /// Derives the matching public key.
    pub fn public_key(&self) -> PublicKey {
        PublicKey(RsaPublicKey::from(&self.0))
    }

    /// Modulus size in bits.
    pub fn modulus_bits(&self) -> usize {
        self.0.size() * 8
    }

    /// Encodes as an unencrypted PKCS#1 PEM document (`RSA PRIVATE KEY`).
    pub fn to_pem(&self) -> CryptoResult<Zeroizing<String>> {
        self.0
            .to_pkcs1_pem(LineEnding::LF)
            .map_err(|e| CryptoError::KeyFormat(format!("private key encoding failed: {e}")))
    }

    /// Decodes a PKCS#1 PEM private key, falling back to unencrypted PKCS#8.
    pub fn from_pem(pem: &str) -> CryptoResult<Self> {
        match RsaPrivateKey::from_pkcs1_pem(pem) {
            Ok(key) => Ok(Self(key)),
            Err(pkcs1_err) => RsaPrivateKey::from_pkcs8_pem(pem).map(Self).map_err(|pkcs8_err| {
                CryptoError::KeyFormat(format!(
                    "invalid private key PEM (pkcs1: {pkcs1_err}; pkcs8: {pkcs8_err})"
                ))
            }),
        }
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrivateKey")
            .field("modulus_bits", &self.modulus_bits())
            .finish_non_exhaustive()
    }
}

impl PublicKey {
    /// Modulus size in bytes.
    pub fn modulus_bytes(&self) -> usize {
        self.0.size()
    }

    /// Modulus size in bits.
    pub fn modulus_bits(&self) -> usize {
        self.0.size() * 8
    }

    /// Largest payload OAEP/SHA-256 can wrap under this modulus.
    pub fn max_wrap_len(&self) -> usize {
        self.modulus_bytes().saturating_sub(OAEP_OVERHEAD)
    }

    /// Encodes as a SubjectPublicKeyInfo PEM document (`PUBLIC KEY`).
    pub fn to_pem(&self) -> CryptoResult<String> {
        self.0
            .to_public_key_pem(LineEnding::LF)
            .map_err(|e| CryptoError::KeyFormat(format!("public key encoding failed: {e}")))
    }

    /// Decodes an SPKI PEM public key, falling back to PKCS#1.
    pub fn from_pem(pem: &str) -> CryptoResult<Self> {
        match RsaPublicKey::from_public_key_pem(pem) {
            Ok(key) => Ok(Self(key)),
            Err(spki_err) => RsaPublicKey::from_pkcs1_pem(pem).map(Self).map_err(|pkcs1_err| {
                CryptoError::KeyFormat(format!(
                    "invalid public key PEM (spki: {spki_err}; pkcs1: {pkcs1_err})"
                ))
            }),
        }
    }
}

impl WrappedKey {
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }
}

/// Wraps `data` (normally a symmetric key) under `public`.
pub fn wrap_key(data: &[u8], public: &PublicKey) -> CryptoResult<WrappedKey> {
    let max = public.max_wrap_len();
    if data.len() > max {
        return Err(CryptoError::PayloadTooLarge {
            max,
            actual: data.len(),
        });
    }

    public
        .0
        .encrypt(&mut OsRng, Oaep::new::<Sha256>(), data)
        .map(WrappedKey)
        .map_err(|e| CryptoError::Wrap(e.to_string()))
}

/// Recovers the wrapped bytes with the matching private key.
pub fn unwrap_key(wrapped: &WrappedKey, private: &PrivateKey) -> CryptoResult<Vec<u8>> {
    private
        .0
        .decrypt(Oaep::new::<Sha256>(), &wrapped.0)
        .map_err(|e| {
            CryptoError::Unwrap(format!("OAEP decryption failed (wrong key or corrupt data): {e}"))
        })
}

/// Injectable RSA component bound to one modulus size.
#[derive(Clone, Copy, Debug)]
pub struct AsymmetricCipher {
    modulus_bits: usize,
}

impl Default for AsymmetricCipher {
    fn default() -> Self {
        Self {
            modulus_bits: DEFAULT_MODULUS_BITS,
        }
    }
}

impl AsymmetricCipher {
    pub fn new(modulus_bits: usize) -> Self {
        Self { modulus_bits }
    }

    pub fn modulus_bits(&self) -> usize {
        self.modulus_bits
    }

    pub fn generate(&self) -> CryptoResult<AsymmetricKeyPair> {
        AsymmetricKeyPair::generate(self.modulus_bits)
    }

    pub fn wrap(&self, public: &PublicKey, data: &[u8]) -> CryptoResult<WrappedKey> {
        wrap_key(data, public)
    }

    pub fn unwrap(&self, private: &PrivateKey, wrapped: &WrappedKey) -> CryptoResult<Vec<u8>> {
        unwrap_key(wrapped, private)
    }
}
