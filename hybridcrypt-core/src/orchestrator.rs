//! Hybrid encryption orchestrator.
//!
//! The orchestrator ties together:
//! - AES-CBC bulk encryption (`SymmetricCipher`)
//! - RSA-OAEP key wrapping (`AsymmetricCipher`)
//! - File persistence (`KeyStore`)
//!
//! It owns all I/O. The primitives are pure. No state survives between
//! calls: every encryption and decryption unwraps the symmetric key again
//! from its persisted form, trading speed for having a single source of
//! truth on disk.

use crate::error::{HybridError, HybridResult};
use hybridcrypt_crypto::{
    AsymmetricCipher, Envelope, KeyLength, PrivateKey, SymmetricCipher, SymmetricKey, WrappedKey,
};
use hybridcrypt_keystore::{KeyStore, PathsConfig};
use std::path::PathBuf;
use tracing::{debug, info};
use zeroize::Zeroizing;

/// Position in the key lifecycle, derived from which artifacts exist on disk.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyState {
    /// At least one of private key, public key or wrapped key is missing.
    Uninitialized,
    /// Private key, public key and wrapped symmetric key all exist.
    KeysReady,
    /// Keys exist and so does an encrypted document.
    EnvelopeReady,
}

/// Generates keys and encrypts/decrypts the configured files.
pub struct HybridSystem {
    paths: PathsConfig,
    symmetric: SymmetricCipher,
    asymmetric: AsymmetricCipher,
}

impl HybridSystem {
    pub fn new(
        paths: PathsConfig,
        symmetric: SymmetricCipher,
        asymmetric: AsymmetricCipher,
    ) -> Self {
        Self {
            paths,
            symmetric,
            asymmetric,
        }
    }

    /// Location of the wrapped symmetric key for the configured key length.
    pub fn wrapped_key_path(&self) -> PathBuf {
        self.paths.wrapped_key_path(self.symmetric.key_length().bits())
    }

    /// Inspects the filesystem to report the current lifecycle state.
    pub fn state(&self) -> KeyState {
        if self.missing_key_file().is_some() {
            KeyState::Uninitialized
        } else if KeyStore::new(&self.paths.encrypted_text_file).exists() {
            KeyState::EnvelopeReady
        } else {
            KeyState::KeysReady
        }
    }

    /// Generates a fresh symmetric key and RSA key pair and persists them.
    ///
    /// All keys are computed before any file is opened. Wrapped keys of every
    /// length are removed up front, since none of them can be unwrapped by
    /// the new private key. The new wrapped key is written last, so a failure
    /// part-way leaves the system `Uninitialized`.
    pub fn generate_keys(&self) -> HybridResult<()> {
        let key_length = self.symmetric.key_length();
        let symmetric_key = self
            .symmetric
            .generate_key()
            .map_err(HybridError::crypto("symmetric key generation"))?;
        let pair = self
            .asymmetric
            .generate()
            .map_err(HybridError::crypto("RSA key generation"))?;
        let wrapped = self
            .asymmetric
            .wrap(&pair.public, symmetric_key.as_bytes())
            .map_err(HybridError::crypto("symmetric key wrapping"))?;
        let private_pem = pair
            .private
            .to_pem()
            .map_err(HybridError::crypto("private key encoding"))?;
        let public_pem = pair
            .public
            .to_pem()
            .map_err(HybridError::crypto("public key encoding"))?;
        debug!(
            "computed {key_length}-bit symmetric key and {}-bit RSA key pair",
            self.asymmetric.modulus_bits()
        );

        for length in KeyLength::ALL {
            KeyStore::new(self.paths.wrapped_key_path(length.bits())).remove()?;
        }
        let wrapped_store = KeyStore::new(self.wrapped_key_path());
        KeyStore::new(&self.paths.private_key).write_text(&private_pem)?;
        KeyStore::new(&self.paths.public_key).write_text(&public_pem)?;
        wrapped_store.write_bytes(wrapped.as_bytes())?;

        info!(
            "keys generated: private key {}, public key {}, wrapped {key_length}-bit key {}",
            self.paths.private_key.display(),
            self.paths.public_key.display(),
            wrapped_store.path().display()
        );
        Ok(())
    }

    /// Encrypts the plaintext file into the encrypted file. Key files are only read.
    pub fn encrypt(&self) -> HybridResult<()> {
        self.require_keys()?;
        let key = self.recover_symmetric_key()?;

        let plaintext = KeyStore::new(&self.paths.text_file).read_bytes()?;
        let envelope = self
            .symmetric
            .encrypt(&key, &plaintext)
            .map_err(HybridError::crypto("encryption"))?;

        KeyStore::new(&self.paths.encrypted_text_file).write_bytes(&envelope.to_bytes())?;
        info!(
            "encrypted {} ({} bytes) into {} ({} bytes)",
            self.paths.text_file.display(),
            plaintext.len(),
            self.paths.encrypted_text_file.display(),
            envelope.encoded_len()
        );
        Ok(())
    }

    /// Decrypts the encrypted file into the decrypted file.
    pub fn decrypt(&self) -> HybridResult<()> {
        self.require_keys()?;
        let envelope_store = KeyStore::new(&self.paths.encrypted_text_file);
        if !envelope_store.exists() {
            return Err(HybridError::EnvelopeMissing {
                path: envelope_store.path().to_path_buf(),
            });
        }
        let key = self.recover_symmetric_key()?;

        let envelope = Envelope::from_bytes(&envelope_store.read_bytes()?)
            .map_err(HybridError::crypto("decryption"))?;
        let plaintext = self
            .symmetric
            .decrypt(&key, &envelope)
            .map_err(HybridError::crypto("decryption"))?;

        KeyStore::new(&self.paths.decrypted_text_file).write_bytes(&plaintext)?;
        info!(
            "decrypted {} into {} ({} bytes)",
            self.paths.encrypted_text_file.display(),
            self.paths.decrypted_text_file.display(),
            plaintext.len()
        );
        Ok(())
    }

    /// Loads the wrapped key and private key, and unwraps the symmetric key.
    fn recover_symmetric_key(&self) -> HybridResult<SymmetricKey> {
        let wrapped = WrappedKey::from_bytes(KeyStore::new(self.wrapped_key_path()).read_bytes()?);
        let pem = Zeroizing::new(KeyStore::new(&self.paths.private_key).read_text()?);
        let private = PrivateKey::from_pem(&pem)
            .map_err(HybridError::crypto("private key loading"))?;

        let raw = self
            .asymmetric
            .unwrap(&private, &wrapped)
            .map_err(HybridError::crypto("symmetric key unwrapping"))?;
        let key = self
            .symmetric
            .key_from_bytes(raw)
            .map_err(HybridError::crypto("symmetric key unwrapping"))?;
        debug!("unwrapped {}-bit symmetric key", key.length());
        Ok(key)
    }

    fn require_keys(&self) -> HybridResult<()> {
        match self.missing_key_file() {
            Some(path) => Err(HybridError::KeysNotGenerated { path }),
            None => Ok(()),
        }
    }

    fn missing_key_file(&self) -> Option<PathBuf> {
        [
            self.paths.private_key.clone(),
            self.paths.public_key.clone(),
            self.wrapped_key_path(),
        ]
        .into_iter()
        .find(|path| !KeyStore::new(path).exists())
    }
}
