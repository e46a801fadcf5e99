//! Path configuration for every persisted artifact.

use crate::error::{StoreError, StoreResult};
use crate::store::{KeyStore, wrapped_key_path};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable naming the configuration file.
pub const CONFIG_ENV_VAR: &str = "HYBRIDCRYPT_PATHS";

/// File name of the configuration inside the config directory.
pub const CONFIG_FILE_NAME: &str = "paths.json";

/// Filesystem locations of every artifact, keyed by logical name.
///
/// Loaded once at startup and never mutated afterwards.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Plaintext document to encrypt.
    pub text_file: PathBuf,
    /// PEM public key.
    pub public_key: PathBuf,
    /// PEM private key (unencrypted).
    pub private_key: PathBuf,
    /// Base path for the wrapped symmetric key; see [`wrapped_key_path`].
    pub symmetric_key_file: PathBuf,
    /// Envelope output of encryption, input of decryption.
    pub encrypted_text_file: PathBuf,
    /// Plaintext output of decryption.
    pub decrypted_text_file: PathBuf,
}

impl PathsConfig {
    /// Loads the JSON configuration at `path`.
    pub fn load(path: impl AsRef<Path>) -> StoreResult<Self> {
        KeyStore::new(path).read_json()
    }

    /// Location of the wrapped symmetric key for a key of `bits` length.
    pub fn wrapped_key_path(&self, bits: usize) -> PathBuf {
        wrapped_key_path(&self.symmetric_key_file, bits)
    }

    /// Returns the platform default configuration path.
    #[must_use]
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .map(|dir| dir.join("hybridcrypt").join(CONFIG_FILE_NAME))
            .unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME))
    }
}

/// Logical name of one configured path.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PathKey {
    TextFile,
    PublicKey,
    PrivateKey,
    SymmetricKeyFile,
    EncryptedTextFile,
    DecryptedTextFile,
}

impl PathKey {
    pub const ALL: [PathKey; 6] = [
        PathKey::TextFile,
        PathKey::PublicKey,
        PathKey::PrivateKey,
        PathKey::SymmetricKeyFile,
        PathKey::EncryptedTextFile,
        PathKey::DecryptedTextFile,
    ];

    /// Key of this path in the JSON configuration.
    pub fn name(self) -> &'static str {
        match self {
            PathKey::TextFile => "text_file",
            PathKey::PublicKey => "public_key",
            PathKey::PrivateKey => "private_key",
            PathKey::SymmetricKeyFile => "symmetric_key_file",
            PathKey::EncryptedTextFile => "encrypted_text_file",
            PathKey::DecryptedTextFile => "decrypted_text_file",
        }
    }
}

/// Per-invocation path overrides (typically from the command line).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PathOverrides {
    pub text_file: Option<PathBuf>,
    pub public_key: Option<PathBuf>,
    pub private_key: Option<PathBuf>,
    pub symmetric_key_file: Option<PathBuf>,
    pub encrypted_text_file: Option<PathBuf>,
    pub decrypted_text_file: Option<PathBuf>,
}

impl PathOverrides {
    pub fn get(&self, key: PathKey) -> Option<&PathBuf> {
        match key {
            PathKey::TextFile => self.text_file.as_ref(),
            PathKey::PublicKey => self.public_key.as_ref(),
            PathKey::PrivateKey => self.private_key.as_ref(),
            PathKey::SymmetricKeyFile => self.symmetric_key_file.as_ref(),
            PathKey::EncryptedTextFile => self.encrypted_text_file.as_ref(),
            PathKey::DecryptedTextFile => self.decrypted_text_file.as_ref(),
        }
    }

    /// Returns whether every path in `needed` is overridden.
    pub fn covers(&self, needed: &[PathKey]) -> bool {
        needed.iter().all(|&key| self.get(key).is_some())
    }

    /// Returns whether every path is overridden.
    pub fn is_complete(&self) -> bool {
        self.covers(&PathKey::ALL)
    }

    /// Merges the overrides over `base`, or builds a config from the overrides alone.
    ///
    /// Without a base every path must be overridden.
    pub fn resolve(self, base: Option<PathsConfig>) -> StoreResult<PathsConfig> {
        match base {
            Some(base) => Ok(PathsConfig {
                text_file: self.text_file.unwrap_or(base.text_file),
                public_key: self.public_key.unwrap_or(base.public_key),
                private_key: self.private_key.unwrap_or(base.private_key),
                symmetric_key_file: self.symmetric_key_file.unwrap_or(base.symmetric_key_file),
                encrypted_text_file: self.encrypted_text_file.unwrap_or(base.encrypted_text_file),
                decrypted_text_file: self.decrypted_text_file.unwrap_or(base.decrypted_text_file),
            }),
            None => self.resolve_only(&PathKey::ALL),
        }
    }

    /// Builds a config from the overrides alone, requiring only the paths in
    /// `needed`. Paths outside `needed` are left empty.
    pub fn resolve_only(self, needed: &[PathKey]) -> StoreResult<PathsConfig> {
        if let Some(key) = needed.iter().find(|&&key| self.get(key).is_none()) {
            let name = key.name();
            return Err(StoreError::Config(format!("no path configured for `{name}`")));
        }
        Ok(PathsConfig {
            text_file: self.text_file.unwrap_or_default(),
            public_key: self.public_key.unwrap_or_default(),
            private_key: self.private_key.unwrap_or_default(),
            symmetric_key_file: self.symmetric_key_file.unwrap_or_default(),
            encrypted_text_file: self.encrypted_text_file.unwrap_or_default(),
            decrypted_text_file: self.decrypted_text_file.unwrap_or_default(),
        })
    }
}
