//! Single-path persistence for key material, envelopes and configuration.

use crate::error::{StoreError, StoreResult};
use serde::de::DeserializeOwned;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::debug;

/// Reads and writes one file.
///
/// Writes land in a temporary sibling first and are renamed over the
/// target, so readers never observe a half-written file.
#[derive(Clone, Debug)]
pub struct KeyStore {
    path: PathBuf,
}

impl KeyStore {
    /// Creates a store for the given path. Nothing is touched until a read or write.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns whether the file currently exists.
    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    pub fn read_bytes(&self) -> StoreResult<Vec<u8>> {
        let data = fs::read(&self.path).map_err(|e| self.io_error("read", e))?;
        debug!("read {} bytes from {}", data.len(), self.path.display());
        Ok(data)
    }

    pub fn write_bytes(&self, data: &[u8]) -> StoreResult<()> {
        self.write_atomic(data)?;
        debug!("wrote {} bytes to {}", data.len(), self.path.display());
        Ok(())
    }

    /// Reads the file as UTF-8 text.
    pub fn read_text(&self) -> StoreResult<String> {
        fs::read_to_string(&self.path).map_err(|e| self.io_error("read", e))
    }

    pub fn write_text(&self, text: &str) -> StoreResult<()> {
        self.write_bytes(text.as_bytes())
    }

    /// Reads and deserializes a JSON document.
    pub fn read_json<T: DeserializeOwned>(&self) -> StoreResult<T> {
        let text = self.read_text()?;
        serde_json::from_str(&text).map_err(|source| StoreError::Json {
            path: self.path.clone(),
            source,
        })
    }

    /// Deletes the file. A file that does not exist is not an error.
    pub fn remove(&self) -> StoreResult<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                debug!("removed {}", self.path.display());
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.io_error("remove", e)),
        }
    }

    fn write_atomic(&self, data: &[u8]) -> StoreResult<()> {
        let parent = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        fs::create_dir_all(parent).map_err(|e| self.io_error("create parent directory of", e))?;

        let mut tmp = NamedTempFile::new_in(parent).map_err(|e| self.io_error("stage", e))?;
        tmp.write_all(data).map_err(|e| self.io_error("write", e))?;
        tmp.as_file().sync_all().map_err(|e| self.io_error("sync", e))?;
        tmp.persist(&self.path)
            .map_err(|e| self.io_error("replace", e.error))?;
        Ok(())
    }

    fn io_error(&self, op: &'static str, source: std::io::Error) -> StoreError {
        StoreError::Io {
            op,
            path: self.path.clone(),
            source,
        }
    }
}

/// Derives the wrapped symmetric key file name from the configured base path.
///
/// The extension is dropped and `_<bits>_bit.txt` appended, so
/// `keys/symkey.txt` with a 128-bit key becomes `keys/symkey_128_bit.txt`.
/// Key generation and encryption must both go through this function.
pub fn wrapped_key_path(base: &Path, bits: usize) -> PathBuf {
    let mut name = base
        .file_stem()
        .map(|stem| stem.to_os_string())
        .unwrap_or_default();
    name.push(format!("_{bits}_bit.txt"));
    base.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrapped_name_without_extension() {
        assert_eq!(
            wrapped_key_path(Path::new("keys/symkey"), 192),
            PathBuf::from("keys/symkey_192_bit.txt")
        );
    }

    #[test]
    fn wrapped_name_keeps_only_last_extension() {
        assert_eq!(
            wrapped_key_path(Path::new("/srv/keys/sym.key.bin"), 128),
            PathBuf::from("/srv/keys/sym.key_128_bit.txt")
        );
    }

    #[test]
    fn wrapped_name_in_current_directory() {
        assert_eq!(
            wrapped_key_path(Path::new("symmetric.txt"), 256),
            PathBuf::from("symmetric_256_bit.txt")
        );
    }
}
