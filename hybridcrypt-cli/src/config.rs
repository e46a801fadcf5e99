//! Resolves the path configuration for one invocation.

use anyhow::{Context, Result};
use hybridcrypt_keystore::{CONFIG_FILE_NAME, PathKey, PathOverrides, PathsConfig};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Picks the configuration file: explicit flag or env var, then the
/// platform config directory, then `paths.json` in the working directory.
pub fn config_path(explicit: Option<&Path>) -> PathBuf {
    if let Some(path) = explicit {
        return path.to_path_buf();
    }
    let platform = PathsConfig::default_path();
    if platform.is_file() {
        platform
    } else {
        PathBuf::from(CONFIG_FILE_NAME)
    }
}

/// Builds the final path set. The config file is read only when the
/// command line leaves one of the `needed` paths unspecified.
pub fn resolve_paths(
    explicit: Option<&Path>,
    overrides: PathOverrides,
    needed: &[PathKey],
) -> Result<PathsConfig> {
    if overrides.covers(needed) {
        debug!("all required paths given on the command line, skipping config file");
        return Ok(overrides.resolve_only(needed)?);
    }

    let path = config_path(explicit);
    let base = PathsConfig::load(&path)
        .with_context(|| format!("could not load path configuration from {}", path.display()))?;
    debug!("loaded path configuration from {}", path.display());
    Ok(overrides.resolve(Some(base))?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hybridcrypt_keystore::KeyStore;
    use tempfile::tempdir;

    #[test]
    fn explicit_path_wins() {
        assert_eq!(
            config_path(Some(Path::new("/etc/custom.json"))),
            PathBuf::from("/etc/custom.json")
        );
    }

    #[test]
    fn complete_overrides_skip_config() {
        let overrides = PathOverrides {
            text_file: Some("a".into()),
            public_key: Some("b".into()),
            private_key: Some("c".into()),
            symmetric_key_file: Some("d.txt".into()),
            encrypted_text_file: Some("e".into()),
            decrypted_text_file: Some("f".into()),
        };
        let missing = Some(Path::new("/definitely/missing.json"));
        let paths = resolve_paths(missing, overrides, &PathKey::ALL).unwrap();
        assert_eq!(paths.symmetric_key_file, PathBuf::from("d.txt"));
    }

    #[test]
    fn needed_subset_skips_config() {
        let overrides = PathOverrides {
            public_key: Some("pub.pem".into()),
            private_key: Some("priv.pem".into()),
            symmetric_key_file: Some("sym.txt".into()),
            ..Default::default()
        };
        let needed = [PathKey::PublicKey, PathKey::PrivateKey, PathKey::SymmetricKeyFile];
        let missing = Some(Path::new("/definitely/missing.json"));

        let paths = resolve_paths(missing, overrides.clone(), &needed).unwrap();
        assert_eq!(paths.private_key, PathBuf::from("priv.pem"));
        assert_eq!(paths.text_file, PathBuf::new());

        let err = resolve_paths(missing, overrides, &PathKey::ALL).unwrap_err();
        assert!(format!("{err:#}").contains("could not load path configuration"));
    }

    #[test]
    fn missing_config_is_reported_with_path() {
        let missing = Some(Path::new("/definitely/missing.json"));
        let err = resolve_paths(missing, PathOverrides::default(), &PathKey::ALL).unwrap_err();
        assert!(format!("{err:#}").contains("/definitely/missing.json"));
    }

    #[test]
    fn overrides_apply_on_top_of_config() {
        let dir = tempdir().unwrap();
        let config = dir.path().join("paths.json");
        KeyStore::new(&config)
            .write_text(
                r#"{"text_file":"t","public_key":"pub","private_key":"priv",
                    "symmetric_key_file":"sym.txt","encrypted_text_file":"enc",
                    "decrypted_text_file":"dec"}"#,
            )
            .unwrap();

        let overrides = PathOverrides {
            private_key: Some("elsewhere.pem".into()),
            ..Default::default()
        };
        let paths = resolve_paths(Some(&config), overrides, &PathKey::ALL).unwrap();
        assert_eq!(paths.private_key, PathBuf::from("elsewhere.pem"));
        assert_eq!(paths.public_key, PathBuf::from("pub"));
    }
}
