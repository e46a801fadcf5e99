//! File persistence layer for hybridcrypt.
//!
//! Every filesystem access in the workspace goes through [`KeyStore`],
//! a thin wrapper over a single path. Failures always surface as
//! [`StoreError`] carrying the path and the underlying I/O or JSON error.
//!
//! There is no locking. Two processes writing the same key files race.

mod config;
mod error;
mod store;

pub use config::{CONFIG_ENV_VAR, CONFIG_FILE_NAME, PathKey, PathOverrides, PathsConfig};
pub use error::{StoreError, StoreResult};
pub use store::{KeyStore, wrapped_key_path};
