mod config;
pub mod database;
mod memory;

pub use config::{Config, LoggingConfig, ReminderConfig, StatsConfig};
pub use database::Database;
pub use memory::MemoryStore;

use std::path::PathBuf;

use crate::error::{ConfigError, Result, StorageError};

/// The persistence collaborator: a string key-value store.
///
/// Implementations must give read-after-write consistency within a session.
/// Each key is owned by exactly one component.
pub trait KvStore {
    /// Get a value from the store.
    fn kv_get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Set (insert or replace) a value in the store.
    fn kv_set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

impl<S: KvStore + ?Sized> KvStore for &S {
    fn kv_get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).kv_get(key)
    }

    fn kv_set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).kv_set(key, value)
    }
}

/// Returns `~/.config/healthguard[-dev]/` based on HEALTHGUARD_ENV.
///
/// Set HEALTHGUARD_ENV=dev to use development data directory.
/// HEALTHGUARD_DATA_DIR, when set, is used verbatim instead.
///
/// # Errors
/// Returns an error if creating the data directory fails.
pub fn data_dir() -> Result<PathBuf> {
    let dir = match std::env::var_os("HEALTHGUARD_DATA_DIR") {
        Some(explicit) => PathBuf::from(explicit),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");

            let env =
                std::env::var("HEALTHGUARD_ENV").unwrap_or_else(|_| "production".to_string());

            if env == "dev" {
                base_dir.join("healthguard-dev")
            } else {
                base_dir.join("healthguard")
            }
        }
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| ConfigError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}
