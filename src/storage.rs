//! Local Storage Module
//!
//! Durable string storage under fixed keys, one file per key.

use std::path::PathBuf;
use tracing::{debug, error, info};

pub const ACCESS_TOKEN_KEY: &str = "access_token";
pub const REFRESH_TOKEN_KEY: &str = "refresh_token";
pub const THEME_KEY: &str = "theme";

/// File-backed key/value storage
#[derive(Debug, Clone)]
pub struct LocalStore {
    storage_path: PathBuf,
}

impl LocalStore {
    /// Open storage rooted at `storage_path`, creating the directory if needed
    pub fn new(storage_path: impl Into<PathBuf>) -> Self {
        let storage_path = storage_path.into();

        if let Err(e) = std::fs::create_dir_all(&storage_path) {
            error!("Failed to create storage directory: {}", e);
        }

        debug!("Local storage initialized at: {:?}", storage_path);

        Self { storage_path }
    }

    /// Read a string value; a missing key is `Ok(None)`
    pub fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let file_path = self.key_path(key);
        if !file_path.exists() {
            return Ok(None);
        }

        std::fs::read_to_string(&file_path)
            .map(Some)
            .map_err(|e| StorageError::Io(e.to_string()))
    }

    /// Write a string value, replacing any previous one
    pub fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        std::fs::write(self.key_path(key), value).map_err(|e| StorageError::Io(e.to_string()))?;

        debug!("Stored value for key: {}", key);
        Ok(())
    }

    /// Delete a value; deleting a missing key is not an error
    pub fn remove(&self, key: &str) -> Result<(), StorageError> {
        let file_path = self.key_path(key);

        if file_path.exists() {
            std::fs::remove_file(&file_path).map_err(|e| StorageError::Io(e.to_string()))?;
            info!("Deleted stored data for key: {}", key);
        }

        Ok(())
    }

    pub fn exists(&self, key: &str) -> bool {
        self.key_path(key).exists()
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.storage_path.join(format!("{}.dat", key))
    }
}

/// Storage errors
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_key_reads_as_none() {
        let dir = TempDir::new().unwrap();
        let store = LocalStore::new(dir.path());

        assert_eq!(store.get(ACCESS_TOKEN_KEY).unwrap(), None);
        assert!(!store.exists(ACCESS_TOKEN_KEY));
    }

    #[test]
    fn set_get_remove() {
        let dir = TempDir::new().unwrap();
        let store = LocalStore::new(dir.path());

        store.set(REFRESH_TOKEN_KEY, "r-1").unwrap();
        assert_eq!(store.get(REFRESH_TOKEN_KEY).unwrap().as_deref(), Some("r-1"));

        store.remove(REFRESH_TOKEN_KEY).unwrap();
        store.remove(REFRESH_TOKEN_KEY).unwrap();
        assert_eq!(store.get(REFRESH_TOKEN_KEY).unwrap(), None);
    }

    #[test]
    fn values_survive_reopen() {
        let dir = TempDir::new().unwrap();
        LocalStore::new(dir.path()).set(THEME_KEY, "dark").unwrap();

        let reopened = LocalStore::new(dir.path());
        assert_eq!(reopened.get(THEME_KEY).unwrap().as_deref(), Some("dark"));
    }
}
