//! Browser LocalStorage backend (wasm32 only)

use crate::error::StorageError;

use super::Storage;

/// Records live in the page's LocalStorage under a key prefix
#[derive(Debug, Clone)]
pub struct LocalStorage {
    prefix: &'static str,
}

impl LocalStorage {
    pub fn new(prefix: &'static str) -> Self {
        Self { prefix }
    }

    fn storage(&self) -> Result<web_sys::Storage, StorageError> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or_else(|| StorageError::Unavailable("LocalStorage not available".into()))
    }

    fn full_key(&self, key: &str) -> String {
        format!("{}{}", self.prefix, key)
    }
}

impl Default for LocalStorage {
    fn default() -> Self {
        Self::new("timber_run_")
    }
}

impl Storage for LocalStorage {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.storage()?
            .get_item(&self.full_key(key))
            .map_err(|e| StorageError::Unavailable(format!("{e:?}")))
    }

    fn persist(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.storage()?
            .set_item(&self.full_key(key), value)
            .map_err(|e| StorageError::Unavailable(format!("{e:?}")))
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.storage()?
            .remove_item(&self.full_key(key))
            .map_err(|e| StorageError::Unavailable(format!("{e:?}")))
    }
}
