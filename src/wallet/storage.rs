use crate::wallet::error::{Result, WaveError};
use std::path::{Path, PathBuf};

/// Plain-text key/value persistence that survives restarts
pub trait PreferenceStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;

    fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// Stores each key as its own file under a directory
pub struct FilePreferenceStore {
    storage_path: PathBuf,
}

impl FilePreferenceStore {
    /// Create new preference storage
    pub fn new(storage_dir: impl AsRef<Path>) -> Result<Self> {
        let storage_path = storage_dir.as_ref().to_path_buf();

        // Create directory if it doesn't exist
        if !storage_path.exists() {
            std::fs::create_dir_all(&storage_path)?;
        }

        Ok(Self { storage_path })
    }

    /// Get default storage path
    pub fn default_path() -> Result<PathBuf> {
        let base = dirs::data_dir()
            .or_else(dirs::home_dir)
            .ok_or_else(|| WaveError::Storage("Could not find a data directory".to_string()))?;
        Ok(base.join("wave-portal"))
    }

    fn key_path(&self, key: &str) -> Result<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(WaveError::Storage(format!("invalid preference key {key:?}")));
        }
        Ok(self.storage_path.join(key))
    }
}

impl PreferenceStore for FilePreferenceStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.key_path(key)?;
        match std::fs::read_to_string(path) {
            Ok(value) => Ok(Some(value.trim().to_string())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.key_path(key)?;
        std::fs::write(path, value)?;
        Ok(())
    }
}
