//! File-based store implementation for native platforms.

use super::{StoreError, StoreResult, TemplateStore};
use std::fs;
use std::path::PathBuf;

/// File-based store. Each key maps to one JSON file in a base directory.
pub struct FileStore {
    base_path: PathBuf,
}

impl FileStore {
    /// Create a file store rooted at the given directory, creating it if
    /// needed.
    pub fn new(base_path: PathBuf) -> StoreResult<Self> {
        if !base_path.exists() {
            fs::create_dir_all(&base_path)
                .map_err(|e| StoreError::Io(format!("failed to create store directory: {e}")))?;
        }
        Ok(Self { base_path })
    }

    /// Create a file store in the platform data directory
    /// (e.g. `~/.local/share/sketchdeck` on Linux).
    pub fn default_location() -> StoreResult<Self> {
        let base = dirs::data_local_dir()
            .or_else(dirs::home_dir)
            .ok_or_else(|| StoreError::Io("could not determine home directory".to_string()))?;
        Self::new(base.join("sketchdeck"))
    }

    pub fn base_path(&self) -> &PathBuf {
        &self.base_path
    }

    /// File path for a key, sanitized for use as a filename.
    fn key_path(&self, key: &str) -> PathBuf {
        let safe_key: String = key
            .chars()
            .map(|c| {
                if c.is_alphanumeric() || c == '-' || c == '_' || c == '.' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.base_path.join(format!("{safe_key}.json"))
    }
}

impl TemplateStore for FileStore {
    fn read(&self, key: &str) -> StoreResult<Option<String>> {
        let path = self.key_path(key);
        if !path.exists() {
            return Ok(None);
        }
        fs::read_to_string(&path)
            .map(Some)
            .map_err(|e| StoreError::Io(format!("failed to read {}: {e}", path.display())))
    }

    fn write(&self, key: &str, value: &str) -> StoreResult<()> {
        let path = self.key_path(key);
        fs::write(&path, value)
            .map_err(|e| StoreError::Io(format!("failed to write {}: {e}", path.display())))
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        let path = self.key_path(key);
        if path.exists() {
            fs::remove_file(&path)
                .map_err(|e| StoreError::Io(format!("failed to delete {}: {e}", path.display())))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_write_and_read() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path().to_path_buf()).unwrap();

        store.write("sketchdeck.templates", "[]").unwrap();
        assert_eq!(
            store.read("sketchdeck.templates").unwrap().as_deref(),
            Some("[]")
        );
    }

    #[test]
    fn test_read_absent_key() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path().to_path_buf()).unwrap();
        assert_eq!(store.read("nonexistent").unwrap(), None);
    }

    #[test]
    fn test_remove() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path().to_path_buf()).unwrap();

        store.write("k", "v").unwrap();
        store.remove("k").unwrap();
        assert_eq!(store.read("k").unwrap(), None);
    }

    #[test]
    fn test_sanitizes_key() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path().to_path_buf()).unwrap();

        store.write("weird/key:with*chars", "payload").unwrap();
        assert_eq!(
            store.read("weird/key:with*chars").unwrap().as_deref(),
            Some("payload")
        );
    }
}
