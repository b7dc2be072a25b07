//! Durable key/value storage for browser state.
//!
//! Each key is a JSON document in its own file under the storage directory.
//! Writes go to a temporary file first and are renamed into place, so a
//! reader never observes a half-written document.

use anyhow::{Context, Result};
use serde::{de::DeserializeOwned, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Local storage rooted at one directory
#[derive(Debug, Clone)]
pub struct LocalStorage {
    /// Root storage directory
    dir: PathBuf,
}

impl LocalStorage {
    /// Open (and create if needed) a storage directory
    pub fn open(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();

        std::fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create storage directory: {}", dir.display()))?;
        info!(storage_dir = %dir.display(), "Local storage opened");

        Ok(Self { dir })
    }

    /// Read the document stored under `key`, if any
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let path = self.path_for(key);
        if !path.exists() {
            debug!(key = key, "Storage miss");
            return Ok(None);
        }

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read storage file: {}", path.display()))?;

        let data: T = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse storage file: {}", path.display()))?;

        debug!(key = key, "Storage hit");
        Ok(Some(data))
    }

    /// Replace the document stored under `key`
    pub fn set<T: Serialize>(&self, key: &str, data: &T) -> Result<()> {
        let path = self.path_for(key);
        let staging = path.with_extension("json.tmp");

        let content = serde_json::to_string(data).context("Failed to serialize storage data")?;

        std::fs::write(&staging, content)
            .with_context(|| format!("Failed to write storage file: {}", staging.display()))?;
        std::fs::rename(&staging, &path)
            .with_context(|| format!("Failed to move storage file into place: {}", path.display()))?;

        debug!(key = key, path = %path.display(), "Storage written");
        Ok(())
    }

    /// Delete the document stored under `key`; missing keys are fine
    pub fn remove(&self, key: &str) -> Result<()> {
        let path = self.path_for(key);
        if path.exists() {
            std::fs::remove_file(&path)
                .with_context(|| format!("Failed to remove storage file: {}", path.display()))?;
            info!(key = key, "Storage entry removed");
        }
        Ok(())
    }

    /// Get the file path for a given key
    fn path_for(&self, key: &str) -> PathBuf {
        // Sanitize key to create valid filename
        let safe_key = key
            .replace(['/', '\\', ':', '*', '?', '"', '<', '>', '|', '.'], "_")
            .replace("__", "_");

        self.dir.join(format!("{}.json", safe_key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};
    use tempfile::TempDir;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct TestData {
        id: u32,
        name: String,
    }

    #[test]
    fn test_set_and_get() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let storage = LocalStorage::open(temp_dir.path())?;

        let data = TestData {
            id: 1,
            name: "test".to_string(),
        };

        storage.set("test_key", &data)?;

        let retrieved: Option<TestData> = storage.get("test_key")?;
        assert_eq!(retrieved, Some(data));
        assert!(!temp_dir.path().join("test_key.json.tmp").exists());

        Ok(())
    }

    #[test]
    fn test_overwrite_replaces_document() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let storage = LocalStorage::open(temp_dir.path())?;

        storage.set("ids", &vec![1, 2, 3])?;
        storage.set("ids", &vec![4])?;

        let retrieved: Option<Vec<u32>> = storage.get("ids")?;
        assert_eq!(retrieved, Some(vec![4]));

        Ok(())
    }

    #[test]
    fn test_miss() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let storage = LocalStorage::open(temp_dir.path())?;

        let retrieved: Option<TestData> = storage.get("nonexistent")?;
        assert_eq!(retrieved, None);

        Ok(())
    }

    #[test]
    fn test_malformed_document_is_an_error() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let storage = LocalStorage::open(temp_dir.path())?;
        std::fs::write(temp_dir.path().join("broken.json"), "{ not json")?;

        let retrieved: Result<Option<TestData>> = storage.get("broken");
        assert!(retrieved.is_err());

        Ok(())
    }

    #[test]
    fn test_remove() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let storage = LocalStorage::open(temp_dir.path())?;

        storage.set("test_key", &1u32)?;
        assert!(temp_dir.path().join("test_key.json").exists());

        storage.remove("test_key")?;
        storage.remove("test_key")?;
        assert!(!temp_dir.path().join("test_key.json").exists());
        assert_eq!(storage.get::<u32>("test_key")?, None);

        Ok(())
    }

    #[test]
    fn test_open_creates_directory() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let nested = temp_dir.path().join("a").join("b");

        let storage = LocalStorage::open(&nested)?;
        assert!(nested.is_dir());
        storage.set("favorites", &vec![1u32])?;
        assert!(nested.join("favorites.json").is_file());

        Ok(())
    }
}
