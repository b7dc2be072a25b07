//! File path utilities for organizing data files.
//!
//! This module provides a centralized way to manage the locations the browser
//! writes to: durable local storage and logs.

use crate::config::Config;
use std::path::{Path, PathBuf};

/// File path manager for data files
#[derive(Debug, Clone)]
pub struct DataPaths {
    root: PathBuf,
    storage_dir: PathBuf,
    logs_dir: PathBuf,
}

impl DataPaths {
    /// Create a new DataPaths with the default layout under the given root
    pub fn new(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref().to_path_buf();
        Self {
            storage_dir: root.join("storage"),
            logs_dir: root.join("logs"),
            root,
        }
    }

    /// Create DataPaths honouring the directories set in the configuration
    pub fn from_config(config: &Config) -> Self {
        Self {
            root: config.data_dir(),
            storage_dir: config.storage_dir(),
            logs_dir: config.log_dir(),
        }
    }

    /// Get the root data directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    // ========== Local storage ==========

    /// Get the local storage directory
    pub fn storage_dir(&self) -> &Path {
        &self.storage_dir
    }

    // ========== Logs ==========

    /// Get logs directory
    pub fn logs_dir(&self) -> &Path {
        &self.logs_dir
    }

    // ========== Utility Methods ==========

    /// Create all necessary directories
    pub fn create_dirs(&self) -> std::io::Result<()> {
        for dir in [&self.root, &self.storage_dir, &self.logs_dir] {
            std::fs::create_dir_all(dir)?;
        }

        Ok(())
    }
}
