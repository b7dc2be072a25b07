//! Shared library for the anime browser workspace.
//!
//! This crate provides common functionality used across the workspace crates:
//! - Configuration management
//! - Catalog domain models
//! - File path utilities
//! - Logging infrastructure

pub mod config;
pub mod logging;
pub mod models;
pub mod paths;

// Re-export commonly used types
pub use config::Config;
pub use logging::LogConfig;
pub use models::*;
pub use paths::DataPaths;

/// Common result type using anyhow::Error
pub type Result<T> = anyhow::Result<T>;
