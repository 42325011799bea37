//! Error types for the rebranding engine.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for rebranding runs.
///
/// Only conditions that abort a whole run are represented here. Per-file
/// problems (unreadable files, failed writes, rename conflicts) are recorded
/// in the [`ChangeReport`](crate::report::ChangeReport) instead.
#[derive(Error, Debug)]
pub enum RebrandError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    #[error("Glob pattern error: {0}")]
    Glob(#[from] globset::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Root directory not found: {0}")]
    RootNotFound(PathBuf),

    #[error("Cannot enumerate {path}: {source}")]
    TraversalFatal {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },
}

/// A specialized Result type for rebranding operations.
pub type Result<T> = std::result::Result<T, RebrandError>;
