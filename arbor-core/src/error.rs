//! Error types for arbor operations

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ArborError {
    #[error("Project root does not exist: {}", .0.display())]
    ProjectRootNotFound(PathBuf),

    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("Symbol not found: {0}")]
    SymbolNotFound(String),

    #[error("Config parse error: {0}")]
    ConfigParse(String),

    #[error("Glob pattern error: {0}")]
    GlobPattern(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
