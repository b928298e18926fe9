//! Error types for Optiviz

use thiserror::Error;

/// Core error type shared by Optiviz crates
#[derive(Error, Debug)]
pub enum OptivizError {
    #[error("unsupported mode {0:?}")]
    UnsupportedMode(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias for core operations
pub type Result<T> = std::result::Result<T, OptivizError>;
