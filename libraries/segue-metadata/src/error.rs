//! Metadata-specific errors
use segue_core::MixError;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using `MetadataError`
pub type Result<T> = std::result::Result<T, MetadataError>;

/// Metadata error types
#[derive(Error, Debug)]
pub enum MetadataError {
    /// File not found
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// Tag writing error
    #[error("Tag writing error: {0}")]
    WriteError(String),

    /// I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Lofty error
    #[error(transparent)]
    Lofty(#[from] lofty::error::LoftyError),
}

impl From<MetadataError> for MixError {
    fn from(err: MetadataError) -> Self {
        match err {
            MetadataError::WriteError(msg) => MixError::TagWrite(msg),
            other => MixError::TagRead(other.to_string()),
        }
    }
}
