//! Audio-specific errors
use segue_core::MixError;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Result type alias using `AudioError`
pub type Result<T> = std::result::Result<T, AudioError>;

/// Audio error types
#[derive(Error, Debug)]
pub enum AudioError {
    /// File not found
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Decoding error
    #[error("Decode error: {0}")]
    DecodeError(String),

    /// Symphonia error
    #[error("Symphonia error: {0}")]
    Symphonia(String),

    /// WAV writer error
    #[error("WAV error: {0}")]
    Wav(#[from] hound::Error),

    /// External encoder exited unsuccessfully
    #[error("Transcoder failed: {0}")]
    Transcoder(String),

    /// External encoder ran past its deadline and was killed
    #[error("Transcoder timed out after {0:?}")]
    Timeout(Duration),

    /// I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<AudioError> for MixError {
    fn from(err: AudioError) -> Self {
        match err {
            AudioError::FileNotFound(path) => MixError::MissingInput(path),
            AudioError::Io(e) => MixError::Io(e),
            AudioError::UnsupportedFormat(_)
            | AudioError::DecodeError(_)
            | AudioError::Symphonia(_) => MixError::decode(err.to_string()),
            AudioError::Wav(_) | AudioError::Transcoder(_) | AudioError::Timeout(_) => {
                MixError::encode(err.to_string())
            }
        }
    }
}
