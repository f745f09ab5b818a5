//! Core error types for Segue
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using `MixError`
pub type Result<T> = std::result::Result<T, MixError>;

/// Core error type for Segue
#[derive(Error, Debug)]
pub enum MixError {
    /// Buffer is shorter than the analysis window a strategy needs
    #[error("Insufficient audio: need at least {needed_samples} samples, have {available_samples}")]
    InsufficientAudio {
        /// Samples in one analysis window
        needed_samples: usize,
        /// Samples in the buffer
        available_samples: usize,
    },

    /// Non-positive or oversized analysis window
    #[error("Invalid window: {0}")]
    InvalidWindow(String),

    /// Strategy or curve misconfiguration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Crossfade duration must be finite and positive
    #[error("Invalid crossfade duration: {0} seconds")]
    InvalidDuration(f64),

    /// Sample rate must be positive
    #[error("Invalid sample rate: {0} Hz")]
    InvalidSampleRate(u32),

    /// Interleaved input needs at least one channel
    #[error("Invalid channel count: {0}")]
    InvalidChannelCount(u16),

    /// Both buffers of a crossfade must share a sample rate
    #[error("Sample rate mismatch: track A is {a} Hz, track B is {b} Hz")]
    SampleRateMismatch {
        /// Rate of the outgoing track
        a: u32,
        /// Rate of the incoming track
        b: u32,
    },

    /// Input file does not exist
    #[error("Input not found: {}", .0.display())]
    MissingInput(PathBuf),

    /// Decoder collaborator failure
    #[error("Decode error: {0}")]
    Decode(String),

    /// Encoder collaborator failure
    #[error("Encode error: {0}")]
    Encode(String),

    /// Tag reader failure
    #[error("Tag read error: {0}")]
    TagRead(String),

    /// Tag writer failure
    #[error("Tag write error: {0}")]
    TagWrite(String),

    /// I/O errors
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl MixError {
    /// Create a decode error
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Create an encode error
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Create an invalid window error
    pub fn invalid_window(msg: impl Into<String>) -> Self {
        Self::InvalidWindow(msg.into())
    }

    /// Create an invalid configuration error
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Whether the error came from an external collaborator rather than the core
    pub fn is_collaborator_error(&self) -> bool {
        matches!(
            self,
            Self::Decode(_) | Self::Encode(_) | Self::TagRead(_) | Self::TagWrite(_)
        )
    }
}
