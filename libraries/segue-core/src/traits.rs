//! Collaborator traits for Segue
//!
//! The mixing core never touches containers, codecs or tag formats directly;
//! it goes through these narrow interfaces.
use crate::error::Result;
use crate::tags::{Tags, WriteReport};
use crate::types::SignalBuffer;
use std::path::Path;

/// Audio decoder trait
///
/// Implementers decode a whole file into a mono `SignalBuffer`.
pub trait AudioDecoder: Send {
    /// Decode an audio file from the given path
    ///
    /// # Errors
    /// Returns `MixError::Decode` if the file cannot be read or decoded
    fn decode(&mut self, path: &Path) -> Result<SignalBuffer>;

    /// Check if the decoder supports the given file format
    fn supports_format(&self, path: &Path) -> bool;
}

/// Audio encoder trait
pub trait AudioEncoder: Send {
    /// Encode `buffer` into a file at `path`
    ///
    /// `bitrate_kbps` applies to lossy outputs; lossless encoders ignore it.
    ///
    /// # Errors
    /// Returns `MixError::Encode` if the output cannot be produced
    fn encode(&self, buffer: &SignalBuffer, path: &Path, bitrate_kbps: u32) -> Result<()>;
}

/// Tag reader trait
pub trait TagReader: Send {
    /// Read all supported tags from an audio file
    fn read_tags(&self, path: &Path) -> Result<Tags>;
}

/// Tag writer trait
///
/// Writing is best-effort: unsupported keys are skipped and per-key failures
/// are reported in the returned `WriteReport` rather than raised.
pub trait TagWriter: Send {
    /// Write `tags` into an existing audio file
    fn write_tags(&self, path: &Path, tags: &Tags) -> Result<WriteReport>;
}
