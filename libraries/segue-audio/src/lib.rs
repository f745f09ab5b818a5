//! Segue Audio
//!
//! File-format collaborators for the Segue mixing pipeline.
//!
//! This crate provides:
//! - Decoding via Symphonia (MP3, FLAC, OGG, WAV, AAC, AIFF), downmixed to mono 16-bit
//! - Lossless WAV output via hound
//! - Lossy output through an external ffmpeg process, with a timeout
//!
//! # Example: Decoding Audio
//!
//! ```rust,no_run
//! use segue_audio::SymphoniaDecoder;
//! use segue_core::AudioDecoder;
//! use std::path::Path;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut decoder = SymphoniaDecoder::new();
//! let buffer = decoder.decode(Path::new("/music/song.mp3"))?;
//!
//! println!("Decoded {} samples at {} Hz", buffer.len(), buffer.sample_rate());
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod decoder;
pub mod encoder;
pub mod error;
pub mod transcoder;

pub use decoder::SymphoniaDecoder;
pub use encoder::WavEncoder;
pub use error::{AudioError, Result};
pub use transcoder::{FfmpegEncoder, OutputFormat, DEFAULT_FFMPEG_PATH, DEFAULT_TIMEOUT};
