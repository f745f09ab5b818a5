//! Lossless WAV output via hound

use crate::error::Result;
use segue_core::{AudioEncoder, SignalBuffer};
use std::path::Path;
use tracing::debug;

/// Writes mono 16-bit PCM WAV files
///
/// WAV is lossless, so the bitrate argument is ignored.
#[derive(Debug, Default, Clone, Copy)]
pub struct WavEncoder;

impl WavEncoder {
    /// Create a new encoder
    pub fn new() -> Self {
        Self
    }

    /// WAV header for a mono 16-bit buffer at `sample_rate`
    pub fn spec(sample_rate: u32) -> hound::WavSpec {
        hound::WavSpec {
            channels: 1,
            sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        }
    }

    /// Write `buffer` to `path`, replacing any existing file
    pub fn write(buffer: &SignalBuffer, path: &Path) -> Result<()> {
        let mut writer = hound::WavWriter::create(path, Self::spec(buffer.sample_rate()))?;
        for &sample in buffer.samples() {
            writer.write_sample(sample)?;
        }
        writer.finalize()?;

        debug!(
            path = %path.display(),
            samples = buffer.len(),
            sample_rate = buffer.sample_rate(),
            "Wrote WAV"
        );
        Ok(())
    }
}

impl AudioEncoder for WavEncoder {
    fn encode(&self, buffer: &SignalBuffer, path: &Path, _bitrate_kbps: u32) -> segue_core::Result<()> {
        Ok(Self::write(buffer, path)?)
    }
}
