//! Decoded signal types
use crate::error::{MixError, Result};

/// Scale used when converting normalized float samples to 16-bit PCM
const I16_SCALE: f64 = i16::MAX as f64;

/// Round and saturate a wide sample into the 16-bit range
#[inline]
pub fn saturate_i16(value: f64) -> i16 {
    if value.is_nan() {
        return 0;
    }
    value.round().clamp(f64::from(i16::MIN), f64::from(i16::MAX)) as i16
}

/// Mono 16-bit PCM signal with its sample rate
///
/// Multi-channel input is averaged down to one channel at construction time,
/// so every `SignalBuffer` is mono. Buffers are never mutated after they are
/// built; operations that transform audio return a new buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignalBuffer {
    samples: Vec<i16>,
    sample_rate: u32,
}

impl SignalBuffer {
    /// Create a buffer from mono samples
    ///
    /// # Errors
    /// Returns `InvalidSampleRate` when `sample_rate` is zero
    pub fn new(samples: Vec<i16>, sample_rate: u32) -> Result<Self> {
        if sample_rate == 0 {
            return Err(MixError::InvalidSampleRate(sample_rate));
        }
        Ok(Self {
            samples,
            sample_rate,
        })
    }

    /// Create a silent buffer of `len` samples
    pub fn silence(len: usize, sample_rate: u32) -> Result<Self> {
        Self::new(vec![0; len], sample_rate)
    }

    /// Reduce interleaved 16-bit frames to mono by averaging each frame
    ///
    /// A trailing partial frame is dropped.
    pub fn from_interleaved_i16(interleaved: &[i16], channels: u16, sample_rate: u32) -> Result<Self> {
        if channels == 0 {
            return Err(MixError::InvalidChannelCount(channels));
        }
        if channels == 1 {
            return Self::new(interleaved.to_vec(), sample_rate);
        }

        let width = usize::from(channels);
        let samples = interleaved
            .chunks_exact(width)
            .map(|frame| {
                let sum: i64 = frame.iter().map(|&s| i64::from(s)).sum();
                saturate_i16(sum as f64 / width as f64)
            })
            .collect();

        Self::new(samples, sample_rate)
    }

    /// Reduce interleaved float frames in [-1.0, 1.0] to mono 16-bit PCM
    ///
    /// Frames are averaged in the float domain, then scaled, rounded and saturated.
    pub fn from_interleaved_f32(interleaved: &[f32], channels: u16, sample_rate: u32) -> Result<Self> {
        if channels == 0 {
            return Err(MixError::InvalidChannelCount(channels));
        }

        let width = usize::from(channels);
        let samples = interleaved
            .chunks_exact(width)
            .map(|frame| {
                let mean = frame.iter().map(|&s| f64::from(s)).sum::<f64>() / width as f64;
                saturate_i16(mean * I16_SCALE)
            })
            .collect();

        Self::new(samples, sample_rate)
    }

    /// Mono samples
    pub fn samples(&self) -> &[i16] {
        &self.samples
    }

    /// Sample rate in Hz
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Check if the buffer holds no samples
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Duration in seconds
    pub fn duration_secs(&self) -> f64 {
        self.samples.len() as f64 / f64::from(self.sample_rate)
    }

    /// Convert a duration to a sample count at this buffer's rate (rounded)
    pub fn seconds_to_samples(&self, seconds: f64) -> usize {
        if !seconds.is_finite() || seconds <= 0.0 {
            return 0;
        }
        (seconds * f64::from(self.sample_rate)).round() as usize
    }

    /// Convert a sample index to seconds at this buffer's rate
    pub fn samples_to_seconds(&self, samples: usize) -> f64 {
        samples as f64 / f64::from(self.sample_rate)
    }

    /// Consume the buffer and return its samples
    pub fn into_samples(self) -> Vec<i16> {
        self.samples
    }
}
