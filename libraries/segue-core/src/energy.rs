//! Windowed energy profiling
//!
//! Splits a signal into non-overlapping windows and measures each window's
//! L1 energy (sum of absolute amplitudes). L1 is immune to sign cancellation
//! and cheaper than RMS while keeping the ordering that min/max searches need.

use crate::error::{MixError, Result};
use crate::types::SignalBuffer;
use tracing::debug;

/// Energy of each non-overlapping window of a signal
#[derive(Debug, Clone, PartialEq)]
pub struct EnergyProfile {
    window_size_samples: usize,
    window_duration_seconds: f64,
    values: Vec<f64>,
}

impl EnergyProfile {
    /// Window length in samples
    pub fn window_size_samples(&self) -> usize {
        self.window_size_samples
    }

    /// Window length in seconds, as requested by the caller
    pub fn window_duration_seconds(&self) -> f64 {
        self.window_duration_seconds
    }

    /// Energy per window
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Number of windows
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if the profile has no windows
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Largest window energy, 0.0 for an empty profile
    pub fn max(&self) -> f64 {
        self.values.iter().copied().fold(0.0, f64::max)
    }

    /// Index of the strictly smallest window energy; ties keep the earliest index
    pub fn min_index(&self) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for (index, &energy) in self.values.iter().enumerate() {
            match best {
                Some((_, lowest)) if energy >= lowest => {}
                _ => best = Some((index, energy)),
            }
        }
        best.map(|(index, _)| index)
    }

    /// Each value divided by the profile maximum
    ///
    /// An all-silent profile (max == 0) normalizes to all zeros.
    pub fn normalized(&self) -> Vec<f64> {
        let max = self.max();
        if max <= 0.0 {
            return vec![0.0; self.values.len()];
        }
        self.values.iter().map(|v| v / max).collect()
    }

    /// Start time of a window, `index * window_duration_seconds`
    pub fn window_start_seconds(&self, index: usize) -> f64 {
        index as f64 * self.window_duration_seconds
    }
}

/// Number of samples covered by a window of `window_duration_seconds`
///
/// # Errors
/// Returns `InvalidWindow` for non-finite or non-positive durations
pub fn window_size_samples(sample_rate: u32, window_duration_seconds: f64) -> Result<usize> {
    if !window_duration_seconds.is_finite() || window_duration_seconds <= 0.0 {
        return Err(MixError::invalid_window(format!(
            "window duration must be positive, got {window_duration_seconds}"
        )));
    }
    let size = (f64::from(sample_rate) * window_duration_seconds).round() as usize;
    Ok(size.max(1))
}

/// Compute the windowed L1 energy of `buffer`
///
/// Trailing samples that do not fill a whole window are dropped.
///
/// # Errors
/// Returns `InvalidWindow` if the duration is not positive or the window is
/// longer than the buffer
pub fn profile(buffer: &SignalBuffer, window_duration_seconds: f64) -> Result<EnergyProfile> {
    let window = window_size_samples(buffer.sample_rate(), window_duration_seconds)?;
    if window > buffer.len() {
        return Err(MixError::invalid_window(format!(
            "window of {} samples exceeds buffer of {} samples",
            window,
            buffer.len()
        )));
    }

    let values: Vec<f64> = buffer
        .samples()
        .chunks_exact(window)
        .map(|chunk| chunk.iter().map(|&s| f64::from(s).abs()).sum())
        .collect();

    debug!(
        window_samples = window,
        windows = values.len(),
        "Computed energy profile"
    );

    Ok(EnergyProfile {
        window_size_samples: window,
        window_duration_seconds,
        values,
    })
}
