//! Transition point selection
//!
//! Every strategy is a pure function over two immutable buffers. They are
//! grouped as variants of [`TransitionStrategy`] and selected by configuration:
//!
//! - **Quiet point**: splice track A at its lowest-energy window, start B at 0
//! - **Peak match**: leave A at its last energetic window, enter B at its first
//! - **Tail/head**: fade out the last `overlap_seconds` of A into the start of B

use crate::energy::{self, EnergyProfile};
use crate::error::{MixError, Result};
use crate::types::{SignalBuffer, TransitionPair, TransitionPoint};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, warn};

/// Default window for the quiet-point search (seconds)
pub const DEFAULT_QUIET_WINDOW_SECONDS: f64 = 2.0;

/// Default window for peak matching (seconds)
pub const DEFAULT_PEAK_WINDOW_SECONDS: f64 = 0.1;

/// Default normalized energy a window must exceed to count as a peak
pub const DEFAULT_PEAK_THRESHOLD: f64 = 0.7;

/// Default tail length for the tail/head splice (seconds)
pub const DEFAULT_TAIL_OVERLAP_SECONDS: f64 = 5.0;

/// How the splice points are chosen
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TransitionStrategy {
    /// Splice track A at its single quietest window
    QuietPoint {
        /// Analysis window length
        #[serde(default = "default_quiet_window")]
        window_seconds: f64,
    },

    /// Leave A at its last peak and enter B at its first peak
    PeakMatch {
        /// Analysis window length
        #[serde(default = "default_peak_window")]
        window_seconds: f64,
        /// Normalised energy a window must exceed to count as a peak
        #[serde(default = "default_peak_threshold")]
        threshold: f64,
    },

    /// Fade out the final `overlap_seconds` of A into the start of B
    TailHead {
        /// Length of A's tail that overlaps B
        #[serde(default = "default_tail_overlap")]
        overlap_seconds: f64,
    },
}

fn default_quiet_window() -> f64 {
    DEFAULT_QUIET_WINDOW_SECONDS
}

fn default_peak_window() -> f64 {
    DEFAULT_PEAK_WINDOW_SECONDS
}

fn default_peak_threshold() -> f64 {
    DEFAULT_PEAK_THRESHOLD
}

fn default_tail_overlap() -> f64 {
    DEFAULT_TAIL_OVERLAP_SECONDS
}

impl Default for TransitionStrategy {
    fn default() -> Self {
        Self::quiet_point()
    }
}

impl fmt::Display for TransitionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl TransitionStrategy {
    /// Quiet-point search with the default 2 s window
    pub fn quiet_point() -> Self {
        Self::QuietPoint {
            window_seconds: DEFAULT_QUIET_WINDOW_SECONDS,
        }
    }

    /// Peak matching with the default 0.1 s window and 0.7 threshold
    pub fn peak_match() -> Self {
        Self::PeakMatch {
            window_seconds: DEFAULT_PEAK_WINDOW_SECONDS,
            threshold: DEFAULT_PEAK_THRESHOLD,
        }
    }

    /// Tail/head splice over the given overlap
    pub fn tail_head(overlap_seconds: f64) -> Self {
        Self::TailHead { overlap_seconds }
    }

    /// Short machine-readable name
    pub fn name(&self) -> &'static str {
        match self {
            Self::QuietPoint { .. } => "quiet_point",
            Self::PeakMatch { .. } => "peak_match",
            Self::TailHead { .. } => "tail_head",
        }
    }

    /// Choose transition points for `a` (outgoing) and `b` (incoming)
    pub fn locate(&self, a: &SignalBuffer, b: &SignalBuffer) -> Result<TransitionPair> {
        let pair = match *self {
            Self::QuietPoint { window_seconds } => quiet_point(a, window_seconds)?,
            Self::PeakMatch {
                window_seconds,
                threshold,
            } => peak_match(a, b, window_seconds, threshold)?,
            Self::TailHead { overlap_seconds } => tail_head(a, overlap_seconds)?,
        };

        debug!(
            strategy = self.name(),
            point_a = pair.a.time_offset_seconds,
            point_b = pair.b.time_offset_seconds,
            fallback = pair.peak_fallback,
            "Located transition"
        );

        Ok(pair)
    }
}

/// Profile `buffer`, turning a too-short buffer into `InsufficientAudio`
fn profile_for_search(buffer: &SignalBuffer, window_seconds: f64) -> Result<EnergyProfile> {
    let window = energy::window_size_samples(buffer.sample_rate(), window_seconds)?;
    if buffer.len() < window {
        return Err(MixError::InsufficientAudio {
            needed_samples: window,
            available_samples: buffer.len(),
        });
    }
    energy::profile(buffer, window_seconds)
}

/// Offset of the quietest window of `a`; track B enters at its start
pub fn quiet_point(a: &SignalBuffer, window_seconds: f64) -> Result<TransitionPair> {
    let profile = profile_for_search(a, window_seconds)?;
    let index = profile
        .min_index()
        .ok_or_else(|| MixError::invalid_window("energy profile has no windows"))?;

    Ok(TransitionPair::new(
        TransitionPoint::new(profile.window_start_seconds(index)),
        TransitionPoint::START,
    ))
}

/// Indices of windows whose normalized energy is strictly above `threshold`
pub fn peak_indices(profile: &EnergyProfile, threshold: f64) -> Vec<usize> {
    profile
        .normalized()
        .iter()
        .enumerate()
        .filter(|&(_, &energy)| energy > threshold)
        .map(|(index, _)| index)
        .collect()
}

/// Last peak of `a` and first peak of `b`, or both starts if either has none
pub fn peak_match(
    a: &SignalBuffer,
    b: &SignalBuffer,
    window_seconds: f64,
    threshold: f64,
) -> Result<TransitionPair> {
    if !(0.0..1.0).contains(&threshold) {
        return Err(MixError::invalid_config(format!(
            "peak threshold must be in [0, 1), got {threshold}"
        )));
    }

    let profile_a = profile_for_search(a, window_seconds)?;
    let profile_b = profile_for_search(b, window_seconds)?;

    let peaks_a = peak_indices(&profile_a, threshold);
    let peaks_b = peak_indices(&profile_b, threshold);

    match (peaks_a.last(), peaks_b.first()) {
        (Some(&last_a), Some(&first_b)) => Ok(TransitionPair::new(
            TransitionPoint::new(profile_a.window_start_seconds(last_a)),
            TransitionPoint::new(profile_b.window_start_seconds(first_b)),
        )),
        _ => {
            warn!(
                peaks_a = peaks_a.len(),
                peaks_b = peaks_b.len(),
                threshold,
                "No peaks above threshold, falling back to track starts"
            );
            Ok(TransitionPair::fallback())
        }
    }
}

/// Fade-out starts `overlap_seconds` before the end of `a`
pub fn tail_head(a: &SignalBuffer, overlap_seconds: f64) -> Result<TransitionPair> {
    if !overlap_seconds.is_finite() || overlap_seconds <= 0.0 {
        return Err(MixError::InvalidDuration(overlap_seconds));
    }

    Ok(TransitionPair::new(
        TransitionPoint::new(a.duration_secs() - overlap_seconds),
        TransitionPoint::START,
    ))
}
