//! Crossfade synthesis between two decoded tracks
//!
//! Provides fade curve shapes for the overlap region:
//! - Linear: complementary ramps, gains always sum to 1.0 (default)
//! - SquareRoot: faster rise than linear
//! - S-Curve: slow start and end, fast middle
//! - Equal Power: constant perceived loudness (sum of squared gains is 1.0)
//!
//! The synthesizer stitches `A[..fade_out_start] ++ blended ++ B[fade_in_end..]`.

use crate::error::{MixError, Result};
use crate::locator::TransitionStrategy;
use crate::types::{saturate_i16, SignalBuffer, TransitionPair, TransitionPoint};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

/// Map normalized fade progress in [0, 1] to a gain in [0, 1]
pub trait GainCurve: Send + Sync {
    /// Gain at `progress`
    fn gain(&self, progress: f64) -> f64;
}

impl<F> GainCurve for F
where
    F: Fn(f64) -> f64 + Send + Sync,
{
    fn gain(&self, progress: f64) -> f64 {
        self(progress)
    }
}

/// Crossfade curve shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FadeCurve {
    /// Linear fade: gains sum to exactly 1.0 at every sample
    ///
    /// Constant amplitude sum, so correlated material crosses with no level
    /// jump. Uncorrelated material dips by 3dB at the midpoint.
    #[default]
    Linear,

    /// Square root fade: t^0.5, rises quickly then slows
    SquareRoot,

    /// S-Curve fade: slow start, fast middle, slow end
    SCurve,

    /// Equal power fade: sin/cos pair, sum of squared gains is 1.0
    EqualPower,
}

impl FadeCurve {
    /// Calculate the fade gain at a given position
    ///
    /// # Arguments
    /// * `position` - Normalized position in the fade (0.0 to 1.0)
    /// * `fade_out` - If true, calculates fade-out gain; if false, fade-in gain
    #[inline]
    pub fn calculate_gain(&self, position: f64, fade_out: bool) -> f64 {
        let position = position.clamp(0.0, 1.0);
        let t = if fade_out { 1.0 - position } else { position };

        match self {
            FadeCurve::Linear => t,
            FadeCurve::SquareRoot => {
                if t <= 0.0 {
                    0.0
                } else {
                    t.sqrt()
                }
            }
            FadeCurve::SCurve => (1.0 - (PI * t).cos()) * 0.5,
            FadeCurve::EqualPower => (t * PI * 0.5).sin(),
        }
    }

    /// Get a human-readable name for the curve
    pub fn display_name(&self) -> &'static str {
        match self {
            FadeCurve::Linear => "Linear",
            FadeCurve::SquareRoot => "Square Root",
            FadeCurve::SCurve => "S-Curve",
            FadeCurve::EqualPower => "Equal Power",
        }
    }
}

/// Outgoing half of a [`FadeCurve`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FadeOut(pub FadeCurve);

/// Incoming half of a [`FadeCurve`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FadeIn(pub FadeCurve);

impl GainCurve for FadeOut {
    fn gain(&self, progress: f64) -> f64 {
        self.0.calculate_gain(progress, true)
    }
}

impl GainCurve for FadeIn {
    fn gain(&self, progress: f64) -> f64 {
        self.0.calculate_gain(progress, false)
    }
}

/// Crossfade length used when none is configured (seconds)
pub const DEFAULT_CROSSFADE_SECONDS: f64 = 5.0;

/// Duration and gain curves of a crossfade
#[derive(Clone)]
pub struct CrossfadeSpec {
    duration_seconds: f64,
    fade_out: Arc<dyn GainCurve>,
    fade_in: Arc<dyn GainCurve>,
}

impl fmt::Debug for CrossfadeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CrossfadeSpec")
            .field("duration_seconds", &self.duration_seconds)
            .finish_non_exhaustive()
    }
}

impl Default for CrossfadeSpec {
    fn default() -> Self {
        Self {
            duration_seconds: DEFAULT_CROSSFADE_SECONDS,
            fade_out: Arc::new(FadeOut(FadeCurve::Linear)),
            fade_in: Arc::new(FadeIn(FadeCurve::Linear)),
        }
    }
}

impl CrossfadeSpec {
    /// Complementary linear crossfade of `duration_seconds`
    pub fn linear(duration_seconds: f64) -> Result<Self> {
        Self::with_curve(duration_seconds, FadeCurve::Linear)
    }

    /// Crossfade using both halves of a named curve shape
    pub fn with_curve(duration_seconds: f64, curve: FadeCurve) -> Result<Self> {
        Self::with_curves(duration_seconds, FadeOut(curve), FadeIn(curve))
    }

    /// Crossfade with independent fade-out and fade-in curves
    ///
    /// # Errors
    /// Returns `InvalidDuration` unless `duration_seconds` is finite and positive
    pub fn with_curves(
        duration_seconds: f64,
        fade_out: impl GainCurve + 'static,
        fade_in: impl GainCurve + 'static,
    ) -> Result<Self> {
        if !duration_seconds.is_finite() || duration_seconds <= 0.0 {
            return Err(MixError::InvalidDuration(duration_seconds));
        }
        Ok(Self {
            duration_seconds,
            fade_out: Arc::new(fade_out),
            fade_in: Arc::new(fade_in),
        })
    }

    /// Crossfade duration in seconds
    pub fn duration_seconds(&self) -> f64 {
        self.duration_seconds
    }

    /// Outgoing gain at `progress`
    pub fn fade_out_gain(&self, progress: f64) -> f64 {
        self.fade_out.gain(progress)
    }

    /// Incoming gain at `progress`
    pub fn fade_in_gain(&self, progress: f64) -> f64 {
        self.fade_in.gain(progress)
    }

    /// Crossfade length in samples at `sample_rate` (rounded)
    pub fn duration_samples(&self, sample_rate: u32) -> usize {
        (self.duration_seconds * f64::from(sample_rate)).round() as usize
    }
}

/// Degraded-quality situations absorbed during a mix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MixDiagnostics {
    /// The overlap was shortened to fit the available audio
    pub overlap_clamped: bool,
    /// Peak matching found no peaks and used the track starts
    pub peak_fallback: bool,
}

/// Stitched output plus how it was produced
#[derive(Debug, Clone)]
pub struct MixResult {
    /// Stitched mono signal
    pub buffer: SignalBuffer,
    /// Where track A started fading out
    pub point_a: TransitionPoint,
    /// Where track B started fading in
    pub point_b: TransitionPoint,
    /// Strategy that chose the points, when known
    pub strategy: Option<TransitionStrategy>,
    /// Overlap length asked for by the crossfade spec
    pub requested_overlap_samples: usize,
    /// Overlap length actually blended
    pub overlap_samples: usize,
    /// First sample of A inside the overlap
    pub fade_out_start: usize,
    /// First sample of B inside the overlap
    pub fade_in_start: usize,
    /// First sample of B after the overlap
    pub fade_in_end: usize,
    /// Absorbed degradations
    pub diagnostics: MixDiagnostics,
}

impl MixResult {
    /// Attach the strategy and its located pair as provenance
    pub fn with_strategy(mut self, strategy: TransitionStrategy, pair: &TransitionPair) -> Self {
        self.strategy = Some(strategy);
        self.diagnostics.peak_fallback = pair.peak_fallback;
        self
    }
}

/// Blend `a` into `b` at the given transition points
///
/// The overlap never reads past either buffer: when the requested duration
/// does not fit, it is shortened and `diagnostics.overlap_clamped` is set.
///
/// # Errors
/// Returns `SampleRateMismatch` when the buffers disagree on sample rate
pub fn synthesize(
    a: &SignalBuffer,
    b: &SignalBuffer,
    point_a: TransitionPoint,
    point_b: TransitionPoint,
    spec: &CrossfadeSpec,
) -> Result<MixResult> {
    if a.sample_rate() != b.sample_rate() {
        return Err(MixError::SampleRateMismatch {
            a: a.sample_rate(),
            b: b.sample_rate(),
        });
    }

    let sample_rate = a.sample_rate();
    let requested = spec.duration_samples(sample_rate);

    // Keep the fade-out window inside A when A is long enough to hold it
    let mut fade_out_start = a.seconds_to_samples(point_a.time_offset_seconds).min(a.len());
    if requested > a.len() - fade_out_start && a.len() >= requested {
        fade_out_start = a.len() - requested;
    }
    let fade_in_start = b.seconds_to_samples(point_b.time_offset_seconds).min(b.len());

    let available_a = a.len() - fade_out_start;
    let available_b = b.len() - fade_in_start;
    let overlap = requested.min(available_a).min(available_b);
    let overlap_clamped = overlap < requested;

    if overlap_clamped {
        warn!(
            requested_samples = requested,
            overlap_samples = overlap,
            available_a,
            available_b,
            "Crossfade overlap clamped to available audio"
        );
    }

    let fade_in_end = fade_in_start + overlap;
    let tail_a = &a.samples()[fade_out_start..fade_out_start + overlap];
    let head_b = &b.samples()[fade_in_start..fade_in_end];

    let mut stitched = Vec::with_capacity(fade_out_start + overlap + (b.len() - fade_in_end));
    stitched.extend_from_slice(&a.samples()[..fade_out_start]);
    stitched.extend(blend(tail_a, head_b, spec));
    stitched.extend_from_slice(&b.samples()[fade_in_end..]);

    debug!(
        fade_out_start,
        fade_in_start,
        overlap_samples = overlap,
        output_samples = stitched.len(),
        "Synthesized crossfade"
    );

    Ok(MixResult {
        buffer: SignalBuffer::new(stitched, sample_rate)?,
        point_a,
        point_b,
        strategy: None,
        requested_overlap_samples: requested,
        overlap_samples: overlap,
        fade_out_start,
        fade_in_start,
        fade_in_end,
        diagnostics: MixDiagnostics {
            overlap_clamped,
            peak_fallback: false,
        },
    })
}

/// Sample-by-sample weighted sum of two equal-length regions
fn blend<'a>(
    outgoing: &'a [i16],
    incoming: &'a [i16],
    spec: &'a CrossfadeSpec,
) -> impl Iterator<Item = i16> + 'a {
    let len = outgoing.len() as f64;
    outgoing
        .iter()
        .zip(incoming)
        .enumerate()
        .map(move |(i, (&out_sample, &in_sample))| {
            let progress = i as f64 / len;
            let mixed = f64::from(out_sample) * spec.fade_out_gain(progress)
                + f64::from(in_sample) * spec.fade_in_gain(progress);
            saturate_i16(mixed)
        })
}
