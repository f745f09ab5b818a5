//! Transition point types
use serde::{Deserialize, Serialize};

/// Where the splice or fade should begin in one track
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TransitionPoint {
    /// Offset from the start of the track, in seconds
    pub time_offset_seconds: f64,
}

impl TransitionPoint {
    /// The start of the track
    pub const START: Self = Self {
        time_offset_seconds: 0.0,
    };

    /// Create a transition point; negative and non-finite offsets collapse to 0
    pub fn new(time_offset_seconds: f64) -> Self {
        let time_offset_seconds = if time_offset_seconds.is_finite() {
            time_offset_seconds.max(0.0)
        } else {
            0.0
        };
        Self {
            time_offset_seconds,
        }
    }
}

/// Transition points chosen for both tracks
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransitionPair {
    /// Where track A starts fading out
    pub a: TransitionPoint,
    /// Where track B starts fading in
    pub b: TransitionPoint,
    /// Set when peak matching found no peaks and fell back to the track starts
    pub peak_fallback: bool,
}

impl TransitionPair {
    /// Create a pair without any fallback
    pub fn new(a: TransitionPoint, b: TransitionPoint) -> Self {
        Self {
            a,
            b,
            peak_fallback: false,
        }
    }

    /// Both points at the start of their tracks, flagged as a fallback
    pub fn fallback() -> Self {
        Self {
            a: TransitionPoint::START,
            b: TransitionPoint::START,
            peak_fallback: true,
        }
    }
}
