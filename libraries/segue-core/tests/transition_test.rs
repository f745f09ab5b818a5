//! Transition point selection tests
//!
//! Covers the energy profile window arithmetic and each strategy's choice of
//! splice points, including the degenerate inputs that trigger fallbacks.

use segue_core::energy;
use segue_core::{MixError, SignalBuffer, TransitionPoint, TransitionStrategy};

// ========== Helper Functions ==========

fn buffer(samples: Vec<i16>, sample_rate: u32) -> SignalBuffer {
    SignalBuffer::new(samples, sample_rate).unwrap()
}

/// One second of constant level per entry in `levels`
fn stepped(levels: &[i16], sample_rate: u32) -> SignalBuffer {
    let samples = levels
        .iter()
        .flat_map(|&level| std::iter::repeat(level).take(sample_rate as usize))
        .collect();
    buffer(samples, sample_rate)
}

fn assert_seconds(point: TransitionPoint, expected: f64) {
    assert!(
        (point.time_offset_seconds - expected).abs() < 1e-9,
        "expected {expected} s, got {} s",
        point.time_offset_seconds
    );
}

// ========== Energy Profile ==========

#[test]
fn profile_length_is_floor_of_len_over_window() {
    // (sample_rate, window_seconds, buffer_len, expected_windows)
    let cases = [
        (10, 1.0, 10, 1),   // len == w
        (10, 1.0, 19, 1),   // len == 2w - 1
        (10, 1.0, 20, 2),   // len == 2w
        (10, 1.0, 103, 10), // trailing partial window dropped
        (1, 1.0, 7, 7),     // single-sample windows
        (44_100, 0.1, 44_100, 10),
    ];

    for (sample_rate, window_seconds, len, expected) in cases {
        let signal = buffer(vec![1; len], sample_rate);
        let profile = energy::profile(&signal, window_seconds).unwrap();
        assert_eq!(
            profile.len(),
            expected,
            "rate={sample_rate} window={window_seconds} len={len}"
        );
    }
}

#[test]
fn profile_sums_absolute_amplitudes() {
    let signal = buffer(vec![1, -2, 3, -4, 5, -6], 2);
    let profile = energy::profile(&signal, 1.0).unwrap();
    assert_eq!(profile.values(), &[3.0, 7.0, 11.0]);
    assert_eq!(profile.window_size_samples(), 2);
}

#[test]
fn profile_window_longer_than_buffer_is_invalid() {
    let signal = buffer(vec![1; 5], 10);
    assert!(matches!(
        energy::profile(&signal, 1.0),
        Err(MixError::InvalidWindow(_))
    ));
}

#[test]
fn profile_rejects_non_positive_window() {
    let signal = buffer(vec![1; 50], 10);
    assert!(matches!(
        energy::profile(&signal, 0.0),
        Err(MixError::InvalidWindow(_))
    ));
    assert!(matches!(
        energy::profile(&signal, -1.0),
        Err(MixError::InvalidWindow(_))
    ));
}

// ========== Quiet Point ==========

#[test]
fn quiet_point_picks_lowest_energy_window() {
    let a = stepped(&[500, 400, 20, 300, 600], 10);
    let b = stepped(&[100; 5], 10);
    let strategy = TransitionStrategy::QuietPoint {
        window_seconds: 1.0,
    };

    let pair = strategy.locate(&a, &b).unwrap();
    assert_seconds(pair.a, 2.0);
    assert_eq!(pair.b, TransitionPoint::START);
    assert!(!pair.peak_fallback);
}

#[test]
fn quiet_point_ties_keep_earliest_window() {
    let a = stepped(&[500, 10, 300, 10, 10], 10);
    let b = stepped(&[100; 5], 10);
    let strategy = TransitionStrategy::QuietPoint {
        window_seconds: 1.0,
    };

    let pair = strategy.locate(&a, &b).unwrap();
    assert_seconds(pair.a, 1.0);
}

#[test]
fn quiet_point_on_too_short_track_is_insufficient() {
    let a = buffer(vec![0; 44_100], 44_100); // 1 s against a 2 s window
    let b = buffer(vec![0; 44_100 * 4], 44_100);

    let err = TransitionStrategy::quiet_point().locate(&a, &b).unwrap_err();
    assert!(matches!(err, MixError::InsufficientAudio { .. }));
}

// ========== Peak Match ==========

#[test]
fn peak_match_uses_last_peak_of_a_and_first_peak_of_b() {
    let a = stepped(&[1000, 100, 900, 100, 100], 10);
    let b = stepped(&[100, 100, 950, 100, 1000], 10);
    let strategy = TransitionStrategy::PeakMatch {
        window_seconds: 1.0,
        threshold: 0.7,
    };

    let pair = strategy.locate(&a, &b).unwrap();
    assert_seconds(pair.a, 2.0);
    assert_seconds(pair.b, 2.0);
    assert!(!pair.peak_fallback);
}

#[test]
fn peak_match_silent_incoming_track_falls_back_to_starts() {
    let loud = buffer(vec![1000; 50], 10);
    let silent = buffer(vec![0; 50], 10);
    let strategy = TransitionStrategy::PeakMatch {
        window_seconds: 1.0,
        threshold: 0.7,
    };

    let pair = strategy.locate(&loud, &silent).unwrap();
    assert_eq!(pair.a, TransitionPoint::START);
    assert_eq!(pair.b, TransitionPoint::START);
    assert!(pair.peak_fallback);
}

#[test]
fn peak_match_flat_signals_peak_everywhere() {
    let a = buffer(vec![1000; 50], 10);
    let b = buffer(vec![1000; 50], 10);
    let strategy = TransitionStrategy::PeakMatch {
        window_seconds: 1.0,
        threshold: 0.7,
    };

    let pair = strategy.locate(&a, &b).unwrap();
    assert_seconds(pair.a, 4.0);
    assert_seconds(pair.b, 0.0);
    assert!(!pair.peak_fallback);
}

#[test]
fn peak_match_all_silent_falls_back() {
    let silent = buffer(vec![0; 50], 10);
    let strategy = TransitionStrategy::PeakMatch {
        window_seconds: 1.0,
        threshold: 0.0,
    };

    let pair = strategy.locate(&silent, &silent).unwrap();
    assert!(pair.peak_fallback);
    assert_eq!(pair.a, TransitionPoint::START);
}

// ========== Tail/Head ==========

#[test]
fn tail_head_matches_duration_minus_overlap() {
    let a = buffer(vec![0; 44_100 * 30], 44_100);
    let b = buffer(vec![0; 44_100 * 30], 44_100);

    let pair = TransitionStrategy::tail_head(5.0).locate(&a, &b).unwrap();
    assert_seconds(pair.a, 25.0);
    assert_eq!(pair.b, TransitionPoint::START);
}

#[test]
fn tail_head_rejects_non_positive_overlap() {
    let a = buffer(vec![0; 100], 10);
    assert!(matches!(
        TransitionStrategy::tail_head(0.0).locate(&a, &a),
        Err(MixError::InvalidDuration(_))
    ));
}
