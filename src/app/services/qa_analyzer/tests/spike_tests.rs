//! Spike check tests

use super::{present, samples_from};
use crate::app::models::Issue;
use crate::app::services::qa_analyzer::spike_check;

#[test]
fn test_no_delta_beyond_limit_never_flags() {
    // Largest delta is 49, limit is 50 — no false positive.
    let samples = present(&[10.0, 59.0, 12.0, 61.0]);
    assert_eq!(spike_check(&samples, 50.0), None);
}

#[test]
fn test_delta_exactly_at_limit_does_not_flag() {
    let samples = present(&[10.0, 60.0]);
    assert_eq!(spike_check(&samples, 50.0), None);
}

#[test]
fn test_rise_beyond_limit_flags() {
    let samples = present(&[10.0, 75.0]);
    assert_eq!(
        spike_check(&samples, 50.0),
        Some(Issue::Spike { max_delta: 65.0 })
    );
}

#[test]
fn test_fall_beyond_limit_flags_direction_ignored() {
    let samples = present(&[120.0, 20.0]);
    assert_eq!(
        spike_check(&samples, 50.0),
        Some(Issue::Spike { max_delta: 100.0 })
    );
}

#[test]
fn test_largest_offending_delta_reported() {
    let samples = present(&[10.0, 75.0, 10.0, 95.0]);
    assert_eq!(
        spike_check(&samples, 50.0),
        Some(Issue::Spike { max_delta: 85.0 })
    );
}

#[test]
fn test_no_delta_synthesized_across_gap() {
    // 10 → (gap) → 200 is a huge jump, but the gap breaks the chain.
    let samples = samples_from(&[Some(10.0), None, Some(200.0)]);
    assert_eq!(spike_check(&samples, 50.0), None);
}

#[test]
fn test_sentinel_breaks_the_chain_like_a_gap() {
    let samples = samples_from(&[Some(10.0), Some(-1.0), Some(200.0)]);
    assert_eq!(spike_check(&samples, 50.0), None);
}

#[test]
fn test_chain_resumes_after_gap() {
    // The delta after the gap (30 → 180) is computed normally.
    let samples = samples_from(&[Some(10.0), None, Some(30.0), Some(180.0)]);
    assert_eq!(
        spike_check(&samples, 50.0),
        Some(Issue::Spike { max_delta: 150.0 })
    );
}

#[test]
fn test_short_or_empty_series_yields_nothing() {
    assert_eq!(spike_check(&present(&[]), 50.0), None);
    assert_eq!(spike_check(&present(&[42.0]), 50.0), None);
}
