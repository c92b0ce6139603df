//! The four anomaly checks
//!
//! Each check takes the raw sample slice and returns at most one issue.
//! Gap samples (`Missing`/`NoReading`) are handled per check: they break
//! the delta chain for spikes, they *are* the subject of the missing-run
//! check, they are excluded from variance for flatlines, and they can
//! never be negative.

use crate::app::models::{Issue, Sample, SampleState};

/// Flag an hour-over-hour delta beyond `spike_limit`.
///
/// Deltas are computed between consecutive present values only; a gap
/// sample resets the chain so no delta is synthesized across it.
/// Direction is not distinguished. Reports the largest offending delta.
pub fn spike_check(samples: &[Sample], spike_limit: f64) -> Option<Issue> {
    let mut previous: Option<f64> = None;
    let mut max_delta: Option<f64> = None;

    for sample in samples {
        match sample.state {
            SampleState::Present(value) => {
                if let Some(prev) = previous {
                    let delta = (value - prev).abs();
                    if delta > spike_limit {
                        max_delta = Some(max_delta.map_or(delta, |m| m.max(delta)));
                    }
                }
                previous = Some(value);
            }
            _ => previous = None,
        }
    }

    max_delta.map(|max_delta| Issue::Spike { max_delta })
}

/// Flag a run of consecutive gap samples of at least `missing_run_hours`.
///
/// Reports the longest counted run. When `already_outdated` is set, the
/// still-open run touching the end of the series is expected (the station
/// is silent right now and reported as such elsewhere) and does not count;
/// only runs inside the historical body do.
pub fn missing_check(
    samples: &[Sample],
    missing_run_hours: usize,
    already_outdated: bool,
) -> Option<Issue> {
    let mut longest = 0usize;
    let mut run = 0usize;

    for sample in samples {
        if sample.state.is_gap() {
            run += 1;
        } else {
            longest = longest.max(run);
            run = 0;
        }
    }

    // `run` now holds the trailing run, open at the end of the series.
    if !already_outdated {
        longest = longest.max(run);
    }

    (missing_run_hours > 0 && longest >= missing_run_hours).then_some(Issue::Missing {
        longest_run_hours: longest,
    })
}

/// Flag zero variance over any sliding window of `window_hours` samples.
///
/// The standard deviation within a window is computed over its present
/// values only — gap samples are excluded, not treated as zero — and a
/// window needs at least two present values to be eligible (the variance
/// of a single sample is undefined, which is not the same as zero).
pub fn flatline_check(samples: &[Sample], window_hours: usize) -> Option<Issue> {
    if window_hours < 2 || samples.len() < window_hours {
        return None;
    }

    for window in samples.windows(window_hours) {
        let values: Vec<f64> = window.iter().filter_map(|s| s.state.value()).collect();
        if values.len() < 2 {
            continue;
        }
        if sample_std(&values) == 0.0 {
            return Some(Issue::Flatline);
        }
    }

    None
}

/// Flag any transmitted value strictly below zero.
///
/// The no-reading sentinel was mapped to [`SampleState::NoReading`] at
/// normalization time and can never reach this check; it only ever
/// contributes to the missing-run count. Reports the worst (lowest) value.
pub fn negative_check(samples: &[Sample]) -> Option<Issue> {
    samples
        .iter()
        .filter_map(|s| s.state.value())
        .filter(|v| *v < 0.0)
        .fold(None, |worst: Option<f64>, v| {
            Some(worst.map_or(v, |w| w.min(v)))
        })
        .map(|worst_value| Issue::Negative { worst_value })
}

/// Sample standard deviation (n−1 denominator). Callers guarantee
/// `values.len() >= 2`.
fn sample_std(values: &[f64]) -> f64 {
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
    variance.sqrt()
}
