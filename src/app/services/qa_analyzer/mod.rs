//! Historical QA analysis for one station
//!
//! Runs the four anomaly checks over a station's trailing hourly series.
//! The checks are independent, use only the series itself (never
//! cross-station data), and are tolerant by construction: insufficient
//! history, an all-missing series, or a malformed payload all yield "no
//! finding" rather than an error, so one bad station can never abort the
//! batch.
//!
//! # Checks
//!
//! - [`checks::spike_check`] — implausible hour-over-hour jumps
//! - [`checks::missing_check`] — runs of missing/no-reading samples
//! - [`checks::flatline_check`] — zero variance over a sliding window
//! - [`checks::negative_check`] — transmitted values below zero
//!
//! # Staleness interplay
//!
//! A station that is outdated *right now* necessarily has an open gap at
//! the end of its series. Counting that gap again as a Missing finding
//! would double-report one outage under two names, so the analyzer takes
//! `already_outdated` and excludes the still-open trailing run when set.

pub mod checks;

#[cfg(test)]
pub mod tests;

pub use checks::{flatline_check, missing_check, negative_check, spike_check};

use crate::app::models::{HistoricalSeries, Issue};
use crate::config::ThresholdConfig;
use tracing::debug;

/// Run all four checks over a series, in stable tag order.
///
/// An empty result means the station is clean and should be silently
/// excluded from the report, never listed with zero issues.
pub fn analyze_series(
    series: &HistoricalSeries,
    thresholds: &ThresholdConfig,
    already_outdated: bool,
) -> Vec<Issue> {
    let mut issues = Vec::new();

    if let Some(issue) = spike_check(&series.samples, thresholds.spike_limit) {
        issues.push(issue);
    }
    if let Some(issue) = missing_check(
        &series.samples,
        thresholds.missing_run_hours,
        already_outdated,
    ) {
        issues.push(issue);
    }
    if let Some(issue) = flatline_check(&series.samples, thresholds.flatline_window_hours) {
        issues.push(issue);
    }
    if let Some(issue) = negative_check(&series.samples) {
        issues.push(issue);
    }

    if !issues.is_empty() {
        debug!(
            "Station {}: {} QA issue(s) over {} samples",
            series.station_id,
            issues.len(),
            series.len()
        );
    }

    issues
}
