//! Combined analyzer tests

use super::series_from;
use crate::app::models::Issue;
use crate::app::services::qa_analyzer::analyze_series;
use crate::config::ThresholdConfig;

fn thresholds() -> ThresholdConfig {
    ThresholdConfig {
        stale_minutes: 80,
        spike_limit: 50.0,
        missing_run_hours: 5,
        flatline_window_hours: 4,
    }
}

#[test]
fn test_clean_series_yields_no_issues() {
    let series = series_from(
        "36t",
        &[Some(10.0), Some(14.0), Some(12.0), Some(18.0), Some(11.0)],
    );
    assert!(analyze_series(&series, &thresholds(), false).is_empty());
}

#[test]
fn test_empty_series_yields_no_issues() {
    let series = series_from("36t", &[]);
    assert!(analyze_series(&series, &thresholds(), false).is_empty());
}

#[test]
fn test_issues_come_out_in_stable_order() {
    // A series that trips every check: a spike, a 5-hour interior run,
    // a flat 4-sample window, and a negative value.
    let series = series_from(
        "36t",
        &[
            Some(10.0),
            Some(90.0),
            None,
            None,
            None,
            None,
            None,
            Some(7.0),
            Some(7.0),
            Some(7.0),
            Some(7.0),
            Some(-3.0),
        ],
    );
    let issues = analyze_series(&series, &thresholds(), false);
    assert_eq!(
        issues,
        vec![
            Issue::Spike { max_delta: 80.0 },
            Issue::Missing {
                longest_run_hours: 5
            },
            Issue::Flatline,
            Issue::Negative { worst_value: -3.0 },
        ]
    );
}

#[test]
fn test_each_issue_appears_at_most_once() {
    // Two separate spikes and two qualifying runs still produce one
    // Spike and one Missing finding.
    let series = series_from(
        "36t",
        &[
            Some(10.0),
            Some(90.0),
            Some(10.0),
            Some(95.0),
            None,
            None,
            None,
            None,
            None,
            Some(12.0),
            None,
            None,
            None,
            None,
            None,
            Some(13.0),
        ],
    );
    let issues = analyze_series(&series, &thresholds(), false);
    assert_eq!(
        issues,
        vec![
            Issue::Spike { max_delta: 85.0 },
            Issue::Missing {
                longest_run_hours: 5
            },
        ]
    );
}

#[test]
fn test_outdated_station_with_only_a_trailing_gap_is_clean() {
    let series = series_from(
        "36t",
        &[Some(10.0), Some(12.0), None, None, None, None, None],
    );
    assert!(analyze_series(&series, &thresholds(), true).is_empty());
    assert_eq!(
        analyze_series(&series, &thresholds(), false),
        vec![Issue::Missing {
            longest_run_hours: 5
        }]
    );
}

#[test]
fn test_all_sentinel_history_flags_missing_only() {
    // Degenerate whole-window outage: 48 hours of the no-reading
    // sentinel, station not currently stale.
    let series = series_from("36t", &[Some(-1.0); 48]);
    let issues = analyze_series(&series, &thresholds(), false);
    assert_eq!(
        issues,
        vec![Issue::Missing {
            longest_run_hours: 48
        }]
    );
}
