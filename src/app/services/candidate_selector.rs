//! Candidate selection for historical QA analysis
//!
//! A history check costs one network round-trip per station, so running it
//! against the full population every cycle is off the table. Selection is
//! the union of three policies, deduplicated by station id:
//!
//! 1. the top-K stations by current value — surfaces emerging spikes and
//!    negatives fastest;
//! 2. every station already flagged outdated this cycle — its history can
//!    show *when* the gap began, which "currently silent" cannot;
//! 3. optionally, any station whose current value is negative-but-not-
//!    sentinel or beyond the extreme ceiling, regardless of rank.
//!
//! Only set membership matters to correctness, but the output is kept in a
//! deterministic first-insertion order so downstream reports are stable
//! across runs and input orderings.

use crate::app::models::{OutdatedEntry, SampleState, StationSnapshot};
use crate::config::SelectionConfig;
use std::collections::HashSet;

/// Pick the station ids to run historical QA against this cycle.
pub fn select_candidates(
    snapshots: &[StationSnapshot],
    outdated: &[OutdatedEntry],
    config: &SelectionConfig,
) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut candidates: Vec<String> = Vec::new();

    // 1. Top-K by present current value, descending. Ties broken by id
    //    ascending so the selection is independent of input iteration order.
    let mut ranked: Vec<(&str, f64)> = snapshots
        .iter()
        .filter_map(|s| s.current.value().map(|v| (s.id.as_str(), v)))
        .collect();
    ranked.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.0.cmp(b.0))
    });
    for (id, _) in ranked.iter().take(config.top_k) {
        if seen.insert(id.to_string()) {
            candidates.push(id.to_string());
        }
    }

    // 2. Everything already flagged outdated.
    for entry in outdated {
        if seen.insert(entry.station_id.clone()) {
            candidates.push(entry.station_id.clone());
        }
    }

    // 3. Extreme current values, when enabled.
    if config.scan_extremes {
        for snapshot in snapshots {
            let Some(value) = snapshot.current.value() else {
                continue;
            };
            if (value < 0.0 || value > config.extreme_ceiling)
                && seen.insert(snapshot.id.clone())
            {
                candidates.push(snapshot.id.clone());
            }
        }
    }

    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::models::bangkok_offset;
    use chrono::{Duration, TimeZone};

    fn snapshot(id: &str, current: SampleState) -> StationSnapshot {
        StationSnapshot {
            id: id.to_string(),
            name: id.to_string(),
            area: String::new(),
            current,
            last_reported_at: None,
        }
    }

    fn outdated(id: &str) -> OutdatedEntry {
        OutdatedEntry {
            station_id: id.to_string(),
            name: id.to_string(),
            area: String::new(),
            elapsed: Duration::hours(2),
            last_reported_at: bangkok_offset().with_ymd_and_hms(2026, 2, 10, 9, 0, 0).unwrap(),
        }
    }

    fn config(top_k: usize) -> SelectionConfig {
        SelectionConfig {
            top_k,
            ..SelectionConfig::default()
        }
    }

    #[test]
    fn test_top_k_by_value_descending() {
        let snapshots = vec![
            snapshot("a", SampleState::Present(10.0)),
            snapshot("b", SampleState::Present(90.0)),
            snapshot("c", SampleState::Present(50.0)),
            snapshot("d", SampleState::Missing),
        ];
        let candidates = select_candidates(&snapshots, &[], &config(2));
        assert_eq!(candidates, vec!["b", "c"]);
    }

    #[test]
    fn test_absent_values_never_rank() {
        let snapshots = vec![
            snapshot("a", SampleState::Missing),
            snapshot("b", SampleState::NoReading),
        ];
        let candidates = select_candidates(&snapshots, &[], &config(5));
        assert!(candidates.is_empty());
    }

    #[test]
    fn test_outdated_stations_always_included() {
        let snapshots = vec![snapshot("a", SampleState::Present(10.0))];
        let candidates = select_candidates(&snapshots, &[outdated("z")], &config(1));
        assert!(candidates.contains(&"a".to_string()));
        assert!(candidates.contains(&"z".to_string()));
    }

    #[test]
    fn test_deduplicates_across_policies() {
        // "a" qualifies via top-K, the outdated list, and the extreme scan;
        // it must appear once.
        let snapshots = vec![snapshot("a", SampleState::Present(200.0))];
        let candidates = select_candidates(&snapshots, &[outdated("a")], &config(5));
        assert_eq!(candidates, vec!["a"]);
    }

    #[test]
    fn test_extreme_scan_catches_stations_outside_top_k() {
        let mut snapshots: Vec<_> = (0..20)
            .map(|i| snapshot(&format!("hi{:02}", i), SampleState::Present(300.0 - i as f64)))
            .collect();
        snapshots.push(snapshot("neg", SampleState::Present(-7.0)));
        snapshots.push(snapshot("mild", SampleState::Present(12.0)));

        let candidates = select_candidates(&snapshots, &[], &config(3));
        assert!(candidates.contains(&"neg".to_string()));
        assert!(!candidates.contains(&"mild".to_string()));
        // Top-3 plus the 17 remaining >150 extremes plus the negative.
        assert_eq!(candidates.len(), 21);
    }

    #[test]
    fn test_extreme_scan_can_be_disabled() {
        let snapshots = vec![
            snapshot("hot", SampleState::Present(400.0)),
            snapshot("neg", SampleState::Present(-7.0)),
            snapshot("mid", SampleState::Present(40.0)),
        ];
        let config = SelectionConfig {
            top_k: 1,
            scan_extremes: false,
            ..SelectionConfig::default()
        };
        let candidates = select_candidates(&snapshots, &[], &config);
        assert_eq!(candidates, vec!["hot"]);
    }

    #[test]
    fn test_sentinel_no_reading_is_not_extreme_negative() {
        let snapshots = vec![snapshot("s", SampleState::NoReading)];
        let candidates = select_candidates(&snapshots, &[], &config(5));
        assert!(candidates.is_empty());
    }

    #[test]
    fn test_selection_is_order_independent() {
        let mut snapshots = vec![
            snapshot("a", SampleState::Present(10.0)),
            snapshot("b", SampleState::Present(90.0)),
            snapshot("c", SampleState::Present(50.0)),
            snapshot("d", SampleState::Present(50.0)),
        ];
        let forward = select_candidates(&snapshots, &[], &config(3));
        snapshots.reverse();
        let reversed = select_candidates(&snapshots, &[], &config(3));

        let forward_set: HashSet<_> = forward.iter().collect();
        let reversed_set: HashSet<_> = reversed.iter().collect();
        assert_eq!(forward_set, reversed_set);
        // Deterministic tie-break: "c" sorts before "d" at equal value.
        assert_eq!(forward, vec!["b", "c", "d"]);
        assert_eq!(forward, reversed);
    }

    #[test]
    fn test_selection_is_idempotent() {
        let snapshots = vec![
            snapshot("a", SampleState::Present(10.0)),
            snapshot("b", SampleState::Present(90.0)),
        ];
        let first = select_candidates(&snapshots, &[outdated("x")], &config(1));
        let second = select_candidates(&snapshots, &[outdated("x")], &config(1));
        assert_eq!(first, second);
    }
}
