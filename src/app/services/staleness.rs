//! Station staleness detection
//!
//! The network reports hourly under normal conditions, so a station whose
//! last report is well past the threshold is effectively silent — a
//! telemetry outage that is not obvious from the snapshot values alone.
//!
//! All functions take `now` as a parameter rather than reading the clock,
//! which keeps staleness purely deterministic in tests.

use crate::app::models::{OutdatedEntry, StationSnapshot};
use chrono::{DateTime, Duration, FixedOffset};
use tracing::debug;

/// Returns `true` if `last_reported_at` is older than `stale_minutes`
/// relative to `now`.
///
/// Staleness is strictly greater than the threshold:
///   elapsed >  stale_minutes  →  stale
///   elapsed == stale_minutes  →  not stale
pub fn is_stale_at(
    last_reported_at: DateTime<FixedOffset>,
    stale_minutes: i64,
    now: DateTime<FixedOffset>,
) -> bool {
    now - last_reported_at > Duration::minutes(stale_minutes)
}

/// Scan a snapshot set and emit an [`OutdatedEntry`] per stale station.
///
/// Snapshots without a report timestamp cannot be judged and are skipped
/// here; they remain eligible for every other check.
pub fn detect_outdated(
    snapshots: &[StationSnapshot],
    stale_minutes: i64,
    now: DateTime<FixedOffset>,
) -> Vec<OutdatedEntry> {
    let mut outdated = Vec::new();

    for snapshot in snapshots {
        let Some(last_reported_at) = snapshot.last_reported_at else {
            continue;
        };
        if is_stale_at(last_reported_at, stale_minutes, now) {
            debug!(
                "Station {} outdated: last report {}",
                snapshot.id, last_reported_at
            );
            outdated.push(OutdatedEntry {
                station_id: snapshot.id.clone(),
                name: snapshot.name.clone(),
                area: snapshot.area.clone(),
                elapsed: now - last_reported_at,
                last_reported_at,
            });
        }
    }

    outdated
}
