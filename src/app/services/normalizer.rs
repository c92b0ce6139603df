//! Reading normalization for the Air4Thai snapshot and history feeds
//!
//! The upstream feeds are loosely typed: value fields arrive as numbers,
//! numeric strings, empty strings, or not at all, and the two snapshot
//! feeds use different key casings. This module converts raw records into
//! uniform [`StationSnapshot`]s and [`HistoricalSeries`], isolating every
//! downstream check from upstream schema variance.
//!
//! Contract: a record missing its value field yields `SampleState::Missing`
//! (never zero, never an error); a record without a station identifier is
//! dropped silently as a feed-quality issue.

use crate::app::models::{HistoricalSeries, Sample, SampleState, StationSnapshot};
use crate::constants::wire;
use chrono::{DateTime, FixedOffset, NaiveDateTime};
use serde_json::Value;
use tracing::debug;

/// Normalize records from the hourly feed (`getAQI_County.php`).
///
/// Record shape: `StationID`, `StationNameTh`, `AreaNameTh`,
/// `last_datetime`, and the reading under `hourly_data.PM25`.
pub fn normalize_hourly(records: &[Value]) -> Vec<StationSnapshot> {
    let mut snapshots: Vec<StationSnapshot> = Vec::with_capacity(records.len());

    for record in records {
        let Some(id) = loose_string(record.get("StationID")) else {
            debug!("Dropping hourly record without a station identifier");
            continue;
        };
        if snapshots.iter().any(|s| s.id == id) {
            debug!("Dropping duplicate hourly record for station {}", id);
            continue;
        }

        snapshots.push(StationSnapshot {
            name: loose_string(record.get("StationNameTh")).unwrap_or_default(),
            area: loose_string(record.get("AreaNameTh")).unwrap_or_default(),
            current: SampleState::from_wire(loose_f64(
                record.get("hourly_data").and_then(|h| h.get("PM25")),
            )),
            last_reported_at: record
                .get("last_datetime")
                .and_then(|v| v.as_str())
                .and_then(parse_feed_datetime),
            id,
        });
    }

    snapshots
}

/// Normalize records from the 24-hour-average feed (`getAQI_JSON.php`).
///
/// Record shape: `stationID`, `nameTH`, `areaTH`, and the averaged reading
/// under `AQILast.PM25.value`. This feed carries no per-station report
/// timestamp, so these snapshots never enter staleness evaluation.
pub fn normalize_daily(records: &[Value]) -> Vec<StationSnapshot> {
    let mut snapshots: Vec<StationSnapshot> = Vec::with_capacity(records.len());

    for record in records {
        let Some(id) = loose_string(record.get("stationID")) else {
            debug!("Dropping daily record without a station identifier");
            continue;
        };
        if snapshots.iter().any(|s| s.id == id) {
            debug!("Dropping duplicate daily record for station {}", id);
            continue;
        }

        snapshots.push(StationSnapshot {
            name: loose_string(record.get("nameTH")).unwrap_or_default(),
            area: loose_string(record.get("areaTH")).unwrap_or_default(),
            current: SampleState::from_wire(loose_f64(
                record
                    .get("AQILast")
                    .and_then(|a| a.get("PM25"))
                    .and_then(|p| p.get("value")),
            )),
            last_reported_at: None,
            id,
        });
    }

    snapshots
}

/// Parse a station-history response body (`getStationHistory.php`) into a
/// series. Returns `None` for malformed or empty payloads — absence of
/// evidence, not an error.
pub fn parse_history_payload(station_id: &str, payload: &Value) -> Option<HistoricalSeries> {
    let data = payload
        .get("stationHistory")?
        .get(0)?
        .get("data")?
        .as_array()?;
    if data.is_empty() {
        return None;
    }

    // Carried order is the feed's order; no re-sort.
    let samples = data
        .iter()
        .map(|row| Sample {
            at: row
                .get("datetime")
                .and_then(|v| v.as_str())
                .and_then(|s| NaiveDateTime::parse_from_str(s, wire::FEED_DATETIME_FORMAT).ok()),
            state: SampleState::from_wire(loose_f64(row.get("PM25"))),
        })
        .collect();

    Some(HistoricalSeries::new(station_id, samples))
}

/// Extract a number from a JSON value that may be a number, a numeric
/// string, or junk. Non-numeric content is treated as absent.
fn loose_f64(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// Extract a non-empty string key; numeric identifiers are stringified.
fn loose_string(value: Option<&Value>) -> Option<String> {
    let text = match value? {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    (!text.is_empty()).then_some(text)
}

/// Parse a feed timestamp, interpreted in network civil time. Malformed
/// timestamps become `None`, which excludes the station from staleness
/// evaluation only.
fn parse_feed_datetime(raw: &str) -> Option<DateTime<FixedOffset>> {
    NaiveDateTime::parse_from_str(raw.trim(), wire::FEED_DATETIME_FORMAT)
        .ok()
        .and_then(|naive| {
            naive
                .and_local_timezone(crate::app::models::bangkok_offset())
                .single()
        })
}
