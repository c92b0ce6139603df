//! Data models for air-quality network monitoring
//!
//! This module contains the core data structures shared by the detection
//! services: station snapshots, historical sample series, anomaly findings,
//! staleness entries, the administrative region table, and the weather and
//! hotspot observation types consumed by the risk correlator.

use crate::constants::{self, wire};
use chrono::{DateTime, Duration, FixedOffset, NaiveDateTime};
use serde::{Deserialize, Serialize};

// =============================================================================
// Sample State
// =============================================================================

/// The state of a single reported value.
///
/// The upstream feeds overload the numeric value `-1` to mean "no reading
/// transmitted" while also carrying genuinely missing fields and genuinely
/// negative (faulty) readings. Representing the three cases explicitly
/// removes the sentinel special-casing from every downstream check:
/// `NoReading` and `Missing` both count toward gap detection, and only
/// `Present` values can ever be a spike, flatline, or negative anomaly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SampleState {
    /// A transmitted numeric reading (which may itself be implausible).
    Present(f64),
    /// The field was absent or non-numeric.
    Missing,
    /// The wire sentinel `-1`: the station reported, but had no reading.
    NoReading,
}

impl SampleState {
    /// Classify a parsed wire value. `None` means the field was absent or
    /// unparseable; the sentinel maps to `NoReading`; everything else,
    /// including invalid negatives, is carried as `Present`.
    pub fn from_wire(value: Option<f64>) -> Self {
        match value {
            None => SampleState::Missing,
            Some(v) if v == wire::SENTINEL_NO_READING => SampleState::NoReading,
            Some(v) => SampleState::Present(v),
        }
    }

    /// The numeric value, if one was transmitted.
    pub fn value(&self) -> Option<f64> {
        match self {
            SampleState::Present(v) => Some(*v),
            _ => None,
        }
    }

    /// True for `Missing` and `NoReading`: the states that form gaps.
    pub fn is_gap(&self) -> bool {
        !matches!(self, SampleState::Present(_))
    }
}

// =============================================================================
// Station Snapshot
// =============================================================================

/// One station's current state, normalized from either snapshot feed.
///
/// `id` is the stable station key and is unique within a snapshot set.
/// `area` is the free-text locality string from which the province is
/// derived by substring matching against the region table.
#[derive(Debug, Clone, PartialEq)]
pub struct StationSnapshot {
    pub id: String,
    pub name: String,
    pub area: String,
    pub current: SampleState,
    /// Last report timestamp in network civil time; `None` when the feed
    /// omitted it or it failed to parse. Stations without a timestamp are
    /// excluded from staleness evaluation but stay eligible elsewhere.
    pub last_reported_at: Option<DateTime<FixedOffset>>,
}

// =============================================================================
// Historical Series
// =============================================================================

/// One hourly sample in a station's trailing history.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    /// Timestamp as reported, if parseable. The checks operate on sample
    /// adjacency, so an unparseable timestamp does not invalidate a sample.
    pub at: Option<NaiveDateTime>,
    pub state: SampleState,
}

/// Ordered hourly samples for one station over a trailing window
/// (nominally 48 hours, but never guaranteed — short series are normal).
///
/// Insertion order is the carried order; malformed upstream ordering is
/// passed through as-is rather than re-sorted.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct HistoricalSeries {
    pub station_id: String,
    pub samples: Vec<Sample>,
}

impl HistoricalSeries {
    pub fn new(station_id: impl Into<String>, samples: Vec<Sample>) -> Self {
        Self {
            station_id: station_id.into(),
            samples,
        }
    }

    /// Build a series from bare states, without timestamps. Used by tests
    /// and by feeds that deliver ordinal-only histories.
    pub fn from_states(station_id: impl Into<String>, states: Vec<SampleState>) -> Self {
        Self {
            station_id: station_id.into(),
            samples: states
                .into_iter()
                .map(|state| Sample { at: None, state })
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

// =============================================================================
// Anomaly Findings
// =============================================================================

/// A single QA issue detected in a station's history. Issues are
/// independent; a station can carry several at once.
#[derive(Debug, Clone, PartialEq)]
pub enum Issue {
    /// An hour-over-hour jump beyond the spike limit (direction ignored).
    Spike { max_delta: f64 },
    /// A run of consecutive missing/no-reading samples at least as long as
    /// the missing-run threshold. Carries the longest counted run.
    Missing { longest_run_hours: usize },
    /// A window of unchanging values: zero variance over the flatline window.
    Flatline,
    /// A transmitted value below zero that is not the no-reading sentinel.
    Negative { worst_value: f64 },
}

impl std::fmt::Display for Issue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Issue::Spike { max_delta } => write!(f, "Spike (Δ{:.0})", max_delta),
            Issue::Missing { longest_run_hours } => {
                write!(f, "Missing ({} hr)", longest_run_hours)
            }
            Issue::Flatline => write!(f, "Flatline"),
            Issue::Negative { worst_value } => write!(f, "Negative ({:.1})", worst_value),
        }
    }
}

/// QA result for one analyzed station. Never constructed with an empty
/// issue list: a clean station is silently excluded from the report.
/// Computed fresh each run and discarded after assembly.
#[derive(Debug, Clone, PartialEq)]
pub struct AnomalyFinding {
    pub station_id: String,
    pub station_name: String,
    pub issues: Vec<Issue>,
}

// =============================================================================
// Staleness
// =============================================================================

/// A station whose most recent report is older than the stale threshold.
/// Lifetime is one run.
#[derive(Debug, Clone, PartialEq)]
pub struct OutdatedEntry {
    pub station_id: String,
    pub name: String,
    /// Free-text locality, used for regional grouping.
    pub area: String,
    pub elapsed: Duration,
    pub last_reported_at: DateTime<FixedOffset>,
}

// =============================================================================
// Region Table
// =============================================================================

/// An administrative grouping of provinces with a responsible owner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub name: String,
    pub provinces: Vec<String>,
    pub owner: String,
}

/// Static mapping from region to provinces and owner, in declared order.
///
/// A station belongs to the *first* region whose province list contains a
/// substring match of the station's area text; stations matching no region
/// are simply absent from the grouped view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionTable {
    pub regions: Vec<Region>,
}

impl RegionTable {
    pub fn new(regions: Vec<Region>) -> Self {
        Self { regions }
    }

    /// First-match-wins region lookup for a station's area text.
    pub fn region_for(&self, area: &str) -> Option<&Region> {
        self.regions
            .iter()
            .find(|region| region.provinces.iter().any(|p| area.contains(p.as_str())))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Region> {
        self.regions.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}

// =============================================================================
// Weather & Hotspot Observations
// =============================================================================

/// One weather station observation, reduced to the fields the risk
/// correlator consumes. Encounter order in the source feed is significant
/// and preserved by the collaborator contract.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherObservation {
    pub province: String,
    pub wind_speed: Option<f64>,
    pub rainfall: Option<f64>,
}

/// Fire-detection point counts per province for the current period,
/// in first-encounter order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct HotspotCounts {
    pub total: usize,
    pub by_province: Vec<(String, u32)>,
}

impl HotspotCounts {
    /// Accumulate province names into counts, preserving first-encounter
    /// order. `total` counts every detection, named province or not.
    pub fn from_provinces<I, S>(provinces: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut counts = HotspotCounts::default();
        for province in provinces {
            counts.total += 1;
            let province = province.as_ref();
            match counts
                .by_province
                .iter_mut()
                .find(|(name, _)| name == province)
            {
                Some((_, count)) => *count += 1,
                None => counts.by_province.push((province.to_string(), 1)),
            }
        }
        counts
    }

    pub fn count_for(&self, province: &str) -> u32 {
        self.by_province
            .iter()
            .find(|(name, _)| name == province)
            .map(|(_, count)| *count)
            .unwrap_or(0)
    }
}

// =============================================================================
// Time Helpers
// =============================================================================

/// The network's civil-time offset (Asia/Bangkok, UTC+7, no DST).
pub fn bangkok_offset() -> FixedOffset {
    FixedOffset::east_opt(constants::BANGKOK_UTC_OFFSET_SECS)
        .expect("Bangkok offset is a valid fixed offset")
}

/// Current time in network civil time.
pub fn bangkok_now() -> DateTime<FixedOffset> {
    chrono::Utc::now().with_timezone(&bangkok_offset())
}
