//! Collaborator traits and the fetch outcome type
//!
//! Every external feed is reached through one of these traits so the engine
//! can run against fakes in tests. Fetches do not return `Result`: a feed
//! being down is an expected operating condition, not an engine error, and
//! the three-way [`FetchOutcome`] keeps "failed" distinguishable from
//! "succeeded with nothing to report" all the way into the final report.

use crate::app::models::{HistoricalSeries, HotspotCounts, WeatherObservation};
use crate::Result;
use chrono::{DateTime, FixedOffset};

/// The result of one feed fetch.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome<T> {
    /// The feed responded with usable data.
    Fetched(T),
    /// The feed responded, but carried nothing.
    Empty,
    /// The fetch failed; the message is carried for the feed-health section
    /// of the report.
    Failed(String),
}

impl<T> FetchOutcome<T> {
    /// The fetched value, if any.
    pub fn into_option(self) -> Option<T> {
        match self {
            FetchOutcome::Fetched(value) => Some(value),
            _ => None,
        }
    }

    /// The failure message, if the fetch failed.
    pub fn failure(&self) -> Option<&str> {
        match self {
            FetchOutcome::Failed(message) => Some(message),
            _ => None,
        }
    }

    pub fn is_fetched(&self) -> bool {
        matches!(self, FetchOutcome::Fetched(_))
    }
}

/// The two Air4Thai snapshot feeds.
///
/// Records come back as raw JSON values; normalization into
/// [`crate::app::models::StationSnapshot`] happens engine-side so that one
/// malformed record never poisons a fetch.
pub trait SnapshotSource {
    /// The hourly snapshot, the primary feed.
    async fn hourly_snapshot(&self) -> FetchOutcome<Vec<serde_json::Value>>;

    /// The daily snapshot, used for the daily PM2.5 range only.
    async fn daily_snapshot(&self) -> FetchOutcome<Vec<serde_json::Value>>;
}

/// Per-station trailing history.
pub trait HistorySource {
    /// Hourly PM2.5 history for one station over `[start, end]`.
    async fn station_history(
        &self,
        station_id: &str,
        start: DateTime<FixedOffset>,
        end: DateTime<FixedOffset>,
    ) -> FetchOutcome<HistoricalSeries>;
}

/// Per-province weather observations.
pub trait WeatherSource {
    async fn observations(&self) -> FetchOutcome<Vec<WeatherObservation>>;
}

/// Per-province fire-hotspot counts.
pub trait HotspotSource {
    async fn hotspot_counts(&self) -> FetchOutcome<HotspotCounts>;
}

/// Destination for the rendered report messages.
pub trait ReportSink {
    /// Deliver the rendered messages, in order.
    async fn deliver(&self, messages: &[String]) -> Result<()>;
}
