//! The monitoring cycle
//!
//! One `run_cycle` call is one complete pass: fetch the snapshot feeds,
//! detect stale stations, run historical QA on a bounded candidate set,
//! correlate weather with hotspots, and assemble the situation report.
//! No state survives between cycles.
//!
//! The hourly snapshot is the primary feed: without it there is nothing to
//! monitor, so its absence is the one fetch condition that fails the cycle.
//! Every other feed degrades its own section of the report and is recorded
//! in the report's feed health instead.

use crate::app::adapters::{
    FetchOutcome, HistorySource, HotspotSource, SnapshotSource, WeatherSource,
};
use crate::app::models::{AnomalyFinding, HotspotCounts, StationSnapshot};
use crate::app::services::report::{FeedHealth, FeedStatus, SituationReport};
use crate::app::services::{
    candidate_selector, normalizer, qa_analyzer, regional_aggregator, risk_correlator, staleness,
};
use crate::config::MonitorConfig;
use crate::constants::HISTORY_WINDOW_HOURS;
use crate::{Error, Result};
use chrono::{DateTime, Duration, FixedOffset};
use futures::stream::{self, StreamExt};
use std::collections::{HashMap, HashSet};
use tracing::{debug, info, warn};

/// Runs monitoring cycles against a fixed set of collaborators.
pub struct Monitor<S, H, W, F> {
    config: MonitorConfig,
    snapshots: S,
    history: H,
    weather: W,
    hotspots: F,
}

impl<S, H, W, F> Monitor<S, H, W, F>
where
    S: SnapshotSource,
    H: HistorySource,
    W: WeatherSource,
    F: HotspotSource,
{
    pub fn new(config: MonitorConfig, snapshots: S, history: H, weather: W, hotspots: F) -> Self {
        Self {
            config,
            snapshots,
            history,
            weather,
            hotspots,
        }
    }

    /// Run one complete monitoring cycle at `now` (network civil time).
    pub async fn run_cycle(&self, now: DateTime<FixedOffset>) -> Result<SituationReport> {
        // Primary feed first; nothing else matters if it is gone.
        let hourly_outcome = self.snapshots.hourly_snapshot().await;
        let hourly_records = match &hourly_outcome {
            FetchOutcome::Fetched(records) => records.as_slice(),
            FetchOutcome::Empty => {
                return Err(Error::snapshot_unavailable(
                    "hourly snapshot feed returned no stations",
                ));
            }
            FetchOutcome::Failed(message) => {
                return Err(Error::snapshot_unavailable(message.clone()));
            }
        };

        let snapshots = normalizer::normalize_hourly(hourly_records);
        if snapshots.is_empty() {
            return Err(Error::snapshot_unavailable(
                "hourly snapshot feed produced no usable records",
            ));
        }
        info!("Normalized {} hourly station snapshots", snapshots.len());

        let daily_outcome = self.snapshots.daily_snapshot().await;
        let daily_snapshots = match &daily_outcome {
            FetchOutcome::Fetched(records) => normalizer::normalize_daily(records),
            _ => Vec::new(),
        };

        let outdated = staleness::detect_outdated(
            &snapshots,
            self.config.thresholds.stale_minutes,
            now,
        );
        info!("{} station(s) outdated", outdated.len());

        let candidates =
            candidate_selector::select_candidates(&snapshots, &outdated, &self.config.selection);
        debug!("{} QA candidate(s) selected", candidates.len());

        let findings = self.analyze_candidates(&candidates, &snapshots, &outdated, now).await;

        let weather_outcome = self.weather.observations().await;
        let observations = match &weather_outcome {
            FetchOutcome::Fetched(observations) => observations.clone(),
            FetchOutcome::Failed(message) => {
                warn!("Weather feed failed: {}", message);
                Vec::new()
            }
            FetchOutcome::Empty => Vec::new(),
        };

        let hotspot_outcome = self.hotspots.hotspot_counts().await;
        let hotspot_counts = match &hotspot_outcome {
            FetchOutcome::Fetched(counts) => counts.clone(),
            FetchOutcome::Failed(message) => {
                warn!("Hotspot feed failed: {}", message);
                HotspotCounts::default()
            }
            FetchOutcome::Empty => HotspotCounts::default(),
        };

        let risk = risk_correlator::correlate(&observations, &hotspot_counts, &self.config.risk);
        let hotspot_ranking = risk_correlator::rank_hotspots(&hotspot_counts, &self.config.risk);
        let regional_groups = regional_aggregator::group_by_region(&outdated, &self.config.regions);

        Ok(SituationReport {
            generated_at: now,
            station_total: snapshots.len(),
            hourly_range: value_range(&snapshots),
            daily_range: value_range(&daily_snapshots),
            outdated,
            regional_groups,
            findings,
            risk,
            hotspot_total: hotspot_counts.total,
            hotspot_ranking,
            feeds: FeedHealth {
                hourly: feed_status(&hourly_outcome),
                daily: feed_status(&daily_outcome),
                weather: feed_status(&weather_outcome),
                hotspots: feed_status(&hotspot_outcome),
            },
        })
    }

    /// Fetch and analyze candidate histories with bounded concurrency.
    ///
    /// Fetches complete in arbitrary order; results are re-sorted by
    /// original candidate position so the report is deterministic. A failed
    /// or absent history is no finding for that station, never a cycle
    /// error.
    async fn analyze_candidates(
        &self,
        candidates: &[String],
        snapshots: &[StationSnapshot],
        outdated: &[crate::app::models::OutdatedEntry],
        now: DateTime<FixedOffset>,
    ) -> Vec<AnomalyFinding> {
        let start = now - Duration::hours(HISTORY_WINDOW_HOURS);
        let outdated_ids: HashSet<&str> =
            outdated.iter().map(|e| e.station_id.as_str()).collect();
        let names: HashMap<&str, &str> = snapshots
            .iter()
            .map(|s| (s.id.as_str(), s.name.as_str()))
            .collect();

        let history = &self.history;
        let mut fetched: Vec<(usize, &String, FetchOutcome<_>)> =
            stream::iter(candidates.iter().enumerate().map(|(position, id)| async move {
                (position, id, history.station_history(id, start, now).await)
            }))
            .buffer_unordered(self.config.selection.max_concurrent_fetches)
            .collect()
            .await;
        fetched.sort_by_key(|(position, _, _)| *position);

        let mut findings = Vec::new();
        for (_, id, outcome) in fetched {
            let series = match outcome {
                FetchOutcome::Fetched(series) => series,
                FetchOutcome::Empty => continue,
                FetchOutcome::Failed(message) => {
                    warn!("History fetch failed for station {}: {}", id, message);
                    continue;
                }
            };
            let issues = qa_analyzer::analyze_series(
                &series,
                &self.config.thresholds,
                outdated_ids.contains(id.as_str()),
            );
            if !issues.is_empty() {
                findings.push(AnomalyFinding {
                    station_id: id.clone(),
                    station_name: names.get(id.as_str()).unwrap_or(&"").to_string(),
                    issues,
                });
            }
        }
        findings
    }
}

/// Min and max over valid (non-negative present) values, `None` when there
/// are none.
fn value_range(snapshots: &[StationSnapshot]) -> Option<(f64, f64)> {
    snapshots
        .iter()
        .filter_map(|s| s.current.value())
        .filter(|v| *v >= 0.0)
        .fold(None, |range, v| match range {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

fn feed_status<T>(outcome: &FetchOutcome<T>) -> FeedStatus {
    match outcome {
        FetchOutcome::Fetched(_) => FeedStatus::Ok,
        FetchOutcome::Empty => FeedStatus::Empty,
        FetchOutcome::Failed(message) => FeedStatus::Failed(message.clone()),
    }
}
