//! Air4Thai HTTP client
//!
//! Covers the three Air4Thai services the monitor consumes: the hourly
//! county snapshot, the 24-hour-average snapshot, and per-station history.
//! Responses are returned as raw JSON records; normalization happens in
//! the engine so a malformed record never fails a fetch.

use crate::app::adapters::{FetchOutcome, HistorySource, SnapshotSource};
use crate::app::models::HistoricalSeries;
use crate::app::services::normalizer;
use crate::constants::endpoints;
use chrono::{DateTime, FixedOffset};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

pub struct Air4ThaiClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl Air4ThaiClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(endpoints::AIR4THAI_BASE, api_key)
    }

    /// Point the client at an alternate host, for testing.
    pub fn with_base_url(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .unwrap_or_default(),
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    async fn fetch_json(&self, url: &str) -> Result<Value, String> {
        debug!("GET {}", url);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| format!("request failed: {}", e))?;
        response
            .json::<Value>()
            .await
            .map_err(|e| format!("invalid JSON body: {}", e))
    }
}

impl SnapshotSource for Air4ThaiClient {
    async fn hourly_snapshot(&self) -> FetchOutcome<Vec<Value>> {
        let url = format!(
            "{}/services/getAQI_County.php?key={}",
            self.base_url, self.api_key
        );
        match self.fetch_json(&url).await {
            Ok(Value::Array(records)) if !records.is_empty() => FetchOutcome::Fetched(records),
            Ok(_) => FetchOutcome::Empty,
            Err(message) => FetchOutcome::Failed(message),
        }
    }

    async fn daily_snapshot(&self) -> FetchOutcome<Vec<Value>> {
        let url = format!("{}/forweb/getAQI_JSON.php", self.base_url);
        match self.fetch_json(&url).await {
            Ok(body) => match body.get("stations").and_then(Value::as_array) {
                Some(records) if !records.is_empty() => FetchOutcome::Fetched(records.clone()),
                _ => FetchOutcome::Empty,
            },
            Err(message) => FetchOutcome::Failed(message),
        }
    }
}

impl HistorySource for Air4ThaiClient {
    async fn station_history(
        &self,
        station_id: &str,
        start: DateTime<FixedOffset>,
        end: DateTime<FixedOffset>,
    ) -> FetchOutcome<HistoricalSeries> {
        let url = format!(
            "{}/services/getStationHistory.php?stationID={}&param=PM25&type=hr&startdate={}&enddate={}&key={}",
            self.base_url,
            station_id,
            start.format("%Y-%m-%d"),
            end.format("%Y-%m-%d"),
            self.api_key
        );
        match self.fetch_json(&url).await {
            Ok(payload) => match normalizer::parse_history_payload(station_id, &payload) {
                Some(series) => FetchOutcome::Fetched(series),
                None => FetchOutcome::Empty,
            },
            Err(message) => FetchOutcome::Failed(message),
        }
    }
}
