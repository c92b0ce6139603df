//! GISTDA fire-hotspot client
//!
//! Fetches the VIIRS 1-day detection features for Thailand and reduces them
//! to per-province counts. Detections without a province name still count
//! toward the total.

use crate::app::adapters::{FetchOutcome, HotspotSource};
use crate::app::models::HotspotCounts;
use crate::constants::endpoints;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Thailand country filter, URL-encoded Thai text fixed by the API.
const COUNTRY_FILTER: &str =
    "%E0%B8%A3%E0%B8%B2%E0%B8%8A%E0%B8%AD%E0%B8%B2%E0%B8%93%E0%B8%B2%E0%B8%88%E0%B8%B1%E0%B8%81%E0%B8%A3%E0%B9%84%E0%B8%97%E0%B8%A2";

pub struct GistdaHotspotClient {
    client: reqwest::Client,
    url: String,
    api_key: String,
}

impl GistdaHotspotClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_url(endpoints::GISTDA_VIIRS_URL, api_key)
    }

    pub fn with_url(url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .unwrap_or_default(),
            url: url.into(),
            api_key: api_key.into(),
        }
    }
}

impl HotspotSource for GistdaHotspotClient {
    async fn hotspot_counts(&self) -> FetchOutcome<HotspotCounts> {
        let url = format!("{}?limit=1000&offset=0&ct_tn={}", self.url, COUNTRY_FILTER);
        debug!("GET {}", self.url);
        let body = match self.client.get(&url).header("API-Key", &self.api_key).send().await {
            Ok(response) => match response.json::<Value>().await {
                Ok(body) => body,
                Err(e) => return FetchOutcome::Failed(format!("invalid JSON body: {}", e)),
            },
            Err(e) => return FetchOutcome::Failed(format!("request failed: {}", e)),
        };

        let Some(features) = body.get("features").and_then(Value::as_array) else {
            return FetchOutcome::Empty;
        };
        if features.is_empty() {
            return FetchOutcome::Empty;
        }

        FetchOutcome::Fetched(count_features(features))
    }
}

/// Reduce detection features to per-province counts in encounter order.
pub fn count_features(features: &[Value]) -> HotspotCounts {
    HotspotCounts::from_provinces(features.iter().map(|feature| {
        feature
            .get("properties")
            .and_then(|p| p.get("pv_tn"))
            .and_then(Value::as_str)
            .unwrap_or("N/A")
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_counts_features_by_province() {
        let features = vec![
            json!({ "properties": { "pv_tn": "น่าน" } }),
            json!({ "properties": { "pv_tn": "ตาก" } }),
            json!({ "properties": { "pv_tn": "น่าน" } }),
        ];
        let counts = count_features(&features);
        assert_eq!(counts.total, 3);
        assert_eq!(counts.count_for("น่าน"), 2);
        assert_eq!(counts.count_for("ตาก"), 1);
    }

    #[test]
    fn test_feature_without_province_counts_toward_total() {
        let features = vec![
            json!({ "properties": {} }),
            json!({ "properties": { "pv_tn": "น่าน" } }),
        ];
        let counts = count_features(&features);
        assert_eq!(counts.total, 2);
        assert_eq!(counts.count_for("N/A"), 1);
    }
}
