//! Situation report assembly and rendering
//!
//! The report is assembled once per cycle and rendered into the four-message
//! layout the delivery channel expects: overview, outdated stations by
//! region, QA anomalies, and hotspot summary. Rendering is pure so the
//! same report can be delivered, printed, or serialized to JSON unchanged.

use crate::app::models::{AnomalyFinding, OutdatedEntry};
use crate::app::services::regional_aggregator::RegionalGroup;
use crate::app::services::risk_correlator::RiskOverlay;
use crate::constants::QA_MESSAGE_CAP;
use chrono::{DateTime, Duration, FixedOffset};
use serde_json::json;

/// Health of one upstream feed during the cycle.
#[derive(Debug, Clone, PartialEq)]
pub enum FeedStatus {
    /// The feed delivered usable data.
    Ok,
    /// The feed responded with nothing to report.
    Empty,
    /// The fetch failed; the report carries the reason.
    Failed(String),
}

impl FeedStatus {
    pub fn is_failed(&self) -> bool {
        matches!(self, FeedStatus::Failed(_))
    }

    fn label(&self) -> String {
        match self {
            FeedStatus::Ok => "ok".to_string(),
            FeedStatus::Empty => "empty".to_string(),
            FeedStatus::Failed(reason) => format!("failed: {}", reason),
        }
    }
}

/// Per-feed health for the cycle. A degraded feed shrinks its section of
/// the report; this record keeps that visible instead of silent.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedHealth {
    pub hourly: FeedStatus,
    pub daily: FeedStatus,
    pub weather: FeedStatus,
    pub hotspots: FeedStatus,
}

impl FeedHealth {
    /// Names of the feeds that failed this cycle, with reasons.
    pub fn failures(&self) -> Vec<(&'static str, &str)> {
        let mut failures = Vec::new();
        for (name, status) in [
            ("hourly", &self.hourly),
            ("daily", &self.daily),
            ("weather", &self.weather),
            ("hotspots", &self.hotspots),
        ] {
            if let FeedStatus::Failed(reason) = status {
                failures.push((name, reason.as_str()));
            }
        }
        failures
    }
}

/// Everything one monitoring cycle concluded, in network civil time.
#[derive(Debug, Clone, PartialEq)]
pub struct SituationReport {
    pub generated_at: DateTime<FixedOffset>,
    /// Stations present in the hourly snapshot after normalization.
    pub station_total: usize,
    /// Min and max of valid hourly PM2.5 values; `None` when no station
    /// carried a valid value.
    pub hourly_range: Option<(f64, f64)>,
    /// Min and max of valid daily (24h) PM2.5 values.
    pub daily_range: Option<(f64, f64)>,
    /// Every outdated station, in snapshot order. This is the raw total;
    /// the grouped view below may cover fewer stations.
    pub outdated: Vec<OutdatedEntry>,
    pub regional_groups: Vec<RegionalGroup>,
    /// Stations with at least one QA issue, in candidate order.
    pub findings: Vec<AnomalyFinding>,
    pub risk: RiskOverlay,
    pub hotspot_total: usize,
    pub hotspot_ranking: Vec<(String, u32)>,
    pub feeds: FeedHealth,
}

impl SituationReport {
    /// Render the report into its delivery messages, in order.
    ///
    /// The overview and hotspot messages are always present; the outdated
    /// and QA messages are omitted when they would be empty.
    pub fn render_messages(&self) -> Vec<String> {
        let mut messages = vec![self.render_overview()];
        if let Some(msg) = self.render_outdated() {
            messages.push(msg);
        }
        if let Some(msg) = self.render_qa() {
            messages.push(msg);
        }
        messages.push(self.render_hotspots());
        messages
    }

    fn timestamp(&self) -> String {
        self.generated_at.format("%Y-%m-%d %H:%M").to_string()
    }

    fn render_overview(&self) -> String {
        let mut msg = String::from("🌏 *Thailand Air Quality Situation*\n");
        msg.push_str(&format!("Updated: {}\n\n", self.timestamp()));
        msg.push_str(&format!(
            "📊 PM2.5 (1h): `{}` | (24h): `{}` µg/m³\n",
            format_range(self.hourly_range),
            format_range(self.daily_range)
        ));
        msg.push_str(&format!(
            "⚠️ Outdated: `{}` | QA flagged: `{}` of `{}` stations\n\n",
            self.outdated.len(),
            self.findings.len(),
            self.station_total
        ));
        msg.push_str("🔍 *Analysis:*\n");
        msg.push_str(&format!(
            "📍 Watch (calm wind + fire): `{}`\n",
            format_province_list(&self.risk.risk_provinces, "no critical areas")
        ));
        msg.push_str(&format!(
            "🌧️ Rain reported: `{}`\n",
            format_province_list(&self.risk.rain_provinces, "no rain reported")
        ));

        let failures = self.feeds.failures();
        if !failures.is_empty() {
            msg.push_str("\n⚠️ *Degraded feeds:*\n");
            for (name, reason) in failures {
                msg.push_str(&format!("• {}: {}\n", name, reason));
            }
        }
        msg
    }

    fn render_outdated(&self) -> Option<String> {
        if self.outdated.is_empty() {
            return None;
        }
        let mut msg = String::from("⏳ *Outdated Stations*\n");
        msg.push_str(&format!("Updated: {}\n", self.timestamp()));
        for group in &self.regional_groups {
            msg.push_str(&format!("\n📍 *{}* ({})\n", group.region, group.owner));
            for entry in &group.entries {
                msg.push_str(&format!(
                    "• {} | {} (down: {})\n",
                    entry.station_id,
                    entry.name,
                    format_elapsed(entry.elapsed)
                ));
            }
        }
        Some(msg)
    }

    fn render_qa(&self) -> Option<String> {
        if self.findings.is_empty() {
            return None;
        }
        let lines: Vec<String> = self
            .findings
            .iter()
            .take(QA_MESSAGE_CAP)
            .map(|finding| {
                let issues: Vec<String> =
                    finding.issues.iter().map(|i| i.to_string()).collect();
                format!(
                    "• {} | {}: {}",
                    finding.station_id,
                    finding.station_name,
                    issues.join(", ")
                )
            })
            .collect();
        Some(format!(
            "🚨 *Stations With Data Anomalies (QA 48h)*\n\n{}",
            lines.join("\n")
        ))
    }

    fn render_hotspots(&self) -> String {
        let mut msg = String::from("🔥 *Daily Hotspot Summary (VIIRS)*\n");
        msg.push_str(&format!("Total: `{}` detections\n\n", self.hotspot_total));
        msg.push_str("🏆 *Top provinces:*\n");
        for (rank, (province, count)) in self.hotspot_ranking.iter().enumerate() {
            msg.push_str(&format!("{}. {}: `{}`\n", rank + 1, province, count));
        }
        msg
    }

    /// Serialize the full report for machine consumption.
    pub fn to_json(&self) -> serde_json::Value {
        json!({
            "generated_at": self.generated_at.to_rfc3339(),
            "station_total": self.station_total,
            "pm25": {
                "hourly_range": self.hourly_range.map(|(lo, hi)| json!([lo, hi])),
                "daily_range": self.daily_range.map(|(lo, hi)| json!([lo, hi])),
            },
            "outdated": {
                "total": self.outdated.len(),
                "regions": self.regional_groups.iter().map(|group| json!({
                    "region": group.region,
                    "owner": group.owner,
                    "stations": group.entries.iter().map(|entry| json!({
                        "id": entry.station_id,
                        "name": entry.name,
                        "area": entry.area,
                        "elapsed": format_elapsed(entry.elapsed),
                        "last_reported_at": entry.last_reported_at.to_rfc3339(),
                    })).collect::<Vec<_>>(),
                })).collect::<Vec<_>>(),
            },
            "qa_findings": self.findings.iter().map(|finding| json!({
                "station_id": finding.station_id,
                "station_name": finding.station_name,
                "issues": finding.issues.iter().map(|i| i.to_string()).collect::<Vec<_>>(),
            })).collect::<Vec<_>>(),
            "risk": {
                "watch_provinces": self.risk.risk_provinces,
                "rain_provinces": self.risk.rain_provinces,
            },
            "hotspots": {
                "total": self.hotspot_total,
                "ranking": self.hotspot_ranking.iter().map(|(province, count)| json!({
                    "province": province,
                    "count": count,
                })).collect::<Vec<_>>(),
            },
            "feeds": {
                "hourly": self.feeds.hourly.label(),
                "daily": self.feeds.daily.label(),
                "weather": self.feeds.weather.label(),
                "hotspots": self.feeds.hotspots.label(),
            },
        })
    }
}

/// Format an elapsed duration as days and hours ("2 d 3 hr", "5 hr").
pub fn format_elapsed(elapsed: Duration) -> String {
    let days = elapsed.num_days();
    let hours = elapsed.num_hours() - days * 24;
    if days > 0 {
        format!("{} d {} hr", days, hours)
    } else {
        format!("{} hr", hours)
    }
}

fn format_range(range: Option<(f64, f64)>) -> String {
    match range {
        Some((lo, hi)) => format!("{}-{}", lo, hi),
        None => "n/a".to_string(),
    }
}

fn format_province_list(provinces: &[String], empty_label: &str) -> String {
    if provinces.is_empty() {
        empty_label.to_string()
    } else {
        provinces.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::models::{bangkok_offset, Issue};
    use chrono::TimeZone;

    fn healthy_feeds() -> FeedHealth {
        FeedHealth {
            hourly: FeedStatus::Ok,
            daily: FeedStatus::Ok,
            weather: FeedStatus::Ok,
            hotspots: FeedStatus::Ok,
        }
    }

    fn base_report() -> SituationReport {
        SituationReport {
            generated_at: bangkok_offset()
                .with_ymd_and_hms(2026, 2, 10, 13, 0, 0)
                .unwrap(),
            station_total: 100,
            hourly_range: Some((8.0, 152.0)),
            daily_range: Some((10.0, 95.0)),
            outdated: Vec::new(),
            regional_groups: Vec::new(),
            findings: Vec::new(),
            risk: RiskOverlay::default(),
            hotspot_total: 0,
            hotspot_ranking: Vec::new(),
            feeds: healthy_feeds(),
        }
    }

    fn finding(id: &str) -> AnomalyFinding {
        AnomalyFinding {
            station_id: id.to_string(),
            station_name: format!("Station {}", id),
            issues: vec![Issue::Flatline],
        }
    }

    fn outdated_entry(id: &str) -> OutdatedEntry {
        OutdatedEntry {
            station_id: id.to_string(),
            name: format!("Station {}", id),
            area: "Mueang, Lampang".to_string(),
            elapsed: Duration::hours(27),
            last_reported_at: bangkok_offset()
                .with_ymd_and_hms(2026, 2, 9, 10, 0, 0)
                .unwrap(),
        }
    }

    #[test]
    fn test_quiet_report_renders_two_messages() {
        // No outdated stations and no findings: overview + hotspots only.
        let messages = base_report().render_messages();
        assert_eq!(messages.len(), 2);
        assert!(messages[0].contains("Thailand Air Quality Situation"));
        assert!(messages[1].contains("Hotspot Summary"));
    }

    #[test]
    fn test_full_report_renders_four_messages() {
        let mut report = base_report();
        report.outdated = vec![outdated_entry("02t")];
        report.regional_groups = vec![RegionalGroup {
            region: "North".to_string(),
            owner: "owner-north".to_string(),
            entries: vec![outdated_entry("02t")],
        }];
        report.findings = vec![finding("36t")];
        let messages = report.render_messages();
        assert_eq!(messages.len(), 4);
        assert!(messages[1].contains("Outdated Stations"));
        assert!(messages[1].contains("down: 1 d 3 hr"));
        assert!(messages[2].contains("36t | Station 36t: Flatline"));
    }

    #[test]
    fn test_qa_message_is_capped() {
        let mut report = base_report();
        report.findings = (0..30).map(|i| finding(&format!("{:02}t", i))).collect();
        let messages = report.render_messages();
        let qa = &messages[1];
        assert_eq!(qa.lines().filter(|l| l.starts_with('•')).count(), 20);
    }

    #[test]
    fn test_overview_reports_empty_ranges_and_lists() {
        let mut report = base_report();
        report.hourly_range = None;
        let overview = &report.render_messages()[0];
        assert!(overview.contains("PM2.5 (1h): `n/a`"));
        assert!(overview.contains("no critical areas"));
        assert!(overview.contains("no rain reported"));
        assert!(!overview.contains("Degraded feeds"));
    }

    #[test]
    fn test_failed_feeds_are_named_in_overview() {
        let mut report = base_report();
        report.feeds.weather = FeedStatus::Failed("timeout".to_string());
        let overview = &report.render_messages()[0];
        assert!(overview.contains("Degraded feeds"));
        assert!(overview.contains("weather: timeout"));
    }

    #[test]
    fn test_json_carries_raw_total_not_grouped_total() {
        let mut report = base_report();
        report.outdated = vec![outdated_entry("02t"), outdated_entry("99t")];
        // Only one of the two matched a region.
        report.regional_groups = vec![RegionalGroup {
            region: "North".to_string(),
            owner: "owner-north".to_string(),
            entries: vec![outdated_entry("02t")],
        }];
        let value = report.to_json();
        assert_eq!(value["outdated"]["total"], 2);
        assert_eq!(
            value["outdated"]["regions"][0]["stations"]
                .as_array()
                .unwrap()
                .len(),
            1
        );
    }

    #[test]
    fn test_format_elapsed() {
        assert_eq!(format_elapsed(Duration::hours(5)), "5 hr");
        assert_eq!(format_elapsed(Duration::hours(51)), "2 d 3 hr");
        assert_eq!(format_elapsed(Duration::minutes(90)), "1 hr");
    }
}
