//! Wind/fire/rain risk correlation
//!
//! Cross-references weather observations with fire-hotspot counts to name
//! provinces where calm wind will trap smoke from active fires, and
//! provinces where rainfall is currently washing the air. Both lists are
//! display aids, deduplicated and capped, not exhaustive surveys.

use crate::app::models::{HotspotCounts, WeatherObservation};
use crate::config::RiskConfig;
use tracing::debug;

/// The correlated province lists for one run.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RiskOverlay {
    /// Provinces with calm wind *and* at least one active hotspot, in
    /// first-encounter order, capped.
    pub risk_provinces: Vec<String>,
    /// Provinces with measurable rainfall, in first-encounter order, capped.
    pub rain_provinces: Vec<String>,
}

/// Correlate weather observations with hotspot counts.
///
/// A province is at risk when any of its observations shows wind strictly
/// below the calm threshold and the province has a nonzero hotspot count.
/// Observations without the relevant measurement contribute nothing; a
/// missing weather or hotspot feed therefore shrinks the lists rather than
/// failing the run.
pub fn correlate(
    observations: &[WeatherObservation],
    hotspots: &HotspotCounts,
    config: &RiskConfig,
) -> RiskOverlay {
    let mut overlay = RiskOverlay::default();

    for obs in observations {
        if overlay.risk_provinces.len() < config.display_cap
            && !overlay.risk_provinces.contains(&obs.province)
            && obs
                .wind_speed
                .is_some_and(|w| w < config.wind_calm_threshold)
            && hotspots.count_for(&obs.province) > 0
        {
            overlay.risk_provinces.push(obs.province.clone());
        }

        if overlay.rain_provinces.len() < config.display_cap
            && !overlay.rain_provinces.contains(&obs.province)
            && obs.rainfall.is_some_and(|r| r > 0.0)
        {
            overlay.rain_provinces.push(obs.province.clone());
        }
    }

    debug!(
        "Risk overlay: {} risk province(s), {} rain province(s)",
        overlay.risk_provinces.len(),
        overlay.rain_provinces.len()
    );

    overlay
}

/// Rank provinces by hotspot count, descending, ties broken by first
/// encounter in the feed. Returns at most `display_cap` entries.
pub fn rank_hotspots(hotspots: &HotspotCounts, config: &RiskConfig) -> Vec<(String, u32)> {
    let mut ranking = hotspots.by_province.clone();
    ranking.sort_by(|a, b| b.1.cmp(&a.1));
    ranking.truncate(config.display_cap);
    ranking
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obs(province: &str, wind: Option<f64>, rain: Option<f64>) -> WeatherObservation {
        WeatherObservation {
            province: province.to_string(),
            wind_speed: wind,
            rainfall: rain,
        }
    }

    fn config() -> RiskConfig {
        RiskConfig {
            wind_calm_threshold: 5.0,
            display_cap: 5,
        }
    }

    #[test]
    fn test_calm_wind_with_hotspots_is_risk() {
        let observations = vec![obs("Nan", Some(2.0), None)];
        let hotspots = HotspotCounts::from_provinces(["Nan", "Nan"]);
        let overlay = correlate(&observations, &hotspots, &config());
        assert_eq!(overlay.risk_provinces, vec!["Nan".to_string()]);
    }

    #[test]
    fn test_calm_wind_without_hotspots_is_not_risk() {
        let observations = vec![obs("Nan", Some(2.0), None)];
        let overlay = correlate(&observations, &HotspotCounts::default(), &config());
        assert!(overlay.risk_provinces.is_empty());
    }

    #[test]
    fn test_hotspots_with_brisk_wind_is_not_risk() {
        let observations = vec![obs("Nan", Some(12.0), None)];
        let hotspots = HotspotCounts::from_provinces(["Nan"]);
        let overlay = correlate(&observations, &hotspots, &config());
        assert!(overlay.risk_provinces.is_empty());
    }

    #[test]
    fn test_wind_exactly_at_threshold_is_not_calm() {
        let observations = vec![obs("Nan", Some(5.0), None)];
        let hotspots = HotspotCounts::from_provinces(["Nan"]);
        let overlay = correlate(&observations, &hotspots, &config());
        assert!(overlay.risk_provinces.is_empty());
    }

    #[test]
    fn test_missing_wind_measurement_is_not_calm() {
        let observations = vec![obs("Nan", None, None)];
        let hotspots = HotspotCounts::from_provinces(["Nan"]);
        let overlay = correlate(&observations, &hotspots, &config());
        assert!(overlay.risk_provinces.is_empty());
    }

    #[test]
    fn test_rainfall_above_zero_is_rain() {
        let observations = vec![
            obs("Phuket", None, Some(1.5)),
            obs("Krabi", None, Some(0.0)),
            obs("Trang", None, None),
        ];
        let overlay = correlate(&observations, &HotspotCounts::default(), &config());
        assert_eq!(overlay.rain_provinces, vec!["Phuket".to_string()]);
    }

    #[test]
    fn test_lists_are_deduplicated_and_capped_in_encounter_order() {
        let provinces = ["P1", "P2", "P3", "P4", "P5", "P6", "P1"];
        let observations: Vec<_> = provinces
            .iter()
            .map(|p| obs(p, Some(1.0), Some(2.0)))
            .collect();
        let hotspots = HotspotCounts::from_provinces(provinces);
        let overlay = correlate(&observations, &hotspots, &config());
        assert_eq!(overlay.risk_provinces, vec!["P1", "P2", "P3", "P4", "P5"]);
        assert_eq!(overlay.rain_provinces, vec!["P1", "P2", "P3", "P4", "P5"]);
    }

    #[test]
    fn test_hotspot_ranking_descending_with_stable_ties() {
        let hotspots =
            HotspotCounts::from_provinces(["Tak", "Nan", "Nan", "Phrae", "Tak", "Nan", "Loei"]);
        let ranking = rank_hotspots(&hotspots, &config());
        assert_eq!(
            ranking,
            vec![
                ("Nan".to_string(), 3),
                ("Tak".to_string(), 2),
                ("Phrae".to_string(), 1),
                ("Loei".to_string(), 1),
            ]
        );
    }

    #[test]
    fn test_hotspot_ranking_is_capped() {
        let hotspots =
            HotspotCounts::from_provinces(["P1", "P2", "P3", "P4", "P5", "P6", "P7"]);
        assert_eq!(rank_hotspots(&hotspots, &config()).len(), 5);
    }
}
