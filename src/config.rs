//! Configuration management and validation.
//!
//! Provides the explicit configuration object passed into every component
//! at construction: detection thresholds, candidate-selection policy, risk
//! correlation settings, and the administrative region table. Nothing in
//! the engine reads process-wide state, so independent runs with different
//! thresholds can coexist in one process (and in one test binary).

use crate::app::models::{Region, RegionTable};
use crate::constants::{risk, selection, thresholds};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

// =============================================================================
// Threshold Configuration
// =============================================================================

/// Detection thresholds, immutable for a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThresholdConfig {
    /// Minutes after which a station is considered outdated (strictly
    /// greater than; an elapsed time exactly at the threshold is fine).
    pub stale_minutes: i64,

    /// Maximum allowed absolute hour-over-hour delta.
    pub spike_limit: f64,

    /// Minimum consecutive missing/no-reading samples that flag a gap.
    pub missing_run_hours: usize,

    /// Window size over which zero variance flags a stuck sensor.
    pub flatline_window_hours: usize,
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            stale_minutes: thresholds::STALE_MINUTES,
            spike_limit: thresholds::SPIKE_LIMIT,
            missing_run_hours: thresholds::MISSING_RUN_HOURS,
            flatline_window_hours: thresholds::FLATLINE_WINDOW_HOURS,
        }
    }
}

// =============================================================================
// Candidate Selection Configuration
// =============================================================================

/// Policy bounding the per-cycle historical QA workload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionConfig {
    /// Top-K stations by current value always analyzed.
    pub top_k: usize,

    /// Also analyze any station whose current value is negative-but-not-
    /// sentinel or exceeds `extreme_ceiling`, even outside the top-K.
    pub scan_extremes: bool,

    /// Ceiling for the extreme scan.
    pub extreme_ceiling: f64,

    /// Concurrent in-flight history fetches.
    pub max_concurrent_fetches: usize,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            top_k: selection::TOP_K,
            scan_extremes: true,
            extreme_ceiling: selection::EXTREME_CEILING,
            max_concurrent_fetches: selection::MAX_CONCURRENT_FETCHES,
        }
    }
}

// =============================================================================
// Risk Correlation Configuration
// =============================================================================

/// Settings for the wind/fire/rain overlay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskConfig {
    /// Wind speed below which a province counts as calm.
    pub wind_calm_threshold: f64,

    /// Display cap for risk, rain, and hotspot-ranking lists.
    pub display_cap: usize,
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            wind_calm_threshold: risk::WIND_CALM_THRESHOLD,
            display_cap: risk::DISPLAY_CAP,
        }
    }
}

// =============================================================================
// Monitor Configuration
// =============================================================================

/// Complete configuration for one monitoring run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    pub thresholds: ThresholdConfig,
    pub selection: SelectionConfig,
    pub risk: RiskConfig,
    pub regions: RegionTable,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            thresholds: ThresholdConfig::default(),
            selection: SelectionConfig::default(),
            risk: RiskConfig::default(),
            regions: default_region_table(),
        }
    }
}

impl MonitorConfig {
    /// Load configuration from a TOML file, filling unset sections with
    /// defaults.
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            Error::configuration(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        let config: MonitorConfig = toml::from_str(&raw).map_err(|e| {
            Error::configuration(format!(
                "Failed to parse config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Create configuration with a custom staleness threshold
    pub fn with_stale_minutes(mut self, minutes: i64) -> Self {
        self.thresholds.stale_minutes = minutes;
        self
    }

    /// Create configuration with a custom spike limit
    pub fn with_spike_limit(mut self, limit: f64) -> Self {
        self.thresholds.spike_limit = limit;
        self
    }

    /// Create configuration with a custom missing-run threshold
    pub fn with_missing_run_hours(mut self, hours: usize) -> Self {
        self.thresholds.missing_run_hours = hours;
        self
    }

    /// Create configuration with a custom flatline window
    pub fn with_flatline_window_hours(mut self, hours: usize) -> Self {
        self.thresholds.flatline_window_hours = hours;
        self
    }

    /// Create configuration with a custom top-K selection bound
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.selection.top_k = top_k;
        self
    }

    /// Disable the extreme-value candidate scan
    pub fn without_extreme_scan(mut self) -> Self {
        self.selection.scan_extremes = false;
        self
    }

    /// Create configuration with a custom region table
    pub fn with_regions(mut self, regions: RegionTable) -> Self {
        self.regions = regions;
        self
    }

    /// Validate configuration values for consistency
    pub fn validate(&self) -> Result<()> {
        if self.thresholds.stale_minutes <= 0 {
            return Err(Error::configuration(
                "stale_minutes must be greater than 0".to_string(),
            ));
        }

        if self.thresholds.spike_limit <= 0.0 {
            return Err(Error::configuration(
                "spike_limit must be greater than 0".to_string(),
            ));
        }

        if self.thresholds.missing_run_hours == 0 {
            return Err(Error::configuration(
                "missing_run_hours must be greater than 0".to_string(),
            ));
        }

        // A single sample has undefined variance; a 1-wide window could
        // never flag anything.
        if self.thresholds.flatline_window_hours < 2 {
            return Err(Error::configuration(
                "flatline_window_hours must be at least 2".to_string(),
            ));
        }

        if self.selection.max_concurrent_fetches == 0 {
            return Err(Error::configuration(
                "max_concurrent_fetches must be greater than 0".to_string(),
            ));
        }

        for region in self.regions.iter() {
            if region.provinces.is_empty() {
                return Err(Error::configuration(format!(
                    "Region '{}' has an empty province list",
                    region.name
                )));
            }
        }

        Ok(())
    }
}

// =============================================================================
// Feed Credentials
// =============================================================================

/// Upstream credentials and delivery targets, sourced from the
/// environment rather than the config file so secrets stay out of
/// version-controlled TOML.
#[derive(Debug, Clone, Default)]
pub struct FeedConfig {
    pub air4thai_key: Option<String>,
    pub gistda_key: Option<String>,
    pub tmd_key: Option<String>,
    pub telegram_token: Option<String>,
    pub telegram_chat_ids: Vec<String>,
}

impl FeedConfig {
    /// Read credentials from the environment. Missing variables are not an
    /// error here; each adapter decides whether it can operate without one.
    pub fn from_env() -> Self {
        let chat_ids = std::env::var("TELEGRAM_CHAT_IDS")
            .unwrap_or_default()
            .split(',')
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty())
            .collect();

        Self {
            air4thai_key: std::env::var("AIR4THAI_KEY").ok(),
            gistda_key: std::env::var("GISTDA_API_KEY").ok(),
            tmd_key: std::env::var("TMD_3HR_KEY").ok(),
            telegram_token: std::env::var("TELEGRAM_BOT_TOKEN").ok(),
            telegram_chat_ids: chat_ids,
        }
    }

    /// True when Telegram delivery is fully configured.
    pub fn can_deliver(&self) -> bool {
        self.telegram_token.is_some() && !self.telegram_chat_ids.is_empty()
    }
}

// =============================================================================
// Default Region Table
// =============================================================================

/// The operational region table for the Thai network: six administrative
/// regions, their provinces (Thai names, matching the feed's area text),
/// and the staff member responsible for follow-up.
pub fn default_region_table() -> RegionTable {
    let region = |name: &str, provinces: &[&str], owner: &str| Region {
        name: name.to_string(),
        provinces: provinces.iter().map(|p| p.to_string()).collect(),
        owner: owner.to_string(),
    };

    RegionTable::new(vec![
        region(
            "ภาคเหนือ",
            &[
                "เชียงราย",
                "เชียงใหม่",
                "พะเยา",
                "แพร่",
                "น่าน",
                "อุตรดิตถ์",
                "ลำปาง",
                "ตาก",
                "ลำพูน",
                "แม่ฮ่องสอน",
                "สุโขทัย",
                "กำแพงเพชร",
                "เพชรบูรณ์",
                "พิษณุโลก",
                "นครสวรรค์",
                "อุทัยธานี",
            ],
            "พี่ป๊อปปี้",
        ),
        region(
            "ภาคกลาง",
            &[
                "กาญจนบุรี",
                "สุพรรณบุรี",
                "อ่างทอง",
                "ชัยนาท",
                "สิงห์บุรี",
                "ราชบุรี",
                "สระบุรี",
                "พระนครศรีอยุธยา",
                "ลพบุรี",
                "เพชรบุรี",
                "สมุทรสงคราม",
                "ประจวบคีรีขันธ์",
            ],
            "พี่ป๊อปปี้",
        ),
        region(
            "กรุงเทพฯและปริมณฑล",
            &[
                "กรุงเทพมหานคร",
                "สมุทรสาคร",
                "นนทบุรี",
                "สมุทรปราการ",
                "ปทุมธานี",
                "นครปฐม",
            ],
            "พี่ป๊อปปี้",
        ),
        region(
            "ภาคใต้",
            &[
                "ชุมพร",
                "ระนอง",
                "พังงา",
                "ภูเก็ต",
                "สุราษฎร์ธานี",
                "นครศรีธรรมราช",
                "กระบี่",
                "ตรัง",
                "พัทลุง",
                "สตูล",
                "สงขลา",
                "ปัตตานี",
                "ยะลา",
                "นราธิวาส",
            ],
            "พี่หน่อย",
        ),
        region(
            "ภาคตะวันออกเฉียงเหนือ",
            &[
                "ขอนแก่น",
                "กาฬสินธุ์",
                "ชัยภูมิ",
                "นครพนม",
                "นครราชสีมา",
                "บึงกาฬ",
                "บุรีรัมย์",
                "มหาสารคาม",
                "มุกดาหาร",
                "ยโสธร",
                "ร้อยเอ็ด",
                "ศรีสะเกษ",
                "สกลนคร",
                "สุรินทร์",
                "หนองคาย",
                "หนองบัวลำภู",
                "อำนาจเจริญ",
                "อุดรธานี",
                "อุบลราชธานี",
                "เลย",
            ],
            "พี่หน่อย",
        ),
        region(
            "ภาคตะวันออก",
            &[
                "นครนายก",
                "ฉะเชิงเทรา",
                "ปราจีนบุรี",
                "สระแก้ว",
                "ชลบุรี",
                "ระยอง",
                "จันทบุรี",
                "ตราด",
            ],
            "พี่ฟรังก์",
        ),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config_is_valid() {
        let config = MonitorConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.thresholds.stale_minutes, 80);
        assert_eq!(config.thresholds.spike_limit, 50.0);
        assert_eq!(config.thresholds.missing_run_hours, 5);
        assert_eq!(config.thresholds.flatline_window_hours, 4);
        assert_eq!(config.regions.regions.len(), 6);
    }

    #[test]
    fn test_builder_methods() {
        let config = MonitorConfig::default()
            .with_stale_minutes(120)
            .with_spike_limit(30.0)
            .with_top_k(5)
            .without_extreme_scan();

        assert_eq!(config.thresholds.stale_minutes, 120);
        assert_eq!(config.thresholds.spike_limit, 30.0);
        assert_eq!(config.selection.top_k, 5);
        assert!(!config.selection.scan_extremes);
        // Untouched sections keep their defaults.
        assert_eq!(config.thresholds.missing_run_hours, 5);
    }

    #[test]
    fn test_validation_rejects_bad_thresholds() {
        assert!(MonitorConfig::default().with_stale_minutes(0).validate().is_err());
        assert!(MonitorConfig::default().with_spike_limit(-1.0).validate().is_err());
        assert!(MonitorConfig::default().with_missing_run_hours(0).validate().is_err());
        assert!(
            MonitorConfig::default()
                .with_flatline_window_hours(1)
                .validate()
                .is_err()
        );
    }

    #[test]
    fn test_validation_rejects_empty_province_list() {
        let config = MonitorConfig::default().with_regions(RegionTable::new(vec![Region {
            name: "empty".to_string(),
            provinces: vec![],
            owner: "nobody".to_string(),
        }]));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_file_partial_override() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[thresholds]\nstale_minutes = 45\n\n[selection]\ntop_k = 3"
        )
        .unwrap();

        let config = MonitorConfig::from_toml_file(file.path()).unwrap();
        assert_eq!(config.thresholds.stale_minutes, 45);
        assert_eq!(config.selection.top_k, 3);
        // Unset fields fall back to defaults, including the region table.
        assert_eq!(config.thresholds.spike_limit, 50.0);
        assert_eq!(config.regions.regions.len(), 6);
    }

    #[test]
    fn test_toml_file_missing_is_configuration_error() {
        let result = MonitorConfig::from_toml_file(Path::new("/nonexistent/monitor.toml"));
        assert!(matches!(result, Err(crate::Error::Configuration { .. })));
    }

    #[test]
    fn test_default_region_table_matches_thai_area_text() {
        let table = default_region_table();
        let region = table.region_for("ต.ช้างเผือก อ.เมือง, เชียงใหม่").unwrap();
        assert_eq!(region.name, "ภาคเหนือ");
        assert_eq!(region.owner, "พี่ป๊อปปี้");
    }
}
