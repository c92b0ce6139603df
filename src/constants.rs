//! Application constants for the Air4Thai monitor
//!
//! This module contains all default threshold values, wire-format
//! sentinels, and upstream endpoints used throughout the application.
//! Every threshold here is a *default*; runs are parameterized through
//! [`crate::config::MonitorConfig`], never through globals.

// =============================================================================
// Detection Thresholds
// =============================================================================

/// Default detection thresholds, tuned for the Air4Thai PM2.5 network
/// (hourly reporting cadence, occasional multi-hour telemetry outages).
pub mod thresholds {
    /// Minutes after which a station with no new report is "outdated".
    /// The network reports hourly; 80 minutes allows one late report.
    pub const STALE_MINUTES: i64 = 80;

    /// Maximum plausible hour-over-hour PM2.5 delta in µg/m³.
    pub const SPIKE_LIMIT: f64 = 50.0;

    /// Minimum consecutive missing/no-reading hours that flag a gap.
    pub const MISSING_RUN_HOURS: usize = 5;

    /// Window size (hours) over which zero variance flags a stuck sensor.
    pub const FLATLINE_WINDOW_HOURS: usize = 4;
}

// =============================================================================
// Candidate Selection
// =============================================================================

/// Defaults for bounding the per-cycle historical QA workload.
pub mod selection {
    /// Stations with the highest current values always get a history check.
    pub const TOP_K: usize = 15;

    /// Current value above which a station is checked regardless of rank,
    /// when extreme scanning is enabled.
    pub const EXTREME_CEILING: f64 = 150.0;

    /// Concurrent in-flight history fetches per cycle.
    pub const MAX_CONCURRENT_FETCHES: usize = 4;
}

// =============================================================================
// Risk Correlation
// =============================================================================

/// Defaults for the wind/fire/rain overlay.
pub mod risk {
    /// Wind speed (m/s) below which a province counts as calm.
    pub const WIND_CALM_THRESHOLD: f64 = 5.0;

    /// Display cap for risk, rain, and hotspot-ranking lists.
    pub const DISPLAY_CAP: usize = 5;
}

// =============================================================================
// Wire Format
// =============================================================================

/// Values and formats fixed by the upstream feeds.
pub mod wire {
    /// Reserved value meaning "no reading transmitted". Distinct from a
    /// true negative reading and never an anomaly on its own.
    pub const SENTINEL_NO_READING: f64 = -1.0;

    /// Timestamp format used by the Air4Thai snapshot and history feeds.
    pub const FEED_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
}

// =============================================================================
// Upstream Endpoints
// =============================================================================

/// Default upstream endpoints. Overridable per client for testing.
pub mod endpoints {
    pub const AIR4THAI_BASE: &str = "http://air4thai.com";
    pub const GISTDA_VIIRS_URL: &str =
        "https://api-gateway.gistda.or.th/api/2.0/resources/features/viirs/1day";
    pub const TMD_WEATHER3H_URL: &str = "https://data.tmd.go.th/api/Weather3Hours/V2/";
    pub const TELEGRAM_API_BASE: &str = "https://api.telegram.org";
}

// =============================================================================
// Miscellaneous
// =============================================================================

/// Trailing history window requested per candidate, in hours.
pub const HISTORY_WINDOW_HOURS: i64 = 48;

/// Maximum QA lines included in the rendered anomaly message.
pub const QA_MESSAGE_CAP: usize = 20;

/// Fixed UTC offset for Asia/Bangkok (the network's civil time, no DST).
pub const BANGKOK_UTC_OFFSET_SECS: i32 = 7 * 3600;
