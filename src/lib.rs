//! Air4Thai Monitor Library
//!
//! A Rust library for monitoring the health of Thailand's national
//! air-quality sensor network. Each run ingests the Air4Thai hourly and
//! daily snapshot feeds, TMD weather observations, and GISTDA fire-hotspot
//! detections, then produces a structured situation report.
//!
//! This library provides tools for:
//! - Normalizing loosely-typed feed records into uniform station snapshots
//! - Detecting silently dead stations via staleness thresholds
//! - Selecting a bounded candidate set for 48-hour historical QA analysis
//! - Flagging spike, missing-run, flatline, and negative-value anomalies
//! - Grouping stale stations by administrative region and responsible owner
//! - Correlating calm wind, fire density, and rainfall into risk overlays

pub mod config;
pub mod constants;

// Core application modules
pub mod app {
    pub mod models;
    pub mod services {
        pub mod candidate_selector;
        pub mod monitor;
        pub mod normalizer;
        pub mod qa_analyzer;
        pub mod regional_aggregator;
        pub mod report;
        pub mod risk_correlator;
        pub mod staleness;
    }
    pub mod adapters {
        pub mod air4thai;
        pub mod gistda;
        pub mod telegram;
        pub mod tmd_weather;

        mod traits;
        pub use traits::{
            FetchOutcome, HistorySource, HotspotSource, ReportSink, SnapshotSource, WeatherSource,
        };
    }
}

// CLI modules
pub mod cli {
    pub mod args;
    pub mod commands;
}

// Re-export commonly used types
pub use app::models::{AnomalyFinding, HistoricalSeries, SampleState, StationSnapshot};
pub use app::services::report::SituationReport;
pub use config::MonitorConfig;

/// Result type alias for the monitor
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for monitoring operations
///
/// Collaborator fetch failures are deliberately *not* errors: they surface
/// as [`app::adapters::FetchOutcome::Failed`] values so a cycle can continue
/// with whatever data is available. The variants here cover the conditions
/// that must stop or visibly degrade a run.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// The primary (hourly) snapshot feed produced no usable data.
    /// A fully-empty report is indistinguishable from "everything is fine",
    /// so this one condition is surfaced upward instead of swallowed.
    #[error("Primary snapshot feed unavailable: {message}")]
    SnapshotUnavailable { message: String },

    /// HTTP transport error
    #[error("HTTP error: {message}")]
    Http {
        message: String,
        #[source]
        source: reqwest::Error,
    },

    /// Report delivery error
    #[error("Report delivery error: {message}")]
    Delivery { message: String },

    /// Data validation error
    #[error("Data validation error: {message}")]
    DataValidation { message: String },

    /// Date/time parsing error
    #[error("Date/time parsing error: {message}")]
    DateTimeParsing {
        message: String,
        #[source]
        source: chrono::ParseError,
    },

    /// Cycle interrupted before completion
    #[error("Interrupted: {message}")]
    Interrupted { message: String },
}

impl Error {
    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a snapshot unavailable error
    pub fn snapshot_unavailable(message: impl Into<String>) -> Self {
        Self::SnapshotUnavailable {
            message: message.into(),
        }
    }

    /// Create an HTTP error with context
    pub fn http(message: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Http {
            message: message.into(),
            source,
        }
    }

    /// Create a report delivery error
    pub fn delivery(message: impl Into<String>) -> Self {
        Self::Delivery {
            message: message.into(),
        }
    }

    /// Create a data validation error
    pub fn data_validation(message: impl Into<String>) -> Self {
        Self::DataValidation {
            message: message.into(),
        }
    }

    /// Create a date/time parsing error
    pub fn datetime_parsing(message: impl Into<String>, source: chrono::ParseError) -> Self {
        Self::DateTimeParsing {
            message: message.into(),
            source,
        }
    }

    /// Create an interruption error
    pub fn interrupted(message: impl Into<String>) -> Self {
        Self::Interrupted {
            message: message.into(),
        }
    }
}

impl From<chrono::ParseError> for Error {
    fn from(error: chrono::ParseError) -> Self {
        Self::DateTimeParsing {
            message: "Date/time parsing failed".to_string(),
            source: error,
        }
    }
}
