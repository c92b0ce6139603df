//! Command-line argument definitions for the Air4Thai monitor
//!
//! This module defines the complete CLI interface using clap derive API.

use crate::config::MonitorConfig;
use crate::{Error, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// CLI arguments for the Air4Thai network monitor
///
/// Runs one monitoring cycle over Thailand's air-quality sensor network:
/// staleness detection, historical QA analysis, and weather/fire risk
/// correlation, delivered as a situation report.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "air4thai-monitor",
    version,
    about = "Station health and anomaly detection for Thailand's air-quality network",
    long_about = "Ingests the Air4Thai hourly and daily snapshot feeds, TMD weather \
                  observations, and GISTDA fire-hotspot detections, evaluates per-station \
                  data-quality health (staleness, spikes, missing runs, flatlines, negative \
                  values), correlates calm wind and fire density into risk areas, and \
                  delivers a structured situation report via Telegram."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands for the monitor
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Run one monitoring cycle (default command)
    Run(RunArgs),
    /// Inspect the administrative region table
    Regions(RegionsArgs),
}

/// Arguments for the run command (one full monitoring cycle)
#[derive(Debug, Clone, Parser)]
pub struct RunArgs {
    /// Path to configuration file
    ///
    /// TOML configuration for thresholds, candidate selection, risk
    /// settings, and the region table. Defaults apply for any section
    /// the file leaves unset.
    #[arg(
        short = 'c',
        long = "config",
        value_name = "FILE",
        help = "Path to configuration file (TOML format)"
    )]
    pub config_file: Option<PathBuf>,

    /// Staleness threshold in minutes
    ///
    /// A station whose last report is strictly older than this is flagged
    /// outdated. The network reports hourly; the default allows one late
    /// report before flagging.
    #[arg(
        long = "stale-minutes",
        value_name = "MINUTES",
        help = "Minutes without a report before a station is outdated"
    )]
    pub stale_minutes: Option<i64>,

    /// Spike limit in µg/m³
    ///
    /// Maximum plausible absolute hour-over-hour PM2.5 delta.
    #[arg(
        long = "spike-limit",
        value_name = "DELTA",
        help = "Maximum plausible hour-over-hour delta"
    )]
    pub spike_limit: Option<f64>,

    /// Missing-run threshold in hours
    #[arg(
        long = "missing-run-hours",
        value_name = "HOURS",
        help = "Consecutive missing hours that flag a gap"
    )]
    pub missing_run_hours: Option<usize>,

    /// Flatline window in hours
    #[arg(
        long = "flatline-window-hours",
        value_name = "HOURS",
        help = "Window over which zero variance flags a stuck sensor"
    )]
    pub flatline_window_hours: Option<usize>,

    /// Number of top-ranked stations to always analyze
    #[arg(
        short = 'k',
        long = "top-k",
        value_name = "COUNT",
        help = "Stations with the highest current values always get a history check"
    )]
    pub top_k: Option<usize>,

    /// Disable the extreme-value candidate scan
    ///
    /// By default any station with a negative or extremely high current
    /// value is analyzed even outside the top-K.
    #[arg(
        long = "no-extreme-scan",
        help = "Do not analyze extreme-value stations outside the top-K"
    )]
    pub no_extreme_scan: bool,

    /// Render the report without delivering it
    ///
    /// Prints the rendered messages to stdout instead of sending them to
    /// Telegram. Useful for previewing a cycle and for running without
    /// delivery credentials.
    #[arg(long = "dry-run", help = "Print the report instead of delivering it")]
    pub dry_run: bool,

    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,

    /// Suppress output (quiet mode)
    ///
    /// Only show errors and critical messages. Overrides verbose settings.
    #[arg(
        short = 'q',
        long = "quiet",
        help = "Suppress output except errors",
        conflicts_with = "verbose"
    )]
    pub quiet: bool,

    /// Output format for the cycle summary
    #[arg(
        long = "output-format",
        value_enum,
        default_value = "human",
        help = "Output format for the cycle summary"
    )]
    pub output_format: OutputFormat,
}

/// Arguments for the regions command (region table inspection)
#[derive(Debug, Clone, Parser)]
pub struct RegionsArgs {
    /// Path to configuration file
    ///
    /// Shows the region table from this file; without it, the built-in
    /// operational table is shown.
    #[arg(
        short = 'c',
        long = "config",
        value_name = "FILE",
        help = "Path to configuration file (TOML format)"
    )]
    pub config_file: Option<PathBuf>,

    /// Output format for the region table
    #[arg(
        long = "format",
        value_enum,
        default_value = "human",
        help = "Output format for the region table"
    )]
    pub output_format: OutputFormat,

    /// Enable verbose logging output
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Enable verbose logging (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,
}

/// Output format options for machine-readable results
#[derive(Debug, Clone, PartialEq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON format for scripting
    Json,
}

impl Args {
    /// Get the command if one was specified
    pub fn get_command(&self) -> Commands {
        self.command
            .clone()
            .expect("Command should be present when get_command() is called")
    }
}

impl RunArgs {
    /// Validate the run command arguments for consistency
    pub fn validate(&self) -> Result<()> {
        if let Some(config_file) = &self.config_file {
            if !config_file.exists() {
                return Err(Error::configuration(format!(
                    "Config file does not exist: {}",
                    config_file.display()
                )));
            }
        }

        if self.stale_minutes.is_some_and(|m| m <= 0) {
            return Err(Error::configuration(
                "stale-minutes must be greater than 0".to_string(),
            ));
        }

        if self.spike_limit.is_some_and(|l| l <= 0.0) {
            return Err(Error::configuration(
                "spike-limit must be greater than 0".to_string(),
            ));
        }

        if self.missing_run_hours == Some(0) {
            return Err(Error::configuration(
                "missing-run-hours must be greater than 0".to_string(),
            ));
        }

        if self.flatline_window_hours.is_some_and(|h| h < 2) {
            return Err(Error::configuration(
                "flatline-window-hours must be at least 2".to_string(),
            ));
        }

        Ok(())
    }

    /// Build the effective monitor configuration: file (or defaults)
    /// first, then CLI overrides on top.
    pub fn build_config(&self) -> Result<MonitorConfig> {
        let mut config = match &self.config_file {
            Some(path) => MonitorConfig::from_toml_file(path)?,
            None => MonitorConfig::default(),
        };

        if let Some(minutes) = self.stale_minutes {
            config = config.with_stale_minutes(minutes);
        }
        if let Some(limit) = self.spike_limit {
            config = config.with_spike_limit(limit);
        }
        if let Some(hours) = self.missing_run_hours {
            config = config.with_missing_run_hours(hours);
        }
        if let Some(hours) = self.flatline_window_hours {
            config = config.with_flatline_window_hours(hours);
        }
        if let Some(top_k) = self.top_k {
            config = config.with_top_k(top_k);
        }
        if self.no_extreme_scan {
            config = config.without_extreme_scan();
        }

        config.validate()?;
        Ok(config)
    }

    /// Determine the appropriate log level based on verbosity flags
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "warn",
                1 => "info",
                2 => "debug",
                _ => "trace",
            }
        }
    }
}

impl RegionsArgs {
    /// Validate the regions command arguments for consistency
    pub fn validate(&self) -> Result<()> {
        if let Some(config_file) = &self.config_file {
            if !config_file.exists() {
                return Err(Error::configuration(format!(
                    "Config file does not exist: {}",
                    config_file.display()
                )));
            }
        }
        Ok(())
    }

    /// Determine the appropriate log level based on verbosity flags
    pub fn get_log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}

impl Default for RunArgs {
    fn default() -> Self {
        Self {
            config_file: None,
            stale_minutes: None,
            spike_limit: None,
            missing_run_hours: None,
            flatline_window_hours: None,
            top_k: None,
            no_extreme_scan: false,
            dry_run: false,
            verbose: 0,
            quiet: false,
            output_format: OutputFormat::Human,
        }
    }
}
