//! Command implementations for the monitor CLI
//!
//! This module contains the command execution logic: logging setup,
//! configuration layering, collaborator construction, and the final
//! cycle summary.

use crate::app::adapters::air4thai::Air4ThaiClient;
use crate::app::adapters::gistda::GistdaHotspotClient;
use crate::app::adapters::telegram::TelegramSink;
use crate::app::adapters::tmd_weather::TmdWeatherClient;
use crate::app::adapters::ReportSink;
use crate::app::models::bangkok_now;
use crate::app::services::monitor::Monitor;
use crate::app::services::report::SituationReport;
use crate::cli::args::{Args, Commands, OutputFormat, RegionsArgs, RunArgs};
use crate::config::{FeedConfig, MonitorConfig};
use crate::{Error, Result};
use colored::*;
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Cycle statistics for the final summary
#[derive(Debug, Clone, Default)]
pub struct CycleStats {
    /// Stations in the hourly snapshot
    pub stations: usize,
    /// Stations flagged outdated
    pub outdated: usize,
    /// Stations with QA findings
    pub qa_flagged: usize,
    /// Hotspot detections counted
    pub hotspots: usize,
    /// Messages rendered for delivery
    pub messages_rendered: usize,
    /// Whether delivery was attempted and succeeded
    pub delivered: bool,
    /// Total cycle time
    pub cycle_time: std::time::Duration,
}

/// Main command dispatcher
pub async fn run(args: Args) -> Result<()> {
    match args.get_command() {
        Commands::Run(run_args) => run_cycle_command(run_args).await,
        Commands::Regions(regions_args) => run_regions_command(regions_args),
    }
}

/// Execute one monitoring cycle:
/// 1. Set up logging and configuration
/// 2. Build the feed clients from environment credentials
/// 3. Run the cycle and render the report
/// 4. Deliver (or print, for dry runs) and summarize
async fn run_cycle_command(args: RunArgs) -> Result<()> {
    let start_time = Instant::now();

    setup_logging(args.get_log_level(), args.quiet)?;

    info!("Starting Air4Thai monitoring cycle");
    debug!("Command line arguments: {:?}", args);

    args.validate()?;
    let config = args.build_config()?;
    debug!("Effective configuration: {:?}", config.thresholds);

    let feeds = FeedConfig::from_env();
    let air4thai_key = feeds.air4thai_key.clone().ok_or_else(|| {
        Error::configuration("AIR4THAI_KEY is not set; the snapshot feeds require it")
    })?;
    if feeds.tmd_key.is_none() {
        warn!("TMD_3HR_KEY not set; the weather feed will be degraded");
    }
    if feeds.gistda_key.is_none() {
        warn!("GISTDA_API_KEY not set; the hotspot feed will be degraded");
    }

    let monitor = Monitor::new(
        config,
        Air4ThaiClient::new(air4thai_key.clone()),
        Air4ThaiClient::new(air4thai_key),
        TmdWeatherClient::new(feeds.tmd_key.clone().unwrap_or_default()),
        GistdaHotspotClient::new(feeds.gistda_key.clone().unwrap_or_default()),
    );

    let report = monitor.run_cycle(bangkok_now()).await?;
    let messages = report.render_messages();
    info!("Report assembled: {} message(s)", messages.len());

    let mut stats = CycleStats {
        stations: report.station_total,
        outdated: report.outdated.len(),
        qa_flagged: report.findings.len(),
        hotspots: report.hotspot_total,
        messages_rendered: messages.len(),
        delivered: false,
        cycle_time: std::time::Duration::default(),
    };

    if args.dry_run || !feeds.can_deliver() {
        if !args.dry_run {
            warn!("Telegram credentials not configured; printing report instead");
        }
        for message in &messages {
            println!("{}\n", message);
        }
    } else {
        let sink = TelegramSink::new(
            feeds.telegram_token.clone().unwrap_or_default(),
            feeds.telegram_chat_ids.clone(),
        );
        match sink.deliver(&messages).await {
            Ok(()) => {
                stats.delivered = true;
                info!("Report delivered to {} chat(s)", feeds.telegram_chat_ids.len());
            }
            // The cycle itself succeeded; a delivery failure is reported
            // in the summary, not propagated.
            Err(e) => error!("Report delivery failed: {}", e),
        }
    }

    stats.cycle_time = start_time.elapsed();
    generate_cycle_summary(&args, &report, &stats)
}

/// Show the effective region table
fn run_regions_command(args: RegionsArgs) -> Result<()> {
    setup_logging(args.get_log_level(), false)?;
    args.validate()?;

    let config = match &args.config_file {
        Some(path) => MonitorConfig::from_toml_file(path)?,
        None => MonitorConfig::default(),
    };

    match args.output_format {
        OutputFormat::Human => {
            println!("\n{}", "Administrative regions".bold());
            for region in config.regions.iter() {
                println!(
                    "\n{} ({})",
                    region.name.bright_white().bold(),
                    region.owner
                );
                println!("   {}", region.provinces.join(", "));
            }
            println!();
        }
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&config.regions)
                    .map_err(|e| Error::data_validation(format!("JSON encoding failed: {}", e)))?
            );
        }
    }
    Ok(())
}

/// Set up structured logging based on CLI arguments
fn setup_logging(log_level: &str, quiet: bool) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    // Create filter
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("air4thai_monitor={}", log_level)));

    // Set up subscriber based on output format preference
    if quiet {
        // Minimal logging for quiet mode
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .init();
    } else {
        // Standard logging with timestamps
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_timer(fmt::time::uptime())
                    .with_writer(std::io::stderr),
            )
            .init();
    }

    debug!("Logging initialized at level: {}", log_level);
    Ok(())
}

/// Generate the final cycle summary
fn generate_cycle_summary(args: &RunArgs, report: &SituationReport, stats: &CycleStats) -> Result<()> {
    match args.output_format {
        OutputFormat::Human => generate_human_summary(report, stats),
        OutputFormat::Json => generate_json_summary(report, stats),
    }
}

/// Generate human-readable summary
fn generate_human_summary(report: &SituationReport, stats: &CycleStats) -> Result<()> {
    println!("\n{}", "Monitoring cycle complete".bright_green().bold());
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("📊 Cycle Summary:");
    println!("   • Stations monitored: {}", stats.stations);
    println!("   • Outdated stations: {}", stats.outdated);
    println!("   • QA-flagged stations: {}", stats.qa_flagged);
    println!("   • Hotspot detections: {}", stats.hotspots);
    println!("   • Messages rendered: {}", stats.messages_rendered);
    println!(
        "   • Delivery: {}",
        if stats.delivered { "sent" } else { "skipped" }
    );
    println!("   • Cycle time: {:.2?}", stats.cycle_time);

    let failures = report.feeds.failures();
    if !failures.is_empty() {
        println!("\n{}", "⚠️  Degraded feeds:".yellow().bold());
        for (name, reason) in failures {
            println!("   • {}: {}", name, reason);
        }
    }

    println!();
    Ok(())
}

/// Generate JSON summary for machine consumption
fn generate_json_summary(report: &SituationReport, stats: &CycleStats) -> Result<()> {
    let mut value = report.to_json();
    value["cycle"] = serde_json::json!({
        "messages_rendered": stats.messages_rendered,
        "delivered": stats.delivered,
        "cycle_time_ms": stats.cycle_time.as_millis() as u64,
    });
    println!(
        "{}",
        serde_json::to_string_pretty(&value)
            .map_err(|e| Error::data_validation(format!("JSON encoding failed: {}", e)))?
    );
    Ok(())
}
