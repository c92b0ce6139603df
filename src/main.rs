use air4thai_monitor::cli::{args::Args, commands};
use clap::Parser;
use std::process;

fn main() {
    // Load credentials from a local .env file when present
    dotenv::dotenv().ok();

    // Parse command line arguments
    let args = Args::parse();

    // If no subcommand was provided, show help and available commands
    if args.command.is_none() {
        show_help_and_commands();
        process::exit(0);
    }

    // Create async runtime and run the main command logic with signal handling
    let runtime = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
        eprintln!("Failed to create async runtime: {}", e);
        process::exit(1);
    });

    let result = runtime.block_on(async {
        // Set up graceful shutdown handling
        let shutdown_signal = async {
            tokio::signal::ctrl_c()
                .await
                .expect("Failed to install CTRL+C signal handler");
        };

        // Run the main command, aborting the cycle on Ctrl+C
        tokio::select! {
            result = commands::run(args) => {
                result
            }
            _ = shutdown_signal => {
                eprintln!("\nReceived CTRL+C, shutting down...");
                Err(air4thai_monitor::Error::interrupted(
                    "Monitoring cycle interrupted by user".to_string()
                ))
            }
        }
    });

    match result {
        Ok(()) => {
            // Success - the summary has already been reported by the command
            process::exit(0);
        }
        Err(error) => {
            // Error occurred - print to stderr and exit with error code
            eprintln!("Error: {:#}", error);
            process::exit(1);
        }
    }
}

/// Show help information and available commands when no subcommand is provided
fn show_help_and_commands() {
    println!("Air4Thai Monitor - Station Health & Anomaly Detection");
    println!("=====================================================");
    println!();
    println!("Monitor Thailand's air-quality sensor network: staleness detection,");
    println!("48-hour historical QA analysis, and weather/fire risk correlation,");
    println!("delivered as a Telegram situation report.");
    println!();
    println!("USAGE:");
    println!("    air4thai-monitor <COMMAND> [OPTIONS]");
    println!();
    println!("COMMANDS:");
    println!("    run         Run one monitoring cycle (main command)");
    println!("    regions     Inspect the administrative region table");
    println!("    help        Show this help message or help for specific commands");
    println!();
    println!("OPTIONS:");
    println!("    -h, --help       Show help information");
    println!("    -V, --version    Show version information");
    println!();
    println!("EXAMPLES:");
    println!("    # Run a cycle and deliver the report:");
    println!("    air4thai-monitor run");
    println!();
    println!("    # Preview the report without delivering it:");
    println!("    air4thai-monitor run --dry-run");
    println!();
    println!("    # Run with a tighter staleness threshold and JSON summary:");
    println!("    air4thai-monitor run --stale-minutes 60 --output-format json");
    println!();
    println!("    # Show the region table:");
    println!("    air4thai-monitor regions --format json");
    println!();
    println!("For detailed help on any command, use:");
    println!("    air4thai-monitor <COMMAND> --help");
}
