//! Multi-Ping Monitor - Main CLI Application
//!
//! Concurrently probes multiple targets over ICMP and streams latency, loss,
//! and jitter metrics to the console and optional CSV/JSON consumers.

use clap::Parser;
use multi_ping_monitor::{
    app::App,
    cli::Cli,
    config::parser::{display_config_summary, load_config},
    error::{AppError, Result},
    PKG_NAME, VERSION,
};
use std::process;

#[tokio::main]
async fn main() {
    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("Application panic: {}", panic_info);
        process::exit(1);
    }));

    let cli = Cli::parse();

    if let Err(message) = cli.validate() {
        eprintln!("Error: {}", message);
        process::exit(2);
    }

    if let Err(e) = run_application(cli).await {
        eprintln!("Error: {}", e);
        print_error_suggestions(&e);
        process::exit(e.exit_code());
    }
}

/// Main application logic
async fn run_application(cli: Cli) -> Result<()> {
    if cli.debug {
        eprintln!("{} v{}", PKG_NAME, VERSION);
        eprintln!("Built {} for {}", env!("BUILD_TIME"), env!("TARGET_TRIPLE"));
        if let Some(commit) = option_env!("GIT_COMMIT") {
            eprintln!("Commit: {}", commit);
        }
        eprintln!("Debug mode enabled");
        eprintln!();
    }

    let config = load_config(cli)?;

    if config.debug {
        eprintln!("Configuration loaded successfully:");
        for line in display_config_summary(&config).lines() {
            eprintln!("  {}", line);
        }
        eprintln!();
    }

    let app = App::new(config.clone());
    let summary = app.run().await?;

    if config.verbose || config.debug {
        eprintln!();
        eprintln!(
            "Run complete: {} round(s) dispatched, {} record(s) delivered",
            summary.rounds, summary.records
        );
    }

    Ok(())
}

/// Print helpful suggestions for common errors
fn print_error_suggestions(error: &AppError) {
    match error {
        AppError::Config(_) | AppError::Validation(_) => {
            eprintln!();
            eprintln!("Configuration help:");
            eprintln!("  - Pass at least one target: mpm 8.8.8.8 1.1.1.1");
            eprintln!("  - Check your .env file and MPM_* environment variables");
            eprintln!("  - Interval must be at least 0.1s, timeout at least 1ms");
        }
        AppError::Probe(_) => {
            eprintln!();
            eprintln!("Probe troubleshooting:");
            eprintln!("  - Ensure the system ping command is installed and on PATH");
            eprintln!("  - Some systems restrict ICMP; try running with elevated privileges");
            eprintln!("  - Increase the timeout with --timeout");
        }
        AppError::Io(_) => {
            eprintln!();
            eprintln!("I/O troubleshooting:");
            eprintln!("  - Check that the CSV destination directory exists and is writable");
        }
        _ => {}
    }
}
