//! Command-line interface module

use clap::Parser;

/// Multi-Ping Monitor - concurrent ICMP latency, loss, and jitter monitoring
#[derive(Parser, Debug, Clone)]
#[command(name = "mpm")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Probe targets (hostnames or IP addresses)
    #[arg(value_name = "TARGET")]
    pub targets: Vec<String>,

    /// Seconds between probe rounds
    #[arg(short, long, value_name = "SECONDS")]
    pub interval: Option<f64>,

    /// Per-probe timeout in milliseconds
    #[arg(short, long, value_name = "MS")]
    pub timeout: Option<u64>,

    /// ICMP payload size in bytes
    #[arg(short = 's', long = "size", value_name = "BYTES")]
    pub payload_bytes: Option<u32>,

    /// IP protocol version (v4 or v6)
    #[arg(long = "ip-version", value_name = "VERSION")]
    pub ip_version: Option<String>,

    /// Number of recent samples in the windowed loss percentage
    #[arg(long = "loss-window", value_name = "SAMPLES")]
    pub loss_window: Option<usize>,

    /// Per-target sample history capacity
    #[arg(long = "history-capacity", value_name = "SAMPLES")]
    pub history_capacity: Option<usize>,

    /// Append metric records to a CSV file (or directory for a generated name)
    #[arg(long = "csv", value_name = "PATH")]
    pub csv_path: Option<std::path::PathBuf>,

    /// Stop after this many probe rounds
    #[arg(short = 'c', long, value_name = "ROUNDS")]
    pub count: Option<u64>,

    /// Stop after this many seconds
    #[arg(short = 'd', long, value_name = "SECONDS")]
    pub duration: Option<f64>,

    /// Emit metric records as JSON lines instead of event lines
    #[arg(long)]
    pub json: bool,

    /// Force colored output
    #[arg(long)]
    pub color: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Enable verbose output
    #[arg(long)]
    pub verbose: bool,

    /// Enable debug output
    #[arg(long)]
    pub debug: bool,
}

impl Cli {
    /// Validate CLI arguments for conflicts and requirements
    pub fn validate(&self) -> Result<(), String> {
        if self.color && self.no_color {
            return Err("Cannot specify both --color and --no-color".to_string());
        }

        // An empty target list is not rejected here: targets may come from
        // MPM_TARGETS or a .env file, which are merged after CLI parsing.
        // The final Config::validate rejects a truly empty set.

        if let Some(interval) = self.interval {
            if !interval.is_finite() || interval < crate::defaults::MIN_INTERVAL_SECONDS {
                return Err(format!(
                    "Interval must be at least {}s",
                    crate::defaults::MIN_INTERVAL_SECONDS
                ));
            }
        }

        if self.timeout == Some(0) {
            return Err("Timeout must be greater than 0".to_string());
        }

        if self.count == Some(0) {
            return Err("Round count must be greater than 0".to_string());
        }

        if let Some(version) = &self.ip_version {
            if version.parse::<crate::types::IpVersion>().is_err() {
                return Err(format!("Invalid IP version '{}' (use v4 or v6)", version));
            }
        }

        Ok(())
    }

    /// Check if colors should be enabled
    pub fn use_colors(&self) -> bool {
        if self.color {
            true
        } else if self.no_color || self.json {
            false
        } else {
            supports_color()
        }
    }

}

/// Check if the terminal supports color output
fn supports_color() -> bool {
    if let Ok(term) = std::env::var("TERM") {
        if term == "dumb" {
            return false;
        }
    }

    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }

    if std::env::var("FORCE_COLOR").is_ok() {
        return true;
    }

    #[cfg(target_os = "windows")]
    {
        if std::env::var("ANSICON").is_ok() || std::env::var("ConEmuANSI").is_ok() {
            return true;
        }
    }

    #[cfg(unix)]
    {
        true
    }
    #[cfg(not(unix))]
    {
        false
    }
}
