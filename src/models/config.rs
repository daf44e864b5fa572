//! Configuration data model and validation

use crate::defaults;
use crate::types::{AppError, IpVersion, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Probe targets (hostnames or IP addresses)
    #[serde(default)]
    pub targets: Vec<String>,

    /// Interval between probe rounds in seconds
    #[serde(default = "default_interval_seconds")]
    pub interval_seconds: f64,

    /// Per-probe timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// ICMP payload size in bytes
    #[serde(default = "default_payload_bytes")]
    pub payload_bytes: u32,

    /// IP protocol version for probes
    #[serde(default)]
    pub ip_version: IpVersion,

    /// Number of most recent samples considered for windowed loss
    #[serde(default = "default_loss_window")]
    pub loss_window: usize,

    /// Per-target history ring capacity
    #[serde(default = "default_history_capacity")]
    pub history_capacity: usize,

    /// Optional CSV log destination
    #[serde(default)]
    pub csv_path: Option<PathBuf>,

    /// Stop after this many probe rounds (run until stopped if absent)
    #[serde(default)]
    pub round_count: Option<u64>,

    /// Stop after this many seconds (run until stopped if absent)
    #[serde(default)]
    pub duration_seconds: Option<f64>,

    /// Emit metric records as JSON lines instead of event lines
    #[serde(default)]
    pub json: bool,

    /// Enable colored terminal output
    #[serde(default = "default_enable_color")]
    pub enable_color: bool,

    /// Enable verbose output
    #[serde(default)]
    pub verbose: bool,

    /// Enable debug output
    #[serde(default)]
    pub debug: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            targets: Vec::new(),
            interval_seconds: default_interval_seconds(),
            timeout_ms: default_timeout_ms(),
            payload_bytes: default_payload_bytes(),
            ip_version: IpVersion::default(),
            loss_window: default_loss_window(),
            history_capacity: default_history_capacity(),
            csv_path: None,
            round_count: None,
            duration_seconds: None,
            json: false,
            enable_color: default_enable_color(),
            verbose: false,
            debug: false,
        }
    }
}

impl Config {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the round interval as a Duration
    pub fn interval(&self) -> Duration {
        Duration::from_secs_f64(self.interval_seconds)
    }

    /// Get the per-probe timeout as a Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Loss window clamped to at least one sample
    pub fn effective_loss_window(&self) -> usize {
        self.loss_window.max(1)
    }

    /// Validate the configuration and return any errors
    pub fn validate(&self) -> Result<()> {
        if self.targets.is_empty() {
            return Err(AppError::validation(
                "At least one probe target is required",
            ));
        }

        for target in &self.targets {
            if target.trim().is_empty() {
                return Err(AppError::validation("Probe target cannot be empty"));
            }

            if target.contains(char::is_whitespace) {
                return Err(AppError::validation(format!(
                    "Probe target '{}' contains whitespace",
                    target
                )));
            }
        }

        if self.interval_seconds < defaults::MIN_INTERVAL_SECONDS {
            return Err(AppError::validation(format!(
                "Interval must be at least {}s, got {}s",
                defaults::MIN_INTERVAL_SECONDS,
                self.interval_seconds
            )));
        }

        if !self.interval_seconds.is_finite() {
            return Err(AppError::validation("Interval must be a finite number"));
        }

        if self.timeout_ms == 0 {
            return Err(AppError::validation("Timeout must be at least 1ms"));
        }

        if self.payload_bytes == 0 {
            return Err(AppError::validation("Payload size must be at least 1 byte"));
        }

        if self.payload_bytes > defaults::MAX_PAYLOAD_BYTES {
            return Err(AppError::validation(format!(
                "Payload size cannot exceed {} bytes",
                defaults::MAX_PAYLOAD_BYTES
            )));
        }

        if self.loss_window == 0 {
            return Err(AppError::validation(
                "Loss window must cover at least 1 sample",
            ));
        }

        if self.history_capacity == 0 {
            return Err(AppError::validation(
                "History capacity must be at least 1 sample",
            ));
        }

        if let Some(count) = self.round_count {
            if count == 0 {
                return Err(AppError::validation("Round count must be at least 1"));
            }
        }

        if let Some(duration) = self.duration_seconds {
            if !duration.is_finite() || duration <= 0.0 {
                return Err(AppError::validation(
                    "Run duration must be a positive number of seconds",
                ));
            }
        }

        Ok(())
    }
}

fn default_interval_seconds() -> f64 {
    defaults::DEFAULT_INTERVAL_SECONDS
}

fn default_timeout_ms() -> u64 {
    defaults::DEFAULT_TIMEOUT_MS
}

fn default_payload_bytes() -> u32 {
    defaults::DEFAULT_PAYLOAD_BYTES
}

fn default_loss_window() -> usize {
    defaults::DEFAULT_LOSS_WINDOW
}

fn default_history_capacity() -> usize {
    defaults::DEFAULT_HISTORY_CAPACITY
}

fn default_enable_color() -> bool {
    defaults::DEFAULT_ENABLE_COLOR
}
