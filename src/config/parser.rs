//! Configuration parsing from CLI arguments and environment variables

use crate::{cli::Cli, config::env::EnvManager, error::Result, models::Config};

/// Configuration parser that combines CLI arguments with environment variables
pub struct ConfigParser {
    cli: Cli,
}

impl ConfigParser {
    /// Create a new configuration parser with CLI arguments
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Parse and build the complete configuration
    pub fn parse(&self) -> Result<Config> {
        // Start with default configuration
        let mut config = Config::default();

        // Load from environment file if it exists
        EnvManager::load_env_file(self.cli.debug)?;

        // Merge environment variables into config
        EnvManager::merge_into(&mut config)?;

        // Override with CLI arguments
        self.apply_cli_overrides(&mut config);

        // Validate the final configuration
        config.validate()?;

        Ok(config)
    }

    /// Apply CLI argument overrides to configuration
    fn apply_cli_overrides(&self, config: &mut Config) {
        if !self.cli.targets.is_empty() {
            config.targets = self.cli.targets.clone();
        }

        if let Some(interval) = self.cli.interval {
            config.interval_seconds = interval;
        }

        if let Some(timeout) = self.cli.timeout {
            config.timeout_ms = timeout;
        }

        if let Some(payload) = self.cli.payload_bytes {
            config.payload_bytes = payload;
        }

        if let Some(version) = &self.cli.ip_version {
            // Already validated by Cli::validate
            if let Ok(parsed) = version.parse() {
                config.ip_version = parsed;
            }
        }

        if let Some(window) = self.cli.loss_window {
            config.loss_window = window;
        }

        if let Some(capacity) = self.cli.history_capacity {
            config.history_capacity = capacity;
        }

        if let Some(path) = &self.cli.csv_path {
            config.csv_path = Some(path.clone());
        }

        if let Some(count) = self.cli.count {
            config.round_count = Some(count);
        }

        if let Some(duration) = self.cli.duration {
            config.duration_seconds = Some(duration);
        }

        config.json = self.cli.json;
        config.enable_color = self.cli.use_colors();
        config.verbose = self.cli.verbose;
        config.debug = self.cli.debug;
    }
}

/// Convenience function to load complete configuration from CLI arguments
pub fn load_config(cli: Cli) -> Result<Config> {
    let parser = ConfigParser::new(cli);
    parser.parse()
}

/// Display configuration summary for debug purposes
pub fn display_config_summary(config: &Config) -> String {
    let mut summary = Vec::new();

    summary.push(format!("Targets: {}", config.targets.join(", ")));
    summary.push(format!("Interval: {}s", config.interval_seconds));
    summary.push(format!("Timeout: {}ms", config.timeout_ms));
    summary.push(format!("Payload: {} bytes", config.payload_bytes));
    summary.push(format!("IP version: {}", config.ip_version));
    summary.push(format!("Loss window: {} samples", config.loss_window));
    summary.push(format!("History capacity: {} samples", config.history_capacity));
    if let Some(path) = &config.csv_path {
        summary.push(format!("CSV log: {}", path.display()));
    }
    if let Some(count) = config.round_count {
        summary.push(format!("Round count: {}", count));
    }
    if let Some(duration) = config.duration_seconds {
        summary.push(format!("Duration: {}s", duration));
    }
    summary.push(format!("JSON output: {}", config.json));
    summary.push(format!("Color output: {}", config.enable_color));
    summary.push(format!("Verbose: {}", config.verbose));
    summary.push(format!("Debug: {}", config.debug));

    summary.join("\n")
}
