//! Configuration validation utilities and rules

use crate::{
    error::Result,
    models::Config,
};
use std::net::IpAddr;

/// Configuration validator with advisory checks beyond `Config::validate`
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate configuration with comprehensive checks
    pub fn validate_comprehensive(config: &Config) -> Result<Vec<ValidationWarning>> {
        let mut warnings = Vec::new();

        // Basic validation (already done in Config::validate)
        config.validate()?;

        warnings.extend(Self::validate_targets(&config.targets));
        warnings.extend(Self::validate_cadence(config));
        warnings.extend(Self::validate_metrics_settings(config));

        Ok(warnings)
    }

    /// Advisory checks on probe targets
    fn validate_targets(targets: &[String]) -> Vec<ValidationWarning> {
        let mut warnings = Vec::new();

        for target in targets {
            if let Ok(ip) = target.parse::<IpAddr>() {
                let is_loopback = match ip {
                    IpAddr::V4(ipv4) => ipv4.is_loopback(),
                    IpAddr::V6(ipv6) => ipv6.is_loopback(),
                };
                if is_loopback {
                    warnings.push(ValidationWarning::new(
                        ValidationLevel::Info,
                        format!("Target {} is a loopback address (localhost)", ip),
                    ));
                }

                let is_private = match ip {
                    IpAddr::V4(ipv4) => ipv4.is_private(),
                    IpAddr::V6(_) => false,
                };
                if is_private {
                    warnings.push(ValidationWarning::new(
                        ValidationLevel::Info,
                        format!("Target {} is in a private IP range, ensure it's reachable", ip),
                    ));
                }
            }
        }

        let mut seen = std::collections::HashSet::new();
        for target in targets {
            if !seen.insert(target) {
                warnings.push(ValidationWarning::new(
                    ValidationLevel::Warning,
                    format!("Target '{}' is listed more than once", target),
                ));
            }
        }

        warnings
    }

    /// Advisory checks on the probe cadence
    fn validate_cadence(config: &Config) -> Vec<ValidationWarning> {
        let mut warnings = Vec::new();

        // A timeout longer than the interval means probes from adjacent
        // rounds can be in flight for the same target at once.
        if config.timeout_ms as f64 / 1000.0 > config.interval_seconds {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Warning,
                format!(
                    "Timeout {}ms exceeds the {}s round interval; probes to a slow target will overlap",
                    config.timeout_ms, config.interval_seconds
                ),
            ));
        }

        if config.interval_seconds < 0.5 && config.targets.len() > 10 {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Warning,
                format!(
                    "Probing {} targets every {}s spawns {} processes per second",
                    config.targets.len(),
                    config.interval_seconds,
                    (config.targets.len() as f64 / config.interval_seconds).round() as u64
                ),
            ));
        }

        if let Some(duration) = config.duration_seconds {
            if duration < config.interval_seconds {
                warnings.push(ValidationWarning::new(
                    ValidationLevel::Warning,
                    format!(
                        "Duration {}s is shorter than the {}s round interval; only one round will run",
                        duration, config.interval_seconds
                    ),
                ));
            }
        }

        warnings
    }

    /// Advisory checks on metrics settings
    fn validate_metrics_settings(config: &Config) -> Vec<ValidationWarning> {
        let mut warnings = Vec::new();

        if config.loss_window > config.history_capacity {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Warning,
                format!(
                    "Loss window of {} samples exceeds the history capacity of {}; the window is effectively {}",
                    config.loss_window, config.history_capacity, config.history_capacity
                ),
            ));
        }

        // 1472 is the largest payload that fits a standard 1500-byte MTU
        // with IPv4 and ICMP headers.
        if config.payload_bytes > 1472 {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Info,
                format!(
                    "Payload of {} bytes will fragment on standard-MTU links",
                    config.payload_bytes
                ),
            ));
        }

        warnings
    }
}

/// Validation warning levels
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationLevel {
    Info,
    Warning,
    Error,
}

impl ValidationLevel {
    /// Get display string for level
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "INFO",
            Self::Warning => "WARNING",
            Self::Error => "ERROR",
        }
    }
}

/// Configuration validation warning
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    pub level: ValidationLevel,
    pub message: String,
}

impl ValidationWarning {
    /// Create a new validation warning
    pub fn new(level: ValidationLevel, message: String) -> Self {
        Self { level, message }
    }

    /// Format warning for display
    pub fn format(&self) -> String {
        format!("[{}] {}", self.level.as_str(), self.message)
    }
}

/// Convenience function for comprehensive configuration validation
pub fn validate_config(config: &Config) -> Result<Vec<ValidationWarning>> {
    ConfigValidator::validate_comprehensive(config)
}
