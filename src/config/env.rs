//! Environment variable handling and .env file management

use crate::error::{AppError, Result};
use crate::models::Config;
use crate::types::IpVersion;
use std::path::Path;

/// Environment variable configuration manager
pub struct EnvManager;

impl EnvManager {
    /// Load .env file if it exists
    pub fn load_env_file(debug: bool) -> Result<()> {
        if Path::new(".env").exists() {
            dotenv::from_filename(".env")
                .map_err(|e| AppError::config(format!("Failed to load .env file: {}", e)))?;

            if debug {
                eprintln!("Loaded configuration from .env file");
            }
        } else if debug {
            eprintln!("No .env file found, using defaults and CLI arguments");
        }

        Ok(())
    }

    /// Merge `MPM_*` environment variables into the configuration
    pub fn merge_into(config: &mut Config) -> Result<()> {
        if let Ok(value) = std::env::var("MPM_TARGETS") {
            Self::validate_env_var("MPM_TARGETS", &value)?;
            config.targets = value
                .split(',')
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(String::from)
                .collect();
        }

        if let Ok(value) = std::env::var("MPM_INTERVAL_SECONDS") {
            Self::validate_env_var("MPM_INTERVAL_SECONDS", &value)?;
            config.interval_seconds = value.parse()?;
        }

        if let Ok(value) = std::env::var("MPM_TIMEOUT_MS") {
            Self::validate_env_var("MPM_TIMEOUT_MS", &value)?;
            config.timeout_ms = value.parse()?;
        }

        if let Ok(value) = std::env::var("MPM_PAYLOAD_BYTES") {
            Self::validate_env_var("MPM_PAYLOAD_BYTES", &value)?;
            config.payload_bytes = value.parse()?;
        }

        if let Ok(value) = std::env::var("MPM_IP_VERSION") {
            config.ip_version = value.parse::<IpVersion>()?;
        }

        if let Ok(value) = std::env::var("MPM_LOSS_WINDOW") {
            Self::validate_env_var("MPM_LOSS_WINDOW", &value)?;
            config.loss_window = value.parse()?;
        }

        if let Ok(value) = std::env::var("MPM_HISTORY_CAPACITY") {
            Self::validate_env_var("MPM_HISTORY_CAPACITY", &value)?;
            config.history_capacity = value.parse()?;
        }

        if let Ok(value) = std::env::var("MPM_CSV_PATH") {
            if !value.trim().is_empty() {
                config.csv_path = Some(value.trim().into());
            }
        }

        if let Ok(value) = std::env::var("MPM_ENABLE_COLOR") {
            Self::validate_env_var("MPM_ENABLE_COLOR", &value)?;
            config.enable_color = value.parse().map_err(|_| {
                AppError::config(format!("Invalid MPM_ENABLE_COLOR value '{}'", value))
            })?;
        }

        Ok(())
    }

    /// Validate environment variable format before parsing
    pub fn validate_env_var(key: &str, value: &str) -> Result<()> {
        match key {
            "MPM_TARGETS" => {
                let targets: Vec<&str> = value
                    .split(',')
                    .map(str::trim)
                    .filter(|t| !t.is_empty())
                    .collect();
                if targets.is_empty() {
                    return Err(AppError::config("MPM_TARGETS must name at least one target"));
                }
                for target in targets {
                    if target.contains(char::is_whitespace) {
                        return Err(AppError::config(format!(
                            "Invalid MPM_TARGETS entry '{}': contains whitespace",
                            target
                        )));
                    }
                }
            }
            "MPM_INTERVAL_SECONDS" => {
                let interval: f64 = value.parse().map_err(|e| {
                    AppError::config(format!("Invalid MPM_INTERVAL_SECONDS value '{}': {}", value, e))
                })?;
                if !interval.is_finite() || interval < crate::defaults::MIN_INTERVAL_SECONDS {
                    return Err(AppError::config(format!(
                        "MPM_INTERVAL_SECONDS must be at least {}, got: {}",
                        crate::defaults::MIN_INTERVAL_SECONDS,
                        value
                    )));
                }
            }
            "MPM_TIMEOUT_MS" => {
                let timeout: u64 = value.parse().map_err(|e| {
                    AppError::config(format!("Invalid MPM_TIMEOUT_MS value '{}': {}", value, e))
                })?;
                if timeout == 0 {
                    return Err(AppError::config("MPM_TIMEOUT_MS must be at least 1"));
                }
            }
            "MPM_PAYLOAD_BYTES" => {
                let payload: u32 = value.parse().map_err(|e| {
                    AppError::config(format!("Invalid MPM_PAYLOAD_BYTES value '{}': {}", value, e))
                })?;
                if payload == 0 || payload > crate::defaults::MAX_PAYLOAD_BYTES {
                    return Err(AppError::config(format!(
                        "MPM_PAYLOAD_BYTES must be between 1 and {}, got: {}",
                        crate::defaults::MAX_PAYLOAD_BYTES,
                        payload
                    )));
                }
            }
            "MPM_LOSS_WINDOW" | "MPM_HISTORY_CAPACITY" => {
                let samples: usize = value.parse().map_err(|e| {
                    AppError::config(format!("Invalid {} value '{}': {}", key, value, e))
                })?;
                if samples == 0 {
                    return Err(AppError::config(format!("{} must be at least 1", key)));
                }
            }
            "MPM_ENABLE_COLOR" => {
                value.parse::<bool>().map_err(|e| {
                    AppError::config(format!("Invalid MPM_ENABLE_COLOR value '{}': {}", value, e))
                })?;
            }
            _ => {
                // Unknown environment variable, ignore
            }
        }

        Ok(())
    }

    /// Get list of all supported environment variables with descriptions
    pub fn get_supported_env_vars() -> Vec<(&'static str, &'static str, &'static str)> {
        vec![
            ("MPM_TARGETS", "Comma-separated probe targets", "8.8.8.8,1.1.1.1"),
            ("MPM_INTERVAL_SECONDS", "Seconds between probe rounds", "1.0"),
            ("MPM_TIMEOUT_MS", "Per-probe timeout in milliseconds", "1000"),
            ("MPM_PAYLOAD_BYTES", "ICMP payload size in bytes", "32"),
            ("MPM_IP_VERSION", "IP protocol version (v4/v6)", "v4"),
            ("MPM_LOSS_WINDOW", "Samples in the windowed loss percentage", "100"),
            ("MPM_HISTORY_CAPACITY", "Per-target sample history capacity", "900"),
            ("MPM_CSV_PATH", "CSV log destination (file or directory)", "./logs"),
            ("MPM_ENABLE_COLOR", "Enable colored output", "true"),
        ]
    }

    /// Display environment variable help
    pub fn display_env_help() -> String {
        let mut help = String::new();
        help.push_str("Supported Environment Variables:\n\n");

        for (var, description, example) in Self::get_supported_env_vars() {
            help.push_str(&format!("  {:<22} {}\n", var, description));
            help.push_str(&format!("  {:<22} Example: {}\n\n", "", example));
        }

        help.push_str("Configuration Priority (highest to lowest):\n");
        help.push_str("  1. Command-line arguments\n");
        help.push_str("  2. Environment variables\n");
        help.push_str("  3. .env file values\n");
        help.push_str("  4. Default values\n");

        help
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Environment variables are process-global; serialize the tests that
    // touch them.
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    fn clear_mpm_vars() {
        for (var, _, _) in EnvManager::get_supported_env_vars() {
            std::env::remove_var(var);
        }
    }

    #[test]
    fn test_validate_env_var() {
        assert!(EnvManager::validate_env_var("MPM_TARGETS", "8.8.8.8,1.1.1.1").is_ok());
        assert!(EnvManager::validate_env_var("MPM_INTERVAL_SECONDS", "0.5").is_ok());
        assert!(EnvManager::validate_env_var("MPM_TIMEOUT_MS", "1000").is_ok());
        assert!(EnvManager::validate_env_var("MPM_PAYLOAD_BYTES", "32").is_ok());
        assert!(EnvManager::validate_env_var("MPM_LOSS_WINDOW", "100").is_ok());
        assert!(EnvManager::validate_env_var("MPM_ENABLE_COLOR", "true").is_ok());

        assert!(EnvManager::validate_env_var("MPM_TARGETS", " , ").is_err());
        assert!(EnvManager::validate_env_var("MPM_TARGETS", "8.8. 8.8").is_err());
        assert!(EnvManager::validate_env_var("MPM_INTERVAL_SECONDS", "0.01").is_err());
        assert!(EnvManager::validate_env_var("MPM_INTERVAL_SECONDS", "abc").is_err());
        assert!(EnvManager::validate_env_var("MPM_TIMEOUT_MS", "0").is_err());
        assert!(EnvManager::validate_env_var("MPM_PAYLOAD_BYTES", "0").is_err());
        assert!(EnvManager::validate_env_var("MPM_PAYLOAD_BYTES", "70000").is_err());
        assert!(EnvManager::validate_env_var("MPM_LOSS_WINDOW", "0").is_err());
        assert!(EnvManager::validate_env_var("MPM_ENABLE_COLOR", "maybe").is_err());
    }

    #[test]
    fn test_unknown_env_var_ignored() {
        assert!(EnvManager::validate_env_var("MPM_UNKNOWN", "whatever").is_ok());
    }

    #[test]
    fn test_merge_into_applies_values() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_mpm_vars();

        std::env::set_var("MPM_TARGETS", "example.com, 8.8.8.8");
        std::env::set_var("MPM_INTERVAL_SECONDS", "2.5");
        std::env::set_var("MPM_TIMEOUT_MS", "250");
        std::env::set_var("MPM_IP_VERSION", "v6");

        let mut config = Config::default();
        EnvManager::merge_into(&mut config).unwrap();

        assert_eq!(config.targets, vec!["example.com", "8.8.8.8"]);
        assert_eq!(config.interval_seconds, 2.5);
        assert_eq!(config.timeout_ms, 250);
        assert_eq!(config.ip_version, IpVersion::V6);

        clear_mpm_vars();
    }

    #[test]
    fn test_merge_into_rejects_bad_values() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_mpm_vars();

        std::env::set_var("MPM_TIMEOUT_MS", "not-a-number");
        let mut config = Config::default();
        assert!(EnvManager::merge_into(&mut config).is_err());

        clear_mpm_vars();
    }

    #[test]
    fn test_display_env_help() {
        let help = EnvManager::display_env_help();
        assert!(help.contains("Supported Environment Variables:"));
        assert!(help.contains("MPM_TARGETS"));
        assert!(help.contains("Configuration Priority"));
        assert!(help.contains("Command-line arguments"));
    }
}
