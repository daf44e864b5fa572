//! Structured logging for the multi-ping monitor
//!
//! Provides leveled, structured logging with console and JSON output
//! formats, session/correlation IDs, and a domain logger for probe
//! lifecycle events. Event lines and metric records are product output and go
//! through the sinks; this logger carries diagnostics only.

use crate::error::AppError;
use crate::models::{Config, MetricRecord};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io::{self, Write};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Log level enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LogLevel {
    /// Trace level - most detailed
    Trace = 0,
    /// Debug level - detailed information for debugging
    Debug = 1,
    /// Info level - general application information
    Info = 2,
    /// Warning level - potentially harmful situations
    Warn = 3,
    /// Error level - error events but application can continue
    Error = 4,
}

impl LogLevel {
    /// Get log level name as string
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "TRACE",
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
        }
    }

    /// Get ANSI color code for console output
    pub fn color_code(&self) -> &'static str {
        match self {
            LogLevel::Trace => "\x1b[37m", // White
            LogLevel::Debug => "\x1b[36m", // Cyan
            LogLevel::Info => "\x1b[32m",  // Green
            LogLevel::Warn => "\x1b[33m",  // Yellow
            LogLevel::Error => "\x1b[31m", // Red
        }
    }

    /// Reset ANSI color code
    pub fn reset_code() -> &'static str {
        "\x1b[0m"
    }
}

impl std::str::FromStr for LogLevel {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, AppError> {
        match s.to_uppercase().as_str() {
            "TRACE" => Ok(LogLevel::Trace),
            "DEBUG" => Ok(LogLevel::Debug),
            "INFO" => Ok(LogLevel::Info),
            "WARN" | "WARNING" => Ok(LogLevel::Warn),
            "ERROR" => Ok(LogLevel::Error),
            _ => Err(AppError::parse(format!("Invalid log level: {}", s))),
        }
    }
}

/// Log entry structure for structured logging
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    /// Timestamp when log entry was created
    pub timestamp: DateTime<Utc>,
    /// Log level
    pub level: LogLevel,
    /// Log message
    pub message: String,
    /// Logger name/component
    pub logger: String,
    /// Correlation ID for tracking related events
    pub correlation_id: Option<String>,
    /// Additional structured fields
    pub fields: HashMap<String, serde_json::Value>,
}

/// Logger implementation with multiple output formats
pub struct Logger {
    /// Minimum log level to output
    min_level: LogLevel,
    /// Whether to use colored output
    use_color: bool,
    /// Output format
    format: LogFormat,
    /// Logger name
    name: String,
    /// Shared context storage
    context: Arc<RwLock<LogContext>>,
}

/// Log output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable console format
    Console,
    /// JSON format for structured logging
    Json,
}

/// Shared logging context for correlation and session tracking
#[derive(Debug, Default)]
struct LogContext {
    /// Global correlation ID for the session
    session_id: Option<String>,
}

impl Logger {
    /// Create a new logger
    pub fn new(name: String) -> Self {
        Self {
            min_level: LogLevel::Warn,
            use_color: true,
            format: LogFormat::Console,
            name,
            context: Arc::new(RwLock::new(LogContext::default())),
        }
    }

    /// Create a logger with verbosity and format derived from configuration.
    ///
    /// JSON-mode runs keep stderr machine-readable as well: diagnostics come
    /// out as JSON entries.
    pub fn with_config(name: String, config: &Config) -> Self {
        let min_level = if config.debug {
            LogLevel::Debug
        } else if config.verbose {
            LogLevel::Info
        } else {
            LogLevel::Warn
        };

        Self {
            min_level,
            use_color: config.enable_color,
            format: if config.json {
                LogFormat::Json
            } else {
                LogFormat::Console
            },
            name,
            context: Arc::new(RwLock::new(LogContext::default())),
        }
    }

    /// Set session correlation ID
    pub async fn set_session_id(&self, session_id: String) {
        let mut context = self.context.write().await;
        context.session_id = Some(session_id);
    }

    /// Create a log entry builder
    pub fn log(&self, level: LogLevel, message: &str) -> LogEntryBuilder {
        LogEntryBuilder::new(self, level, message.to_string())
    }

    /// Convenience methods for different log levels
    pub fn trace(&self, message: &str) -> LogEntryBuilder {
        self.log(LogLevel::Trace, message)
    }

    pub fn debug(&self, message: &str) -> LogEntryBuilder {
        self.log(LogLevel::Debug, message)
    }

    pub fn info(&self, message: &str) -> LogEntryBuilder {
        self.log(LogLevel::Info, message)
    }

    pub fn warn(&self, message: &str) -> LogEntryBuilder {
        self.log(LogLevel::Warn, message)
    }

    pub fn error(&self, message: &str) -> LogEntryBuilder {
        self.log(LogLevel::Error, message)
    }

    /// Check if a log level would be output
    pub fn would_log(&self, level: LogLevel) -> bool {
        level >= self.min_level
    }

    /// Write log entry to output
    async fn write_entry(&self, mut entry: LogEntry) {
        if entry.level < self.min_level {
            return;
        }

        let context = self.context.read().await;
        if let Some(session_id) = &context.session_id {
            entry.fields.insert(
                "session_id".to_string(),
                serde_json::Value::String(session_id.clone()),
            );
        }
        drop(context);

        let output = match self.format {
            LogFormat::Console => self.format_console(&entry),
            LogFormat::Json => self.format_json(&entry),
        };

        // Diagnostics always go to stderr so they never interleave with
        // metric output on stdout.
        let _ = writeln!(io::stderr(), "{}", output);
    }

    /// Format log entry for console output
    fn format_console(&self, entry: &LogEntry) -> String {
        let timestamp = entry.timestamp.format("%Y-%m-%d %H:%M:%S%.3f");
        let level_str = entry.level.as_str();

        let formatted_level = if self.use_color {
            format!(
                "{}{:>5}{}",
                entry.level.color_code(),
                level_str,
                LogLevel::reset_code()
            )
        } else {
            format!("{:>5}", level_str)
        };

        let mut output = format!(
            "{} {} [{}] {}",
            timestamp, formatted_level, entry.logger, entry.message
        );

        if let Some(correlation_id) = &entry.correlation_id {
            output.push_str(&format!(" [{}]", &correlation_id[..8.min(correlation_id.len())]));
        }

        if !entry.fields.is_empty() {
            let fields_str: Vec<String> = entry
                .fields
                .iter()
                .map(|(k, v)| format!("{}={}", k, v))
                .collect();
            output.push_str(&format!(" {{{}}}", fields_str.join(", ")));
        }

        output
    }

    /// Format log entry as JSON
    fn format_json(&self, entry: &LogEntry) -> String {
        serde_json::to_string(entry).unwrap_or_else(|_| {
            format!(
                "{{\"error\": \"Failed to serialize log entry\", \"message\": \"{}\"}}",
                entry.message
            )
        })
    }
}

/// Builder pattern for creating log entries
pub struct LogEntryBuilder<'a> {
    logger: &'a Logger,
    entry: LogEntry,
}

impl<'a> LogEntryBuilder<'a> {
    fn new(logger: &'a Logger, level: LogLevel, message: String) -> Self {
        Self {
            logger,
            entry: LogEntry {
                timestamp: Utc::now(),
                level,
                message,
                logger: logger.name.clone(),
                correlation_id: None,
                fields: HashMap::new(),
            },
        }
    }

    /// Add a correlation ID
    pub fn correlation_id(mut self, id: &str) -> Self {
        self.entry.correlation_id = Some(id.to_string());
        self
    }

    /// Add a structured field
    pub fn field<T: Serialize>(mut self, key: &str, value: T) -> Self {
        if let Ok(json_value) = serde_json::to_value(value) {
            self.entry.fields.insert(key.to_string(), json_value);
        }
        self
    }

    /// Add the derived metrics of a sample
    pub fn sample(self, record: &MetricRecord) -> Self {
        self.field("target", &record.target)
            .field("rtt_ms", record.rtt_ms)
            .field("sent", record.sent)
            .field("received", record.received)
            .field("window_loss_pct", record.window_loss_pct)
            .field("jitter_ms", record.jitter_ms)
    }

    /// Add error information
    pub fn error_info(self, error: &AppError) -> Self {
        self.field("error_category", error.category())
            .field("error_recoverable", error.is_recoverable())
            .field("error_exit_code", error.exit_code())
    }

    /// Finalize and write the log entry
    pub async fn log(self) {
        self.logger.write_entry(self.entry).await;
    }
}

/// Specialized logger for probe lifecycle events
pub struct ProbeLogger {
    logger: Logger,
}

impl ProbeLogger {
    /// Create a new probe logger
    pub fn new(config: &Config) -> Self {
        Self {
            logger: Logger::with_config("PROBE".to_string(), config),
        }
    }

    /// Log a run start with its parameters
    pub async fn log_run_started(&self, config: &Config) {
        self.logger
            .info(&format!(
                "Probing {} target(s) every {:.1}s",
                config.targets.len(),
                config.interval_seconds
            ))
            .field("targets", &config.targets)
            .field("interval_s", config.interval_seconds)
            .field("timeout_ms", config.timeout_ms)
            .field("payload_bytes", config.payload_bytes)
            .field("ip_version", config.ip_version.name())
            .log()
            .await;
    }

    /// Log one processed probe result with its raw diagnostic text.
    ///
    /// Replies log at debug, misses at info; the raw probe output is attached
    /// only at debug level since it can be multi-line.
    pub async fn log_result(&self, record: &MetricRecord, raw_output: &str) {
        let (level, message) = match record.rtt_ms {
            Some(rtt) => (
                LogLevel::Debug,
                format!("{} replied in {:.2}ms", record.target, rtt),
            ),
            None => (LogLevel::Info, format!("{} missed a reply", record.target)),
        };

        let mut builder = self.logger.log(level, &message).sample(record);
        if self.logger.would_log(LogLevel::Debug) && !raw_output.is_empty() {
            builder = builder.field("raw_output", raw_output);
        }
        builder.log().await;
    }

    /// Log a run stop with final counters
    pub async fn log_run_stopped(&self, rounds: u64, records: u64) {
        self.logger
            .info(&format!(
                "Run stopped after {} round(s), {} record(s)",
                rounds, records
            ))
            .field("rounds", rounds)
            .field("records", records)
            .log()
            .await;
    }
}

/// Global logger factory and management
pub struct LoggerFactory {
    config: Config,
    session_id: String,
}

impl LoggerFactory {
    /// Create a new logger factory
    pub fn new(config: Config) -> Self {
        Self {
            config,
            session_id: Uuid::new_v4().to_string(),
        }
    }

    /// Create a logger with a specific name
    pub async fn create_logger(&self, name: &str) -> Logger {
        let logger = Logger::with_config(name.to_string(), &self.config);
        logger.set_session_id(self.session_id.clone()).await;
        logger
    }

    /// Create a probe logger
    pub fn create_probe_logger(&self) -> ProbeLogger {
        ProbeLogger::new(&self.config)
    }

    /// Get session ID
    pub fn session_id(&self) -> &str {
        &self.session_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_log_level_parsing() {
        assert_eq!(LogLevel::from_str("DEBUG").unwrap(), LogLevel::Debug);
        assert_eq!(LogLevel::from_str("info").unwrap(), LogLevel::Info);
        assert_eq!(LogLevel::from_str("warning").unwrap(), LogLevel::Warn);
        assert!(LogLevel::from_str("invalid").is_err());
    }

    #[test]
    fn test_log_level_ordering() {
        assert!(LogLevel::Trace < LogLevel::Debug);
        assert!(LogLevel::Debug < LogLevel::Info);
        assert!(LogLevel::Info < LogLevel::Warn);
        assert!(LogLevel::Warn < LogLevel::Error);
    }

    #[test]
    fn test_logger_verbosity_from_config() {
        let config = Config {
            debug: true,
            enable_color: false,
            ..Default::default()
        };
        let logger = Logger::with_config("TEST".to_string(), &config);
        assert!(logger.would_log(LogLevel::Debug));
        assert!(!logger.use_color);

        let quiet = Logger::with_config("TEST".to_string(), &Config::default());
        assert!(!quiet.would_log(LogLevel::Info));
        assert!(quiet.would_log(LogLevel::Warn));
    }

    #[test]
    fn test_json_mode_selects_json_diagnostics() {
        let config = Config {
            json: true,
            ..Default::default()
        };
        let logger = Logger::with_config("TEST".to_string(), &config);
        assert_eq!(logger.format, LogFormat::Json);

        let plain = Logger::with_config("TEST".to_string(), &Config::default());
        assert_eq!(plain.format, LogFormat::Console);
    }

    #[tokio::test]
    async fn test_session_id_management() {
        let logger = Logger::new("TEST".to_string());
        logger.set_session_id("test-session".to_string()).await;

        let context = logger.context.read().await;
        assert_eq!(context.session_id.as_ref().unwrap(), "test-session");
    }

    #[tokio::test]
    async fn test_log_entry_builder() {
        let logger = Logger::new("TEST".to_string());
        logger
            .info("test message")
            .correlation_id("test-id")
            .field("test_field", "test_value")
            .log()
            .await;
    }

    #[test]
    fn test_log_formats() {
        let entry = LogEntry {
            timestamp: Utc::now(),
            level: LogLevel::Info,
            message: "Test message".to_string(),
            logger: "TEST".to_string(),
            correlation_id: Some("test-correlation".to_string()),
            fields: HashMap::new(),
        };

        let logger = Logger::new("TEST".to_string());

        let console_output = logger.format_console(&entry);
        assert!(console_output.contains("INFO"));
        assert!(console_output.contains("Test message"));

        let json_output = logger.format_json(&entry);
        assert!(json_output.starts_with('{'));
        assert!(json_output.ends_with('}'));
    }

    #[test]
    fn test_error_info_fields() {
        let logger = Logger::new("TEST".to_string());
        let err = AppError::scheduler("already running");
        let builder = logger.error("start failed").error_info(&err);

        assert_eq!(
            builder.entry.fields.get("error_category"),
            Some(&serde_json::Value::String("SCHEDULER".to_string()))
        );
        assert!(builder.entry.fields.contains_key("error_exit_code"));
        assert!(builder.entry.fields.contains_key("error_recoverable"));
    }

    #[tokio::test]
    async fn test_probe_logger_result() {
        let config = Config {
            verbose: true,
            ..Default::default()
        };
        let probe_logger = ProbeLogger::new(&config);
        let record = MetricRecord {
            target: "8.8.8.8".to_string(),
            timestamp: 100.0,
            rtt_ms: None,
            sent: 1,
            received: 0,
            window_loss_pct: 100.0,
            jitter_ms: 0.0,
        };
        probe_logger.log_result(&record, "Request timed out.").await;
    }

    #[tokio::test]
    async fn test_logger_factory() {
        let factory = LoggerFactory::new(Config::default());
        let logger = factory.create_logger("TEST").await;
        assert_eq!(logger.name, "TEST");
        assert!(!factory.session_id().is_empty());
    }
}
