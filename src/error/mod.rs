//! Error handling for the multi-ping monitor

use thiserror::Error;

/// Custom error types for the multi-ping monitor
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Validation errors (bad start parameters)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Probe execution errors (launch failures, broken pipes)
    #[error("Probe error: {0}")]
    Probe(String),

    /// Parsing errors (probe output, numeric fields)
    #[error("Parsing error: {0}")]
    Parse(String),

    /// Scheduler lifecycle errors (invalid state transitions)
    #[error("Scheduler error: {0}")]
    Scheduler(String),

    /// I/O errors (CSV log, file operations)
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config(message.into())
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation(message.into())
    }

    /// Create a new probe error
    pub fn probe<S: Into<String>>(message: S) -> Self {
        Self::Probe(message.into())
    }

    /// Create a new parsing error
    pub fn parse<S: Into<String>>(message: S) -> Self {
        Self::Parse(message.into())
    }

    /// Create a new scheduler error
    pub fn scheduler<S: Into<String>>(message: S) -> Self {
        Self::Scheduler(message.into())
    }

    /// Create a new I/O error
    pub fn io<S: Into<String>>(message: S) -> Self {
        Self::Io(message.into())
    }

    /// Create a new internal error
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal(message.into())
    }

    /// Get the error category name for logging and diagnostics
    pub fn category(&self) -> &'static str {
        match self {
            AppError::Config(_) => "CONFIG",
            AppError::Validation(_) => "VALIDATION",
            AppError::Probe(_) => "PROBE",
            AppError::Parse(_) => "PARSE",
            AppError::Scheduler(_) => "SCHEDULER",
            AppError::Io(_) => "IO",
            AppError::Internal(_) => "INTERNAL",
        }
    }

    /// Whether the run can continue after this error.
    ///
    /// Probe, parse, and I/O failures resolve to degraded samples or skipped
    /// log rows; configuration and validation failures abort before the run
    /// begins.
    pub fn is_recoverable(&self) -> bool {
        match self {
            AppError::Config(_) | AppError::Validation(_) => false,
            AppError::Probe(_) | AppError::Parse(_) | AppError::Io(_) => true,
            AppError::Scheduler(_) => false,
            AppError::Internal(_) => false,
        }
    }

    /// Process exit code for this error category
    pub fn exit_code(&self) -> i32 {
        match self {
            AppError::Config(_) => 2,
            AppError::Validation(_) => 2,
            AppError::Probe(_) => 3,
            AppError::Parse(_) => 4,
            AppError::Scheduler(_) => 5,
            AppError::Io(_) => 6,
            AppError::Internal(_) => 1,
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Io(err.to_string())
    }
}

impl From<std::num::ParseFloatError> for AppError {
    fn from(err: std::num::ParseFloatError) -> Self {
        AppError::Parse(err.to_string())
    }
}

impl From<std::num::ParseIntError> for AppError {
    fn from(err: std::num::ParseIntError) -> Self {
        AppError::Parse(err.to_string())
    }
}

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;
