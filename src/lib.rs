//! Multi-Ping Monitor
//!
//! A concurrent ICMP monitoring engine that probes multiple targets on a
//! fixed cadence, derives per-target latency, windowed packet loss, and EWMA
//! jitter, and streams one metric record per probe to console, CSV, and JSON
//! consumers.

pub mod app;
pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod logging;
pub mod models;
pub mod output;
pub mod parser;
pub mod probe;
pub mod scheduler;
pub mod stream;
pub mod types;

// Re-export commonly used types
pub use engine::{MetricsEngine, TargetState, JITTER_SMOOTHING};
pub use error::{AppError, Result};
pub use models::{Config, MetricRecord, Sample};
pub use output::{ConsoleSink, CsvSink, JsonSink, MetricSink, SinkSet};
pub use parser::{LatencyParser, ParserConfig};
pub use probe::{ProbeOutput, ProbeRunner, ProbeSpec, SystemPingRunner};
pub use scheduler::{ScheduleParams, Scheduler, SchedulerState};
pub use stream::{result_stream, ProbeResult, ResultReceiver, ResultSender};
pub use types::IpVersion;

/// Application version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const PKG_NAME: &str = env!("CARGO_PKG_NAME");
pub const PKG_DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Default configuration values
pub mod defaults {
    /// Default seconds between probe rounds
    pub const DEFAULT_INTERVAL_SECONDS: f64 = 1.0;
    /// Floor for the round interval
    pub const MIN_INTERVAL_SECONDS: f64 = 0.1;
    /// Default per-probe timeout in milliseconds
    pub const DEFAULT_TIMEOUT_MS: u64 = 1000;
    /// Default ICMP payload size in bytes
    pub const DEFAULT_PAYLOAD_BYTES: u32 = 32;
    /// Largest accepted ICMP payload size
    pub const MAX_PAYLOAD_BYTES: u32 = 65_500;
    /// Default sample count for the windowed loss percentage
    pub const DEFAULT_LOSS_WINDOW: usize = 100;
    /// Default per-target history ring capacity
    pub const DEFAULT_HISTORY_CAPACITY: usize = 900;
    pub const DEFAULT_ENABLE_COLOR: bool = true;
}
