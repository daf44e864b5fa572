//! Data models for configuration, samples, and metric records

pub mod config;
pub mod metrics;

pub use config::Config;
pub use metrics::{MetricRecord, Sample, CSV_HEADER};
