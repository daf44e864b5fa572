//! Metric record consumers
//!
//! Consumers subscribe to the stream of metric records through the
//! [`MetricSink`] trait. Sinks own their own pacing: the console sink rate
//! limits its summary redraw, the CSV sink appends a row per record, the JSON
//! sink emits one object per record. Sink failures never abort probing.

mod csv;
mod event;

pub use csv::CsvSink;
pub use event::{ConsoleSink, JsonSink};

use crate::models::MetricRecord;
use async_trait::async_trait;

/// A consumer of the metric record stream.
///
/// `on_record` is called once per record by the single consumer loop;
/// implementations must not fail the run; persistence or render errors are
/// their own concern to log and swallow.
#[async_trait]
pub trait MetricSink: Send {
    /// Handle one metric record
    async fn on_record(&mut self, record: &MetricRecord);

    /// Flush any buffered output at end of run
    async fn flush(&mut self) {}
}

/// Fan-out over a set of sinks
pub struct SinkSet {
    sinks: Vec<Box<dyn MetricSink>>,
}

impl SinkSet {
    /// Create an empty sink set
    pub fn new() -> Self {
        Self { sinks: Vec::new() }
    }

    /// Add a sink to the set
    pub fn push(&mut self, sink: Box<dyn MetricSink>) {
        self.sinks.push(sink);
    }

    /// Number of registered sinks
    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    /// Whether no sinks are registered
    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }

    /// Deliver one record to every sink in registration order
    pub async fn dispatch(&mut self, record: &MetricRecord) {
        for sink in &mut self.sinks {
            sink.on_record(record).await;
        }
    }

    /// Flush all sinks
    pub async fn flush(&mut self) {
        for sink in &mut self.sinks {
            sink.flush().await;
        }
    }
}

impl Default for SinkSet {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct CountingSink {
        seen: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl MetricSink for CountingSink {
        async fn on_record(&mut self, _record: &MetricRecord) {
            self.seen.fetch_add(1, Ordering::Relaxed);
        }
    }

    fn record() -> MetricRecord {
        MetricRecord {
            target: "t".to_string(),
            timestamp: 100.0,
            rtt_ms: Some(1.0),
            sent: 1,
            received: 1,
            window_loss_pct: 0.0,
            jitter_ms: 0.0,
        }
    }

    #[tokio::test]
    async fn test_sink_set_fans_out() {
        let seen = Arc::new(AtomicUsize::new(0));
        let mut sinks = SinkSet::new();
        sinks.push(Box::new(CountingSink { seen: seen.clone() }));
        sinks.push(Box::new(CountingSink { seen: seen.clone() }));
        assert_eq!(sinks.len(), 2);

        sinks.dispatch(&record()).await;
        sinks.dispatch(&record()).await;
        assert_eq!(seen.load(Ordering::Relaxed), 4);
    }

    #[tokio::test]
    async fn test_empty_sink_set() {
        let mut sinks = SinkSet::new();
        assert!(sinks.is_empty());
        sinks.dispatch(&record()).await;
        sinks.flush().await;
    }
}
