//! Console and JSON-lines metric sinks

use crate::models::MetricRecord;
use crate::output::MetricSink;
use async_trait::async_trait;
use colored::Colorize;
use std::collections::BTreeMap;
use std::time::{Duration, Instant};

/// Minimum interval between per-target summary redraws
pub const DEFAULT_REDRAW_INTERVAL: Duration = Duration::from_millis(500);

/// Console sink printing one event line per record and, when enabled, a
/// rate-limited per-target summary.
///
/// The redraw throttle keeps high probe rates from flooding the terminal;
/// event lines themselves are never dropped.
pub struct ConsoleSink {
    use_color: bool,
    summary_enabled: bool,
    min_redraw: Duration,
    last_redraw: Option<Instant>,
    latest: BTreeMap<String, MetricRecord>,
}

impl ConsoleSink {
    /// Create a console sink
    pub fn new(use_color: bool, summary_enabled: bool) -> Self {
        Self {
            use_color,
            summary_enabled,
            min_redraw: DEFAULT_REDRAW_INTERVAL,
            last_redraw: None,
            latest: BTreeMap::new(),
        }
    }

    /// Override the minimum summary redraw interval
    pub fn with_redraw_interval(mut self, min_redraw: Duration) -> Self {
        self.min_redraw = min_redraw;
        self
    }

    fn format_event_line(&self, record: &MetricRecord) -> String {
        let line = record.event_line();
        if !self.use_color {
            return line;
        }
        if record.rtt_ms.is_some() {
            line.green().to_string()
        } else {
            line.red().to_string()
        }
    }

    fn summary_due(&self) -> bool {
        match self.last_redraw {
            Some(at) => at.elapsed() >= self.min_redraw,
            None => true,
        }
    }

    fn format_summary(&self) -> String {
        let mut parts = Vec::with_capacity(self.latest.len());
        for (target, record) in &self.latest {
            let rtt = record
                .rtt_ms
                .map(|rtt| format!("{:.1}ms", rtt))
                .unwrap_or_else(|| "-".to_string());
            parts.push(format!(
                "{}: {} loss {:.1}% jitter {:.2}ms {}/{}",
                target,
                rtt,
                record.window_loss_pct,
                record.jitter_ms,
                record.received,
                record.sent
            ));
        }
        let summary = format!("stats | {}", parts.join(" | "));
        if self.use_color {
            summary.dimmed().to_string()
        } else {
            summary
        }
    }
}

#[async_trait]
impl MetricSink for ConsoleSink {
    async fn on_record(&mut self, record: &MetricRecord) {
        println!("{}", self.format_event_line(record));

        if !self.summary_enabled {
            return;
        }
        self.latest.insert(record.target.clone(), record.clone());
        if self.summary_due() {
            self.last_redraw = Some(Instant::now());
            println!("{}", self.format_summary());
        }
    }

    async fn flush(&mut self) {
        if self.summary_enabled && !self.latest.is_empty() {
            println!("{}", self.format_summary());
        }
    }
}

/// Sink emitting one JSON object per metric record to stdout
#[derive(Debug, Default)]
pub struct JsonSink;

impl JsonSink {
    /// Create a JSON-lines sink
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl MetricSink for JsonSink {
    async fn on_record(&mut self, record: &MetricRecord) {
        match serde_json::to_string(record) {
            Ok(line) => println!("{}", line),
            Err(err) => eprintln!("{{\"error\":\"failed to serialize record: {}\"}}", err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(target: &str, rtt_ms: Option<f64>) -> MetricRecord {
        MetricRecord {
            target: target.to_string(),
            timestamp: 1_700_000_000.0,
            rtt_ms,
            sent: 4,
            received: 3,
            window_loss_pct: 25.0,
            jitter_ms: 1.5,
        }
    }

    #[test]
    fn test_event_line_plain_when_color_disabled() {
        let sink = ConsoleSink::new(false, false);
        let line = sink.format_event_line(&record("a", Some(10.0)));
        assert!(!line.contains('\x1b'));
        assert!(line.contains("10.00 ms"));
    }

    #[test]
    fn test_summary_lists_targets_in_order() {
        let mut sink = ConsoleSink::new(false, true);
        sink.latest.insert("b".to_string(), record("b", None));
        sink.latest.insert("a".to_string(), record("a", Some(10.0)));

        let summary = sink.format_summary();
        let a_pos = summary.find("a:").unwrap();
        let b_pos = summary.find("b:").unwrap();
        assert!(a_pos < b_pos);
        assert!(summary.contains("loss 25.0%"));
        assert!(summary.contains("3/4"));
    }

    #[test]
    fn test_summary_throttle() {
        let mut sink =
            ConsoleSink::new(false, true).with_redraw_interval(Duration::from_secs(3600));
        assert!(sink.summary_due());
        sink.last_redraw = Some(Instant::now());
        assert!(!sink.summary_due());
    }

    #[tokio::test]
    async fn test_json_sink_does_not_panic() {
        let mut sink = JsonSink::new();
        sink.on_record(&record("a", Some(1.0))).await;
        sink.on_record(&record("a", None)).await;
    }
}
