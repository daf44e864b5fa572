//! Sample and metric record data models

use chrono::{DateTime, Local, SecondsFormat, TimeZone};
use serde::{Deserialize, Serialize};

/// CSV header row, written once when the log file is newly created
pub const CSV_HEADER: &str =
    "timestamp_iso,epoch_seconds,target,rtt_ms,sent,received,window_loss_pct,jitter_ms";

/// A single probe observation for one target.
///
/// An absent `rtt_ms` encodes a timeout or unreachable probe.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Wall-clock timestamp in epoch seconds
    pub timestamp: f64,
    /// Round-trip time in milliseconds, absent on timeout
    pub rtt_ms: Option<f64>,
}

impl Sample {
    /// Create a sample carrying a reply RTT
    pub fn reply(timestamp: f64, rtt_ms: f64) -> Self {
        Self {
            timestamp,
            rtt_ms: Some(rtt_ms),
        }
    }

    /// Create a sample recording a missed reply
    pub fn miss(timestamp: f64) -> Self {
        Self {
            timestamp,
            rtt_ms: None,
        }
    }

    /// Whether this sample carries a reply
    pub fn is_reply(&self) -> bool {
        self.rtt_ms.is_some()
    }
}

/// One derived metric record per processed sample, the unit handed to
/// consumers (console sinks, CSV log, JSON lines).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricRecord {
    /// Probe target this record belongs to
    pub target: String,
    /// Wall-clock timestamp of the underlying probe, epoch seconds
    pub timestamp: f64,
    /// Round-trip time in milliseconds, absent on timeout
    pub rtt_ms: Option<f64>,
    /// Probes attempted for this target so far
    pub sent: u64,
    /// Replies received for this target so far
    pub received: u64,
    /// Windowed packet loss percentage over the recent sample window
    pub window_loss_pct: f64,
    /// Smoothed jitter (EWMA of consecutive RTT deltas) in milliseconds
    pub jitter_ms: f64,
}

impl MetricRecord {
    /// Local wall-clock timestamp for this record, if representable
    pub fn local_time(&self) -> Option<DateTime<Local>> {
        let secs = self.timestamp.trunc() as i64;
        let nanos = (self.timestamp.fract() * 1e9) as u32;
        Local.timestamp_opt(secs, nanos).single()
    }

    /// ISO-8601 timestamp for the CSV log
    pub fn timestamp_iso(&self) -> String {
        self.local_time()
            .map(|t| t.to_rfc3339_opts(SecondsFormat::Millis, false))
            .unwrap_or_default()
    }

    /// Wall-clock time formatted as `HH:MM:SS` for the event line
    pub fn clock(&self) -> String {
        self.local_time()
            .map(|t| t.format("%H:%M:%S").to_string())
            .unwrap_or_else(|| "--:--:--".to_string())
    }

    /// Human-readable event line for this record.
    ///
    /// `"[HH:MM:SS] <target> <rtt> ms, jitter <j> ms"` on reply,
    /// `"[HH:MM:SS] <target> timeout"` otherwise.
    pub fn event_line(&self) -> String {
        match self.rtt_ms {
            Some(rtt) => format!(
                "[{}] {} {:.2} ms, jitter {:.2} ms",
                self.clock(),
                self.target,
                rtt,
                self.jitter_ms
            ),
            None => format!("[{}] {} timeout", self.clock(), self.target),
        }
    }

    /// CSV row matching [`CSV_HEADER`].
    ///
    /// `epoch_seconds`, `rtt_ms`, and `jitter_ms` carry 3 decimals,
    /// `window_loss_pct` 2; an absent RTT leaves the field empty.
    pub fn csv_row(&self) -> String {
        let rtt_field = self
            .rtt_ms
            .map(|rtt| format!("{:.3}", rtt))
            .unwrap_or_default();
        format!(
            "{},{:.3},{},{},{},{},{:.2},{:.3}",
            self.timestamp_iso(),
            self.timestamp,
            self.target,
            rtt_field,
            self.sent,
            self.received,
            self.window_loss_pct,
            self.jitter_ms
        )
    }
}
