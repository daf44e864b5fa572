//! Incremental per-target metrics engine
//!
//! Owns all per-target state: a bounded ring of recent samples, send/receive
//! counters, and the jitter EWMA. State is mutated only by the single consumer
//! draining the result stream, so the engine itself needs no locking. Each
//! processed sample synchronously yields one [`MetricRecord`]; pacing and
//! buffering are consumer concerns.

use crate::models::{MetricRecord, Sample};
use std::collections::HashMap;
use std::collections::VecDeque;

/// Fixed EWMA smoothing divisor for jitter: `ewma += (delta - ewma) / 16`
pub const JITTER_SMOOTHING: f64 = 16.0;

/// Incremental state for one probe target
#[derive(Debug, Clone)]
pub struct TargetState {
    /// Bounded ring of recent samples, oldest first
    history: VecDeque<Sample>,
    /// Last observed RTT, input to the next jitter delta
    prev_rtt: Option<f64>,
    /// Smoothed jitter in milliseconds
    jitter_ewma: f64,
    /// Probes attempted
    sent: u64,
    /// Replies received
    received: u64,
}

impl TargetState {
    fn new(capacity: usize) -> Self {
        Self {
            history: VecDeque::with_capacity(capacity),
            prev_rtt: None,
            jitter_ewma: 0.0,
            sent: 0,
            received: 0,
        }
    }

    /// Recent samples, oldest first
    pub fn history(&self) -> impl Iterator<Item = &Sample> {
        self.history.iter()
    }

    /// Number of samples currently retained
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Current smoothed jitter in milliseconds
    pub fn jitter_ms(&self) -> f64 {
        self.jitter_ewma
    }

    /// (sent, received) counters
    pub fn counters(&self) -> (u64, u64) {
        (self.sent, self.received)
    }

    /// Most recent sample, if any
    pub fn last_sample(&self) -> Option<&Sample> {
        self.history.back()
    }
}

/// Per-target metrics engine over an unbounded probe stream with bounded
/// memory
#[derive(Debug)]
pub struct MetricsEngine {
    targets: HashMap<String, TargetState>,
    history_capacity: usize,
    loss_window: usize,
}

impl MetricsEngine {
    /// Create an engine with the given history ring capacity and loss window.
    /// Both are clamped to at least 1.
    pub fn new(history_capacity: usize, loss_window: usize) -> Self {
        Self {
            targets: HashMap::new(),
            history_capacity: history_capacity.max(1),
            loss_window: loss_window.max(1),
        }
    }

    /// Process one sample for `target` and synchronously derive its metric
    /// record.
    ///
    /// Appends to the bounded history (evicting the oldest sample on
    /// overflow), advances the counters, and updates the jitter EWMA on
    /// reply samples. Timestamps are not assumed monotonic: a late probe from
    /// an earlier round is recorded in arrival order.
    pub fn record(&mut self, target: &str, timestamp: f64, rtt_ms: Option<f64>) -> MetricRecord {
        let capacity = self.history_capacity;
        let state = self
            .targets
            .entry(target.to_string())
            .or_insert_with(|| TargetState::new(capacity));

        if state.history.len() == capacity {
            state.history.pop_front();
        }
        state.history.push_back(Sample { timestamp, rtt_ms });

        state.sent += 1;
        if let Some(rtt) = rtt_ms {
            state.received += 1;
            if let Some(prev) = state.prev_rtt {
                let delta = (rtt - prev).abs();
                state.jitter_ewma += (delta - state.jitter_ewma) / JITTER_SMOOTHING;
            }
            state.prev_rtt = Some(rtt);
        }
        // A miss leaves prev_rtt and the EWMA untouched: jitter measures
        // variation between consecutive replies, not gaps.

        let window_loss_pct = Self::loss_of(state, self.loss_window);

        MetricRecord {
            target: target.to_string(),
            timestamp,
            rtt_ms,
            sent: state.sent,
            received: state.received,
            window_loss_pct,
            jitter_ms: state.jitter_ewma,
        }
    }

    /// Windowed loss percentage for `target` over the most recent
    /// `min(window, history_len)` samples; 0.0 for unknown targets or empty
    /// history.
    pub fn windowed_loss(&self, target: &str) -> f64 {
        self.targets
            .get(target)
            .map(|state| Self::loss_of(state, self.loss_window))
            .unwrap_or(0.0)
    }

    fn loss_of(state: &TargetState, window: usize) -> f64 {
        let len = state.history.len();
        if len == 0 {
            return 0.0;
        }
        let n = window.min(len);
        let misses = state
            .history
            .iter()
            .rev()
            .take(n)
            .filter(|sample| sample.rtt_ms.is_none())
            .count();
        100.0 * misses as f64 / n as f64
    }

    /// Per-target state, if the target has been observed
    pub fn state(&self, target: &str) -> Option<&TargetState> {
        self.targets.get(target)
    }

    /// Observed targets in arbitrary order
    pub fn targets(&self) -> impl Iterator<Item = &str> {
        self.targets.keys().map(String::as_str)
    }

    /// Drop all per-target state: history, counters, and jitter for every
    /// target
    pub fn clear(&mut self) {
        self.targets.clear();
    }

    /// Configured history ring capacity
    pub fn history_capacity(&self) -> usize {
        self.history_capacity
    }

    /// Configured loss window
    pub fn loss_window(&self) -> usize {
        self.loss_window
    }
}
