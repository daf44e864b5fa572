//! Probe round scheduler
//!
//! Drives the fixed probing cadence: one round per interval, one concurrently
//! spawned probe per target per round, so a slow or unreachable target never
//! delays the cadence of the others. Rounds are scheduled from the nominal
//! tick time rather than from completion time, so ticks self-correct instead
//! of drifting; overlapping probes for the same target simply run
//! concurrently.

use crate::defaults;
use crate::error::{AppError, Result};
use crate::parser::LatencyParser;
use crate::probe::{ProbeRunner, ProbeSpec};
use crate::stream::{ProbeResult, ResultSender};
use crate::types::IpVersion;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};

/// Scheduler lifecycle states. There are no others.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    /// Never started
    Idle,
    /// Firing probe rounds
    Running,
    /// Stopped; in-flight probes may still deliver results
    Stopped,
}

/// Parameters for a scheduled probing run
#[derive(Debug, Clone)]
pub struct ScheduleParams {
    /// Probe targets, one concurrent probe each per round
    pub targets: Vec<String>,
    /// Interval between round starts
    pub interval: Duration,
    /// Per-probe reply timeout
    pub timeout: Duration,
    /// ICMP payload size in bytes
    pub payload_bytes: u32,
    /// IP protocol version
    pub ip_version: IpVersion,
}

impl ScheduleParams {
    /// Validate the stated floors; violations are rejected, not clamped
    pub fn validate(&self) -> Result<()> {
        if self.targets.is_empty() {
            return Err(AppError::validation(
                "Cannot start scheduler with an empty target list",
            ));
        }
        if self.targets.iter().any(|t| t.trim().is_empty()) {
            return Err(AppError::validation("Probe target cannot be empty"));
        }
        if self.interval < Duration::from_secs_f64(defaults::MIN_INTERVAL_SECONDS) {
            return Err(AppError::validation(format!(
                "Interval must be at least {}s",
                defaults::MIN_INTERVAL_SECONDS
            )));
        }
        if self.timeout < Duration::from_millis(1) {
            return Err(AppError::validation("Timeout must be at least 1ms"));
        }
        if self.payload_bytes == 0 {
            return Err(AppError::validation("Payload size must be at least 1 byte"));
        }
        Ok(())
    }

    fn probe_spec(&self) -> ProbeSpec {
        ProbeSpec {
            timeout: self.timeout,
            payload_bytes: self.payload_bytes,
            ip_version: self.ip_version,
        }
    }
}

/// Fires one probe per target per interval through a [`ProbeRunner`]
pub struct Scheduler {
    runner: Arc<dyn ProbeRunner>,
    parser: Arc<LatencyParser>,
    state: SchedulerState,
    stop_tx: Option<watch::Sender<bool>>,
    drive: Option<JoinHandle<()>>,
    rounds: Arc<AtomicU64>,
}

impl Scheduler {
    /// Create a scheduler over the given probe runner with the default parser
    pub fn new(runner: Arc<dyn ProbeRunner>) -> Self {
        Self::with_parser(runner, LatencyParser::new())
    }

    /// Create a scheduler with a custom latency parser
    pub fn with_parser(runner: Arc<dyn ProbeRunner>, parser: LatencyParser) -> Self {
        Self {
            runner,
            parser: Arc::new(parser),
            state: SchedulerState::Idle,
            stop_tx: None,
            drive: None,
            rounds: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Current lifecycle state
    pub fn state(&self) -> SchedulerState {
        self.state
    }

    /// Number of probe rounds dispatched since the last start
    pub fn rounds_dispatched(&self) -> u64 {
        self.rounds.load(Ordering::Relaxed)
    }

    /// Begin firing probe rounds.
    ///
    /// Validates parameters synchronously and transitions to `Running`.
    /// Restarting after `stop()` is permitted and begins fresh scheduling;
    /// starting while already running is an error.
    pub fn start(&mut self, params: ScheduleParams, sender: ResultSender) -> Result<()> {
        if self.state == SchedulerState::Running {
            return Err(AppError::scheduler("Scheduler is already running"));
        }
        params.validate()?;

        let (stop_tx, stop_rx) = watch::channel(false);
        self.rounds.store(0, Ordering::Relaxed);

        let handle = tokio::spawn(drive_rounds(
            Arc::clone(&self.runner),
            Arc::clone(&self.parser),
            params,
            sender,
            stop_rx,
            Arc::clone(&self.rounds),
        ));

        self.stop_tx = Some(stop_tx);
        self.drive = Some(handle);
        self.state = SchedulerState::Running;
        Ok(())
    }

    /// Stop scheduling new rounds.
    ///
    /// Cooperative and idempotent: in-flight probes run to completion and
    /// still deliver results; calling `stop()` twice or before any `start()`
    /// is a no-op.
    pub fn stop(&mut self) {
        if let Some(stop_tx) = self.stop_tx.take() {
            let _ = stop_tx.send(true);
        }
        self.drive.take();
        if self.state == SchedulerState::Running {
            self.state = SchedulerState::Stopped;
        }
    }
}

impl Drop for Scheduler {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Wall-clock timestamp in epoch seconds
fn epoch_now() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or(0.0)
}

async fn drive_rounds(
    runner: Arc<dyn ProbeRunner>,
    parser: Arc<LatencyParser>,
    params: ScheduleParams,
    sender: ResultSender,
    mut stop_rx: watch::Receiver<bool>,
    rounds: Arc<AtomicU64>,
) {
    let spec = params.probe_spec();
    let mut ticker = interval(params.interval);
    // Ticks are anchored to the nominal schedule; after a saturated stretch
    // the cadence catches up rather than drifting cumulatively.
    ticker.set_missed_tick_behavior(MissedTickBehavior::Burst);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                rounds.fetch_add(1, Ordering::Relaxed);
                for target in &params.targets {
                    let runner = Arc::clone(&runner);
                    let parser = Arc::clone(&parser);
                    let sender = sender.clone();
                    let target = target.clone();
                    tokio::spawn(async move {
                        let timestamp = epoch_now();
                        let output = runner.probe(&target, &spec).await;
                        let rtt_ms = parser.parse(&output.raw);
                        sender.send(ProbeResult {
                            target,
                            timestamp,
                            rtt_ms,
                            raw_output: output.raw,
                        });
                    });
                }
            }
            _ = stop_rx.changed() => break,
        }
    }
}
